//! The `settings` command, for inspecting and editing the program settings file
use crate::settings::{Settings, get_settings_file_path};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::Path;

/// Subcommands for settings
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Open the settings file in a text editor, creating it first if needed
    Edit,
    /// Print the path of the settings file
    Path,
    /// Print the settings in effect, including defaults for anything not set in the file
    Show,
    /// Print a settings file with every setting at its default value
    DumpDefault,
}

impl SettingsSubcommands {
    /// Execute the supplied settings subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::Edit => {
                let file_path = get_settings_file_path();
                write_template_if_missing(&file_path)?;
                println!("Opening settings file for editing: {}", file_path.display());
                edit::edit_file(&file_path)?;
            }
            Self::Path => println!("{}", get_settings_file_path().display()),
            Self::Show => print!("{}", effective_settings(&Settings::load()?)?),
            Self::DumpDefault => print!("{}", Settings::template()?),
        }

        Ok(())
    }
}

/// Write the settings template to `file_path`, unless a file is already there
fn write_template_if_missing(file_path: &Path) -> Result<()> {
    if file_path.is_file() {
        return Ok(());
    }

    if let Some(dir_path) = file_path.parent() {
        fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {}", dir_path.display()))?;
    }
    fs::write(file_path, Settings::template()?)
        .with_context(|| format!("Failed to write {}", file_path.display()))
}

/// Render settings as TOML
fn effective_settings(settings: &Settings) -> Result<String> {
    Ok(toml::to_string(settings)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_template_if_missing() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("solar_model").join("settings.toml");
        write_template_if_missing(&file_path).unwrap();
        assert_eq!(
            fs::read_to_string(&file_path).unwrap(),
            Settings::template().unwrap()
        );

        // User's own settings are kept
        fs::write(&file_path, "overwrite = true\n").unwrap();
        write_template_if_missing(&file_path).unwrap();
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "overwrite = true\n");
    }

    #[test]
    fn test_effective_settings() {
        let settings = Settings {
            prices_file: "data/prices.csv".into(),
            ..Settings::default()
        };
        let rendered = effective_settings(&settings).unwrap();
        assert!(rendered.contains("prices_file = \"data/prices.csv\""));
        assert!(rendered.contains("assumptions_file = \"assumptions.toml\""));
        assert_eq!(toml::from_str::<Settings>(&rendered).unwrap(), settings);
    }
}
