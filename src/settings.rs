//! Program settings, read from `settings.toml` in the user's config directory.
//!
//! The settings give defaults for each run: where the price dataset and economic assumptions
//! live, how much to log and whether an existing output folder may be overwritten. Anything given
//! on the command line takes precedence.
use crate::assumptions::ASSUMPTIONS_FILE_NAME;
use crate::get_solar_model_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use anyhow::{Context, Result};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// The price dataset read when none is given on the command line
pub const DEFAULT_PRICES_FILE: &str = "energy_prices.csv";

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    get_solar_model_config_dir().join(SETTINGS_FILE_NAME)
}

/// Program settings from config file
#[derive(Debug, Clone, DocumentedFields, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Log level: one of off, error, warn, info, debug or trace
    pub log_level: String,
    /// Whether to overwrite output folders which already contain files
    pub overwrite: bool,
    /// CSV file of electricity prices by region, used when no file is given on the command line
    pub prices_file: PathBuf,
    /// TOML file of economic assumptions, used if it exists and none is given on the command line
    pub assumptions_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            overwrite: false,
            prices_file: DEFAULT_PRICES_FILE.into(),
            assumptions_file: ASSUMPTIONS_FILE_NAME.into(),
        }
    }
}

impl Settings {
    /// Read the settings file from the user's config directory, if there is one
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    /// Read settings from `file_path`. Missing files and fields are given default values.
    fn load_from_path(file_path: &Path) -> Result<Settings> {
        if file_path.is_file() {
            read_toml(file_path)
        } else {
            Ok(Settings::default())
        }
    }

    /// The price dataset to read: the one given on the command line, else the configured one
    pub fn prices_path<'a>(&'a self, from_cli: Option<&'a Path>) -> &'a Path {
        from_cli.unwrap_or(&self.prices_file)
    }

    /// The economic assumptions file to read, if any.
    ///
    /// A file given on the command line is always used (and must exist). Otherwise the configured
    /// file is used if it exists; if not, the built-in assumptions apply.
    pub fn assumptions_path<'a>(&'a self, from_cli: Option<&'a Path>) -> Option<&'a Path> {
        from_cli.or_else(|| {
            self.assumptions_file
                .is_file()
                .then_some(self.assumptions_file.as_path())
        })
    }

    /// A settings file with every setting commented out at its default value
    pub fn template() -> Result<String> {
        let defaults: toml::Table = toml::from_str(&toml::to_string(&Settings::default())?)?;

        let mut out = String::from("# Settings for solar_model. Uncomment a line to change it.\n");
        for (field, value) in &defaults {
            let docs = Settings::get_field_docs(field)
                .ok()
                .with_context(|| format!("No documentation for setting {field}"))?;
            writeln!(out)?;
            for line in docs.lines() {
                writeln!(out, "# {}", line.trim())?;
            }
            writeln!(out, "# {field} = {value}")?;
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_from_path_missing_file() {
        let dir = tempdir().unwrap();
        assert_eq!(
            Settings::load_from_path(&dir.path().join(SETTINGS_FILE_NAME)).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn test_load_from_path_partial() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&file_path, "prices_file = \"data/prices.csv\"\n").unwrap();

        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings {
                prices_file: "data/prices.csv".into(),
                ..Settings::default()
            }
        );
    }

    #[test]
    fn test_prices_path() {
        let settings = Settings::default();
        assert_eq!(settings.prices_path(None), Path::new(DEFAULT_PRICES_FILE));
        assert_eq!(
            settings.prices_path(Some(Path::new("other.csv"))),
            Path::new("other.csv")
        );
    }

    #[test]
    fn test_assumptions_path() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            assumptions_file: dir.path().join(ASSUMPTIONS_FILE_NAME),
            ..Settings::default()
        };

        // Configured file is only used once it exists
        assert_eq!(settings.assumptions_path(None), None);
        fs::write(&settings.assumptions_file, "itc_rate = 0.26\n").unwrap();
        assert_eq!(
            settings.assumptions_path(None),
            Some(settings.assumptions_file.as_path())
        );

        // The command line wins, whether or not the file exists
        let cli_path = dir.path().join("missing.toml");
        assert_eq!(
            settings.assumptions_path(Some(&cli_path)),
            Some(cli_path.as_path())
        );
    }

    #[test]
    fn test_template() {
        let template = Settings::template().unwrap();
        assert!(template.contains("# Log level: one of off, error, warn, info, debug or trace"));
        assert!(template.contains("# prices_file = \"energy_prices.csv\""));

        // Uncommenting every setting gives the defaults back
        let uncommented: String = template
            .lines()
            .filter_map(|line| line.strip_prefix("# "))
            .filter(|line| line.contains(" = "))
            .map(|line| format!("{line}\n"))
            .collect();
        let settings: Settings = toml::from_str(&uncommented).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
