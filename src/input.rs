//! Common routines for handling input data.
use crate::error::ModelError;
use anyhow::{Context, Result, ensure};
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::fs;
use std::path::Path;

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Check that a value is a finite number strictly greater than zero
pub fn check_positive<T>(value: T, name: &str) -> Result<()>
where
    T: Into<f64> + Copy + Display,
{
    let raw: f64 = value.into();
    ensure!(
        raw.is_finite() && raw > 0.0,
        ModelError::InvalidInput(format!("{name} must be > 0 (got {value})"))
    );

    Ok(())
}

/// Check that a value is a finite number greater than or equal to zero
pub fn check_non_negative<T>(value: T, name: &str) -> Result<()>
where
    T: Into<f64> + Copy + Display,
{
    let raw: f64 = value.into();
    ensure!(
        raw.is_finite() && raw >= 0.0,
        ModelError::InvalidInput(format!("{name} must be >= 0 (got {value})"))
    );

    Ok(())
}

/// Check that a value is a proportion, i.e. between 0 and 1 inclusive
pub fn check_proportion<T>(value: T, name: &str) -> Result<()>
where
    T: Into<f64> + Copy + Display,
{
    let raw: f64 = value.into();
    ensure!(
        (0.0..=1.0).contains(&raw),
        ModelError::InvalidInput(format!("{name} must be between 0 and 1 (got {value})"))
    );

    Ok(())
}
