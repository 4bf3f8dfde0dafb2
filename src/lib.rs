//! Common functionality for solar_model.
//!
//! The model projects the cash flows of a solar installation over its lifetime and derives its
//! internal rate of return and payback period. The entry point is [`scenario::run_model`].
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod assumptions;
pub mod cli;
pub mod error;
pub mod finance;
pub mod input;
pub mod log;
pub mod output;
pub mod prices;
pub mod scenario;
pub mod schedule;
pub mod settings;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the config folder for the program, located in the user's config directory
pub fn get_solar_model_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config dir on this platform; fall back on the current directory
        return PathBuf::from(".");
    };
    config_dir.push("solar_model");

    config_dir
}
