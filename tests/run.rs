//! Integration tests for the CLI commands.
use solar_model::cli::{RunArgs, RunOpts, handle_regions_command, handle_run_command};
use solar_model::error::{ModelError, model_error};
use solar_model::settings::Settings;
use solar_model::units::MoneyPerEnergy;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Write a price file into `dir`, returning its path
fn create_price_file(dir: &Path) -> PathBuf {
    let file_path = dir.join("energy_prices.csv");
    fs::write(
        &file_path,
        "state,cost_per_kWh
California,0.30
Sunland,0.20
Texas,0.14
",
    )
    .unwrap();

    file_path
}

fn run_args(prices_file: Option<PathBuf>, region: &str) -> RunArgs {
    RunArgs {
        prices_file,
        region: region.into(),
        size: 10.0,
        years: None,
        assumptions: None,
        opts: RunOpts::default(),
    }
}

fn quiet_settings() -> Option<Settings> {
    Some(Settings {
        log_level: "off".into(),
        ..Settings::default()
    })
}

#[test]
fn test_handle_run_command() {
    let dir = tempdir().unwrap();
    let output_dir = dir.path().join("results");
    let mut args = run_args(Some(create_price_file(dir.path())), "SUNLAND");
    args.opts.output_dir = Some(output_dir.clone());

    let result = handle_run_command(&args, quiet_settings()).unwrap();
    assert_eq!(result.cashflow_table.len(), 26);
    assert_eq!(result.payback_year, Some(7));

    let cashflows = fs::read_to_string(output_dir.join("cashflows.csv")).unwrap();
    assert_eq!(cashflows.lines().count(), 27);
    let summary = fs::read_to_string(output_dir.join("summary.toml")).unwrap();
    assert!(summary.contains("region = \"Sunland\""));
    assert!(summary.contains("payback_years = 7"));

    // Running again into the same folder requires permission to overwrite
    assert!(handle_run_command(&args, quiet_settings()).is_err());
    args.opts.overwrite = true;
    handle_run_command(&args, quiet_settings()).unwrap();
}

#[test]
fn test_handle_run_command_with_assumptions() {
    let dir = tempdir().unwrap();
    let assumptions_path = dir.path().join("assumptions.toml");
    fs::write(&assumptions_path, "project_years = 10\nitc_rate = 0.0\n").unwrap();

    let mut args = run_args(Some(create_price_file(dir.path())), "Texas");
    args.assumptions = Some(assumptions_path);

    let result = handle_run_command(&args, quiet_settings()).unwrap();
    assert_eq!(result.cashflow_table.len(), 11);

    // Horizon beyond the one in the assumptions file
    args.years = Some(11);
    let err = handle_run_command(&args, quiet_settings()).unwrap_err();
    assert!(matches!(
        model_error(&err),
        Some(ModelError::InvalidInput(_))
    ));
}

#[test]
fn test_handle_run_command_unknown_region() {
    let dir = tempdir().unwrap();
    let args = run_args(Some(create_price_file(dir.path())), "Atlantis");
    let err = handle_run_command(&args, quiet_settings()).unwrap_err();
    assert_eq!(err.to_string(), "Error running model.");
    assert!(matches!(model_error(&err), Some(ModelError::NotFound(_))));
}

#[test]
fn test_handle_regions_command() {
    let dir = tempdir().unwrap();
    handle_regions_command(Some(&create_price_file(dir.path())), quiet_settings()).unwrap();

    let bad_file = dir.path().join("bad.csv");
    fs::write(&bad_file, "region,price\nTexas,0.14\n").unwrap();
    let err = handle_regions_command(Some(&bad_file), quiet_settings()).unwrap_err();
    assert!(matches!(
        model_error(&err),
        Some(ModelError::MalformedSource(_))
    ));
}

#[test]
fn test_files_from_settings() {
    let dir = tempdir().unwrap();
    let assumptions_path = dir.path().join("assumptions.toml");
    fs::write(&assumptions_path, "project_years = 12\n").unwrap();
    let settings = Settings {
        prices_file: create_price_file(dir.path()),
        assumptions_file: assumptions_path,
        ..quiet_settings().unwrap()
    };

    let args = run_args(None, "texas");
    let result = handle_run_command(&args, Some(settings.clone())).unwrap();
    assert_eq!(result.cashflow_table.len(), 13);
    handle_regions_command(None, Some(settings.clone())).unwrap();

    // Files given on the command line win over the settings
    let other_prices = dir.path().join("other.csv");
    fs::write(&other_prices, "state,cost_per_kWh\nOhio,0.16\n").unwrap();
    let mut args = run_args(Some(other_prices), "Ohio");
    let assumptions_path = dir.path().join("short.toml");
    fs::write(&assumptions_path, "project_years = 3\n").unwrap();
    args.assumptions = Some(assumptions_path);
    let result = handle_run_command(&args, Some(settings)).unwrap();
    assert_eq!(result.base_price, MoneyPerEnergy(0.16));
    assert_eq!(result.cashflow_table.len(), 4);
}

#[test]
fn test_missing_default_prices_file() {
    let dir = tempdir().unwrap();
    let settings = Settings {
        prices_file: dir.path().join("energy_prices.csv"),
        ..quiet_settings().unwrap()
    };
    let args = run_args(None, "Texas");
    let err = handle_run_command(&args, Some(settings)).unwrap_err();
    assert_eq!(err.to_string(), "Failed to load prices.");
}

#[test]
fn test_invalid_log_level_after_logger_initialised() {
    let dir = tempdir().unwrap();
    let prices_file = create_price_file(dir.path());
    handle_regions_command(Some(&prices_file), quiet_settings()).unwrap();

    let settings = Settings {
        log_level: "verbose".into(),
        ..Settings::default()
    };
    let err = handle_regions_command(Some(&prices_file), Some(settings)).unwrap_err();
    assert_eq!(err.to_string(), "Failed to initialise logging.");
}
