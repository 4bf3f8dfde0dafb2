//! The module responsible for writing output data to disk.
use crate::scenario::{ScenarioInput, ScenarioResult};
use crate::units::{Capacity, Energy, Money, MoneyPerEnergy};
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The output file name for the cash-flow table
const CASHFLOWS_FILE_NAME: &str = "cashflows.csv";

/// The output file name for the summary metrics
const SUMMARY_FILE_NAME: &str = "summary.toml";

/// Create a new output directory.
///
/// If the directory already exists and is not empty, an error is returned unless `allow_overwrite`
/// is set.
///
/// # Returns
///
/// Whether an existing directory's contents will be overwritten.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        // Should we allow overwriting?
        let is_empty = output_dir.read_dir()?.next().is_none();
        if is_empty {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use --overwrite to overwrite it."
        );
        return Ok(true);
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(false)
}

/// Represents the summary metrics of a scenario, as written to the summary file
#[derive(Serialize, Debug, PartialEq)]
struct Summary<'a> {
    region: &'a str,
    base_price_per_kwh: MoneyPerEnergy,
    system_size_kw: Capacity,
    years: u32,
    upfront_cost: Money,
    annual_generation_kwh: Energy,
    #[serde(skip_serializing_if = "Option::is_none")]
    irr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payback_years: Option<u32>,
}

/// Write the cash-flow table and summary metrics of a scenario to the output directory
pub fn write_results(
    output_path: &Path,
    input: &ScenarioInput,
    result: &ScenarioResult,
) -> Result<()> {
    let cashflows_path = output_path.join(CASHFLOWS_FILE_NAME);
    write_cashflows(&cashflows_path, result)
        .with_context(|| format!("Failed to write {}", cashflows_path.display()))?;

    let summary = Summary {
        region: &input.region,
        base_price_per_kwh: result.base_price,
        system_size_kw: input.system_size,
        years: input.years,
        upfront_cost: result.upfront_cost,
        annual_generation_kwh: result.annual_generation,
        irr: result.irr,
        payback_years: result.payback_year,
    };
    let summary_path = output_path.join(SUMMARY_FILE_NAME);
    fs::write(&summary_path, toml::to_string(&summary)?)
        .with_context(|| format!("Failed to write {}", summary_path.display()))?;

    Ok(())
}

/// Write the cash-flow table to a CSV file
fn write_cashflows(file_path: &Path, result: &ScenarioResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(file_path)?;
    for row in &result.cashflow_table {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::EconomicAssumptions;
    use crate::fixture::{assumptions, price_table};
    use crate::prices::PriceTable;
    use crate::scenario::run_model;
    use rstest::rstest;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_create_output_directory_new() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("results").join("run1");
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());
    }

    #[test]
    fn test_create_output_directory_existing() {
        let dir = tempdir().unwrap();

        // Empty directories can be reused
        assert!(!create_output_directory(dir.path(), false).unwrap());

        File::create(dir.path().join(CASHFLOWS_FILE_NAME)).unwrap();
        assert!(create_output_directory(dir.path(), false).is_err());
        assert!(create_output_directory(dir.path(), true).unwrap());
    }

    #[rstest]
    fn test_write_results(price_table: PriceTable, assumptions: EconomicAssumptions) {
        let dir = tempdir().unwrap();
        let input = ScenarioInput::new("Sunland", 10.0, 3);
        let result = run_model(&price_table, &assumptions, &input).unwrap();
        write_results(dir.path(), &input, &result).unwrap();

        let cashflows = fs::read_to_string(dir.path().join(CASHFLOWS_FILE_NAME)).unwrap();
        let lines: Vec<_> = cashflows.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0],
            "year,price_per_kwh,generation_kwh,om_cost,net_cashflow,cumulative_cashflow"
        );
        assert_eq!(lines[1], "0,,0.0,0.0,-17500.0,-17500.0");
        assert_eq!(lines[2], "1,0.2,14000.0,150.0,2650.0,-14850.0");

        let summary = fs::read_to_string(dir.path().join(SUMMARY_FILE_NAME)).unwrap();
        assert!(summary.contains("region = \"Sunland\""));
        assert!(summary.contains("upfront_cost = 25000.0"));
        assert!(summary.contains("irr = "));
        assert!(!summary.contains("payback_years"));
    }
}
