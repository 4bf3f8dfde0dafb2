//! The entry point for running the model for a single scenario.
use crate::assumptions::EconomicAssumptions;
use crate::error::ModelError;
use crate::finance::{annual_generation, irr, upfront_capex};
use crate::input::check_positive;
use crate::prices::PriceLookup;
use crate::schedule::{CashFlowYear, build_schedule, payback_year};
use crate::units::{Capacity, Energy, Money, MoneyPerEnergy};
use anyhow::{Result, ensure};
use log::{debug, info};

/// The inputs chosen by the user for a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioInput {
    /// The region whose electricity price is used
    pub region: String,
    /// Installed DC capacity
    pub system_size: Capacity,
    /// Project horizon in years
    pub years: u32,
}

impl ScenarioInput {
    /// Create a new [`ScenarioInput`]
    pub fn new(region: &str, system_size_kw: f64, years: u32) -> Self {
        Self {
            region: region.to_string(),
            system_size: Capacity(system_size_kw),
            years,
        }
    }

    /// Check that the input is valid for the given assumptions
    fn validate(&self, assumptions: &EconomicAssumptions) -> Result<()> {
        check_positive(self.system_size, "system_size_kw")?;
        check_positive(self.years, "years")?;
        ensure!(
            self.years <= assumptions.project_years,
            ModelError::InvalidInput(format!(
                "years cannot exceed the project horizon of {} years (got {})",
                assumptions.project_years, self.years
            ))
        );

        Ok(())
    }
}

/// The results of running the model for a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    /// The base electricity price for the region
    pub base_price: MoneyPerEnergy,
    /// The cash-flow table, with prices and cash flows rounded for presentation
    pub cashflow_table: Vec<CashFlowYear>,
    /// The capital cost of the system, before the tax credit
    pub upfront_cost: Money,
    /// The energy generated by the system each year
    pub annual_generation: Energy,
    /// The internal rate of return, if there is one
    pub irr: Option<f64>,
    /// The first year in which the project has paid for itself, if it does within the horizon
    pub payback_year: Option<u32>,
}

/// Run the model for a scenario.
///
/// The IRR and payback year are calculated from the unrounded cash flows; only the returned table
/// is rounded.
///
/// # Arguments
///
/// * `prices` - Source of base electricity prices
/// * `assumptions` - Economic assumptions
/// * `input` - The user's choices for the scenario
pub fn run_model<P>(
    prices: &P,
    assumptions: &EconomicAssumptions,
    input: &ScenarioInput,
) -> Result<ScenarioResult>
where
    P: PriceLookup + ?Sized,
{
    input.validate(assumptions)?;

    let base_price = prices.price_for(&input.region)?;
    debug!(
        "Base price for region '{}': {base_price} $/kWh",
        input.region
    );

    let upfront_cost = upfront_capex(input.system_size, assumptions.capex_per_watt)?;
    let annual_generation = annual_generation(input.system_size, assumptions.gen_kwh_per_kw_year)?;
    let schedule = build_schedule(input.system_size, base_price, input.years, assumptions)?;

    let irr = irr(&schedule.cash_flows);
    let payback_year = payback_year(&schedule.rows);
    info!(
        "Ran model for {} kW system in '{}' over {} years",
        input.system_size, input.region, input.years
    );
    if irr.is_none() {
        info!("IRR is undefined for this scenario");
    }
    if payback_year.is_none() {
        info!("Project does not pay back within {} years", input.years);
    }

    Ok(ScenarioResult {
        base_price,
        cashflow_table: schedule.rows.iter().map(CashFlowYear::rounded).collect(),
        upfront_cost,
        annual_generation,
        irr,
        payback_year,
    })
}
