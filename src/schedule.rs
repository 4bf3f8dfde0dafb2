//! Code for building the year-by-year cash-flow schedule of a project.
use crate::assumptions::EconomicAssumptions;
use crate::finance::{annual_generation, annual_om_cost, itc_value, price_for_year, upfront_capex};
use crate::input::check_positive;
use crate::units::{Capacity, Energy, Money, MoneyPerEnergy};
use anyhow::Result;
use serde::Serialize;

/// Number of decimal places prices are rounded to for presentation
const PRICE_DECIMAL_PLACES: i32 = 4;

/// Number of decimal places monetary values are rounded to for presentation
const MONEY_DECIMAL_PLACES: i32 = 2;

/// One year of a cash-flow schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowYear {
    /// Project year, with 0 being the year of installation
    pub year: u32,
    /// Energy price for the year ($/kWh). There is no price for year 0.
    pub price_per_kwh: Option<MoneyPerEnergy>,
    /// Energy generated in the year (kWh)
    pub generation_kwh: Energy,
    /// Operations and maintenance cost for the year
    pub om_cost: Money,
    /// Net cash flow for the year
    pub net_cashflow: Money,
    /// Sum of net cash flows up to and including this year
    pub cumulative_cashflow: Money,
}

impl CashFlowYear {
    /// A copy of this row with the price and cash flows rounded for presentation.
    ///
    /// Halves are rounded away from zero.
    pub fn rounded(&self) -> CashFlowYear {
        CashFlowYear {
            price_per_kwh: self
                .price_per_kwh
                .map(|price| price.round_dp(PRICE_DECIMAL_PLACES)),
            net_cashflow: self.net_cashflow.round_dp(MONEY_DECIMAL_PLACES),
            cumulative_cashflow: self.cumulative_cashflow.round_dp(MONEY_DECIMAL_PLACES),
            ..self.clone()
        }
    }
}

/// A cash-flow schedule, ordered by year
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    /// One row per year from 0 to the horizon inclusive
    pub rows: Vec<CashFlowYear>,
    /// The net cash flow for each year, starting with year 0
    pub cash_flows: Vec<Money>,
}

/// Build the cash-flow schedule for a project.
///
/// Year 0 holds the investment, i.e. the capital cost less the tax credit. In each following year
/// the system saves the cost of the energy it generates at that year's escalated price, less the
/// O&M cost.
///
/// # Arguments
///
/// * `system_size` - Installed DC capacity
/// * `base_price` - Energy price in year 1
/// * `years` - Project horizon in years
/// * `assumptions` - Economic assumptions
pub fn build_schedule(
    system_size: Capacity,
    base_price: MoneyPerEnergy,
    years: u32,
    assumptions: &EconomicAssumptions,
) -> Result<Schedule> {
    check_positive(years, "years")?;
    check_positive(base_price, "base_price_per_kwh")?;

    let capex = upfront_capex(system_size, assumptions.capex_per_watt)?;
    let itc = itc_value(capex, assumptions.itc_rate)?;
    let generation = annual_generation(system_size, assumptions.gen_kwh_per_kw_year)?;
    let om_cost = annual_om_cost(system_size, assumptions.om_per_kw_year)?;

    let capacity = years as usize + 1;
    let mut rows = Vec::with_capacity(capacity);
    let mut cash_flows = Vec::with_capacity(capacity);

    let investment = itc - capex;
    rows.push(CashFlowYear {
        year: 0,
        price_per_kwh: None,
        generation_kwh: Energy(0.0),
        om_cost: Money(0.0),
        net_cashflow: investment,
        cumulative_cashflow: investment,
    });
    cash_flows.push(investment);

    let mut cumulative = investment;
    for year in 1..=years {
        let price = price_for_year(base_price, year, assumptions.price_escalation)?;
        let gross_savings = generation * price;
        let net = gross_savings - om_cost;
        cumulative = cumulative + net;

        rows.push(CashFlowYear {
            year,
            price_per_kwh: Some(price),
            generation_kwh: generation,
            om_cost,
            net_cashflow: net,
            cumulative_cashflow: cumulative,
        });
        cash_flows.push(net);
    }

    Ok(Schedule { rows, cash_flows })
}

/// Find the payback year of a project.
///
/// This is the first year in which the cumulative cash flow is non-negative. No interpolation is
/// done within a year. If the tax credit alone covers the capital cost, this is year 0.
///
/// # Returns
///
/// The payback year or `None` if the project does not pay back within the horizon.
pub fn payback_year(rows: &[CashFlowYear]) -> Option<u32> {
    rows.iter()
        .find(|row| row.cumulative_cashflow >= Money(0.0))
        .map(|row| row.year)
}
