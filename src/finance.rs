//! General functions related to finance.
//!
//! Every formula validates its own arguments and fails with [`ModelError::InvalidInput`] rather
//! than clamping, so that a bad parameter can never silently produce a misleading result.
//!
//! [`ModelError::InvalidInput`]: crate::error::ModelError::InvalidInput
use crate::input::{check_non_negative, check_positive, check_proportion};
use crate::units::{
    Capacity, Dimensionless, Energy, EnergyPerCapacity, Money, MoneyPerCapacity, MoneyPerEnergy,
    MoneyPerWatt,
};
use anyhow::Result;
use log::debug;

/// Initial guess for the IRR solver
const IRR_INITIAL_GUESS: f64 = 0.1;

/// Maximum number of Newton-Raphson iterations for the IRR solver
const IRR_MAX_ITERATIONS: u32 = 100;

/// The IRR has converged once the change in rate between iterations is smaller than this
const IRR_TOLERANCE: f64 = 1e-12;

/// The bracket searched by bisection if Newton-Raphson fails
const IRR_BRACKET: (f64, f64) = (-0.9999, 100.0);

/// Maximum number of bisection iterations for the IRR solver
const IRR_MAX_BISECTIONS: u32 = 200;

/// Calculates the upfront capital cost of a system.
///
/// # Arguments
///
/// * `system_size` - Installed DC capacity
/// * `capex_per_watt` - Installed cost per watt
pub fn upfront_capex(system_size: Capacity, capex_per_watt: MoneyPerWatt) -> Result<Money> {
    check_positive(system_size, "system_size_kw")?;
    check_positive(capex_per_watt, "capex_per_watt")?;

    Ok(capex_per_watt * system_size.to_watts())
}

/// Calculates the value of the investment tax credit (ITC) for a given capital cost
pub fn itc_value(capex: Money, itc_rate: Dimensionless) -> Result<Money> {
    check_non_negative(capex, "capex")?;
    check_proportion(itc_rate, "itc_rate")?;

    Ok(capex * itc_rate)
}

/// Calculates the annual energy generated by a system
pub fn annual_generation(
    system_size: Capacity,
    generation_per_kw_year: EnergyPerCapacity,
) -> Result<Energy> {
    check_positive(system_size, "system_size_kw")?;
    check_positive(generation_per_kw_year, "gen_kwh_per_kw_year")?;

    Ok(generation_per_kw_year * system_size)
}

/// Calculates the price of energy in a given year of the project.
///
/// Year 1 is the reference year, for which the base price is used unescalated. The price in year
/// `t` is `base_price * (1 + escalation)^(t - 1)`.
///
/// # Arguments
///
/// * `base_price` - The price in year 1
/// * `year` - The project year (must be at least 1)
/// * `escalation` - Annual price escalation rate
pub fn price_for_year(
    base_price: MoneyPerEnergy,
    year: u32,
    escalation: Dimensionless,
) -> Result<MoneyPerEnergy> {
    check_positive(base_price, "base_price_per_kwh")?;
    check_positive(year, "year")?;
    check_non_negative(escalation, "escalation")?;

    let growth = (Dimensionless(1.0) + escalation).powf(f64::from(year - 1));
    Ok(base_price * growth)
}

/// Calculates the annual operations and maintenance (O&M) cost of a system
pub fn annual_om_cost(system_size: Capacity, om_per_kw_year: MoneyPerCapacity) -> Result<Money> {
    check_positive(system_size, "system_size_kw")?;
    check_non_negative(om_per_kw_year, "om_per_kw_year")?;

    Ok(om_per_kw_year * system_size)
}

/// Calculates the net present value of a series of annual cash flows.
///
/// The first cash flow is taken to occur at time zero and is not discounted.
///
/// # Returns
///
/// The NPV or an error if `rate` is not greater than -1.
pub fn npv(rate: f64, cash_flows: &[Money]) -> Result<Money> {
    check_positive(rate + 1.0, "1 + rate")?;

    Ok(Money(npv_and_derivative(rate, cash_flows).0))
}

/// Calculates the NPV of `cash_flows` at `rate` and its derivative with respect to the rate
fn npv_and_derivative(rate: f64, cash_flows: &[Money]) -> (f64, f64) {
    let one_plus_r = 1.0 + rate;
    let mut discount = 1.0;
    let mut npv = 0.0;
    let mut derivative = 0.0;
    for (t, cash_flow) in cash_flows.iter().enumerate() {
        npv += cash_flow.value() / discount;
        if t > 0 {
            #[allow(clippy::cast_precision_loss)]
            let t = t as f64;
            derivative -= t * cash_flow.value() / (discount * one_plus_r);
        }
        discount *= one_plus_r;
    }

    (npv, derivative)
}

/// Calculates the internal rate of return (IRR) of a series of annual cash flows.
///
/// The IRR is the rate at which the NPV of the cash flows is zero. It is found with
/// Newton-Raphson, starting from a rate of 10%, stopping once the step between successive rates is
/// below 1e-12. If that fails to converge, the root is instead found by bisection over
/// (-99.99%, 10000%), provided the NPV changes sign across that range.
///
/// # Returns
///
/// The IRR as a decimal, or `None` if there are fewer than two cash flows or no rate could be
/// found (e.g. because the project never breaks even).
pub fn irr(cash_flows: &[Money]) -> Option<f64> {
    if cash_flows.len() < 2 {
        return None;
    }

    let rate = irr_newton(cash_flows).or_else(|| {
        debug!("Newton-Raphson failed to find IRR; falling back to bisection");
        irr_bisection(cash_flows)
    })?;

    rate.is_finite().then_some(rate)
}

/// Try to find the IRR with Newton-Raphson
fn irr_newton(cash_flows: &[Money]) -> Option<f64> {
    let mut rate = IRR_INITIAL_GUESS;
    for _ in 0..IRR_MAX_ITERATIONS {
        let (npv, derivative) = npv_and_derivative(rate, cash_flows);
        if !npv.is_finite() || !derivative.is_finite() {
            return None;
        }

        let step = npv / derivative;
        rate -= step;
        if !rate.is_finite() || rate <= -1.0 {
            return None;
        }

        if step.abs() < IRR_TOLERANCE {
            return Some(rate);
        }
    }

    None
}

/// Try to find the IRR by bisection
fn irr_bisection(cash_flows: &[Money]) -> Option<f64> {
    let (mut low, mut high) = IRR_BRACKET;
    let npv_low = npv_and_derivative(low, cash_flows).0;
    let npv_high = npv_and_derivative(high, cash_flows).0;
    if !npv_low.is_finite() || !npv_high.is_finite() || (npv_low < 0.0) == (npv_high < 0.0) {
        return None;
    }

    for _ in 0..IRR_MAX_BISECTIONS {
        let mid = 0.5 * (low + high);
        let npv_mid = npv_and_derivative(mid, cash_flows).0;
        if high - low < IRR_TOLERANCE {
            return Some(mid);
        }

        if (npv_mid < 0.0) == (npv_low < 0.0) {
            low = mid;
        } else {
            high = mid;
        }
    }

    Some(0.5 * (low + high))
}
