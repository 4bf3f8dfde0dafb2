//! Defines the `EconomicAssumptions` struct, which represents the contents of `assumptions.toml`.
use crate::input::{check_non_negative, check_positive, check_proportion, input_err_msg, read_toml};
use crate::units::{Dimensionless, EnergyPerCapacity, MoneyPerCapacity, MoneyPerWatt};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The default file name for economic assumptions
pub const ASSUMPTIONS_FILE_NAME: &str = "assumptions.toml";

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_unit_param_default!(default_capex_per_watt, MoneyPerWatt, 2.50);
define_unit_param_default!(default_itc_rate, Dimensionless, 0.30);
define_unit_param_default!(default_gen_kwh_per_kw_year, EnergyPerCapacity, 1400.0);
define_unit_param_default!(default_price_escalation, Dimensionless, 0.025);
define_unit_param_default!(default_om_per_kw_year, MoneyPerCapacity, 15.0);
define_param_default!(default_project_years, u32, 25);

/// The fixed economic assumptions used when projecting cash flows.
///
/// Any field may be omitted from the assumptions file, in which case its default is used.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct EconomicAssumptions {
    /// Installed cost of the system ($/W)
    #[serde(default = "default_capex_per_watt")]
    pub capex_per_watt: MoneyPerWatt,
    /// Investment tax credit, as a proportion of the capital cost
    #[serde(default = "default_itc_rate")]
    pub itc_rate: Dimensionless,
    /// Energy generated each year per kW of installed capacity (kWh/kW/year)
    #[serde(default = "default_gen_kwh_per_kw_year")]
    pub gen_kwh_per_kw_year: EnergyPerCapacity,
    /// Annual escalation rate of the electricity price
    #[serde(default = "default_price_escalation")]
    pub price_escalation: Dimensionless,
    /// Operations and maintenance cost per kW of installed capacity ($/kW/year)
    #[serde(default = "default_om_per_kw_year")]
    pub om_per_kw_year: MoneyPerCapacity,
    /// The maximum project horizon in years
    #[serde(default = "default_project_years")]
    pub project_years: u32,
}

impl Default for EconomicAssumptions {
    fn default() -> Self {
        Self {
            capex_per_watt: default_capex_per_watt(),
            itc_rate: default_itc_rate(),
            gen_kwh_per_kw_year: default_gen_kwh_per_kw_year(),
            price_escalation: default_price_escalation(),
            om_per_kw_year: default_om_per_kw_year(),
            project_years: default_project_years(),
        }
    }
}

impl EconomicAssumptions {
    /// Read economic assumptions from the specified file.
    ///
    /// # Returns
    ///
    /// The assumptions or an error if the file is missing or contains invalid values
    pub fn from_path(file_path: &Path) -> Result<EconomicAssumptions> {
        let assumptions: EconomicAssumptions = read_toml(file_path)?;
        assumptions
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(assumptions)
    }

    /// Read economic assumptions from a file if one is given, otherwise use the defaults
    pub fn load(file_path: Option<&Path>) -> Result<EconomicAssumptions> {
        file_path.map_or_else(|| Ok(Self::default()), Self::from_path)
    }

    /// Check that every assumption is within its valid range.
    ///
    /// The formulas also check their arguments when they are used, but this lets a bad assumptions
    /// file be reported as soon as it is loaded.
    pub fn validate(&self) -> Result<()> {
        check_positive(self.capex_per_watt, "capex_per_watt")?;
        check_proportion(self.itc_rate, "itc_rate")?;
        check_positive(self.gen_kwh_per_kw_year, "gen_kwh_per_kw_year")?;
        check_non_negative(self.price_escalation, "price_escalation")?;
        check_non_negative(self.om_per_kw_year, "om_per_kw_year")?;
        check_positive(self.project_years, "project_years")?;

        Ok(())
    }
}
