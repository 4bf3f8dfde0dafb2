//! The price table, which gives the base electricity price for each region.
//!
//! The table is read from a CSV file with (at least) the columns `state` and `cost_per_kWh`. It is
//! loaded once and then only read from; region names are matched case-insensitively.
use crate::error::ModelError;
use crate::input::input_err_msg;
use crate::units::MoneyPerEnergy;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use indexmap::map::Entry;
use itertools::Itertools;
use log::{debug, warn};
use serde::Deserialize;
use std::path::Path;
use unicase::UniCase;

/// The name of the column containing region names
const REGION_COLUMN: &str = "state";

/// The name of the column containing prices
const PRICE_COLUMN: &str = "cost_per_kWh";

/// Something which can give the base energy price for a region
pub trait PriceLookup {
    /// Get the base price for the given region.
    ///
    /// # Returns
    ///
    /// The price, or a [`ModelError::NotFound`] error if the region is unknown.
    fn price_for(&self, region: &str) -> Result<MoneyPerEnergy>;
}

/// Represents a row of the price CSV file
#[derive(Debug, Deserialize, PartialEq)]
struct PriceRow {
    state: String,
    #[serde(rename = "cost_per_kWh")]
    cost_per_kwh: MoneyPerEnergy,
}

/// An entry in the price table
#[derive(Debug, Clone, PartialEq)]
struct PriceEntry {
    /// The region name as written in the source data
    name: String,
    price: MoneyPerEnergy,
}

/// A table of base electricity prices, keyed by region name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    entries: IndexMap<UniCase<String>, PriceEntry>,
}

impl PriceTable {
    /// Read a price table from the specified CSV file.
    ///
    /// # Returns
    ///
    /// The price table or a [`ModelError::MalformedSource`] error if the file is missing a
    /// required column, has no rows or cannot be parsed.
    pub fn from_path(file_path: &Path) -> Result<PriceTable> {
        let table = read_price_csv(file_path).with_context(|| input_err_msg(file_path))?;
        debug!(
            "Read prices for {} regions from {}",
            table.len(),
            file_path.display()
        );

        Ok(table)
    }

    /// Create a price table from pairs of region names and prices.
    ///
    /// If a region appears more than once, the first price given for it is used.
    pub fn from_pairs<I, S>(pairs: I) -> PriceTable
    where
        I: IntoIterator<Item = (S, MoneyPerEnergy)>,
        S: Into<String>,
    {
        let mut table = PriceTable::default();
        for (name, price) in pairs {
            table.insert(name.into(), price);
        }

        table
    }

    /// Add a price for a region, unless the region is already present
    fn insert(&mut self, name: String, price: MoneyPerEnergy) {
        match self.entries.entry(UniCase::new(name.clone())) {
            Entry::Vacant(entry) => {
                entry.insert(PriceEntry { name, price });
            }
            Entry::Occupied(entry) => {
                warn!(
                    "Duplicate price given for region '{name}'; using first value ({})",
                    entry.get().price
                );
            }
        }
    }

    /// The names of all regions in the table, sorted alphabetically
    pub fn regions(&self) -> Vec<&str> {
        self.entries
            .values()
            .map(|entry| entry.name.as_str())
            .sorted()
            .collect()
    }

    /// Get the name of a region as given in the source data
    pub fn region_name(&self, region: &str) -> Option<&str> {
        self.get(region).map(|entry| entry.name.as_str())
    }

    /// The number of regions in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get(&self, region: &str) -> Option<&PriceEntry> {
        self.entries.get(&UniCase::new(region.to_string()))
    }
}

impl PriceLookup for PriceTable {
    fn price_for(&self, region: &str) -> Result<MoneyPerEnergy> {
        let entry = self.get(region).ok_or_else(|| {
            ModelError::NotFound(format!("Region '{region}' not found in price table"))
        })?;

        Ok(entry.price)
    }
}

/// Read the contents of a price CSV file
fn read_price_csv(file_path: &Path) -> Result<PriceTable> {
    let mut reader = csv::Reader::from_path(file_path)?;

    let headers = reader.headers()?;
    for column in [REGION_COLUMN, PRICE_COLUMN] {
        ensure!(
            headers.iter().any(|header| header == column),
            ModelError::MalformedSource(format!(
                "CSV must contain '{REGION_COLUMN}' and '{PRICE_COLUMN}' columns"
            ))
        );
    }

    let mut table = PriceTable::default();
    for result in reader.deserialize() {
        let row: PriceRow =
            result.map_err(|err| ModelError::MalformedSource(format!("Invalid row: {err}")))?;
        table.insert(row.state, row.cost_per_kwh);
    }

    ensure!(
        !table.is_empty(),
        ModelError::MalformedSource("CSV file cannot be empty".into())
    );

    Ok(table)
}
