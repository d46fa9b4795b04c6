//! Immutable input snapshot for one financial evaluation

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::BusinessUnit;
use crate::error::Result;

/// Currency tag carried by every monetary amount
///
/// `PEN` and `USD` are accepted as the ledger codes for base and foreign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "BASE", alias = "PEN")]
    Base,
    #[serde(rename = "FOREIGN", alias = "USD")]
    Foreign,
}

/// An amount in its original currency. Base values are always derived from it.
///
/// An amount without a currency tag is base currency, except for supplier
/// costs (see [`RecurringServiceLine::cost1`] and [`FixedCostLine::unit_cost`]),
/// which are quoted in foreign currency.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Money {
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn base(amount: f64) -> Self {
        Self::new(amount, Currency::Base)
    }

    pub fn foreign(amount: f64) -> Self {
        Self::new(amount, Currency::Foreign)
    }
}

/// A monthly service billed to the customer for the life of the contract
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecurringServiceLine {
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_price: Money,
    /// Supplier cost; untagged amounts are foreign currency
    #[serde(default = "untagged_cost", deserialize_with = "supplier_cost")]
    pub cost1: Money,
    #[serde(default = "untagged_cost", deserialize_with = "supplier_cost")]
    pub cost2: Money,
    #[serde(default)]
    pub description: Option<String>,
}

/// A one-time cost spread over a window of periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCostLine {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: f64,
    /// Supplier cost; untagged amounts are foreign currency
    #[serde(default = "untagged_cost", deserialize_with = "supplier_cost")]
    pub unit_cost: Money,
    #[serde(default, deserialize_with = "whole_number")]
    pub start_period: u32,
    #[serde(default = "default_duration", deserialize_with = "whole_number")]
    pub duration_months: u32,
}

impl FixedCostLine {
    pub fn new(quantity: f64, unit_cost: Money, start_period: u32, duration_months: u32) -> Self {
        Self {
            id: None,
            category: None,
            service_type: None,
            quantity,
            unit_cost,
            start_period,
            duration_months,
        }
    }

    /// Number of periods the cost is spread over (a zero duration counts as one)
    pub fn effective_duration(&self) -> u32 {
        self.duration_months.max(1)
    }
}

/// Everything one evaluation needs, frozen at the time it is requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Foreign to base rate locked when the transaction was created
    #[serde(default = "default_exchange_rate", deserialize_with = "null_as_one")]
    pub locked_exchange_rate: f64,

    #[serde(default, deserialize_with = "whole_number")]
    pub contract_term_months: u32,

    /// Manual MRC override; zero means "build it from the service lines"
    #[serde(default, deserialize_with = "null_as_default")]
    pub mrc: Money,

    #[serde(default, deserialize_with = "null_as_default")]
    pub nrc: Money,

    /// Annual cost of capital used to discount the monthly timeline
    #[serde(default, deserialize_with = "null_as_default")]
    pub annual_capital_cost: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub bond_applies: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub bond_rate: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub business_unit: BusinessUnit,

    #[serde(default, deserialize_with = "null_as_default")]
    pub recurring_services: Vec<RecurringServiceLine>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub fixed_costs: Vec<FixedCostLine>,
}

impl Default for TransactionInput {
    fn default() -> Self {
        Self {
            locked_exchange_rate: default_exchange_rate(),
            contract_term_months: 0,
            mrc: Money::default(),
            nrc: Money::default(),
            annual_capital_cost: 0.0,
            bond_applies: false,
            bond_rate: 0.0,
            business_unit: BusinessUnit::default(),
            recurring_services: Vec::new(),
            fixed_costs: Vec::new(),
        }
    }
}

impl TransactionInput {
    /// Parse a single snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

/// Load a JSON array of snapshots for batch evaluation
pub fn load_batch<P: AsRef<Path>>(path: P) -> Result<Vec<TransactionInput>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn default_exchange_rate() -> f64 {
    1.0
}

fn default_duration() -> u32 {
    1
}

fn untagged_cost() -> Money {
    Money::foreign(0.0)
}

/// Wire shape of an amount whose currency tag may be missing or null
#[derive(Deserialize)]
struct UntaggedAmount {
    #[serde(default, deserialize_with = "null_as_default")]
    amount: f64,
    #[serde(default)]
    currency: Option<Currency>,
}

/// Supplier costs are quoted in foreign currency unless tagged otherwise
fn supplier_cost<'de, D>(deserializer: D) -> std::result::Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<UntaggedAmount>::deserialize(deserializer)? {
        Some(raw) => Money::new(raw.amount, raw.currency.unwrap_or(Currency::Foreign)),
        None => untagged_cost(),
    })
}

/// A non-negative whole number, written either as an integer or as a float
/// with no fractional part (`36` or `36.0`). `null` reads as zero.
fn whole_number<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    struct WholeNumber;

    impl<'de> Visitor<'de> for WholeNumber {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative whole number")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<u32, E> {
            u32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<u32, E> {
            u32::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<u32, E> {
            if v.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&v) {
                Ok(v as u32)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<u32, E> {
            Ok(0)
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<u32, E> {
            Ok(0)
        }

        fn visit_some<D2>(self, deserializer: D2) -> std::result::Result<u32, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }
    }

    deserializer.deserialize_option(WholeNumber)
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_one<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_else(default_exchange_rate))
}
