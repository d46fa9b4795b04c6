//! Business units and the attributes each commission rule set reads

use serde::{Deserialize, Serialize};
use std::fmt;

/// Business unit owning the deal. Each variant carries only what its own
/// commission rules need.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum BusinessUnit {
    /// Public sector sales
    #[serde(rename = "ESTADO")]
    StateSector,
    /// Regional commercial channel
    #[serde(rename = "GIGALAN")]
    RegionalChannel(RegionalAttributes),
    #[serde(rename = "CORPORATIVO")]
    Corporate,
    /// No unit set, or a code with no commission rules
    #[default]
    #[serde(other)]
    Unassigned,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegionalAttributes {
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub sale_type: Option<SaleType>,
    /// Monthly charge the customer already pays (base currency), used for upgrades
    #[serde(default)]
    pub prior_mrc: Option<f64>,
}

impl RegionalAttributes {
    pub fn new(region: Region, sale_type: SaleType) -> Self {
        Self {
            region: Some(region),
            sale_type: Some(sale_type),
            prior_mrc: None,
        }
    }

    pub fn with_prior_mrc(mut self, prior_mrc: f64) -> Self {
        self.prior_mrc = Some(prior_mrc);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Region {
    Lima,
    ProvincesWithCaching,
    ProvincesWithInternexa,
    ProvincesWithTdp,
    /// Any other region code; earns no regional rate
    Unlisted(String),
}

impl Region {
    pub fn code(&self) -> &str {
        match self {
            Region::Lima => "LIMA",
            Region::ProvincesWithCaching => "PROVINCIAS CON CACHING",
            Region::ProvincesWithInternexa => "PROVINCIAS CON INTERNEXA",
            Region::ProvincesWithTdp => "PROVINCIAS CON TDP",
            Region::Unlisted(code) => code,
        }
    }
}

impl From<String> for Region {
    fn from(code: String) -> Self {
        match code.as_str() {
            "LIMA" => Region::Lima,
            "PROVINCIAS CON CACHING" => Region::ProvincesWithCaching,
            "PROVINCIAS CON INTERNEXA" => Region::ProvincesWithInternexa,
            "PROVINCIAS CON TDP" => Region::ProvincesWithTdp,
            _ => Region::Unlisted(code),
        }
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.code().to_string()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SaleType {
    /// New customer
    New,
    /// Upgrade of an existing customer
    Existing,
    Unlisted(String),
}

impl SaleType {
    pub fn code(&self) -> &str {
        match self {
            SaleType::New => "NUEVO",
            SaleType::Existing => "EXISTENTE",
            SaleType::Unlisted(code) => code,
        }
    }
}

impl From<String> for SaleType {
    fn from(code: String) -> Self {
        match code.as_str() {
            "NUEVO" => SaleType::New,
            "EXISTENTE" => SaleType::Existing,
            _ => SaleType::Unlisted(code),
        }
    }
}

impl From<SaleType> for String {
    fn from(sale_type: SaleType) -> Self {
        sale_type.code().to_string()
    }
}

impl fmt::Display for SaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
