//! Commission engine: business-unit-specific tiered rules
//!
//! Every rule set is a pure function of a [`CommissionContext`]. Units with no
//! rules, and inputs missing the attributes a rule needs, pay zero rather than
//! failing.

mod bands;
mod corporate;
mod regional;
mod state_sector;

pub use bands::MarginBand;

use serde::{Deserialize, Serialize};

use crate::transaction::BusinessUnit;

/// Pre-commission figures the rules are evaluated against (base currency)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommissionContext {
    pub contract_term_months: u32,
    pub payback: Option<u32>,
    /// Gross margin ratio computed without commission
    pub gross_margin_ratio: f64,
    pub total_revenue: f64,
    pub mrc_base: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionRule {
    /// No rule set for the business unit
    Unassigned,
    StateSectorSinglePayment,
    StateSectorRecurring,
    RegionalChannel,
    Corporate,
}

/// Commission amount plus which rule and tier produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommissionOutcome {
    pub rule: CommissionRule,
    /// Rate of the matched tier, zero when none matched
    pub rate: f64,
    pub cap: Option<f64>,
    pub amount: f64,
}

impl CommissionOutcome {
    pub fn none(rule: CommissionRule) -> Self {
        Self {
            rule,
            rate: 0.0,
            cap: None,
            amount: 0.0,
        }
    }
}

/// Dispatch to the rule set of the deal's business unit
pub fn calculate_commission(unit: &BusinessUnit, ctx: &CommissionContext) -> CommissionOutcome {
    let outcome = match unit {
        BusinessUnit::StateSector => state_sector::calculate(ctx),
        BusinessUnit::RegionalChannel(attrs) => regional::calculate(attrs, ctx),
        BusinessUnit::Corporate => corporate::calculate(ctx),
        BusinessUnit::Unassigned => CommissionOutcome::none(CommissionRule::Unassigned),
    };

    log::debug!(
        "commission {:?}: rate {} cap {:?} -> {:.2}",
        outcome.rule,
        outcome.rate,
        outcome.cap,
        outcome.amount
    );

    outcome
}
