//! One-time cost lines normalized to base currency

use serde::{Deserialize, Serialize};

use super::CurrencyConverter;
use crate::transaction::FixedCostLine;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedFixedCost {
    pub line: FixedCostLine,
    pub unit_cost_base: f64,
    /// quantity x base unit cost, before any distribution over periods
    pub total_base: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FixedCosts {
    pub lines: Vec<NormalizedFixedCost>,
    /// Nominal installation total across all lines
    pub installation_total: f64,
}

pub fn process_fixed_costs(lines: &[FixedCostLine], converter: &CurrencyConverter) -> FixedCosts {
    let mut out = FixedCosts::default();

    for line in lines {
        let unit_cost_base = converter.money_to_base(line.unit_cost);
        let total_base = line.quantity * unit_cost_base;
        out.installation_total += total_base;
        out.lines.push(NormalizedFixedCost {
            line: line.clone(),
            unit_cost_base,
            total_base,
        });
    }

    out
}
