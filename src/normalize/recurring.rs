//! Recurring service lines: per-line base values and monthly aggregates

use serde::{Deserialize, Serialize};

use super::CurrencyConverter;
use crate::transaction::RecurringServiceLine;

/// A service line with its base-currency figures alongside the original input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedServiceLine {
    pub line: RecurringServiceLine,
    pub unit_price_base: f64,
    pub cost1_base: f64,
    pub cost2_base: f64,
    /// quantity x base unit price
    pub monthly_revenue_base: f64,
    /// quantity x (base cost1 + base cost2)
    pub monthly_expense_base: f64,
}

/// Output of the recurring-service stage
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecurringServices {
    pub lines: Vec<EnrichedServiceLine>,
    pub monthly_revenue_base: f64,
    pub monthly_expense_base: f64,
    /// Sum of quantity x unit price in each line's original currency.
    /// Only used as the MRC fallback.
    pub revenue_from_services_original: f64,
}

pub fn process_recurring_services(
    services: &[RecurringServiceLine],
    converter: &CurrencyConverter,
) -> RecurringServices {
    let mut out = RecurringServices::default();

    for line in services {
        let quantity = line.quantity;
        let unit_price_base = converter.money_to_base(line.unit_price);
        let cost1_base = converter.money_to_base(line.cost1);
        let cost2_base = converter.money_to_base(line.cost2);

        let enriched = EnrichedServiceLine {
            line: line.clone(),
            unit_price_base,
            cost1_base,
            cost2_base,
            monthly_revenue_base: quantity * unit_price_base,
            monthly_expense_base: quantity * (cost1_base + cost2_base),
        };

        out.monthly_revenue_base += enriched.monthly_revenue_base;
        out.monthly_expense_base += enriched.monthly_expense_base;
        out.revenue_from_services_original += quantity * line.unit_price.amount;
        out.lines.push(enriched);
    }

    log::trace!(
        "{} recurring lines: revenue {:.2}/month, expense {:.2}/month (base)",
        out.lines.len(),
        out.monthly_revenue_base,
        out.monthly_expense_base
    );

    out
}
