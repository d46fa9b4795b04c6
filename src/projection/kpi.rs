//! Investment KPIs derived from the timeline

use super::irr::{calculate_irr, calculate_npv, IrrConfig};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kpis {
    /// Net present value at the monthly cost of capital
    pub npv: Option<f64>,
    /// Monthly internal rate of return
    pub irr: Option<f64>,
    pub payback: Option<u32>,
    pub gross_margin: f64,
    pub gross_margin_ratio: f64,
}

/// First period where the running total of net cash flow is non-negative
pub fn payback_period(cashflows: &[f64]) -> Option<u32> {
    let mut cumulative = 0.0;
    for (t, &flow) in cashflows.iter().enumerate() {
        cumulative += flow;
        if cumulative >= 0.0 {
            return Some(t as u32);
        }
    }
    None
}

/// `revenue - expense` and its share of revenue (zero for zero revenue)
pub fn gross_margin(total_revenue: f64, total_expense: f64) -> (f64, f64) {
    let margin = total_revenue - total_expense;
    (margin, ratio(margin, total_revenue))
}

/// `part / whole`, or zero when there is nothing to divide by
pub fn ratio(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole
    }
}

pub fn calculate_kpis(
    cashflows: &[f64],
    total_revenue: f64,
    total_expense: f64,
    annual_capital_cost: f64,
    irr_config: &IrrConfig,
) -> Kpis {
    let monthly_rate = annual_capital_cost / 12.0;
    let (gross_margin, gross_margin_ratio) = gross_margin(total_revenue, total_expense);

    Kpis {
        npv: calculate_npv(monthly_rate, cashflows),
        irr: calculate_irr(cashflows, irr_config),
        payback: payback_period(cashflows),
        gross_margin,
        gross_margin_ratio,
    }
}
