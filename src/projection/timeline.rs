//! Month-by-month cash flow timeline

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::normalize::NormalizedFixedCost;

/// One period of the timeline. Period 0 is the signing month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowPeriod {
    pub period: u32,

    // Inflows
    pub nrc: f64,
    pub mrc: f64,

    // Outflows (negative)
    /// Commission plus performance bond, period 0 only
    pub commission: f64,
    pub recurring_expense: f64,
    pub fixed_costs: f64,

    // Summary
    pub net_cash_flow: f64,
    pub cumulative_cash_flow: f64,
}

impl CashflowPeriod {
    pub fn new(period: u32) -> Self {
        Self {
            period,
            nrc: 0.0,
            mrc: 0.0,
            commission: 0.0,
            recurring_expense: 0.0,
            fixed_costs: 0.0,
            net_cash_flow: 0.0,
            cumulative_cash_flow: 0.0,
        }
    }

    pub fn revenue(&self) -> f64 {
        self.nrc + self.mrc
    }
}

/// How one fixed cost line landed on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCostSchedule {
    pub id: Option<String>,
    pub category: Option<String>,
    pub service_type: Option<String>,
    /// Nominal line total (base currency)
    pub total: f64,
    pub start_period: u32,
    pub duration_months: u32,
    /// Outflow per period, same length as the timeline
    pub values: Vec<f64>,
    /// Portion of `total` that fell inside the contract horizon
    pub applied: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Timeline {
    pub periods: Vec<CashflowPeriod>,
    pub fixed_costs: Vec<FixedCostSchedule>,
}

/// Base-currency amounts the timeline is built from
#[derive(Debug, Clone, Copy)]
pub struct TimelineInputs<'a> {
    pub contract_term_months: u32,
    pub nrc: f64,
    pub mrc: f64,
    pub commission: f64,
    pub bond_cost: f64,
    pub monthly_expense: f64,
    pub fixed_costs: &'a [NormalizedFixedCost],
}

impl Timeline {
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn net_cash_flows(&self) -> Vec<f64> {
        self.periods.iter().map(|p| p.net_cash_flow).collect()
    }

    pub fn total_revenue(&self) -> f64 {
        self.periods.iter().fold(0.0, |acc, p| acc + p.revenue())
    }

    /// Fixed cost actually applied within the horizon, across all lines
    pub fn fixed_cost_applied(&self) -> f64 {
        self.fixed_costs.iter().fold(0.0, |acc, fc| acc + fc.applied)
    }

    /// Write the per-period table as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        for period in &self.periods {
            csv.serialize(period)?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn write_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut csv = csv::Writer::from_path(path)?;
        for period in &self.periods {
            csv.serialize(period)?;
        }
        csv.flush()?;
        Ok(())
    }
}

/// Build the `term + 1` period timeline.
///
/// NRC, commission and bond land in period 0; MRC and recurring expense in
/// periods 1..=term. Each fixed cost is spread evenly over its window; the
/// part of a window past the last period is dropped.
pub fn build_timeline(inputs: &TimelineInputs<'_>) -> Timeline {
    let num_periods = inputs.contract_term_months as usize + 1;

    let mut periods: Vec<CashflowPeriod> = (0..num_periods as u32).map(CashflowPeriod::new).collect();

    periods[0].nrc = inputs.nrc;
    periods[0].commission = -inputs.commission - inputs.bond_cost;
    for period in periods.iter_mut().skip(1) {
        period.mrc = inputs.mrc;
        period.recurring_expense = -inputs.monthly_expense;
    }

    let fixed_costs: Vec<FixedCostSchedule> = inputs
        .fixed_costs
        .iter()
        .map(|cost| distribute_fixed_cost(cost, num_periods))
        .collect();

    let mut cumulative = 0.0;
    for (t, period) in periods.iter_mut().enumerate() {
        period.fixed_costs = fixed_costs.iter().fold(0.0, |acc, fc| acc + fc.values[t]);
        period.net_cash_flow = period.nrc
            + period.mrc
            + period.commission
            + period.recurring_expense
            + period.fixed_costs;
        cumulative += period.net_cash_flow;
        period.cumulative_cash_flow = cumulative;
    }

    Timeline { periods, fixed_costs }
}

fn distribute_fixed_cost(cost: &NormalizedFixedCost, num_periods: usize) -> FixedCostSchedule {
    let duration = cost.line.effective_duration();
    let start = cost.line.start_period as usize;
    let per_period = cost.total_base / duration as f64;

    let mut values = vec![0.0; num_periods];
    let mut applied = 0.0;
    let end = start.saturating_add(duration as usize).min(num_periods);
    for value in values.iter_mut().take(end).skip(start) {
        *value = -per_period;
        applied += per_period;
    }

    if end < start.saturating_add(duration as usize) {
        log::debug!(
            "fixed cost {:?} runs past the horizon: {:.2} of {:.2} applied",
            cost.line.id,
            applied,
            cost.total_base
        );
    }

    FixedCostSchedule {
        id: cost.line.id.clone(),
        category: cost.line.category.clone(),
        service_type: cost.line.service_type.clone(),
        total: cost.total_base,
        start_period: cost.line.start_period,
        duration_months: duration,
        values,
        applied,
    }
}
