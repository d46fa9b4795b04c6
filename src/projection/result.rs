//! Financial result of one evaluation

use serde::{Deserialize, Serialize};

use super::timeline::{CashflowPeriod, FixedCostSchedule, Timeline};
use crate::commission::CommissionOutcome;
use crate::error::Result;
use crate::normalize::{EnrichedServiceLine, NormalizedFixedCost};
use crate::transaction::{Currency, FixedCostLine, Money, RecurringServiceLine};

/// Revenue and margin before commission; what the commission tiers see
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreCommissionMargin {
    pub total_revenue: Option<f64>,
    /// Nominal installation total plus recurring expense over the term
    pub total_expense: Option<f64>,
    pub gross_margin: Option<f64>,
    pub gross_margin_ratio: Option<f64>,
    /// Payback of the timeline without commission
    pub payback: Option<u32>,
}

/// Complete evaluation output. All amounts are base currency unless the
/// field name says otherwise.
///
/// Headline figures are `None` when the arithmetic behind them did not stay
/// finite (amounts near the `f64` range). Detail rows (timeline, line
/// breakdowns, commission trace) keep plain numbers: NaN reads as 0 and
/// infinities saturate at `f64::MIN` / `f64::MAX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialResult {
    // Charges
    pub mrc_original: Option<f64>,
    pub mrc_currency: Currency,
    pub mrc_base: Option<f64>,
    pub nrc_original: Option<f64>,
    pub nrc_currency: Currency,
    pub nrc_base: Option<f64>,

    // KPIs
    pub npv: Option<f64>,
    /// Monthly IRR
    pub irr: Option<f64>,
    pub payback: Option<u32>,

    // Totals
    pub total_revenue: Option<f64>,
    pub total_expense: Option<f64>,
    pub gross_margin: Option<f64>,
    pub gross_margin_ratio: Option<f64>,

    // Commission
    pub commission: Option<f64>,
    pub commission_rate: Option<f64>,
    pub commission_detail: CommissionOutcome,

    // Installation
    /// Fixed cost applied within the contract horizon
    pub installation_cost: Option<f64>,
    pub installation_ratio: Option<f64>,

    // Performance bond
    pub bond_applies: bool,
    pub bond_cost_original: Option<f64>,
    pub bond_cost: Option<f64>,

    pub pre_commission: PreCommissionMargin,
    pub recurring_services: Vec<EnrichedServiceLine>,
    pub fixed_costs: Vec<NormalizedFixedCost>,
    pub timeline: Timeline,
}

impl FinancialResult {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replace non-finite values in the detail rows with finite stand-ins
    pub(crate) fn saturate_details(&mut self) {
        self.commission_detail.saturate();
        self.recurring_services.saturate();
        self.fixed_costs.saturate();
        self.timeline.saturate();
    }
}

/// `Some` only for a finite value
pub(crate) fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

trait Saturate {
    fn saturate(&mut self);
}

impl Saturate for f64 {
    fn saturate(&mut self) {
        if self.is_nan() {
            *self = 0.0;
        } else {
            *self = self.clamp(f64::MIN, f64::MAX);
        }
    }
}

impl<T: Saturate> Saturate for Option<T> {
    fn saturate(&mut self) {
        if let Some(value) = self {
            value.saturate();
        }
    }
}

impl<T: Saturate> Saturate for Vec<T> {
    fn saturate(&mut self) {
        self.iter_mut().for_each(Saturate::saturate);
    }
}

impl Saturate for Money {
    fn saturate(&mut self) {
        self.amount.saturate();
    }
}

impl Saturate for CommissionOutcome {
    fn saturate(&mut self) {
        self.rate.saturate();
        self.cap.saturate();
        self.amount.saturate();
    }
}

impl Saturate for RecurringServiceLine {
    fn saturate(&mut self) {
        self.quantity.saturate();
        self.unit_price.saturate();
        self.cost1.saturate();
        self.cost2.saturate();
    }
}

impl Saturate for EnrichedServiceLine {
    fn saturate(&mut self) {
        self.line.saturate();
        self.unit_price_base.saturate();
        self.cost1_base.saturate();
        self.cost2_base.saturate();
        self.monthly_revenue_base.saturate();
        self.monthly_expense_base.saturate();
    }
}

impl Saturate for FixedCostLine {
    fn saturate(&mut self) {
        self.quantity.saturate();
        self.unit_cost.saturate();
    }
}

impl Saturate for NormalizedFixedCost {
    fn saturate(&mut self) {
        self.line.saturate();
        self.unit_cost_base.saturate();
        self.total_base.saturate();
    }
}

impl Saturate for CashflowPeriod {
    fn saturate(&mut self) {
        self.nrc.saturate();
        self.mrc.saturate();
        self.commission.saturate();
        self.recurring_expense.saturate();
        self.fixed_costs.saturate();
        self.net_cash_flow.saturate();
        self.cumulative_cash_flow.saturate();
    }
}

impl Saturate for FixedCostSchedule {
    fn saturate(&mut self) {
        self.total.saturate();
        self.values.saturate();
        self.applied.saturate();
    }
}

impl Saturate for Timeline {
    fn saturate(&mut self) {
        self.periods.saturate();
        self.fixed_costs.saturate();
    }
}
