//! Orchestrator: one deterministic evaluation of a transaction snapshot

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::irr::IrrConfig;
use super::kpi::{calculate_kpis, gross_margin, payback_period, ratio};
use super::result::{finite, FinancialResult, PreCommissionMargin};
use super::timeline::{build_timeline, TimelineInputs};
use crate::commission::{calculate_commission, CommissionContext};
use crate::normalize::{
    process_fixed_costs, process_recurring_services, resolve_mrc, BondCost, BondTerms,
    CurrencyConverter, FixedCosts, RecurringServices, ResolvedMrc,
};
use crate::transaction::TransactionInput;

/// Configuration for the engine
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub irr: IrrConfig,
    #[serde(default)]
    pub bond: BondTerms,
}

/// Everything normalized to base currency, before any commission is known
struct Normalized {
    converter: CurrencyConverter,
    services: RecurringServices,
    fixed: FixedCosts,
    mrc: ResolvedMrc,
    nrc_base: f64,
    bond: BondCost,
}

/// Pass-1 figures the commission rules are looked up with
struct PassOne {
    total_revenue: f64,
    total_expense: f64,
    gross_margin: f64,
    gross_margin_ratio: f64,
    payback: Option<u32>,
}

impl PassOne {
    fn report(&self) -> PreCommissionMargin {
        PreCommissionMargin {
            total_revenue: finite(self.total_revenue),
            total_expense: finite(self.total_expense),
            gross_margin: finite(self.gross_margin),
            gross_margin_ratio: finite(self.gross_margin_ratio),
            payback: self.payback,
        }
    }
}

/// Main financial engine
///
/// Stateless apart from its configuration: `evaluate` is a pure function of
/// the input snapshot, so equal inputs give equal results.
#[derive(Debug, Clone, Default)]
pub struct FinancialEngine {
    config: EngineConfig,
}

impl FinancialEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full evaluation for one transaction
    pub fn evaluate(&self, input: &TransactionInput) -> FinancialResult {
        let normalized = self.normalize(input);

        // Pass 1: margin and payback without commission
        let pre_commission = self.pre_commission(input, &normalized);

        let commission = calculate_commission(
            &input.business_unit,
            &CommissionContext {
                contract_term_months: input.contract_term_months,
                payback: pre_commission.payback,
                gross_margin_ratio: pre_commission.gross_margin_ratio,
                total_revenue: pre_commission.total_revenue,
                mrc_base: normalized.mrc.base,
            },
        );

        // Pass 2: final timeline and totals with commission
        let timeline = build_timeline(&self.timeline_inputs(input, &normalized, commission.amount));
        let installation_cost = timeline.fixed_cost_applied();
        let term = input.contract_term_months as f64;

        let total_revenue = pre_commission.total_revenue;
        let total_expense = commission.amount
            + installation_cost
            + normalized.services.monthly_expense_base * term
            + normalized.bond.base;

        let kpis = calculate_kpis(
            &timeline.net_cash_flows(),
            total_revenue,
            total_expense,
            input.annual_capital_cost,
            &self.config.irr,
        );

        if !(total_revenue.is_finite() && total_expense.is_finite()) {
            log::warn!(
                "evaluation overflowed (revenue {}, expense {}); non-finite figures reported as null",
                total_revenue,
                total_expense
            );
        }

        log::debug!(
            "evaluated {}-month deal: revenue {:.2}, expense {:.2}, commission {:.2}, npv {:?}, irr {:?}",
            input.contract_term_months,
            total_revenue,
            total_expense,
            commission.amount,
            kpis.npv,
            kpis.irr
        );

        let mut result = FinancialResult {
            mrc_original: finite(normalized.mrc.original),
            mrc_currency: normalized.mrc.currency,
            mrc_base: finite(normalized.mrc.base),
            nrc_original: finite(input.nrc.amount),
            nrc_currency: input.nrc.currency,
            nrc_base: finite(normalized.nrc_base),
            npv: kpis.npv,
            irr: kpis.irr,
            payback: kpis.payback,
            total_revenue: finite(total_revenue),
            total_expense: finite(total_expense),
            gross_margin: finite(kpis.gross_margin),
            gross_margin_ratio: finite(kpis.gross_margin_ratio),
            commission: finite(commission.amount),
            commission_rate: finite(ratio(commission.amount, total_revenue)),
            commission_detail: commission,
            installation_cost: finite(installation_cost),
            installation_ratio: finite(ratio(installation_cost, total_revenue)),
            bond_applies: input.bond_applies,
            bond_cost_original: finite(normalized.bond.original),
            bond_cost: finite(normalized.bond.base),
            pre_commission: pre_commission.report(),
            recurring_services: normalized.services.lines,
            fixed_costs: normalized.fixed.lines,
            timeline,
        };
        result.saturate_details();
        result
    }

    /// Evaluate independent snapshots in parallel, preserving order
    pub fn evaluate_batch(&self, inputs: &[TransactionInput]) -> Vec<FinancialResult> {
        log::info!("evaluating batch of {} transactions", inputs.len());
        inputs.par_iter().map(|input| self.evaluate(input)).collect()
    }

    fn normalize(&self, input: &TransactionInput) -> Normalized {
        let converter = CurrencyConverter::new(input.locked_exchange_rate);
        let services = process_recurring_services(&input.recurring_services, &converter);
        let fixed = process_fixed_costs(&input.fixed_costs, &converter);
        let mrc = resolve_mrc(input.mrc, services.revenue_from_services_original, &converter);
        let nrc_base = converter.money_to_base(input.nrc);
        let bond = self.config.bond.cost(
            input.bond_applies,
            input.bond_rate,
            input.contract_term_months,
            &mrc,
            &converter,
        );

        Normalized {
            converter,
            services,
            fixed,
            mrc,
            nrc_base,
            bond,
        }
    }

    /// Margin ratio and payback the commission tiers are looked up with.
    /// Commission is left out entirely so tier boundaries never depend on it.
    fn pre_commission(&self, input: &TransactionInput, normalized: &Normalized) -> PassOne {
        let term = input.contract_term_months as f64;
        let total_revenue = normalized.nrc_base + normalized.mrc.base * term;
        let total_expense =
            normalized.fixed.installation_total + normalized.services.monthly_expense_base * term;
        let (gross_margin, gross_margin_ratio) = gross_margin(total_revenue, total_expense);

        let timeline = build_timeline(&self.timeline_inputs(input, normalized, 0.0));
        let payback = payback_period(&timeline.net_cash_flows());

        log::trace!(
            "pre-commission margin ratio {:.4} (locked rate {}), payback {:?}",
            gross_margin_ratio,
            normalized.converter.locked_rate(),
            payback
        );

        PassOne {
            total_revenue,
            total_expense,
            gross_margin,
            gross_margin_ratio,
            payback,
        }
    }

    fn timeline_inputs<'a>(
        &self,
        input: &TransactionInput,
        normalized: &'a Normalized,
        commission: f64,
    ) -> TimelineInputs<'a> {
        TimelineInputs {
            contract_term_months: input.contract_term_months,
            nrc: normalized.nrc_base,
            mrc: normalized.mrc.base,
            commission,
            bond_cost: normalized.bond.base,
            monthly_expense: normalized.services.monthly_expense_base,
            fixed_costs: &normalized.fixed.lines,
        }
    }
}
