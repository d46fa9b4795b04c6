//! Rule set A: public-sector deals
//!
//! Single-payment deals (term of one month or less) pay a revenue share with
//! an absolute cap. Recurring deals pay a revenue share capped at a multiple
//! of the MRC, and only when payback is fast enough for the term.

use super::bands::MarginBand;
use super::{CommissionContext, CommissionOutcome, CommissionRule};

struct AbsoluteCapTier {
    band: MarginBand,
    rate: f64,
    cap: f64,
}

struct RecurringTier {
    band: MarginBand,
    max_payback: u32,
    rate: f64,
    cap_mrc_multiple: f64,
}

const SINGLE_PAYMENT_TIERS: [AbsoluteCapTier; 5] = [
    AbsoluteCapTier { band: MarginBand::closed(0.30, 0.35), rate: 0.01, cap: 11_000.0 },
    AbsoluteCapTier { band: MarginBand::above_through(0.35, 0.39), rate: 0.02, cap: 12_000.0 },
    AbsoluteCapTier { band: MarginBand::above_through(0.39, 0.49), rate: 0.03, cap: 13_000.0 },
    AbsoluteCapTier { band: MarginBand::above_through(0.49, 0.59), rate: 0.04, cap: 14_000.0 },
    AbsoluteCapTier { band: MarginBand::above(0.59), rate: 0.05, cap: 15_000.0 },
];

const LOW: MarginBand = MarginBand::closed(0.30, 0.35);
const MID: MarginBand = MarginBand::above_through(0.35, 0.39);
const HIGH: MarginBand = MarginBand::above(0.39);

const fn tier(band: MarginBand, max_payback: u32, rate: f64, cap_mrc_multiple: f64) -> RecurringTier {
    RecurringTier { band, max_payback, rate, cap_mrc_multiple }
}

/// Contract terms with a recurring commission schedule
const RECURRING_SCHEDULES: [(u32, [RecurringTier; 3]); 4] = [
    (12, [tier(LOW, 7, 0.025, 0.8), tier(MID, 7, 0.03, 0.9), tier(HIGH, 6, 0.035, 1.0)]),
    (24, [tier(LOW, 11, 0.025, 0.8), tier(MID, 11, 0.03, 0.9), tier(HIGH, 10, 0.035, 1.0)]),
    (36, [tier(LOW, 19, 0.025, 0.8), tier(MID, 19, 0.03, 0.9), tier(HIGH, 18, 0.035, 1.0)]),
    (48, [tier(LOW, 26, 0.02, 0.8), tier(MID, 26, 0.025, 0.9), tier(HIGH, 25, 0.03, 1.0)]),
];

pub(super) fn calculate(ctx: &CommissionContext) -> CommissionOutcome {
    let single = ctx.contract_term_months <= 1;
    if ctx.total_revenue == 0.0 {
        let rule = if single {
            CommissionRule::StateSectorSinglePayment
        } else {
            CommissionRule::StateSectorRecurring
        };
        return CommissionOutcome::none(rule);
    }

    if single {
        single_payment(ctx)
    } else {
        recurring(ctx)
    }
}

fn single_payment(ctx: &CommissionContext) -> CommissionOutcome {
    let rule = CommissionRule::StateSectorSinglePayment;
    let Some(tier) = SINGLE_PAYMENT_TIERS
        .iter()
        .find(|t| t.band.contains(ctx.gross_margin_ratio))
    else {
        log::debug!("single-payment margin ratio {:.4} below every tier", ctx.gross_margin_ratio);
        return CommissionOutcome::none(rule);
    };

    let calculated = ctx.total_revenue * tier.rate;
    CommissionOutcome {
        rule,
        rate: tier.rate,
        cap: Some(tier.cap),
        amount: calculated.min(tier.cap),
    }
}

fn recurring(ctx: &CommissionContext) -> CommissionOutcome {
    let rule = CommissionRule::StateSectorRecurring;
    let Some((_, tiers)) = RECURRING_SCHEDULES
        .iter()
        .find(|(term, _)| *term == ctx.contract_term_months)
    else {
        log::debug!("no recurring schedule for a {}-month term", ctx.contract_term_months);
        return CommissionOutcome::none(rule);
    };

    let Some(tier) = tiers.iter().find(|t| {
        t.band.contains(ctx.gross_margin_ratio)
            && ctx.payback.is_some_and(|payback| payback <= t.max_payback)
    }) else {
        log::debug!(
            "no recurring tier for ratio {:.4} with payback {:?}",
            ctx.gross_margin_ratio,
            ctx.payback
        );
        return CommissionOutcome::none(rule);
    };

    let calculated = ctx.total_revenue * tier.rate;
    let cap = ctx.mrc_base * tier.cap_mrc_multiple;
    CommissionOutcome {
        rule,
        rate: tier.rate,
        cap: Some(cap),
        amount: calculated.min(cap),
    }
}
