//! Rule set C: corporate accounts
//!
//! No payout schedule has been defined for this unit yet. The nominal rate
//! and MRC cap are carried, but the amount fed into the cap is always zero,
//! so the commission is always zero.

use super::{CommissionContext, CommissionOutcome, CommissionRule};

const NOMINAL_RATE: f64 = 0.06;
const CAP_MRC_MULTIPLE: f64 = 1.2;

pub(super) fn calculate(ctx: &CommissionContext) -> CommissionOutcome {
    let calculated = 0.0_f64;
    let cap = CAP_MRC_MULTIPLE * ctx.mrc_base;

    CommissionOutcome {
        rule: CommissionRule::Corporate,
        rate: NOMINAL_RATE,
        cap: Some(cap),
        amount: calculated.min(cap),
    }
}
