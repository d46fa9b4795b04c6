//! Rule set B: regional commercial channel
//!
//! The rate comes from a region x margin-band matrix and is paid on the
//! monthly charge over the whole term. Upgrades of existing customers only
//! earn on the increase over what they already pay.

use super::bands::MarginBand;
use super::{CommissionContext, CommissionOutcome, CommissionRule};
use crate::transaction::{RegionalAttributes, Region, SaleType};

/// Payback has to land strictly before this period
const MAX_PAYBACK_EXCLUSIVE: u32 = 2;

struct RateTier {
    band: MarginBand,
    rate: f64,
}

const fn rate(band: MarginBand, rate: f64) -> RateTier {
    RateTier { band, rate }
}

const LIMA_NEW: [RateTier; 4] = [
    rate(MarginBand::from_until(0.40, 0.50), 0.009),
    rate(MarginBand::from_until(0.50, 0.60), 0.014),
    rate(MarginBand::from_until(0.60, 0.70), 0.019),
    rate(MarginBand::at_least(0.70), 0.024),
];

const LIMA_EXISTING: [RateTier; 4] = [
    rate(MarginBand::from_until(0.40, 0.50), 0.010),
    rate(MarginBand::from_until(0.50, 0.60), 0.015),
    rate(MarginBand::from_until(0.60, 0.70), 0.020),
    rate(MarginBand::at_least(0.70), 0.025),
];

const PROVINCES_CACHING: [RateTier; 2] = [
    rate(MarginBand::from_until(0.40, 0.45), 0.03),
    rate(MarginBand::at_least(0.45), 0.035),
];

/// Shared by the Internexa and TDP provincial networks
const PROVINCES_CARRIER: [RateTier; 2] = [
    rate(MarginBand::from_until(0.17, 0.20), 0.02),
    rate(MarginBand::at_least(0.20), 0.03),
];

fn rate_table(region: &Region, sale_type: &SaleType) -> &'static [RateTier] {
    match (region, sale_type) {
        (Region::Lima, SaleType::New) => &LIMA_NEW,
        (Region::Lima, SaleType::Existing) => &LIMA_EXISTING,
        (Region::Lima, SaleType::Unlisted(_)) => &[],
        (Region::ProvincesWithCaching, _) => &PROVINCES_CACHING,
        (Region::ProvincesWithInternexa, _) | (Region::ProvincesWithTdp, _) => &PROVINCES_CARRIER,
        (Region::Unlisted(_), _) => &[],
    }
}

pub(super) fn calculate(attrs: &RegionalAttributes, ctx: &CommissionContext) -> CommissionOutcome {
    let rule = CommissionRule::RegionalChannel;

    let region = attrs.region.as_ref().filter(|r| !r.code().is_empty());
    let sale_type = attrs.sale_type.as_ref().filter(|s| !s.code().is_empty());
    let (Some(region), Some(sale_type)) = (region, sale_type) else {
        log::debug!("regional commission skipped: region or sale type missing");
        return CommissionOutcome::none(rule);
    };

    if !ctx.payback.is_some_and(|payback| payback < MAX_PAYBACK_EXCLUSIVE) {
        log::debug!("regional commission skipped: payback {:?} too slow", ctx.payback);
        return CommissionOutcome::none(rule);
    }

    let tier_rate = rate_table(region, sale_type)
        .iter()
        .find(|t| t.band.contains(ctx.gross_margin_ratio))
        .map_or(0.0, |t| t.rate);

    let term = ctx.contract_term_months as f64;
    let amount = match sale_type {
        SaleType::New => tier_rate * ctx.mrc_base * term,
        SaleType::Existing => {
            let prior_mrc = attrs.prior_mrc.unwrap_or(0.0);
            tier_rate * term * (ctx.mrc_base - prior_mrc)
        }
        SaleType::Unlisted(_) => 0.0,
    };

    log::debug!("regional commission: {} / {} at rate {}", region, sale_type, tier_rate);

    CommissionOutcome {
        rule,
        rate: tier_rate,
        cap: None,
        amount,
    }
}
