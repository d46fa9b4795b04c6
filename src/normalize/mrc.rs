//! Resolution of the one canonical monthly recurring charge

use serde::{Deserialize, Serialize};

use super::CurrencyConverter;
use crate::transaction::{Currency, Money};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedMrc {
    pub original: f64,
    pub currency: Currency,
    pub base: f64,
    /// True when the manual override won over the service-line sum
    pub from_override: bool,
}

/// A positive manual MRC wins; otherwise the service lines' original-currency
/// revenue is used. Either way the result is tagged with the MRC's currency.
pub fn resolve_mrc(
    manual: Money,
    revenue_from_services_original: f64,
    converter: &CurrencyConverter,
) -> ResolvedMrc {
    let from_override = manual.amount > 0.0;
    let original = if from_override {
        manual.amount
    } else {
        revenue_from_services_original
    };

    log::debug!(
        "MRC resolved to {:.2} {:?} from {}",
        original,
        manual.currency,
        if from_override { "manual override" } else { "service lines" }
    );

    ResolvedMrc {
        original,
        currency: manual.currency,
        base: converter.to_base(original, manual.currency),
        from_override,
    }
}
