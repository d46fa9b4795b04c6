//! Carta fianza (performance bond) cost

use serde::{Deserialize, Serialize};

use super::{CurrencyConverter, ResolvedMrc};

/// Contractual factors of the bond formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BondTerms {
    /// Share of the contract value the bond guarantees
    pub guaranteed_fraction: f64,
    /// Sales-tax gross-up applied to the guaranteed amount
    pub tax_factor: f64,
}

impl Default for BondTerms {
    fn default() -> Self {
        Self {
            guaranteed_fraction: 0.10,
            tax_factor: 1.18,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BondCost {
    /// Cost in the MRC's own currency
    pub original: f64,
    pub base: f64,
}

impl BondTerms {
    /// Bond cost for the contract, or zero when no bond applies.
    ///
    /// The formula is defined on the original-currency MRC; only the finished
    /// amount is converted, using the MRC's currency tag.
    pub fn cost(
        &self,
        applies: bool,
        bond_rate: f64,
        contract_term_months: u32,
        mrc: &ResolvedMrc,
        converter: &CurrencyConverter,
    ) -> BondCost {
        if !applies {
            return BondCost::default();
        }

        let original = self.guaranteed_fraction
            * contract_term_months as f64
            * mrc.original
            * self.tax_factor
            * bond_rate;

        BondCost {
            original,
            base: converter.to_base(original, mrc.currency),
        }
    }
}
