//! Conversion to base currency at the locked rate

use crate::transaction::{Currency, Money};

/// Converts tagged amounts to base currency using the rate frozen on the
/// transaction. The rate is never re-fetched during an evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyConverter {
    locked_rate: f64,
}

impl CurrencyConverter {
    pub fn new(locked_rate: f64) -> Self {
        if locked_rate <= 0.0 {
            log::warn!("locked exchange rate {} is not positive; using it as given", locked_rate);
        }
        Self { locked_rate }
    }

    pub fn locked_rate(&self) -> f64 {
        self.locked_rate
    }

    pub fn to_base(&self, amount: f64, currency: Currency) -> f64 {
        match currency {
            Currency::Foreign => amount * self.locked_rate,
            Currency::Base => amount,
        }
    }

    pub fn money_to_base(&self, money: Money) -> f64 {
        self.to_base(money.amount, money.currency)
    }
}
