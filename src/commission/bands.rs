//! Gross-margin-ratio bands used by the tier tables

/// An interval over the pre-commission gross margin ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarginBand {
    lower: f64,
    lower_inclusive: bool,
    upper: f64,
    upper_inclusive: bool,
}

impl MarginBand {
    /// `[lower, upper]`
    pub const fn closed(lower: f64, upper: f64) -> Self {
        Self { lower, lower_inclusive: true, upper, upper_inclusive: true }
    }

    /// `(lower, upper]`
    pub const fn above_through(lower: f64, upper: f64) -> Self {
        Self { lower, lower_inclusive: false, upper, upper_inclusive: true }
    }

    /// `[lower, upper)`
    pub const fn from_until(lower: f64, upper: f64) -> Self {
        Self { lower, lower_inclusive: true, upper, upper_inclusive: false }
    }

    /// `(lower, inf)`
    pub const fn above(lower: f64) -> Self {
        Self { lower, lower_inclusive: false, upper: f64::INFINITY, upper_inclusive: false }
    }

    /// `[lower, inf)`
    pub const fn at_least(lower: f64) -> Self {
        Self { lower, lower_inclusive: true, upper: f64::INFINITY, upper_inclusive: false }
    }

    pub fn contains(&self, ratio: f64) -> bool {
        let above_lower = if self.lower_inclusive {
            ratio >= self.lower
        } else {
            ratio > self.lower
        };
        let below_upper = if self.upper_inclusive {
            ratio <= self.upper
        } else {
            ratio < self.upper
        };
        above_lower && below_upper
    }
}
