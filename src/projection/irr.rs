//! Net Present Value and Internal Rate of Return
//!
//! Both work on periodic (monthly) rates over the timeline's net cash flows.

use serde::{Deserialize, Serialize};

/// Newton-Raphson settings for the IRR solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrConfig {
    pub initial_guess: f64,
    pub max_iterations: u32,
    /// Accept a rate once |NPV| drops below this
    pub tolerance: f64,
    /// Give up when the NPV slope is flatter than this
    pub min_derivative: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Default for IrrConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.10,
            max_iterations: 100,
            tolerance: 1e-6,
            min_derivative: 1e-10,
            lower_bound: -0.99, // -99% per period
            upper_bound: 10.0,  // 1000% per period
        }
    }
}

/// Calculate NPV of a series of cash flows at a periodic discount rate.
///
/// # Returns
/// * `None` for an empty series or when the arithmetic does not produce a finite value
pub fn calculate_npv(rate: f64, cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    let npv = npv_at_rate(cashflows, rate);
    npv.is_finite().then_some(npv)
}

/// Calculate the periodic Internal Rate of Return using Newton-Raphson.
///
/// Mirrors spreadsheet IRR(): no fallback search, so anything that does not
/// converge from the initial guess is reported as no solution.
///
/// # Arguments
/// * `cashflows` - Net cash flows per period (positive = inflow, negative = outflow)
/// * `config` - Solver settings
///
/// # Returns
/// * `Option<f64>` - Periodic IRR as a decimal, or None if no solution found
pub fn calculate_irr(cashflows: &[f64], config: &IrrConfig) -> Option<f64> {
    if cashflows.len() < 2 {
        return None;
    }

    // A root needs money going both ways
    let has_positive = cashflows.iter().any(|&cf| cf > 0.0);
    let has_negative = cashflows.iter().any(|&cf| cf < 0.0);
    if !has_positive || !has_negative {
        return None;
    }

    let mut rate = config.initial_guess;

    for iteration in 0..config.max_iterations {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if !npv.is_finite() || !dnpv.is_finite() {
            log::debug!("IRR: non-finite NPV at rate {} (iteration {})", rate, iteration);
            return None;
        }

        if npv.abs() < config.tolerance {
            return Some(rate);
        }

        if dnpv.abs() < config.min_derivative {
            log::debug!("IRR: derivative stalled at rate {} (iteration {})", rate, iteration);
            return None;
        }

        rate -= npv / dnpv;

        if rate < config.lower_bound || rate > config.upper_bound {
            log::debug!("IRR: rate {} left the search range (iteration {})", rate, iteration);
            return None;
        }
    }

    log::debug!("IRR: no convergence after {} iterations", config.max_iterations);
    None
}

/// Calculate NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / ((1.0 + rate).powi(t as i32 + 1));
        }
    }

    (npv, dnpv)
}

/// Calculate NPV at a given periodic rate
fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .fold(0.0, |acc, pv| acc + pv)
}
