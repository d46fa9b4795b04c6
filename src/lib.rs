//! Deal Engine - Financial evaluation of telecom sales transactions
//!
//! This library provides:
//! - Currency normalization at a per-transaction locked exchange rate
//! - Recurring service and fixed cost processing
//! - Commission rules per business unit
//! - Monthly cash flow timelines with NPV, IRR and payback
//! - Approval lifecycle with cached results for finalized transactions

pub mod commission;
pub mod error;
pub mod normalize;
pub mod projection;
pub mod transaction;

// Re-export commonly used types
pub use error::{EngineError, Result};
pub use projection::{EngineConfig, FinancialEngine, FinancialResult, Timeline};
pub use transaction::{BusinessUnit, Currency, Money, TransactionInput};
