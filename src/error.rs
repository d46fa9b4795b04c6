//! Error types for the deal engine
//!
//! Domain edge cases (missing amounts, unknown business units, IRR that does
//! not converge) never surface here. Only malformed input and the I/O around
//! the engine do.

use thiserror::Error;

use crate::transaction::ApprovalStatus;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The input snapshot does not fit the transaction contract
    #[error("malformed transaction input: {0}")]
    MalformedInput(#[from] serde_json::Error),

    #[error("failed to read transaction input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write timeline CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot {action} a transaction that is {from}")]
    InvalidTransition {
        from: ApprovalStatus,
        action: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
