//! Approval lifecycle: draft -> pending -> approved / rejected
//!
//! Timestamps are supplied by the caller so every transition stays a pure
//! function of its arguments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::TransactionInput;
use crate::error::{EngineError, Result};
use crate::projection::{FinancialEngine, FinancialResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApprovalStatus {
    #[default]
    Draft,
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// Approved and rejected transactions are frozen
    pub fn is_final(self) -> bool {
        matches!(self, ApprovalStatus::Approved | ApprovalStatus::Rejected)
    }

    /// Financial metrics may only be recomputed while the deal is still open
    pub fn allows_recalculation(self) -> bool {
        !self.is_final()
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApprovalStatus::Draft => "DRAFT",
            ApprovalStatus::Pending => "PENDING",
            ApprovalStatus::Approved => "APPROVED",
            ApprovalStatus::Rejected => "REJECTED",
        };
        f.write_str(label)
    }
}

/// Status of one transaction plus when it moved
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub status: ApprovalStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub rejection_note: Option<String>,
}

impl ApprovalRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a draft for review
    pub fn submit(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.require(ApprovalStatus::Draft, "submit")?;
        self.status = ApprovalStatus::Pending;
        self.submitted_at = Some(at);
        log::debug!("transaction submitted at {}", at);
        Ok(())
    }

    pub fn approve(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.require(ApprovalStatus::Pending, "approve")?;
        self.status = ApprovalStatus::Approved;
        self.decided_at = Some(at);
        log::debug!("transaction approved at {}", at);
        Ok(())
    }

    pub fn reject(&mut self, at: DateTime<Utc>, note: Option<String>) -> Result<()> {
        self.require(ApprovalStatus::Pending, "reject")?;
        self.status = ApprovalStatus::Rejected;
        self.decided_at = Some(at);
        self.rejection_note = note;
        log::debug!("transaction rejected at {}", at);
        Ok(())
    }

    fn require(&self, expected: ApprovalStatus, action: &'static str) -> Result<()> {
        if self.status != expected {
            return Err(EngineError::InvalidTransition {
                from: self.status,
                action,
            });
        }
        Ok(())
    }
}

/// Result to show for a transaction, and whether the caller should cache it
#[derive(Debug, Clone)]
pub struct ResolvedResult {
    pub result: FinancialResult,
    pub store_in_cache: bool,
}

/// Pick between a cached result and a fresh evaluation.
///
/// Final transactions reuse their cached result; a missing cache entry is
/// recomputed and flagged for storing. Open transactions always recompute
/// and are never cached.
pub fn resolve_result(
    status: ApprovalStatus,
    cached: Option<FinancialResult>,
    engine: &FinancialEngine,
    input: &TransactionInput,
) -> ResolvedResult {
    match (status.is_final(), cached) {
        (true, Some(result)) => ResolvedResult {
            result,
            store_in_cache: false,
        },
        (true, None) => {
            log::debug!("no cached result for {} transaction, recomputing", status);
            ResolvedResult {
                result: engine.evaluate(input),
                store_in_cache: true,
            }
        }
        (false, _) => ResolvedResult {
            result: engine.evaluate(input),
            store_in_cache: false,
        },
    }
}
