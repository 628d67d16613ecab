//! Harness error definitions.
//!
//! This module defines the fatal error taxonomy for the harness. It provides:
//! 1. **Contract Violations:** Broken transaction or harness invariants that abort a run.
//! 2. **Lifecycle Errors:** Input offered to a scoreboard that no longer accepts it.
//! 3. **Configuration Errors:** Invalid parameters and configuration loading failures.
//!
//! DUT-behavior findings (data mismatches, unexpected or missing responses) are
//! not errors. They are recorded by the scoreboard and surface in the run report.

use thiserror::Error;

use crate::transaction::TxnId;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Fatal harness errors.
///
/// Any of these aborts the current run; none of them describes DUT misbehavior.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// A transaction was used in a way its write-once contract forbids.
    #[error("invalid state for transaction {id}: {reason}")]
    InvalidState {
        /// Transaction the operation was attempted on.
        id: TxnId,
        /// What was attempted.
        reason: &'static str,
    },

    /// A harness component broke its protocol (ordering, pacing, or input shape).
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// Input was offered to a scoreboard that has already closed.
    #[error("scoreboard is closed; no further input accepted")]
    Closed,

    /// A configuration or stimulus parameter is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration JSON could not be parsed.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Returns `true` for errors that stem from a broken contract rather than bad input.
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::InvalidState { .. } | Self::ProtocolViolation(_))
    }
}
