//! Mismatch records and run outcome types.

use std::fmt;

use serde::Serialize;

use crate::transaction::{Tick, Transaction};

/// Why a record was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MismatchReason {
    /// The paired response carried the wrong data.
    DataMismatch,
    /// A response arrived while no expectation was pending.
    UnexpectedResponse,
    /// An expectation was never answered.
    MissingResponse,
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DataMismatch => "DataMismatch",
            Self::UnexpectedResponse => "UnexpectedResponse",
            Self::MissingResponse => "MissingResponse",
        })
    }
}

/// A permanent finding of DUT non-conformance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MismatchRecord {
    /// Expected request; absent only for `UnexpectedResponse`.
    pub expected: Option<Transaction>,
    /// Observed response; absent only for `MissingResponse`.
    pub actual: Option<Transaction>,
    /// Classification.
    pub reason: MismatchReason,
    /// Response value the model predicted, when an expectation was involved.
    pub expected_response: Option<u32>,
    /// Tick at which the finding was made.
    pub at: Tick,
}

impl MismatchRecord {
    pub(crate) const fn data_mismatch(
        expected: Transaction,
        actual: Transaction,
        predicted: u32,
        at: Tick,
    ) -> Self {
        Self {
            expected: Some(expected),
            actual: Some(actual),
            reason: MismatchReason::DataMismatch,
            expected_response: Some(predicted),
            at,
        }
    }

    pub(crate) const fn unexpected(actual: Transaction, at: Tick) -> Self {
        Self {
            expected: None,
            actual: Some(actual),
            reason: MismatchReason::UnexpectedResponse,
            expected_response: None,
            at,
        }
    }

    pub(crate) const fn missing(expected: Transaction, predicted: u32, at: Tick) -> Self {
        Self {
            expected: Some(expected),
            actual: None,
            reason: MismatchReason::MissingResponse,
            expected_response: Some(predicted),
            at,
        }
    }
}

impl fmt::Display for MismatchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at, self.reason)?;
        if let Some(expected) = &self.expected {
            write!(f, " expected {expected}")?;
        }
        if let Some(data) = self.expected_response {
            write!(f, " (want {data:#010x})")?;
        }
        if let Some(actual) = &self.actual {
            write!(f, " actual {actual}")?;
        }
        Ok(())
    }
}

/// Why the scoreboard closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CloseCause {
    /// Every expectation was resolved during draining.
    Drained,
    /// The drain timeout expired with expectations still pending.
    TimedOut,
    /// The run was cancelled.
    Aborted,
    /// Explicit end-of-test teardown.
    EndOfTest,
}

/// Scoreboard lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Accepting both streams.
    Running,
    /// Stimulus exhausted; awaiting trailing responses until `deadline`.
    Draining {
        /// Tick at which the drain times out.
        deadline: Tick,
    },
    /// No further input accepted.
    Closed(CloseCause),
}

/// Pass/fail outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// Zero mismatch records.
    Pass,
    /// At least one mismatch record.
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        })
    }
}
