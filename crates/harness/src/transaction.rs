//! Transaction value object.
//!
//! A `Transaction` describes one request and, once the monitor has seen it, the
//! response paired with it. It provides:
//! 1. **Identity:** A `TxnId` drawn from a per-stream monotonic allocator.
//! 2. **Request half:** `request_valid` and `request_data`, fixed at construction.
//! 3. **Response half:** `response_data` and `response_observed_at`, written exactly once.
//!
//! Expected and observed copies are always distinct objects and are compared by value.

use std::fmt;

use serde::Serialize;

use crate::common::{HarnessError, Result};

/// Logical clock count, one per DUT clock edge.
pub type Tick = u64;

/// Monotonic sequence number identifying a transaction within its stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TxnId(pub u64);

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out strictly increasing transaction ids for one stream.
#[derive(Debug, Clone, Default)]
pub struct TxnIdAllocator {
    next: u64,
}

impl TxnIdAllocator {
    /// Creates an allocator whose first id is `#0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id and advances the allocator.
    pub fn next_id(&mut self) -> TxnId {
        let id = TxnId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub const fn issued(&self) -> u64 {
        self.next
    }
}

/// One request and, once observed, its response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    id: TxnId,
    request_valid: bool,
    request_data: u32,
    response_data: Option<u32>,
    response_observed_at: Option<Tick>,
}

impl Transaction {
    /// Creates a request transaction with no response half.
    pub const fn new(id: TxnId, request_valid: bool, request_data: u32) -> Self {
        Self {
            id,
            request_valid,
            request_data,
            response_data: None,
            response_observed_at: None,
        }
    }

    /// Fills in the response half.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidState` if the response was already filled.
    pub fn fill_response(&mut self, data: u32, at: Tick) -> Result<()> {
        if self.response_data.is_some() {
            return Err(HarnessError::InvalidState {
                id: self.id,
                reason: "response already filled",
            });
        }
        self.response_data = Some(data);
        self.response_observed_at = Some(at);
        Ok(())
    }

    /// Sequence number of this transaction.
    pub const fn id(&self) -> TxnId {
        self.id
    }

    /// Whether the request half asserts `request_valid`.
    pub const fn request_valid(&self) -> bool {
        self.request_valid
    }

    /// Request payload.
    pub const fn request_data(&self) -> u32 {
        self.request_data
    }

    /// Response payload, once observed.
    pub const fn response_data(&self) -> Option<u32> {
        self.response_data
    }

    /// Tick at which the response was observed.
    pub const fn response_observed_at(&self) -> Option<Tick> {
        self.response_observed_at
    }

    /// Returns `true` once the response half has been filled.
    pub const fn is_observed(&self) -> bool {
        self.response_data.is_some()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if self.request_valid {
            write!(f, " req={:#010x}", self.request_data)?;
        }
        match (self.response_data, self.response_observed_at) {
            (Some(data), Some(at)) => write!(f, " rsp={data:#010x}@{at}"),
            (Some(data), None) => write!(f, " rsp={data:#010x}"),
            _ => Ok(()),
        }
    }
}
