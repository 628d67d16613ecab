//! Request driver.
//!
//! The driver applies queued transactions to the DUT's request pins, strictly
//! one per tick and in order. A presented transaction stays in flight until the
//! bench acknowledges that the clock edge sampled it; presenting another one
//! before that is a protocol violation.

use std::collections::VecDeque;

use tracing::trace;

use crate::common::{HarnessError, Result};
use crate::dut::RequestPins;
use crate::transaction::Transaction;

/// What the driver put on the request pins for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Pin values for this tick.
    pub pins: RequestPins,
    /// Transaction presented this tick; `None` on an idle tick.
    pub transaction: Option<Transaction>,
}

/// Sequential request driver.
#[derive(Debug, Default)]
pub struct Driver {
    queue: VecDeque<Transaction>,
    in_flight: bool,
    driven: u64,
    idle_ticks: u64,
}

impl Driver {
    /// Creates an idle driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `transactions` behind anything already queued.
    pub fn drive(&mut self, transactions: impl IntoIterator<Item = Transaction>) {
        self.queue.extend(transactions);
    }

    /// Presents the next transaction (or idle pins) for the current tick.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::ProtocolViolation` if the previous transaction has
    /// not been acknowledged yet.
    pub fn drive_tick(&mut self) -> Result<Issue> {
        if self.in_flight {
            return Err(HarnessError::ProtocolViolation(
                "driver presented a transaction before the previous one was sampled".to_owned(),
            ));
        }
        let Some(transaction) = self.queue.pop_front() else {
            self.idle_ticks += 1;
            return Ok(Issue {
                pins: RequestPins::IDLE,
                transaction: None,
            });
        };

        trace!(id = %transaction.id(), "driving");
        self.in_flight = true;
        self.driven += 1;
        Ok(Issue {
            pins: RequestPins {
                request_valid: transaction.request_valid(),
                request_data: transaction.request_data(),
            },
            transaction: Some(transaction),
        })
    }

    /// Marks the presented transaction as sampled by the DUT clock edge.
    pub const fn acknowledge(&mut self) {
        self.in_flight = false;
    }

    /// Returns `true` once every queued transaction has been driven and sampled.
    pub fn is_exhausted(&self) -> bool {
        self.queue.is_empty() && !self.in_flight
    }

    /// Transactions still waiting to be presented.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Transactions presented so far.
    pub const fn driven(&self) -> u64 {
        self.driven
    }

    /// Ticks on which nothing was queued.
    pub const fn idle_ticks(&self) -> u64 {
        self.idle_ticks
    }
}
