//! Response monitor.
//!
//! The monitor samples the DUT's response pins once per tick, independently of
//! the driver. Whenever `response_valid` is asserted it builds a fresh observed
//! transaction, stamps it with the sampling tick, and hands it to every
//! subscriber synchronously in registration order. It never pairs responses
//! with requests; that is the scoreboard's job.

use std::fmt;

use tracing::trace;

use crate::common::Result;
use crate::dut::ResponsePins;
use crate::transaction::{Tick, Transaction, TxnIdAllocator};

/// Callback invoked for every observed transaction.
pub type Subscriber = Box<dyn FnMut(&Transaction) + Send>;

/// Response-side monitor.
#[derive(Default)]
pub struct Monitor {
    ids: TxnIdAllocator,
    subscribers: Vec<Subscriber>,
}

impl fmt::Debug for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("observed", &self.ids.issued())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Monitor {
    /// Creates a monitor with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber; it sees every transaction observed from now on.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Transaction) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Samples the response pins for tick `now`.
    ///
    /// Returns the observed transaction, or `None` when no response is asserted.
    ///
    /// # Errors
    ///
    /// Propagates `HarnessError::InvalidState` from filling the fresh transaction,
    /// which cannot happen for a correctly constructed one.
    pub fn sample(&mut self, pins: ResponsePins, now: Tick) -> Result<Option<Transaction>> {
        if !pins.response_valid {
            return Ok(None);
        }

        let mut observed = Transaction::new(self.ids.next_id(), false, 0);
        observed.fill_response(pins.response_data, now)?;
        trace!(%observed, "observed");

        for subscriber in &mut self.subscribers {
            subscriber(&observed);
        }
        Ok(Some(observed))
    }

    /// Number of responses observed so far.
    pub const fn observed(&self) -> u64 {
        self.ids.issued()
    }
}
