//! Expected-value models.
//!
//! A model predicts the response the DUT owes for each valid request. The
//! scoreboard notifies the model once per request in issue order, keeps the
//! returned address with the queued expectation, and asks for the prediction
//! only when a response is paired with that expectation. Requests are always
//! registered after the responses observed on the same edge, mirroring the
//! DUT's read-before-write ordering.

use crate::config::ModelKind;
use crate::transaction::Transaction;

/// Storage address a model assigned to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelAddr(pub usize);

/// Predicts DUT responses from the issued request stream.
pub trait ExpectedModel: Send {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Registers a valid request in issue order and returns its address.
    fn on_request(&mut self, request: &Transaction) -> ModelAddr;

    /// Response expected for `request`, evaluated at pairing time.
    fn expected_response(&self, request: &Transaction, addr: ModelAddr) -> u32;
}

/// Builds the model described by `kind`.
pub fn build(kind: ModelKind) -> Box<dyn ExpectedModel> {
    match kind {
        ModelKind::IdentityEcho => Box::new(IdentityEcho),
        ModelKind::CircularBuffer { depth } => Box::new(CircularBuffer::new(depth)),
    }
}

/// Response equals the request data.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityEcho;

impl ExpectedModel for IdentityEcho {
    fn name(&self) -> &'static str {
        "identity-echo"
    }

    fn on_request(&mut self, _request: &Transaction) -> ModelAddr {
        ModelAddr(0)
    }

    fn expected_response(&self, request: &Transaction, _addr: ModelAddr) -> u32 {
        request.request_data()
    }
}

/// Mirror of the echo buffer's addressed storage.
///
/// Each valid request is written to the slot under a wrap-around counter; the
/// prediction is whatever that slot holds when the response is paired. If more
/// than `depth` requests are outstanding the slot has been overwritten, exactly
/// as it would be inside the device.
#[derive(Debug, Clone)]
pub struct CircularBuffer {
    slots: Vec<u32>,
    next: usize,
}

impl CircularBuffer {
    /// Creates a model with `depth` slots (at least one).
    pub fn new(depth: usize) -> Self {
        Self {
            slots: vec![0; depth.max(1)],
            next: 0,
        }
    }
}

impl ExpectedModel for CircularBuffer {
    fn name(&self) -> &'static str {
        "circular-buffer"
    }

    fn on_request(&mut self, request: &Transaction) -> ModelAddr {
        let slot = self.next;
        self.slots[slot] = request.request_data();
        self.next = (slot + 1) % self.slots.len();
        ModelAddr(slot)
    }

    fn expected_response(&self, _request: &Transaction, addr: ModelAddr) -> u32 {
        self.slots[addr.0 % self.slots.len()]
    }
}
