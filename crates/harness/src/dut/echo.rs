//! Reference echo-buffer DUT.
//!
//! The device owns a circular buffer addressed by a wrap-around write counter.
//! On every clock edge it:
//! 1. Presents the slot captured on the previous edge (read-before-write).
//! 2. When `request_valid` is set, writes `request_data` into the currently
//!    addressed slot and advances the counter.
//!
//! The result is a one-cycle-delayed echo of every valid request, routed
//! through addressed storage.

use crate::common::DEFAULT_BUFFER_DEPTH;
use crate::dut::{Dut, RequestPins, ResponsePins};

/// Echo-buffer DUT structure.
#[derive(Debug, Clone)]
pub struct EchoBuffer {
    /// Backing storage.
    storage: Vec<u32>,
    /// Slot written by the next valid request.
    write_addr: usize,
    /// Slot captured on the previous edge, presented on the next one.
    pending: Option<usize>,
}

impl EchoBuffer {
    /// Creates an echo buffer with `depth` slots (at least one).
    pub fn new(depth: usize) -> Self {
        Self {
            storage: vec![0; depth.max(1)],
            write_addr: 0,
            pending: None,
        }
    }

    /// Number of storage slots.
    pub fn depth(&self) -> usize {
        self.storage.len()
    }

    /// Slot the next valid request will be written to.
    pub const fn write_addr(&self) -> usize {
        self.write_addr
    }
}

impl Default for EchoBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_DEPTH)
    }
}

impl Dut for EchoBuffer {
    fn name(&self) -> &str {
        "ECHO"
    }

    fn tick(&mut self, request: RequestPins) -> ResponsePins {
        let response = self
            .pending
            .take()
            .map_or(ResponsePins::IDLE, |slot| ResponsePins::valid(self.storage[slot]));

        if request.request_valid {
            let slot = self.write_addr;
            self.storage[slot] = request.request_data;
            self.pending = Some(slot);
            self.write_addr = (slot + 1) % self.storage.len();
        }

        response
    }

    fn reset(&mut self) {
        self.storage.fill(0);
        self.write_addr = 0;
        self.pending = None;
    }
}
