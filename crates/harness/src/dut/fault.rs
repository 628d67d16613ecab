//! Fault-injecting DUT wrapper.
//!
//! `FaultyDut` wraps any `Dut` and perturbs its response pins so the scoreboard's
//! failure paths can be exercised against a known-good device. Response faults
//! are keyed on the zero-based index of the inner device's valid responses; the
//! spurious fault is keyed on the edge number.

use tracing::debug;

use crate::dut::{Dut, RequestPins, ResponsePins};

/// A single injected defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Suppress the inner device's nth valid response.
    Drop {
        /// Zero-based response index.
        response: u64,
    },
    /// XOR the inner device's nth valid response with `xor`.
    Corrupt {
        /// Zero-based response index.
        response: u64,
        /// Bits to flip.
        xor: u32,
    },
    /// Assert a response carrying `data` on edge `edge`, replacing whatever the
    /// inner device produced on that edge.
    Spurious {
        /// Zero-based edge number.
        edge: u64,
        /// Payload of the invented response.
        data: u32,
    },
}

/// DUT wrapper applying a list of faults.
#[derive(Debug)]
pub struct FaultyDut<D> {
    inner: D,
    faults: Vec<Fault>,
    /// Valid responses produced by the inner device so far.
    responses: u64,
    /// Edges applied so far.
    edges: u64,
}

impl<D: Dut> FaultyDut<D> {
    /// Wraps `inner` with no faults.
    pub const fn new(inner: D) -> Self {
        Self {
            inner,
            faults: Vec::new(),
            responses: 0,
            edges: 0,
        }
    }

    /// Adds a fault.
    #[must_use]
    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.faults.push(fault);
        self
    }

    /// Adds several faults.
    #[must_use]
    pub fn with_faults(mut self, faults: impl IntoIterator<Item = Fault>) -> Self {
        self.faults.extend(faults);
        self
    }

    /// Faults currently armed.
    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    /// Shared access to the wrapped device.
    pub const fn inner(&self) -> &D {
        &self.inner
    }

    fn perturb_response(&self, index: u64, mut pins: ResponsePins) -> ResponsePins {
        for fault in &self.faults {
            match *fault {
                Fault::Drop { response } if response == index => {
                    debug!(index, "fault: dropping response");
                    return ResponsePins::IDLE;
                }
                Fault::Corrupt { response, xor } if response == index => {
                    debug!(index, xor, "fault: corrupting response");
                    pins.response_data ^= xor;
                }
                _ => {}
            }
        }
        pins
    }
}

impl<D: Dut> Dut for FaultyDut<D> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn tick(&mut self, request: RequestPins) -> ResponsePins {
        let edge = self.edges;
        self.edges += 1;

        let mut out = self.inner.tick(request);
        if out.response_valid {
            let index = self.responses;
            self.responses += 1;
            out = self.perturb_response(index, out);
        }

        for fault in &self.faults {
            match *fault {
                Fault::Spurious { edge: at, data } if at == edge => {
                    debug!(edge, data, "fault: spurious response");
                    out = ResponsePins::valid(data);
                }
                _ => {}
            }
        }
        out
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.responses = 0;
        self.edges = 0;
    }
}
