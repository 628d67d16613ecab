//! Device-under-test boundary.
//!
//! This module defines the `Dut` trait implemented by every device the harness can drive. It provides:
//! 1. **Pins:** Fixed-width request and response signal bundles, one value per tick.
//! 2. **Clocking:** `tick` applies one clock edge, sampling requests and producing responses.
//! 3. **Reference DUT:** `EchoBuffer`, a one-cycle-delayed echo through addressed storage.
//! 4. **Fault injection:** `FaultyDut`, a wrapper that drops, corrupts, or invents responses.
//!
//! All implementors must be `Send` so a bench can be moved onto a worker thread.

/// Reference echo-buffer DUT.
pub mod echo;

/// Fault-injecting DUT wrapper.
pub mod fault;

pub use echo::EchoBuffer;
pub use fault::{Fault, FaultyDut};

/// Request interface, driven by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestPins {
    /// Request strobe.
    pub request_valid: bool,
    /// Request payload; meaningful only while `request_valid` is set.
    pub request_data: u32,
}

impl RequestPins {
    /// Pins with the strobe deasserted.
    pub const IDLE: Self = Self {
        request_valid: false,
        request_data: 0,
    };
}

/// Response interface, sampled by the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResponsePins {
    /// Response strobe.
    pub response_valid: bool,
    /// Response payload; meaningful only while `response_valid` is set.
    pub response_data: u32,
}

impl ResponsePins {
    /// Pins with the strobe deasserted.
    pub const IDLE: Self = Self {
        response_valid: false,
        response_data: 0,
    };

    /// Pins asserting a response carrying `data`.
    pub const fn valid(data: u32) -> Self {
        Self {
            response_valid: true,
            response_data: data,
        }
    }
}

/// Trait for clocked request/response devices.
///
/// The harness treats the device as a black box: it presents request pins, applies
/// one clock edge, and reads the response pins produced by that edge.
pub trait Dut: Send {
    /// Returns a short name for this device (e.g., `"ECHO"`).
    fn name(&self) -> &str;

    /// Applies one clock edge: samples `request` and returns the response pins
    /// valid until the next edge.
    fn tick(&mut self, request: RequestPins) -> ResponsePins;

    /// Returns the device to its power-on state.
    fn reset(&mut self);
}

impl<D: Dut + ?Sized> Dut for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn tick(&mut self, request: RequestPins) -> ResponsePins {
        (**self).tick(request)
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}
