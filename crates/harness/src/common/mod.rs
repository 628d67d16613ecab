//! Common types and constants shared across the harness.
//!
//! This module provides the building blocks used by every component:
//! 1. **Constants:** DUT geometry and timing defaults.
//! 2. **Error Handling:** The fatal `HarnessError` taxonomy and `Result` alias.
//! 3. **Cancellation:** A cloneable token used to abort a run from another thread.

/// Common constants used throughout the harness.
pub mod constants;

/// Error types for contract violations and configuration failures.
pub mod error;

/// Cooperative cancellation token.
pub mod cancel;

pub use cancel::CancelToken;
pub use constants::{DEFAULT_BUFFER_DEPTH, DEFAULT_EXPECTED_LATENCY};
pub use error::{HarnessError, Result};
