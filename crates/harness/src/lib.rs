//! Cycle-driven conformance harness library.
//!
//! This crate drives a device-under-test with generated stimulus and checks its
//! responses against an independent expected-value model:
//! 1. **Stimulus:** Seeded, reproducible transaction sequences.
//! 2. **Driver/Monitor:** Independent request and response processes around the DUT.
//! 3. **Scoreboard:** In-order matching with response deadlines, draining and a verdict.
//! 4. **DUT:** The device trait, a reference echo buffer and a fault-injecting wrapper.
//! 5. **Run:** Configuration, the test bench entry point, statistics and reports.

/// Common types (errors, constants, cancellation).
pub mod common;
/// Harness configuration (stimulus profile, DUT geometry, scoreboard timing).
pub mod config;
/// Transaction value object and id allocation.
pub mod transaction;
/// Seeded stimulus generator.
pub mod sequencer;
/// Request driver.
pub mod driver;
/// Response monitor with subscriber fan-out.
pub mod monitor;
/// In-order scoreboard, expected-value models and mismatch records.
pub mod scoreboard;
/// Coverage sink trait and counting implementation.
pub mod coverage;
/// Device-under-test boundary (trait, reference DUT, fault injection).
pub mod dut;
/// Per-run statistics.
pub mod stats;
/// Final run report.
pub mod report;
/// Test bench wiring every component for one run.
pub mod bench;

/// Single entry point for a run; build with `TestBench::new`.
pub use crate::bench::TestBench;
/// Fatal harness errors and the crate-wide result alias.
pub use crate::common::{HarnessError, Result};
/// Root configuration type; use `HarnessConfig::default()` or load JSON.
pub use crate::config::HarnessConfig;
/// Outcome of a finished run.
pub use crate::report::RunReport;
/// The scoreboard; shared between the bench and the monitor subscriber.
pub use crate::scoreboard::Scoreboard;
/// Transaction value object.
pub use crate::transaction::Transaction;
