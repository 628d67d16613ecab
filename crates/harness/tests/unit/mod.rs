//! # Unit and Scenario Tests
//!
//! Organized bottom-up: value types and generators first, then the driver,
//! monitor and scoreboard in isolation, then whole-bench scenarios and
//! properties.

/// Configuration defaults, JSON loading and validation.
pub mod config;


/// Driver pacing contract.
pub mod driver;

/// Monitor emission and subscriber fan-out.
pub mod monitor;

/// Scoreboard matching, lifecycle and concurrency.
pub mod scoreboard;
