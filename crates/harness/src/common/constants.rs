//! Harness-wide constants.

/// Number of storage slots in the reference echo-buffer DUT.
///
/// The DUT addresses its storage with an 8-bit wrap-around counter.
pub const DEFAULT_BUFFER_DEPTH: usize = 256;

/// Ticks between a request being sampled and its response appearing.
pub const DEFAULT_EXPECTED_LATENCY: u64 = 1;

/// Drain timeout expressed as a multiple of the expected latency.
pub const DRAIN_TIMEOUT_MULTIPLIER: u64 = 4;

/// Number of coverage buckets (top nibble of the response data).
pub const COVERAGE_BUCKETS: usize = 16;
