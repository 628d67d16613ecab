//! Configuration system for the conformance harness.
//!
//! This module defines all configuration structures and enums used to parameterize
//! a run. It provides:
//! 1. **Defaults:** Baseline stimulus, DUT geometry, and scoreboard timing constants.
//! 2. **Structures:** Hierarchical config for stimulus, DUT, and scoreboard.
//! 3. **Enums:** Request-valid and request-data distributions, expected-value models.
//!
//! A whole test variant is one `HarnessConfig`; there is no per-variant code path.
//! Configuration is supplied as JSON or built with `HarnessConfig::default()`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::constants::{
    DEFAULT_BUFFER_DEPTH, DEFAULT_EXPECTED_LATENCY, DRAIN_TIMEOUT_MULTIPLIER,
};
use crate::common::{HarnessError, Result};

/// Default configuration constants for the harness.
mod defaults {
    /// Number of transactions generated per run.
    pub const COUNT: usize = 64;

    /// Seed for the stimulus generator.
    pub const SEED: u64 = 1;

    /// Extra ticks a response may trail its nominal latency before it is overdue.
    pub const LATENCY_TOLERANCE: u64 = 0;
}

/// Distribution of the `request_valid` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum ValidDistribution {
    /// Every transaction asserts `request_valid`.
    #[default]
    Always,
    /// Each transaction asserts `request_valid` with probability `percent / 100`.
    Bernoulli {
        /// Probability in percent, `0..=100`.
        percent: u8,
    },
}

/// Distribution of the `request_data` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum DataDistribution {
    /// Uniform over the whole `u32` domain.
    #[default]
    Uniform,
    /// Directed ramp: `start`, `start + step`, ... with wrapping arithmetic.
    ///
    /// Consumes no randomness, so the valid-bit draws are unaffected by it.
    Sequential {
        /// First value.
        start: u32,
        /// Increment between consecutive transactions.
        step: u32,
    },
}

/// Expected-value model used by the scoreboard to predict each response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum ModelKind {
    /// Response equals the request data.
    IdentityEcho,
    /// Mirrors the DUT's addressed circular storage.
    CircularBuffer {
        /// Number of storage slots.
        depth: usize,
    },
}

impl Default for ModelKind {
    fn default() -> Self {
        Self::CircularBuffer {
            depth: DEFAULT_BUFFER_DEPTH,
        }
    }
}

/// Root configuration structure containing all harness settings.
///
/// # Examples
///
/// ```
/// use dutcheck_core::config::HarnessConfig;
///
/// let config = HarnessConfig::default();
/// assert_eq!(config.stimulus.seed, 1);
/// assert_eq!(config.dut.depth, 256);
/// ```
///
/// Deserializing from JSON; omitted fields take their defaults:
///
/// ```
/// use dutcheck_core::config::{DataDistribution, HarnessConfig, ValidDistribution};
///
/// let json = r#"{
///     "stimulus": {
///         "count": 3,
///         "seed": 1,
///         "valid": { "Bernoulli": { "percent": 50 } },
///         "data": { "Sequential": { "start": 16, "step": 16 } }
///     },
///     "scoreboard": {
///         "drain_timeout_ticks": 10
///     }
/// }"#;
///
/// let config = HarnessConfig::from_json_str(json).unwrap();
/// assert_eq!(config.stimulus.count, 3);
/// assert_eq!(config.stimulus.valid, ValidDistribution::Bernoulli { percent: 50 });
/// assert_eq!(config.stimulus.data, DataDistribution::Sequential { start: 16, step: 16 });
/// assert_eq!(config.scoreboard.drain_timeout(), 10);
/// assert_eq!(config.dut.depth, 256);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HarnessConfig {
    /// Stimulus profile
    #[serde(default)]
    pub stimulus: StimulusProfile,
    /// Reference DUT geometry
    #[serde(default)]
    pub dut: DutConfig,
    /// Scoreboard model and timing
    #[serde(default)]
    pub scoreboard: ScoreboardConfig,
}

impl HarnessConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Json` on malformed input and `HarnessError::Config`
    /// when a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// As `from_json_str`, plus `HarnessError::Io` when the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks every section for out-of-range values, then checks that a
    /// circular-buffer model has the same geometry as the DUT it mirrors.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.stimulus.validate()?;
        self.dut.validate()?;
        self.scoreboard.validate()?;
        match self.scoreboard.model {
            ModelKind::CircularBuffer { depth } if depth != self.dut.depth => {
                Err(HarnessError::Config(format!(
                    "scoreboard.model depth {depth} does not match dut.depth {}",
                    self.dut.depth
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Stimulus profile: everything needed to reproduce a generated sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StimulusProfile {
    /// Number of transactions to generate (must be positive)
    #[serde(default = "StimulusProfile::default_count")]
    pub count: usize,

    /// PRNG seed
    #[serde(default = "StimulusProfile::default_seed")]
    pub seed: u64,

    /// Distribution of `request_valid`
    #[serde(default)]
    pub valid: ValidDistribution,

    /// Distribution of `request_data`
    #[serde(default)]
    pub data: DataDistribution,
}

impl StimulusProfile {
    /// Returns the default transaction count.
    const fn default_count() -> usize {
        defaults::COUNT
    }

    /// Returns the default seed.
    const fn default_seed() -> u64 {
        defaults::SEED
    }

    /// Checks count and distribution parameters.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` for a zero count or a percentage above 100.
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(HarnessError::Config(
                "stimulus.count must be positive".to_owned(),
            ));
        }
        match self.valid {
            ValidDistribution::Bernoulli { percent } if percent > 100 => Err(
                HarnessError::Config(format!("stimulus.valid percent {percent} exceeds 100")),
            ),
            _ => Ok(()),
        }
    }
}

impl Default for StimulusProfile {
    fn default() -> Self {
        Self {
            count: defaults::COUNT,
            seed: defaults::SEED,
            valid: ValidDistribution::default(),
            data: DataDistribution::default(),
        }
    }
}

/// Reference DUT geometry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DutConfig {
    /// Storage slots in the echo buffer
    #[serde(default = "DutConfig::default_depth")]
    pub depth: usize,
}

impl DutConfig {
    /// Returns the default storage depth.
    const fn default_depth() -> usize {
        DEFAULT_BUFFER_DEPTH
    }

    /// Checks the storage depth.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` for a zero depth.
    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(HarnessError::Config("dut.depth must be positive".to_owned()));
        }
        Ok(())
    }
}

impl Default for DutConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_BUFFER_DEPTH,
        }
    }
}

/// Scoreboard model and timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScoreboardConfig {
    /// Expected-value model
    #[serde(default)]
    pub model: ModelKind,

    /// Nominal ticks from request sample to response
    #[serde(default = "ScoreboardConfig::default_expected_latency")]
    pub expected_latency_ticks: u64,

    /// Slack added to the nominal latency before an expectation is overdue
    #[serde(default = "ScoreboardConfig::default_latency_tolerance")]
    pub latency_tolerance_ticks: u64,

    /// Retire overdue head entries as missing while the run is still going.
    /// When false only the drain timeout bounds waiting.
    #[serde(default = "ScoreboardConfig::default_enforce_deadline")]
    pub enforce_response_deadline: bool,

    /// Drain timeout; defaults to a small multiple of the expected latency
    #[serde(default)]
    pub drain_timeout_ticks: Option<u64>,
}

impl ScoreboardConfig {
    /// Returns the default nominal latency.
    const fn default_expected_latency() -> u64 {
        DEFAULT_EXPECTED_LATENCY
    }

    /// Returns the default latency tolerance.
    const fn default_latency_tolerance() -> u64 {
        defaults::LATENCY_TOLERANCE
    }

    /// Deadlines are enforced unless turned off.
    const fn default_enforce_deadline() -> bool {
        true
    }

    /// Effective drain timeout in ticks.
    pub fn drain_timeout(&self) -> u64 {
        self.drain_timeout_ticks
            .unwrap_or(self.expected_latency_ticks * DRAIN_TIMEOUT_MULTIPLIER)
    }

    /// Ticks after issue at which an expectation becomes overdue, if enforced.
    pub fn response_window(&self) -> Option<u64> {
        self.enforce_response_deadline
            .then(|| self.expected_latency_ticks + self.latency_tolerance_ticks)
    }

    /// Checks timing and model parameters.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` for a zero latency, a zero drain timeout,
    /// or a zero-depth circular-buffer model.
    pub fn validate(&self) -> Result<()> {
        if self.expected_latency_ticks == 0 {
            return Err(HarnessError::Config(
                "scoreboard.expected_latency_ticks must be positive".to_owned(),
            ));
        }
        if self.drain_timeout() == 0 {
            return Err(HarnessError::Config(
                "scoreboard.drain_timeout_ticks must be positive".to_owned(),
            ));
        }
        if let ModelKind::CircularBuffer { depth: 0 } = self.model {
            return Err(HarnessError::Config(
                "scoreboard.model depth must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for ScoreboardConfig {
    fn default() -> Self {
        Self {
            model: ModelKind::default(),
            expected_latency_ticks: DEFAULT_EXPECTED_LATENCY,
            latency_tolerance_ticks: defaults::LATENCY_TOLERANCE,
            enforce_response_deadline: true,
            drain_timeout_ticks: None,
        }
    }
}
