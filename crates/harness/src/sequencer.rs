//! Stimulus generator.
//!
//! The sequencer produces finite, reproducible transaction sequences. Every
//! call to `produce` reseeds a `StdRng` from the explicit seed, so the same
//! `(count, seed)` always yields the same sequence, ids included.
//!
//! Per transaction the draws happen in a fixed order:
//! 1. `request_valid` from the configured `ValidDistribution`
//!    (`Always` consumes no randomness).
//! 2. `request_data` from the configured `DataDistribution`
//!    (`Sequential` consumes no randomness).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::common::{HarnessError, Result};
use crate::config::{DataDistribution, StimulusProfile, ValidDistribution};
use crate::transaction::{Transaction, TxnIdAllocator};

/// Seeded transaction generator.
#[derive(Debug, Clone, Default)]
pub struct StimulusGenerator {
    valid: ValidDistribution,
    data: DataDistribution,
    profile: Option<(usize, u64)>,
    issued: Vec<Transaction>,
}

impl StimulusGenerator {
    /// Creates a generator with explicit field distributions.
    pub const fn new(valid: ValidDistribution, data: DataDistribution) -> Self {
        Self {
            valid,
            data,
            profile: None,
            issued: Vec::new(),
        }
    }

    /// Creates a generator from a stimulus profile; `produce_profile` replays it.
    pub fn from_profile(profile: &StimulusProfile) -> Self {
        Self {
            profile: Some((profile.count, profile.seed)),
            ..Self::new(profile.valid, profile.data)
        }
    }

    /// Produces `count` transactions from `seed`.
    ///
    /// The returned sequence is also kept as the issue log (see `issued`).
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` if `count` is zero or a Bernoulli
    /// percentage exceeds 100.
    pub fn produce(&mut self, count: usize, seed: u64) -> Result<Vec<Transaction>> {
        if count == 0 {
            return Err(HarnessError::Config("count must be positive".to_owned()));
        }
        let threshold = match self.valid {
            ValidDistribution::Always => None,
            ValidDistribution::Bernoulli { percent } if percent <= 100 => {
                Some(f64::from(percent) / 100.0)
            }
            ValidDistribution::Bernoulli { percent } => {
                return Err(HarnessError::Config(format!(
                    "valid percent {percent} exceeds 100"
                )));
            }
        };

        let mut rng = StdRng::seed_from_u64(seed);
        let mut ids = TxnIdAllocator::new();
        let mut ramp = match self.data {
            DataDistribution::Sequential { start, .. } => start,
            DataDistribution::Uniform => 0,
        };

        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let request_valid = threshold.is_none_or(|p| rng.gen_bool(p));
            let request_data = match self.data {
                DataDistribution::Uniform => rng.gen_range(0..=u32::MAX),
                DataDistribution::Sequential { step, .. } => {
                    let value = ramp;
                    ramp = ramp.wrapping_add(step);
                    value
                }
            };
            out.push(Transaction::new(ids.next_id(), request_valid, request_data));
        }

        debug!(count, seed, "stimulus produced");
        self.issued.clone_from(&out);
        Ok(out)
    }

    /// Produces the sequence described by the profile this generator was built from.
    ///
    /// # Errors
    ///
    /// As `produce`; also `HarnessError::Config` if the generator was not built
    /// with `from_profile`.
    pub fn produce_profile(&mut self) -> Result<Vec<Transaction>> {
        let (count, seed) = self.profile.ok_or_else(|| {
            HarnessError::Config("generator has no stimulus profile".to_owned())
        })?;
        self.produce(count, seed)
    }

    /// The most recently produced sequence, in issue order.
    pub fn issued(&self) -> &[Transaction] {
        &self.issued
    }
}
