//! Final run report.

use std::fmt;

use serde::Serialize;

use crate::scoreboard::{CloseCause, MismatchRecord, Phase, ScoreboardSummary, Verdict};
use crate::stats::RunStats;

/// Everything a finished run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Name of the driven device.
    pub dut: String,
    /// Expected-value model used by the scoreboard.
    pub model: &'static str,
    /// Seed of the stimulus profile.
    pub seed: u64,
    /// Transaction count of the stimulus profile.
    pub count: usize,
    /// `Pass` iff `mismatches` is empty.
    pub verdict: Verdict,
    /// How the scoreboard closed.
    pub close_cause: Option<CloseCause>,
    /// Counters.
    pub stats: RunStats,
    /// Every finding, in the order it was made.
    pub mismatches: Vec<MismatchRecord>,
}

impl RunReport {
    /// Assembles a report from the scoreboard's final summary.
    pub fn new(
        dut: impl Into<String>,
        seed: u64,
        count: usize,
        mut stats: RunStats,
        summary: ScoreboardSummary,
    ) -> Self {
        stats.absorb(&summary);
        let close_cause = match summary.phase {
            Phase::Closed(cause) => Some(cause),
            Phase::Running | Phase::Draining { .. } => None,
        };
        Self {
            dut: dut.into(),
            model: summary.model,
            seed,
            count,
            verdict: summary.verdict(),
            close_cause,
            stats,
            mismatches: summary.records,
        }
    }

    /// Returns `true` iff the run produced no mismatch records.
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }

    /// Process exit status for this report: 0 on pass, 1 on fail.
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.passed())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} dut={} model={} seed={} count={} matched={} findings={}",
            self.verdict,
            self.dut,
            self.model,
            self.seed,
            self.count,
            self.stats.matched,
            self.mismatches.len()
        )?;
        if let Some(cause) = self.close_cause {
            writeln!(f, "closed: {cause:?} after {} ticks", self.stats.ticks)?;
        }
        for record in &self.mismatches {
            writeln!(f, "  {record}")?;
        }
        Ok(())
    }
}
