//! Run statistics collection and reporting.
//!
//! This module tracks the counters of a single run. It provides:
//! 1. **Clock:** Ticks elapsed, including the draining tail.
//! 2. **Stimulus:** Transactions issued, split into valid requests and idle cycles.
//! 3. **Responses:** Responses observed and matched.
//! 4. **Findings:** Record counts per mismatch reason.

use serde::Serialize;

use crate::scoreboard::{MismatchReason, ScoreboardSummary};

/// Per-run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Clock edges applied to the DUT.
    pub ticks: u64,
    /// Transactions presented by the driver.
    pub transactions_driven: u64,
    /// Transactions presented with `request_valid` set.
    pub requests_valid: u64,
    /// Ticks with the request strobe deasserted (idle transactions and drain tail).
    pub idle_cycles: u64,
    /// Responses seen by the monitor.
    pub responses_observed: u64,
    /// Responses that matched their expectation.
    pub matched: u64,
    /// `DataMismatch` records.
    pub data_mismatches: u64,
    /// `UnexpectedResponse` records.
    pub unexpected_responses: u64,
    /// `MissingResponse` records.
    pub missing_responses: u64,
}

/// Section names for selective stats output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "stimulus", "findings"];

impl RunStats {
    /// Folds the scoreboard's counters into these stats.
    pub fn absorb(&mut self, summary: &ScoreboardSummary) {
        let count = |reason| summary.count(reason) as u64;
        self.matched = summary.matched;
        self.data_mismatches = count(MismatchReason::DataMismatch);
        self.unexpected_responses = count(MismatchReason::UnexpectedResponse);
        self.missing_responses = count(MismatchReason::MissingResponse);
    }

    /// Total records of every reason.
    pub const fn findings(&self) -> u64 {
        self.data_mismatches + self.unexpected_responses + self.missing_responses
    }

    /// Fraction of valid requests whose response matched, in percent.
    pub fn match_rate(&self) -> f64 {
        if self.requests_valid == 0 {
            return 100.0;
        }
        100.0 * self.matched as f64 / self.requests_valid as f64
    }

    /// Renders the requested sections as text.
    ///
    /// Each element of `sections` should be one of `"summary"`, `"stimulus"` or
    /// `"findings"`. An empty slice renders everything.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let mut out = String::new();
        let mut line = |s: String| {
            out.push_str(&s);
            out.push('\n');
        };

        line("==========================================================".to_owned());
        line("CONFORMANCE RUN STATISTICS".to_owned());
        line("==========================================================".to_owned());
        if want("summary") {
            line(format!("run_ticks                {}", self.ticks));
            line(format!("run_matched              {}", self.matched));
            line(format!("run_match_rate           {:.2}%", self.match_rate()));
            line(format!("run_findings             {}", self.findings()));
            line("----------------------------------------------------------".to_owned());
        }
        if want("stimulus") {
            line("STIMULUS".to_owned());
            line(format!("  txn.driven             {}", self.transactions_driven));
            line(format!("  txn.valid              {}", self.requests_valid));
            line(format!("  cycles.idle            {}", self.idle_cycles));
            line(format!("  rsp.observed           {}", self.responses_observed));
            line("----------------------------------------------------------".to_owned());
        }
        if want("findings") {
            line("FINDINGS".to_owned());
            line(format!("  data_mismatch          {}", self.data_mismatches));
            line(format!("  unexpected_response    {}", self.unexpected_responses));
            line(format!("  missing_response       {}", self.missing_responses));
        }
        line("==========================================================".to_owned());
        out
    }

    /// Prints the requested sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
