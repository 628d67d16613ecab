//! In-order response scoreboard.
//!
//! The scoreboard is the sole arbiter of pass/fail. It provides:
//! 1. **Expected side:** `on_expected` queues each valid issued request behind a response deadline.
//! 2. **Observed side:** `on_observed` pairs each response with the head of the queue, and only the head.
//! 3. **Lifecycle:** `Running -> Draining -> Closed`, driven by `advance`, `begin_drain`, `close` and `abort`.
//! 4. **Findings:** Immutable `MismatchRecord`s for data mismatches, unexpected and missing responses.
//!
//! Both streams may be fed from different threads; every queue mutation happens
//! under one lock, so FIFO order holds and no update is lost.

/// Expected-value models.
pub mod model;

/// Mismatch records, phases and verdicts.
pub mod record;

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::common::{HarnessError, Result};
use crate::config::ScoreboardConfig;
use crate::transaction::{Tick, Transaction, TxnId};

pub use model::{CircularBuffer, ExpectedModel, IdentityEcho, ModelAddr};
pub use record::{CloseCause, MismatchReason, MismatchRecord, Phase, Verdict};

/// One queued expectation.
#[derive(Debug)]
struct Pending {
    txn: Transaction,
    addr: ModelAddr,
    /// Tick after which the expectation is overdue, if deadlines are enforced.
    due: Option<Tick>,
}

/// Everything guarded by the scoreboard lock.
struct State {
    phase: Phase,
    now: Tick,
    queue: VecDeque<Pending>,
    model: Box<dyn ExpectedModel>,
    records: Vec<MismatchRecord>,
    matched: u64,
    expected: u64,
    idle_skipped: u64,
    observed: u64,
    last_expected: Option<TxnId>,
    fatal: Option<String>,
}

impl State {
    fn record(&mut self, record: MismatchRecord) {
        warn!(%record, "scoreboard mismatch");
        self.records.push(record);
    }

    fn retire_head(&mut self, at: Tick) -> bool {
        let Some(head) = self.queue.pop_front() else {
            return false;
        };
        let predicted = self.model.expected_response(&head.txn, head.addr);
        self.record(MismatchRecord::missing(head.txn, predicted, at));
        true
    }

    /// Retires head entries whose deadline lies before `at`.
    fn retire_overdue(&mut self, at: Tick) {
        while self
            .queue
            .front()
            .and_then(|p| p.due)
            .is_some_and(|due| due < at)
        {
            let _ = self.retire_head(at);
        }
    }

    fn retire_all(&mut self, at: Tick) {
        while self.retire_head(at) {}
    }

    fn transition(&mut self, phase: Phase) {
        info!(from = ?self.phase, to = ?phase, now = self.now, "scoreboard phase");
        self.phase = phase;
    }

    fn violation(&mut self, message: String) -> HarnessError {
        if self.fatal.is_none() {
            self.fatal = Some(message.clone());
        }
        HarnessError::ProtocolViolation(message)
    }
}

/// Snapshot of scoreboard results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreboardSummary {
    /// Lifecycle phase at snapshot time.
    pub phase: Phase,
    /// Name of the expected-value model.
    pub model: &'static str,
    /// Responses that matched their expectation.
    pub matched: u64,
    /// Valid expectations accepted.
    pub expected: u64,
    /// Invalid (idle) requests skipped by the expected side.
    pub idle_skipped: u64,
    /// Observed responses accepted.
    pub observed: u64,
    /// Expectations still queued.
    pub pending: usize,
    /// Every finding, in the order it was made.
    pub records: Vec<MismatchRecord>,
}

impl ScoreboardSummary {
    /// `Pass` iff no records exist.
    pub fn verdict(&self) -> Verdict {
        if self.records.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    /// Number of records with the given reason.
    pub fn count(&self, reason: MismatchReason) -> usize {
        self.records.iter().filter(|r| r.reason == reason).count()
    }
}

/// In-order scoreboard.
pub struct Scoreboard {
    state: Mutex<State>,
    window: Option<u64>,
    drain_timeout: u64,
}

impl std::fmt::Debug for Scoreboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Scoreboard")
            .field("phase", &state.phase)
            .field("pending", &state.queue.len())
            .field("records", &state.records.len())
            .field("window", &self.window)
            .field("drain_timeout", &self.drain_timeout)
            .finish_non_exhaustive()
    }
}

impl Scoreboard {
    /// Creates a scoreboard using the model and timing from `config`.
    pub fn new(config: &ScoreboardConfig) -> Self {
        Self::with_model(config, model::build(config.model))
    }

    /// Creates a scoreboard with a caller-supplied model and the timing from `config`.
    pub fn with_model(config: &ScoreboardConfig, model: Box<dyn ExpectedModel>) -> Self {
        Self {
            state: Mutex::new(State {
                phase: Phase::Running,
                now: 0,
                queue: VecDeque::new(),
                model,
                records: Vec::new(),
                matched: 0,
                expected: 0,
                idle_skipped: 0,
                observed: 0,
                last_expected: None,
                fatal: None,
            }),
            window: config.response_window(),
            drain_timeout: config.drain_timeout(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Accepts an issued request from the expected side.
    ///
    /// Requests without `request_valid` are idle cycles; they are counted and
    /// not queued. Valid requests are registered with the model and queued with
    /// a deadline relative to the current scoreboard tick.
    ///
    /// # Errors
    ///
    /// `HarnessError::Closed` after close; `HarnessError::ProtocolViolation` while
    /// draining or when ids are not strictly increasing.
    pub fn on_expected(&self, txn: Transaction) -> Result<()> {
        let mut state = self.lock();
        let phase = state.phase;
        match phase {
            Phase::Running => {}
            Phase::Draining { .. } => {
                return Err(state.violation(format!(
                    "expected {} offered after stimulus exhaustion",
                    txn.id()
                )));
            }
            Phase::Closed(_) => return Err(HarnessError::Closed),
        }
        if let Some(last) = state.last_expected {
            if txn.id() <= last {
                return Err(state.violation(format!(
                    "expected id {} does not follow {last}",
                    txn.id()
                )));
            }
        }
        state.last_expected = Some(txn.id());

        if !txn.request_valid() {
            state.idle_skipped += 1;
            return Ok(());
        }

        let addr = state.model.on_request(&txn);
        let due = self.window.map(|w| state.now + w);
        debug!(id = %txn.id(), ?due, "expecting");
        state.expected += 1;
        state.queue.push_back(Pending { txn, addr, due });
        Ok(())
    }

    /// Accepts an observed response and pairs it with the head expectation.
    ///
    /// # Errors
    ///
    /// `HarnessError::Closed` after close; `HarnessError::ProtocolViolation` if
    /// `txn` carries no response.
    pub fn on_observed(&self, txn: Transaction) -> Result<()> {
        let mut state = self.lock();
        if let Phase::Closed(_) = state.phase {
            return Err(HarnessError::Closed);
        }
        let (Some(actual), Some(at)) = (txn.response_data(), txn.response_observed_at()) else {
            return Err(state.violation(format!(
                "observed {} carries no response",
                txn.id()
            )));
        };
        state.observed += 1;
        state.retire_overdue(at);

        let Some(head) = state.queue.pop_front() else {
            state.record(MismatchRecord::unexpected(txn, at));
            return Ok(());
        };
        let predicted = state.model.expected_response(&head.txn, head.addr);
        if actual == predicted {
            debug!(expected = %head.txn, observed = %txn, "matched");
            state.matched += 1;
        } else {
            state.record(MismatchRecord::data_mismatch(head.txn, txn, predicted, at));
        }
        Ok(())
    }

    /// Moves the scoreboard clock to `now`, retiring overdue expectations and
    /// resolving the draining phase. Returns the resulting phase.
    ///
    /// The drain deadline is inclusive: a response sampled on the deadline tick
    /// itself still counts, so the timeout only fires on a later tick.
    pub fn advance(&self, now: Tick) -> Phase {
        let mut state = self.lock();
        state.now = state.now.max(now);
        if let Phase::Closed(_) = state.phase {
            return state.phase;
        }
        state.retire_overdue(now);

        let phase = state.phase;
        if let Phase::Draining { deadline } = phase {
            if state.queue.is_empty() {
                state.transition(Phase::Closed(CloseCause::Drained));
            } else if now > deadline {
                info!(pending = state.queue.len(), "drain timeout exceeded");
                state.retire_all(now);
                state.transition(Phase::Closed(CloseCause::TimedOut));
            }
        }
        state.phase
    }

    /// Signals stimulus exhaustion: `Running -> Draining`.
    ///
    /// A no-op while already draining.
    ///
    /// # Errors
    ///
    /// `HarnessError::Closed` after close.
    pub fn begin_drain(&self, now: Tick) -> Result<()> {
        let mut state = self.lock();
        let phase = state.phase;
        match phase {
            Phase::Running => {
                state.now = state.now.max(now);
                let deadline = now + self.drain_timeout;
                state.transition(Phase::Draining { deadline });
                Ok(())
            }
            Phase::Draining { .. } => Ok(()),
            Phase::Closed(_) => Err(HarnessError::Closed),
        }
    }

    /// End-of-test teardown: every pending expectation becomes missing.
    pub fn close(&self, now: Tick) -> Phase {
        self.shut(now, CloseCause::EndOfTest)
    }

    /// Cancels the run: every pending expectation becomes missing.
    pub fn abort(&self, now: Tick) -> Phase {
        self.shut(now, CloseCause::Aborted)
    }

    fn shut(&self, now: Tick, cause: CloseCause) -> Phase {
        let mut state = self.lock();
        if let Phase::Closed(_) = state.phase {
            return state.phase;
        }
        state.now = state.now.max(now);
        state.retire_all(now);
        state.transition(Phase::Closed(cause));
        state.phase
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Expectations still queued.
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    /// Takes the first contract violation seen by either stream, if any.
    pub fn take_fatal(&self) -> Option<HarnessError> {
        self.lock().fatal.take().map(HarnessError::ProtocolViolation)
    }

    /// Snapshot of the results so far.
    pub fn summary(&self) -> ScoreboardSummary {
        let state = self.lock();
        ScoreboardSummary {
            phase: state.phase,
            model: state.model.name(),
            matched: state.matched,
            expected: state.expected,
            idle_skipped: state.idle_skipped,
            observed: state.observed,
            pending: state.queue.len(),
            records: state.records.clone(),
        }
    }

    /// `Pass` iff no records exist so far.
    pub fn verdict(&self) -> Verdict {
        if self.lock().records.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}
