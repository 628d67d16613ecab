//! Test bench: one run of stimulus against one DUT.
//!
//! The bench owns every component and is the only thing that knows about the
//! clock. Each tick it:
//! 1. Advances the scoreboard clock (overdue expectations, drain exits).
//! 2. Lets the driver present the next request and applies one DUT edge.
//! 3. Lets the monitor sample the response pins; subscribers feed the scoreboard.
//! 4. Forwards the issued request to the scoreboard's expected side.
//!
//! Responses are observed before the request issued on the same edge is
//! registered, matching the device's read-before-write ordering. The driver and
//! monitor never reference each other.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::common::{CancelToken, HarnessError, Result};
use crate::config::HarnessConfig;
use crate::coverage::CoverageSink;
use crate::driver::Driver;
use crate::dut::Dut;
use crate::monitor::Monitor;
use crate::report::RunReport;
use crate::scoreboard::{Phase, Scoreboard};
use crate::sequencer::StimulusGenerator;
use crate::stats::RunStats;
use crate::transaction::{Tick, Transaction};

/// Harness entry point for a single run.
#[derive(Debug)]
pub struct TestBench<D> {
    config: HarnessConfig,
    dut: D,
    generator: StimulusGenerator,
    driver: Driver,
    monitor: Monitor,
    scoreboard: Arc<Scoreboard>,
    cancel: CancelToken,
    stats: RunStats,
    now: Tick,
    started: bool,
}

impl<D: Dut> TestBench<D> {
    /// Builds a bench for `config` around `dut`.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` if the configuration does not validate.
    pub fn new(config: HarnessConfig, dut: D) -> Result<Self> {
        config.validate()?;
        let scoreboard = Arc::new(Scoreboard::new(&config.scoreboard));

        let mut monitor = Monitor::new();
        let sink = Arc::clone(&scoreboard);
        monitor.subscribe(move |observed| {
            if let Err(err) = sink.on_observed(observed.clone()) {
                warn!(%err, %observed, "scoreboard rejected observed response");
            }
        });

        Ok(Self {
            generator: StimulusGenerator::from_profile(&config.stimulus),
            config,
            dut,
            driver: Driver::new(),
            monitor,
            scoreboard,
            cancel: CancelToken::new(),
            stats: RunStats::default(),
            now: 0,
            started: false,
        })
    }

    /// Routes every observed transaction to `sink` as well.
    #[must_use]
    pub fn with_coverage(mut self, sink: Arc<dyn CoverageSink>) -> Self {
        self.monitor.subscribe(move |observed| sink.record(observed));
        self
    }

    /// Registers an extra monitor subscriber.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Transaction) + Send + 'static) {
        self.monitor.subscribe(subscriber);
    }

    /// Token that aborts this run when cancelled.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Shared handle to the scoreboard.
    pub const fn scoreboard(&self) -> &Arc<Scoreboard> {
        &self.scoreboard
    }

    /// The driven device.
    pub const fn dut(&self) -> &D {
        &self.dut
    }

    /// Current tick.
    pub const fn now(&self) -> Tick {
        self.now
    }

    /// Resets the DUT, produces the stimulus profile and queues it on the driver.
    ///
    /// Returns the number of transactions queued.
    ///
    /// # Errors
    ///
    /// `HarnessError::ProtocolViolation` when called twice; stimulus errors from
    /// the generator.
    pub fn start(&mut self) -> Result<usize> {
        if self.started {
            return Err(HarnessError::ProtocolViolation(
                "test bench already started".to_owned(),
            ));
        }
        self.started = true;
        self.dut.reset();
        let stimulus = self.generator.produce_profile()?;
        let count = stimulus.len();
        info!(
            dut = self.dut.name(),
            count,
            seed = self.config.stimulus.seed,
            "run started"
        );
        self.driver.drive(stimulus);
        Ok(count)
    }

    /// Applies one clock tick and returns the scoreboard phase afterwards.
    ///
    /// # Errors
    ///
    /// `HarnessError::ProtocolViolation` before `start`; any contract violation
    /// during the tick, in which case the scoreboard is aborted first.
    pub fn tick(&mut self) -> Result<Phase> {
        if !self.started {
            return Err(HarnessError::ProtocolViolation(
                "test bench ticked before start".to_owned(),
            ));
        }
        self.step().inspect_err(|err| {
            error!(%err, now = self.now, "run aborted");
            let _ = self.scoreboard.abort(self.now);
        })
    }

    fn step(&mut self) -> Result<Phase> {
        let now = self.now;
        let phase = self.scoreboard.advance(now);
        if let Phase::Closed(_) = phase {
            return Ok(phase);
        }
        if self.cancel.is_cancelled() {
            warn!(now, "run cancelled");
            return Ok(self.scoreboard.abort(now));
        }

        let issue = self.driver.drive_tick()?;
        let response = self.dut.tick(issue.pins);
        self.driver.acknowledge();
        self.stats.ticks += 1;

        match &issue.transaction {
            Some(txn) => {
                self.stats.transactions_driven += 1;
                if txn.request_valid() {
                    self.stats.requests_valid += 1;
                } else {
                    self.stats.idle_cycles += 1;
                }
            }
            None => self.stats.idle_cycles += 1,
        }

        if self.monitor.sample(response, now)?.is_some() {
            self.stats.responses_observed += 1;
        }
        if let Some(err) = self.scoreboard.take_fatal() {
            return Err(err);
        }

        if let Some(txn) = issue.transaction {
            self.scoreboard.on_expected(txn)?;
        }
        if phase == Phase::Running && self.driver.is_exhausted() {
            self.scoreboard.begin_drain(now)?;
        }

        self.now += 1;
        Ok(self.scoreboard.phase())
    }

    /// Snapshot report of the run so far.
    pub fn report(&self) -> RunReport {
        RunReport::new(
            self.dut.name(),
            self.config.stimulus.seed,
            self.config.stimulus.count,
            self.stats.clone(),
            self.scoreboard.summary(),
        )
    }

    /// Runs the whole profile to completion and returns the report.
    ///
    /// # Errors
    ///
    /// Any contract violation raised during the run.
    pub fn run(mut self) -> Result<RunReport> {
        let _ = self.start()?;
        while !matches!(self.tick()?, Phase::Closed(_)) {}

        let report = self.report();
        info!(
            verdict = %report.verdict,
            ticks = report.stats.ticks,
            findings = report.mismatches.len(),
            "run complete"
        );
        Ok(report)
    }
}
