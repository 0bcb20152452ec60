//! Routine runner

use super::timebase::Timebase;
use crate::action::{Action, Context, Status};
use crate::safety::{SafeState, SafetyMonitor, SafetyStatus, StopReason, StopSignal};
use crate::traits::{HardwareMap, OutputError, Telemetry, Value};

/// Tick interval used when none is configured
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 10;

/// Telemetry key for the tick counter
pub const TICK_TELEMETRY: &str = "runner.tick";
/// Telemetry key for time since the first tick
pub const ELAPSED_TELEMETRY: &str = "runner.elapsed_ms";

/// How a routine ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Root action finished
    Completed,
    /// Stopped early and driven to the safe state
    Aborted(StopReason),
    /// An output failed during a poll
    Faulted(OutputError),
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Call `step` again next tick
    Running,
    /// Nothing more will be polled
    Finished(Outcome),
}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunReport {
    pub outcome: Outcome,
    /// Number of ticks in which the root was polled
    pub ticks: u32,
    /// Time from the first tick to the last
    pub elapsed_ms: u32,
}

/// Drives a root action to completion
///
/// Stop conditions are checked between ticks, before the root is polled,
/// so a poll is never interrupted. Once finished, further steps poll
/// nothing and issue no commands.
pub struct Runner<A: Action, S: SafeState> {
    root: A,
    safe: S,
    monitor: SafetyMonitor,
    interval_ms: u32,
    ticks: u32,
    outcome: Option<Outcome>,
}

impl<A: Action, S: SafeState> Runner<A, S> {
    /// Create a runner with the default autonomous period limit
    pub fn new(root: A, safe: S) -> Self {
        Self {
            root,
            safe,
            monitor: SafetyMonitor::default(),
            interval_ms: DEFAULT_TICK_INTERVAL_MS,
            ticks: 0,
            outcome: None,
        }
    }

    /// Replace the period limit (0 disables the watchdog)
    pub fn with_period_limit(mut self, period_limit_ms: u32) -> Self {
        self.monitor = SafetyMonitor::new(period_limit_ms);
        self
    }

    /// Replace the tick interval used by `run` (at least 1 ms)
    pub fn with_interval(mut self, interval_ms: u32) -> Self {
        self.interval_ms = interval_ms.max(1);
        self
    }

    /// Time between ticks
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Run one tick
    ///
    /// A hardware error aborts the routine: the tree is cancelled and the
    /// safe state applied on a best-effort basis, then the original error
    /// is returned. Errors raised while shutting down after a stop are
    /// returned too, after both cancel and safe state have been attempted.
    pub fn step<T: StopSignal + ?Sized>(
        &mut self,
        now_ms: u32,
        hardware: &mut dyn HardwareMap,
        telemetry: &mut dyn Telemetry,
        stop: &T,
    ) -> Result<Step, OutputError> {
        if let Some(outcome) = self.outcome {
            return Ok(Step::Finished(outcome));
        }
        if self.ticks == 0 {
            info!("{}: start at {} ms", self.root.label(), now_ms);
        }

        self.monitor.update_time(now_ms);
        if stop.stop_requested() {
            self.monitor.request_stop();
        }

        let mut ctx = Context::new(now_ms, hardware, telemetry);

        if let SafetyStatus::Stop(reason) = self.monitor.check() {
            warn!(
                "{}: aborted ({}) after {} ticks",
                self.root.label(),
                reason,
                self.ticks
            );
            let outcome = Outcome::Aborted(reason);
            self.outcome = Some(outcome);
            let cancelled = self.root.cancel(&mut ctx);
            let safe = self.safe.make_safe(&mut *ctx.hardware);
            return cancelled.and(safe).map(|_| Step::Finished(outcome));
        }

        self.ticks += 1;
        ctx.report(TICK_TELEMETRY, Value::Count(self.ticks));
        ctx.report(ELAPSED_TELEMETRY, Value::Millis(self.monitor.elapsed_ms()));

        match self.root.poll(&mut ctx) {
            Ok(Status::Running) => Ok(Step::Running),
            Ok(Status::Done) => {
                info!(
                    "{}: complete in {} ms",
                    self.root.label(),
                    self.monitor.elapsed_ms()
                );
                self.outcome = Some(Outcome::Completed);
                Ok(Step::Finished(Outcome::Completed))
            }
            Err(e) => {
                warn!("{}: output fault {}", self.root.label(), e);
                self.outcome = Some(Outcome::Faulted(e));
                let _ = self.root.cancel(&mut ctx);
                let _ = self.safe.make_safe(&mut *ctx.hardware);
                Err(e)
            }
        }
    }

    /// Tick at a fixed interval until the routine ends
    ///
    /// Deadlines are `start + n * interval`, so a slow tick shortens
    /// the following wait instead of shifting every later tick.
    pub fn run<B: Timebase + ?Sized, T: StopSignal + ?Sized>(
        &mut self,
        timebase: &mut B,
        hardware: &mut dyn HardwareMap,
        telemetry: &mut dyn Telemetry,
        stop: &T,
    ) -> Result<RunReport, OutputError> {
        let mut deadline = timebase.now_ms();
        loop {
            let now = timebase.now_ms();
            if let Step::Finished(outcome) = self.step(now, hardware, telemetry, stop)? {
                return Ok(RunReport {
                    outcome,
                    ticks: self.ticks,
                    elapsed_ms: self.monitor.elapsed_ms(),
                });
            }
            deadline = deadline.wrapping_add(self.interval_ms);
            timebase.wait_until(deadline);
        }
    }

    /// Ticks in which the root was polled
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Time since the first tick
    pub fn elapsed_ms(&self) -> u32 {
        self.monitor.elapsed_ms()
    }

    /// How the routine ended, if it has
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Output error that ended the routine, if any
    pub fn fault(&self) -> Option<OutputError> {
        match self.outcome {
            Some(Outcome::Faulted(e)) => Some(e),
            _ => None,
        }
    }

    /// Summary so far
    pub fn report(&self) -> Option<RunReport> {
        self.outcome.map(|outcome| RunReport {
            outcome,
            ticks: self.ticks,
            elapsed_ms: self.monitor.elapsed_ms(),
        })
    }

    /// Root action
    pub fn root(&self) -> &A {
        &self.root
    }
}
