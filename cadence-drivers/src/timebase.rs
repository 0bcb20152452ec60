//! Embassy timebase and async driver loop
//!
//! `EmbassyTimebase` lets the blocking `Runner::run` loop sleep on the
//! embassy time driver. Inside an embassy executor prefer [`drive`], which
//! awaits a `Ticker` instead of busy-waiting.

use cadence_core::action::Action;
use cadence_core::runner::{deadline_reached, RunReport, Runner, Step, Timebase};
use cadence_core::safety::{SafeState, StopSignal};
use cadence_core::traits::{HardwareMap, OutputError, Telemetry};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{block_for, Duration, Instant, Ticker};

/// Milliseconds since the timebase was created
#[derive(Debug, Clone, Copy)]
pub struct EmbassyTimebase {
    origin: Instant,
}

impl EmbassyTimebase {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for EmbassyTimebase {
    fn default() -> Self {
        Self::new()
    }
}

impl Timebase for EmbassyTimebase {
    fn now_ms(&self) -> u32 {
        self.origin.elapsed().as_millis() as u32
    }

    fn wait_until(&mut self, deadline_ms: u32) {
        let now = self.now_ms();
        if !deadline_reached(now, deadline_ms) {
            block_for(Duration::from_millis(deadline_ms.wrapping_sub(now) as u64));
        }
    }
}

/// Stop signal raised from another task
///
/// ```ignore
/// static STOP: Signal<CriticalSectionRawMutex, ()> = Signal::new();
/// // elsewhere: STOP.signal(());
/// drive(&mut runner, &mut outputs, &mut telemetry, &SignalStop(&STOP)).await
/// ```
pub struct SignalStop<'a, M: RawMutex>(pub &'a Signal<M, ()>);

impl<M: RawMutex> StopSignal for SignalStop<'_, M> {
    fn stop_requested(&self) -> bool {
        self.0.signaled()
    }
}

/// Tick a runner from an async task until the routine ends
///
/// Ticks at the runner's own interval.
pub async fn drive<A, S, T>(
    runner: &mut Runner<A, S>,
    hardware: &mut dyn HardwareMap,
    telemetry: &mut dyn Telemetry,
    stop: &T,
) -> Result<RunReport, OutputError>
where
    A: Action,
    S: SafeState,
    T: StopSignal + ?Sized,
{
    let origin = Instant::now();
    let mut ticker = Ticker::every(Duration::from_millis(runner.interval_ms() as u64));
    loop {
        let now = origin.elapsed().as_millis() as u32;
        if let Step::Finished(outcome) = runner.step(now, hardware, telemetry, stop)? {
            return Ok(RunReport {
                outcome,
                ticks: runner.ticks(),
                elapsed_ms: runner.elapsed_ms(),
            });
        }
        ticker.next().await;
    }
}
