//! Non-blocking delay

use super::{Action, Context, Lifecycle, Status};
use crate::traits::OutputError;

/// Wait for a fixed duration without blocking the loop
///
/// The clock starts on the first poll, which always reports `Running`.
/// A sleep therefore lasts at least one tick, even with a zero duration.
#[derive(Debug, Clone)]
pub struct Sleep {
    duration_ms: u32,
    state: Lifecycle,
}

impl Sleep {
    /// Sleep for `duration_ms` milliseconds
    pub const fn millis(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            state: Lifecycle::NotStarted,
        }
    }

    /// Sleep for a fractional number of seconds, truncated to milliseconds
    pub fn secs_f32(seconds: f32) -> Self {
        Self::millis((seconds * 1000.0) as u32)
    }

    /// Target duration
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }
}

impl Action for Sleep {
    fn poll(&mut self, ctx: &mut Context<'_>) -> Result<Status, OutputError> {
        if self.state.start(ctx.now_ms) {
            return Ok(Status::Running);
        }

        match self.state.elapsed_ms(ctx.now_ms) {
            Some(elapsed) if elapsed < self.duration_ms => Ok(Status::Running),
            _ => {
                self.state.finish();
                Ok(Status::Done)
            }
        }
    }

    fn cancel(&mut self, _ctx: &mut Context<'_>) -> Result<(), OutputError> {
        self.state.finish();
        Ok(())
    }

    fn label(&self) -> &'static str {
        "sleep"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{run_to_done, FakeHardware, RecordingTelemetry};
    use proptest::prelude::*;

    fn poll_at(sleep: &mut Sleep, now_ms: u32) -> Status {
        let mut hw = FakeHardware::new();
        let mut telemetry = RecordingTelemetry::default();
        let mut ctx = Context::new(now_ms, &mut hw, &mut telemetry);
        sleep.poll(&mut ctx).unwrap()
    }

    #[test]
    fn test_zero_duration_runs_once() {
        let mut sleep = Sleep::millis(0);
        assert_eq!(poll_at(&mut sleep, 1000), Status::Running);
        assert_eq!(poll_at(&mut sleep, 1000), Status::Done);
    }

    #[test]
    fn test_done_at_duration() {
        let mut sleep = Sleep::millis(500);
        assert_eq!(poll_at(&mut sleep, 100), Status::Running);
        assert_eq!(poll_at(&mut sleep, 599), Status::Running);
        assert_eq!(poll_at(&mut sleep, 600), Status::Done);
    }

    #[test]
    fn test_done_stays_done() {
        let mut sleep = Sleep::millis(10);
        poll_at(&mut sleep, 0);
        assert_eq!(poll_at(&mut sleep, 20), Status::Done);
        // A later poll does not restart the clock
        assert_eq!(poll_at(&mut sleep, 25), Status::Done);
    }

    #[test]
    fn test_secs_f32() {
        assert_eq!(Sleep::secs_f32(1.0 / 3.0).duration_ms(), 333);
        assert_eq!(Sleep::secs_f32(0.5).duration_ms(), 500);
        assert_eq!(Sleep::secs_f32(-1.0).duration_ms(), 0);
    }

    #[test]
    fn test_short_sleep_takes_a_full_tick() {
        let mut sleep = Sleep::millis(3);
        let mut hw = FakeHardware::new();
        let mut telemetry = RecordingTelemetry::default();
        let finished_at = run_to_done(&mut sleep, &mut hw, &mut telemetry, 20, 10);
        assert_eq!(finished_at, 20);
    }

    #[test]
    fn test_cancel_finishes() {
        let mut sleep = Sleep::millis(1000);
        poll_at(&mut sleep, 0);

        let mut hw = FakeHardware::new();
        let mut telemetry = RecordingTelemetry::default();
        let mut ctx = Context::new(5, &mut hw, &mut telemetry);
        sleep.cancel(&mut ctx).unwrap();
        assert_eq!(sleep.poll(&mut ctx).unwrap(), Status::Done);
        assert!(hw.commands().is_empty());
    }

    proptest! {
        #[test]
        fn prop_running_until_elapsed(duration in 0u32..5_000, start in 0u32..100_000, probe in 0u32..10_000) {
            let mut sleep = Sleep::millis(duration);
            prop_assert_eq!(poll_at(&mut sleep, start), Status::Running);

            let expected = if probe < duration { Status::Running } else { Status::Done };
            prop_assert_eq!(poll_at(&mut sleep, start + probe), expected);
        }
    }
}
