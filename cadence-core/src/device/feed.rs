//! Feed servos

use crate::action::{Action, Context, Lifecycle, Status};
use crate::config::{FeedConfig, OutputName, ServoPair};
use crate::safety::SafeState;
use crate::traits::{check_position, HardwareMap, OutputError, Value};

/// Telemetry key for a raise stroke
pub const RAISE_TELEMETRY: &str = "feed.raise_ms";
/// Telemetry key for a lower stroke
pub const LOWER_TELEMETRY: &str = "feed.lower_ms";

/// Pair of servos lifting balls into the shooter
#[derive(Debug, Clone)]
pub struct Feed {
    left: OutputName,
    right: OutputName,
    raised: ServoPair,
    lowered: ServoPair,
    settle_ms: u32,
}

impl Feed {
    /// Resolve both servos
    ///
    /// Nothing is commanded at bind time; the servos keep whatever position
    /// they powered up in until the first stroke.
    pub fn bind(config: &FeedConfig, hw: &mut dyn HardwareMap) -> Result<Self, OutputError> {
        hw.servo(&config.left)?;
        hw.servo(&config.right)?;

        Ok(Self {
            left: config.left.clone(),
            right: config.right.clone(),
            raised: config.raised,
            lowered: config.lowered,
            settle_ms: config.settle_ms,
        })
    }

    /// Lift the ball into the shooter
    pub fn raise(&self) -> FeedStroke {
        self.stroke("feed.raise", RAISE_TELEMETRY, self.raised)
    }

    /// Return to the loading position
    pub fn lower(&self) -> FeedStroke {
        self.stroke("feed.lower", LOWER_TELEMETRY, self.lowered)
    }

    fn stroke(&self, label: &'static str, key: &'static str, target: ServoPair) -> FeedStroke {
        FeedStroke {
            label,
            key,
            left: self.left.clone(),
            right: self.right.clone(),
            target,
            settle_ms: self.settle_ms,
            state: Lifecycle::NotStarted,
        }
    }
}

fn set_pair(
    hw: &mut dyn HardwareMap,
    left: &str,
    right: &str,
    target: ServoPair,
) -> Result<(), OutputError> {
    let l = check_position(target.left).and_then(|p| hw.servo(left)?.set_position(p));
    let r = check_position(target.right).and_then(|p| hw.servo(right)?.set_position(p));
    l.and(r)
}

impl SafeState for Feed {
    fn make_safe(&self, hw: &mut dyn HardwareMap) -> Result<(), OutputError> {
        set_pair(hw, &self.left, &self.right, self.lowered)
    }
}

/// Move both servos, then wait for them to settle
///
/// Positions are commanded on the first poll only. There is no feedback,
/// so the stroke simply runs for the settle time.
pub struct FeedStroke {
    label: &'static str,
    key: &'static str,
    left: OutputName,
    right: OutputName,
    target: ServoPair,
    settle_ms: u32,
    state: Lifecycle,
}

impl Action for FeedStroke {
    fn poll(&mut self, ctx: &mut Context<'_>) -> Result<Status, OutputError> {
        if self.state.is_done() {
            return Ok(Status::Done);
        }
        if self.state.start(ctx.now_ms) {
            set_pair(&mut *ctx.hardware, &self.left, &self.right, self.target)?;
        }

        let elapsed = self.state.elapsed_ms(ctx.now_ms).unwrap_or(0);
        ctx.report(self.key, Value::Millis(elapsed));

        if elapsed < self.settle_ms {
            Ok(Status::Running)
        } else {
            self.state.finish();
            Ok(Status::Done)
        }
    }

    fn cancel(&mut self, _ctx: &mut Context<'_>) -> Result<(), OutputError> {
        self.state.finish();
        Ok(())
    }

    fn label(&self) -> &'static str {
        self.label
    }
}
