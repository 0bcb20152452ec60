//! Cooperative actions
//!
//! An action is a unit of work polled once per tick. A poll never blocks:
//! an action that has to wait returns [`Status::Running`] and is polled
//! again on the next tick. Composites ([`Sequential`], [`Parallel`]) build
//! larger actions without looking inside their children.

pub mod lifecycle;
pub mod parallel;
pub mod sequential;
pub mod sleep;
pub mod staged;

use alloc::boxed::Box;

use crate::traits::{HardwareMap, MotorOutput, OutputError, ServoOutput, Telemetry, Value};

pub use lifecycle::Lifecycle;
pub use parallel::Parallel;
pub use sequential::Sequential;
pub use sleep::Sleep;
pub use staged::{Boundary, Lookup, StageError, StageTable, Window, MAX_STAGES};

/// Result of polling an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Poll again next tick
    Running,
    /// Finished; must not be polled again
    Done,
}

impl Status {
    /// Check if the action wants another poll
    pub fn is_running(self) -> bool {
        self == Status::Running
    }

    /// Check if the action has finished
    pub fn is_done(self) -> bool {
        self == Status::Done
    }
}

impl From<bool> for Status {
    fn from(running: bool) -> Self {
        if running {
            Status::Running
        } else {
            Status::Done
        }
    }
}

/// Everything an action may touch during one poll
///
/// `now_ms` is sampled once per tick, so every action polled in the same
/// tick sees the same timestamp.
pub struct Context<'a> {
    /// Tick timestamp in milliseconds (wrapping)
    pub now_ms: u32,
    /// Output lookup
    pub hardware: &'a mut dyn HardwareMap,
    /// Telemetry sink for this tick
    pub telemetry: &'a mut dyn Telemetry,
}

impl<'a> Context<'a> {
    /// Create a context for one tick
    pub fn new(
        now_ms: u32,
        hardware: &'a mut dyn HardwareMap,
        telemetry: &'a mut dyn Telemetry,
    ) -> Self {
        Self {
            now_ms,
            hardware,
            telemetry,
        }
    }

    /// Look up a motor by name
    pub fn motor(&mut self, name: &str) -> Result<&mut dyn MotorOutput, OutputError> {
        self.hardware.motor(name)
    }

    /// Look up a servo by name
    pub fn servo(&mut self, name: &str) -> Result<&mut dyn ServoOutput, OutputError> {
        self.hardware.servo(name)
    }

    /// Record a telemetry value
    pub fn report(&mut self, key: &'static str, value: Value) {
        self.telemetry.put(key, value);
    }
}

/// A cooperatively polled unit of work
pub trait Action {
    /// Advance by one tick
    ///
    /// The first poll performs the action's one-time setup. Hardware
    /// errors are returned immediately and abort the routine.
    fn poll(&mut self, ctx: &mut Context<'_>) -> Result<Status, OutputError>;

    /// Stop early, emitting terminal commands if the action is mid-flight
    ///
    /// After `cancel` the action reports [`Status::Done`].
    fn cancel(&mut self, ctx: &mut Context<'_>) -> Result<(), OutputError> {
        let _ = ctx;
        Ok(())
    }

    /// Short name used in logs
    fn label(&self) -> &'static str;
}

/// Heap-allocated action, used by composites
pub type BoxedAction = Box<dyn Action>;

impl<A: Action + ?Sized> Action for Box<A> {
    fn poll(&mut self, ctx: &mut Context<'_>) -> Result<Status, OutputError> {
        (**self).poll(ctx)
    }

    fn cancel(&mut self, ctx: &mut Context<'_>) -> Result<(), OutputError> {
        (**self).cancel(ctx)
    }

    fn label(&self) -> &'static str {
        (**self).label()
    }
}
