//! Intake roller and ball advance

use super::SetupError;
use crate::action::{Action, Boundary, Context, Lifecycle, Lookup, StageTable, Status};
use crate::config::{ConfigError, IntakeConfig, OutputName};
use crate::safety::SafeState;
use crate::traits::{check_power, Direction, HardwareMap, OutputError, Value};

/// Telemetry key for ball advance progress
pub const ADVANCE_TELEMETRY: &str = "intake.advance_ms";

/// Output applied during one stage of a ball advance
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntakeCommand {
    /// Direction to set first (None leaves it unchanged)
    pub direction: Option<Direction>,
    pub power: f32,
}

impl IntakeCommand {
    fn apply(&self, ctx: &mut Context<'_>, name: &str) -> Result<(), OutputError> {
        let motor = ctx.motor(name)?;
        if let Some(direction) = self.direction {
            motor.set_direction(direction)?;
        }
        motor.set_power(check_power(self.power)?)
    }
}

/// Single intake motor
#[derive(Debug, Clone)]
pub struct Intake {
    name: OutputName,
    on_power: f32,
    advance: StageTable<IntakeCommand>,
}

impl Intake {
    /// Bind the motor and set its direction
    ///
    /// The ball advance windows are laid out relative to that direction:
    /// hold, pull back at feed power, push at eject power, then stop with
    /// the bound direction restored. Windows out of order are rejected
    /// before the motor is touched.
    pub fn bind(
        config: &IntakeConfig,
        boundary: Boundary,
        hw: &mut dyn HardwareMap,
    ) -> Result<Self, SetupError> {
        let forward = Some(config.direction);
        let back = Some(config.direction.opposite());
        let timing = &config.advance;
        let advance = StageTable::new(
            IntakeCommand {
                direction: forward,
                power: 0.0,
            },
            boundary,
        )
        .window(
            timing.hold_ms,
            IntakeCommand {
                direction: None,
                power: 0.0,
            },
        )
        .and_then(|t| {
            t.window(
                timing.feed_ms,
                IntakeCommand {
                    direction: back,
                    power: timing.feed_power,
                },
            )
        })
        .and_then(|t| {
            t.window(
                timing.eject_ms,
                IntakeCommand {
                    direction: forward,
                    power: timing.eject_power,
                },
            )
        })
        .map_err(|_| ConfigError::WindowOrder)?;

        hw.motor(&config.name)?.set_direction(config.direction)?;

        Ok(Self {
            name: config.name.clone(),
            on_power: config.on_power,
            advance,
        })
    }

    /// Run the roller at the configured power
    pub fn on(&self) -> IntakePower {
        self.power("intake.on", self.on_power)
    }

    /// Stop the roller
    pub fn off(&self) -> IntakePower {
        self.power("intake.off", 0.0)
    }

    /// Push one held ball into the shooter
    pub fn advance_ball(&self) -> AdvanceBall {
        AdvanceBall {
            name: self.name.clone(),
            table: self.advance.clone(),
            state: Lifecycle::NotStarted,
        }
    }

    fn power(&self, label: &'static str, power: f32) -> IntakePower {
        IntakePower {
            label,
            name: self.name.clone(),
            power,
            state: Lifecycle::NotStarted,
        }
    }
}

impl SafeState for Intake {
    fn make_safe(&self, hw: &mut dyn HardwareMap) -> Result<(), OutputError> {
        hw.motor(&self.name)?.set_power(0.0)
    }
}

/// Set the roller power once and finish
pub struct IntakePower {
    label: &'static str,
    name: OutputName,
    power: f32,
    state: Lifecycle,
}

impl Action for IntakePower {
    fn poll(&mut self, ctx: &mut Context<'_>) -> Result<Status, OutputError> {
        if !self.state.start(ctx.now_ms) {
            return Ok(Status::Done);
        }

        ctx.motor(&self.name)?.set_power(check_power(self.power)?)?;
        self.state.finish();
        Ok(Status::Done)
    }

    fn cancel(&mut self, _ctx: &mut Context<'_>) -> Result<(), OutputError> {
        self.state.finish();
        Ok(())
    }

    fn label(&self) -> &'static str {
        self.label
    }
}

/// Timed multi-stage ball advance
///
/// The stage command is reapplied on every poll. Once the last window has
/// passed the roller is stopped and the action finishes.
pub struct AdvanceBall {
    name: OutputName,
    table: StageTable<IntakeCommand>,
    state: Lifecycle,
}

impl Action for AdvanceBall {
    fn poll(&mut self, ctx: &mut Context<'_>) -> Result<Status, OutputError> {
        if self.state.is_done() {
            return Ok(Status::Done);
        }
        self.state.start(ctx.now_ms);

        let elapsed = self.state.elapsed_ms(ctx.now_ms).unwrap_or(0);
        ctx.report(ADVANCE_TELEMETRY, Value::Millis(elapsed));

        match self.table.lookup(elapsed) {
            Lookup::Stage(stage, command) => {
                if self.state.stage() != Some(stage) {
                    debug!("advance: stage {} at {} ms", stage, elapsed);
                    self.state.set_stage(stage);
                }
                command.apply(ctx, &self.name)?;
                Ok(Status::Running)
            }
            Lookup::Gap => Ok(Status::Running),
            Lookup::Finished(command) => {
                self.state.finish();
                command.apply(ctx, &self.name)?;
                Ok(Status::Done)
            }
        }
    }

    fn cancel(&mut self, ctx: &mut Context<'_>) -> Result<(), OutputError> {
        let was_running = self.state.is_running();
        self.state.finish();
        if was_running {
            self.table.finish().apply(ctx, &self.name)?;
        }
        Ok(())
    }

    fn label(&self) -> &'static str {
        "intake.advance"
    }
}
