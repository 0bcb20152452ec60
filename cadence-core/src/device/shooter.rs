//! Shooter flywheels

use crate::action::{Action, Context, Lifecycle, Status};
use crate::config::{OutputName, ShooterConfig};
use crate::safety::SafeState;
use crate::traits::{HardwareMap, OutputError, RunMode};

/// Velocity-controlled flywheel pair
#[derive(Debug, Clone)]
pub struct Shooter {
    left: OutputName,
    right: OutputName,
    on_velocity: [f32; 2],
}

impl Shooter {
    /// Bind both motors and configure direction, run mode and zero-power
    /// behavior
    pub fn bind(config: &ShooterConfig, hw: &mut dyn HardwareMap) -> Result<Self, OutputError> {
        for motor in [&config.left, &config.right] {
            let output = hw.motor(&motor.name)?;
            output.set_direction(motor.direction)?;
            output.set_run_mode(RunMode::Velocity)?;
            output.set_zero_power_behavior(config.zero_power)?;
        }

        Ok(Self {
            left: config.left.name.clone(),
            right: config.right.name.clone(),
            on_velocity: [config.left.velocity, config.right.velocity],
        })
    }

    /// Spin up to the configured velocities
    pub fn on(&self) -> ShooterAction {
        self.action("shooter.on", self.on_velocity)
    }

    /// Stop both flywheels
    pub fn off(&self) -> ShooterAction {
        self.action("shooter.off", [0.0, 0.0])
    }

    fn action(&self, label: &'static str, velocity: [f32; 2]) -> ShooterAction {
        ShooterAction {
            label,
            left: self.left.clone(),
            right: self.right.clone(),
            velocity,
            state: Lifecycle::NotStarted,
        }
    }
}

impl SafeState for Shooter {
    fn make_safe(&self, hw: &mut dyn HardwareMap) -> Result<(), OutputError> {
        let left = hw.motor(&self.left).and_then(|m| m.set_velocity(0.0));
        let right = hw.motor(&self.right).and_then(|m| m.set_velocity(0.0));
        left.and(right)
    }
}

/// Set both flywheel velocities once and finish
pub struct ShooterAction {
    label: &'static str,
    left: OutputName,
    right: OutputName,
    velocity: [f32; 2],
    state: Lifecycle,
}

impl Action for ShooterAction {
    fn poll(&mut self, ctx: &mut Context<'_>) -> Result<Status, OutputError> {
        if !self.state.start(ctx.now_ms) {
            return Ok(Status::Done);
        }

        ctx.motor(&self.left)?.set_velocity(self.velocity[0])?;
        ctx.motor(&self.right)?.set_velocity(self.velocity[1])?;
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
