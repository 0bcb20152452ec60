//! Hardware output traits
//!
//! The scheduling core is open loop: it only ever writes to outputs and
//! never reads hardware state back. Implementations live in
//! `cadence-drivers` (or in test fakes).

use serde::Deserialize;

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Positive power turns the output forward
    #[default]
    Forward,
    /// Positive power turns the output in reverse
    Reverse,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// Sign applied to a commanded power or velocity
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }
}

/// What a motor does when commanded to zero power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum ZeroPowerBehavior {
    /// Short the windings, stopping quickly
    #[default]
    Brake,
    /// Let the motor coast to a stop
    Float,
}

/// How a motor interprets its commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Power is applied directly
    #[default]
    OpenLoop,
    /// Velocity targets are tracked by the driver
    Velocity,
}

/// Errors raised by hardware outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// No output is bound under the requested name
    NotFound,
    /// Commanded value is outside the output's range
    InvalidValue,
    /// The underlying peripheral rejected the write
    Bus,
}

/// A DC motor output
///
/// Setters are write-only. Calling the same setter twice with the same
/// value must be harmless.
pub trait MotorOutput {
    /// Set the logical direction (flips the sign of power and velocity)
    fn set_direction(&mut self, dir: Direction) -> Result<(), OutputError>;

    /// Set the behavior applied at zero power
    fn set_zero_power_behavior(&mut self, behavior: ZeroPowerBehavior) -> Result<(), OutputError>;

    /// Set the run mode
    fn set_run_mode(&mut self, mode: RunMode) -> Result<(), OutputError>;

    /// Apply raw power in the range -1.0..=1.0
    fn set_power(&mut self, power: f32) -> Result<(), OutputError>;

    /// Track a velocity target in encoder ticks per second
    fn set_velocity(&mut self, ticks_per_s: f32) -> Result<(), OutputError>;
}

/// A positional servo output
pub trait ServoOutput {
    /// Command a position in the range 0.0..=1.0
    fn set_position(&mut self, position: f32) -> Result<(), OutputError>;
}

/// Named lookup of the robot's outputs
///
/// Device controllers hold output names, not handles. Every poll receives
/// the map through its context, so tests can substitute fakes.
pub trait HardwareMap {
    /// Look up a motor by name
    fn motor(&mut self, name: &str) -> Result<&mut dyn MotorOutput, OutputError>;

    /// Look up a servo by name
    fn servo(&mut self, name: &str) -> Result<&mut dyn ServoOutput, OutputError>;
}

/// Check that a power command is within -1.0..=1.0
pub fn check_power(power: f32) -> Result<f32, OutputError> {
    if (-1.0..=1.0).contains(&power) {
        Ok(power)
    } else {
        Err(OutputError::InvalidValue)
    }
}

/// Check that a servo position is within 0.0..=1.0
pub fn check_position(position: f32) -> Result<f32, OutputError> {
    if (0.0..=1.0).contains(&position) {
        Ok(position)
    } else {
        Err(OutputError::InvalidValue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Forward.opposite(), Direction::Reverse);
        assert_eq!(Direction::Reverse.opposite(), Direction::Forward);
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Forward.sign(), 1.0);
        assert_eq!(Direction::Reverse.sign(), -1.0);
    }

    #[test]
    fn test_power_range() {
        assert_eq!(check_power(0.9), Ok(0.9));
        assert_eq!(check_power(-1.0), Ok(-1.0));
        assert_eq!(check_power(1.5), Err(OutputError::InvalidValue));
        assert_eq!(check_power(f32::NAN), Err(OutputError::InvalidValue));
    }

    #[test]
    fn test_position_range() {
        assert_eq!(check_position(0.04), Ok(0.04));
        assert_eq!(check_position(-0.1), Err(OutputError::InvalidValue));
    }
}
