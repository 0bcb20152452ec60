//! Configuration type definitions
//!
//! Every field has a default reproducing the competition routine, so a
//! TOML file only needs to name what it changes.

use heapless::String;
use serde::Deserialize;

use super::mission::MissionConfig;
use crate::action::Boundary;
use crate::traits::{check_position, check_power, Direction, ZeroPowerBehavior};

/// Maximum output name length
pub const MAX_LABEL_LEN: usize = 16;

/// Name of a hardware output
pub type OutputName = String<MAX_LABEL_LEN>;

/// Build an output name, leaving it empty if it does not fit
pub fn output_name(name: &str) -> OutputName {
    let mut out = OutputName::new();
    if out.push_str(name).is_err() {
        out.clear();
    }
    out
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// TOML could not be parsed into the expected shape
    Syntax,
    /// Motor power outside -1.0..=1.0
    InvalidPower,
    /// Servo position outside 0.0..=1.0
    InvalidPosition,
    /// Velocity negative or not finite
    InvalidVelocity,
    /// Stage bounds not strictly increasing from zero
    WindowOrder,
    /// Tick interval outside 1..=1000 ms
    InvalidTickInterval,
    /// Output name missing or too long
    EmptyName,
}

/// One velocity-controlled motor
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShooterMotor {
    /// Output name
    pub name: OutputName,
    /// Logical direction set at bind time
    pub direction: Direction,
    /// Velocity commanded by `on()`, in encoder ticks per second
    pub velocity: f32,
}

/// Shooter flywheel pair
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct ShooterConfig {
    pub left: ShooterMotor,
    pub right: ShooterMotor,
    /// Applied to both motors when stopped
    pub zero_power: ZeroPowerBehavior,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            left: ShooterMotor {
                name: output_name("leftShooter"),
                direction: Direction::Reverse,
                velocity: 1650.0,
            },
            right: ShooterMotor {
                name: output_name("rightShooter"),
                direction: Direction::Forward,
                velocity: 1675.0,
            },
            zero_power: ZeroPowerBehavior::Float,
        }
    }
}

/// Ball advance timing
///
/// Bounds are milliseconds since the first poll. The intake holds still
/// until `hold_ms`, pulls the ball back until `feed_ms`, then pushes it
/// into the shooter until `eject_ms`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct AdvanceConfig {
    pub hold_ms: u32,
    pub feed_ms: u32,
    pub eject_ms: u32,
    /// Power while pulling back (opposite to the bound direction)
    pub feed_power: f32,
    /// Power while pushing (bound direction)
    pub eject_power: f32,
}

impl Default for AdvanceConfig {
    fn default() -> Self {
        Self {
            hold_ms: 100,
            feed_ms: 200,
            eject_ms: 350,
            feed_power: 0.5,
            eject_power: 1.0,
        }
    }
}

/// Intake roller
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct IntakeConfig {
    pub name: OutputName,
    pub direction: Direction,
    /// Power commanded by `on()`
    pub on_power: f32,
    pub advance: AdvanceConfig,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            name: output_name("intake"),
            direction: Direction::Reverse,
            on_power: 0.9,
            advance: AdvanceConfig::default(),
        }
    }
}

/// Positions for the left and right feed servos
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoPair {
    pub left: f32,
    pub right: f32,
}

/// Feed servos lifting balls into the shooter
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct FeedConfig {
    pub left: OutputName,
    pub right: OutputName,
    pub raised: ServoPair,
    pub lowered: ServoPair,
    /// Time allowed for a stroke to complete (open loop)
    pub settle_ms: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            left: output_name("leftBringUp"),
            right: output_name("rightBringUp"),
            raised: ServoPair {
                left: 0.95,
                right: 0.04,
            },
            lowered: ServoPair {
                left: 0.5,
                right: 0.5,
            },
            settle_ms: 500,
        }
    }
}

/// Loop timing
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct TimingConfig {
    /// Control loop period
    pub tick_interval_ms: u32,
    /// Classification of elapsed times landing on a stage bound
    pub boundary: Boundary,
    /// Abort the routine after this long (0 disables)
    pub period_limit_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10,
            boundary: Boundary::HalfOpen,
            period_limit_ms: crate::safety::AUTONOMOUS_PERIOD_MS,
        }
    }
}

/// Complete routine configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct RoutineConfig {
    pub shooter: ShooterConfig,
    pub intake: IntakeConfig,
    pub feed: FeedConfig,
    pub timing: TimingConfig,
    pub mission: MissionConfig,
}

fn name_ok(name: &OutputName) -> Result<(), ConfigError> {
    if name.is_empty() {
        Err(ConfigError::EmptyName)
    } else {
        Ok(())
    }
}

fn power_ok(power: f32) -> Result<(), ConfigError> {
    check_power(power)
        .map(|_| ())
        .map_err(|_| ConfigError::InvalidPower)
}

fn position_ok(position: f32) -> Result<(), ConfigError> {
    check_position(position)
        .map(|_| ())
        .map_err(|_| ConfigError::InvalidPosition)
}

fn velocity_ok(velocity: f32) -> Result<(), ConfigError> {
    if velocity.is_finite() && velocity >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidVelocity)
    }
}

impl RoutineConfig {
    /// Check every value against the ranges the outputs accept
    pub fn validate(&self) -> Result<(), ConfigError> {
        for motor in [&self.shooter.left, &self.shooter.right] {
            name_ok(&motor.name)?;
            velocity_ok(motor.velocity)?;
        }

        let intake = &self.intake;
        name_ok(&intake.name)?;
        power_ok(intake.on_power)?;
        power_ok(intake.advance.feed_power)?;
        power_ok(intake.advance.eject_power)?;
        let advance = &intake.advance;
        if !(0 < advance.hold_ms && advance.hold_ms < advance.feed_ms && advance.feed_ms < advance.eject_ms)
        {
            return Err(ConfigError::WindowOrder);
        }

        let feed = &self.feed;
        name_ok(&feed.left)?;
        name_ok(&feed.right)?;
        for pair in [feed.raised, feed.lowered] {
            position_ok(pair.left)?;
            position_ok(pair.right)?;
        }

        if !(1..=1000).contains(&self.timing.tick_interval_ms) {
            return Err(ConfigError::InvalidTickInterval);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(RoutineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_constants() {
        let config = RoutineConfig::default();
        assert_eq!(config.shooter.left.name.as_str(), "leftShooter");
        assert_eq!(config.shooter.left.velocity, 1650.0);
        assert_eq!(config.shooter.right.velocity, 1675.0);
        assert_eq!(config.intake.direction, Direction::Reverse);
        assert_eq!(config.feed.raised.right, 0.04);
        assert_eq!(config.timing.period_limit_ms, 30_000);
    }

    #[test]
    fn test_output_name_too_long() {
        assert!(output_name("aVeryLongOutputNameIndeed").is_empty());
        assert_eq!(output_name("intake").as_str(), "intake");
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = RoutineConfig::default();
        config.intake.on_power = 1.2;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPower));

        let mut config = RoutineConfig::default();
        config.feed.lowered.left = -0.1;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPosition));

        let mut config = RoutineConfig::default();
        config.shooter.right.velocity = f32::INFINITY;
        assert_eq!(config.validate(), Err(ConfigError::InvalidVelocity));

        let mut config = RoutineConfig::default();
        config.intake.advance.feed_ms = 100;
        assert_eq!(config.validate(), Err(ConfigError::WindowOrder));

        let mut config = RoutineConfig::default();
        config.timing.tick_interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTickInterval));

        let mut config = RoutineConfig::default();
        config.feed.right.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyName));
    }
}
