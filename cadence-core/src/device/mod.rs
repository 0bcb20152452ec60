//! Device controllers
//!
//! Controllers bind to named outputs once, configure their static
//! properties, and then hand out a fresh action for every use.

pub mod feed;
pub mod intake;
pub mod shooter;

use crate::config::{ConfigError, RoutineConfig};
use crate::safety::SafeState;
use crate::traits::{HardwareMap, OutputError};

pub use feed::{Feed, FeedStroke, LOWER_TELEMETRY, RAISE_TELEMETRY};
pub use intake::{AdvanceBall, Intake, IntakeCommand, IntakePower, ADVANCE_TELEMETRY};
pub use shooter::{Shooter, ShooterAction};

/// Why the controllers could not be set up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError {
    /// Configuration rejected before any output was touched
    Config(ConfigError),
    /// Output missing or failing while binding
    Output(OutputError),
}

impl From<ConfigError> for SetupError {
    fn from(e: ConfigError) -> Self {
        SetupError::Config(e)
    }
}

impl From<OutputError> for SetupError {
    fn from(e: OutputError) -> Self {
        SetupError::Output(e)
    }
}

/// Every controller the routine uses
#[derive(Debug, Clone)]
pub struct Devices {
    pub shooter: Shooter,
    pub intake: Intake,
    pub feed: Feed,
}

impl Devices {
    /// Bind all controllers
    pub fn bind(config: &RoutineConfig, hw: &mut dyn HardwareMap) -> Result<Self, SetupError> {
        let devices = Self {
            shooter: Shooter::bind(&config.shooter, hw)?,
            intake: Intake::bind(&config.intake, config.timing.boundary, hw)?,
            feed: Feed::bind(&config.feed, hw)?,
        };
        debug!("devices bound");
        Ok(devices)
    }
}

/// Shooter stopped, intake stopped, feed lowered
impl SafeState for Devices {
    fn make_safe(&self, hw: &mut dyn HardwareMap) -> Result<(), OutputError> {
        let shooter = self.shooter.make_safe(hw);
        let intake = self.intake.make_safe(hw);
        let feed = self.feed.make_safe(hw);
        shooter.and(intake).and(feed)
    }
}
