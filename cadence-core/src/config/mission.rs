//! Mission data: the legs driven and the cycles run

use heapless::Vec;
use serde::Deserialize;

use crate::motion::{Leg, Pose};

/// Maximum intake cycles after the preload
pub const MAX_CYCLES: usize = 6;

/// One intake-and-shoot cycle
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleConfig {
    /// Drive to the ball row
    pub approach: Leg,
    /// Drive along the row with the intake running
    pub sweep: Leg,
    /// Drive to the shooting position
    pub shoot: Leg,
    /// Pause before the volley (0 skips it)
    #[serde(default)]
    pub settle_ms: u32,
}

/// Legs and cycles of the routine
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct MissionConfig {
    /// Leg driven while shooting the preloaded balls
    pub preload: Leg,
    /// Stop the shooter after the preload volley
    pub preload_spin_down: bool,
    /// Pause between the two feed strokes of a volley
    pub volley_pause_ms: u32,
    pub cycles: Vec<CycleConfig, MAX_CYCLES>,
}

fn cycle(approach: Leg, sweep: Leg, shoot: Leg, settle_ms: u32) -> CycleConfig {
    CycleConfig {
        approach,
        sweep,
        shoot,
        settle_ms,
    }
}

impl Default for MissionConfig {
    fn default() -> Self {
        let mut cycles = Vec::new();
        for c in [
            cycle(
                Leg::starting_at(Pose::new(40.0, 124.0, 125.0)).strafe_to(38.0, 74.5, 163.0),
                Leg::starting_at(Pose::new(38.0, 74.5, 163.0)).line_to_y(82.0),
                Leg::starting_at(Pose::new(38.0, 84.0, 163.0)).strafe_to(60.0, 88.0, 120.0),
                500,
            ),
            cycle(
                Leg::starting_at(Pose::new(60.0, 88.0, 120.0)).strafe_to(35.0, 38.0, 166.5),
                Leg::starting_at(Pose::new(35.0, 49.0, 163.0)).line_to_y(57.0),
                Leg::starting_at(Pose::new(35.0, 55.0, 163.0)).strafe_to(54.0, 85.0, 120.0),
                0,
            ),
            cycle(
                Leg::starting_at(Pose::new(54.0, 85.0, 120.0)).strafe_to(32.5, 15.0, 163.0),
                Leg::starting_at(Pose::new(32.5, 15.0, 163.0)).line_to_y(25.0),
                Leg::starting_at(Pose::new(32.0, 25.0, 163.0)).strafe_to(70.0, 78.0, 111.5),
                0,
            ),
        ] {
            // Three cycles always fit
            let _ = cycles.push(c);
        }

        Self {
            preload: Leg::starting_at(Pose::new(21.0, 124.0, 125.0)).line_to_x(40.0),
            preload_spin_down: true,
            volley_pause_ms: 333,
            cycles,
        }
    }
}

impl MissionConfig {
    /// Every leg in driving order
    pub fn legs(&self) -> impl Iterator<Item = &Leg> {
        core::iter::once(&self.preload).chain(
            self.cycles
                .iter()
                .flat_map(|c| [&c.approach, &c.sweep, &c.shoot]),
        )
    }
}
