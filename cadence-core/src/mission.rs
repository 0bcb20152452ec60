//! Routine builder
//!
//! Turns mission data into the root action: a preload volley followed by
//! intake cycles. Drive legs come from the trajectory provider; everything
//! else comes from the device controllers.

use crate::action::{Sequential, Sleep};
use crate::config::{CycleConfig, MissionConfig, RoutineConfig};
use crate::device::{Devices, SetupError};
use crate::motion::TrajectoryProvider;
use crate::runner::Runner;
use crate::traits::HardwareMap;

/// Legs further apart than this are reported as disconnected
pub const LEG_TOLERANCE_IN: f32 = 1.0;
/// Heading difference reported as disconnected
pub const LEG_TOLERANCE_DEG: f32 = 5.0;

/// Feed one ball, advance the next, feed again
pub fn volley(devices: &Devices, pause_ms: u32) -> Sequential {
    Sequential::new("volley")
        .then(devices.feed.raise())
        .then(devices.feed.lower())
        .then(devices.intake.advance_ball())
        .then(Sleep::millis(pause_ms))
        .then(devices.feed.raise())
        .then(devices.feed.lower())
}

fn preload(
    config: &MissionConfig,
    devices: &Devices,
    trajectories: &mut dyn TrajectoryProvider,
) -> Sequential {
    let mut phase = Sequential::new("preload")
        .then(devices.shooter.on())
        .then_boxed(trajectories.build(&config.preload))
        .then(volley(devices, config.volley_pause_ms));
    if config.preload_spin_down {
        phase.push(devices.shooter.off());
    }
    phase
}

fn cycle(
    cycle: &CycleConfig,
    pause_ms: u32,
    devices: &Devices,
    trajectories: &mut dyn TrajectoryProvider,
) -> Sequential {
    let mut phase = Sequential::new("cycle")
        .then_boxed(trajectories.build(&cycle.approach))
        .then(devices.intake.on())
        .then_boxed(trajectories.build(&cycle.sweep))
        .then(devices.shooter.on())
        .then_boxed(trajectories.build(&cycle.shoot))
        .then(devices.intake.off());
    if cycle.settle_ms > 0 {
        phase.push(Sleep::millis(cycle.settle_ms));
    }
    phase.then(volley(devices, pause_ms))
}

/// Count legs that do not start where the previous one ended
///
/// Each gap is logged. The routine still runs; the path follower is
/// expected to close small gaps itself.
pub fn check_continuity(config: &MissionConfig) -> usize {
    let mut gaps = 0;
    let mut legs = config.legs().enumerate();
    let Some((_, mut prev)) = legs.next() else {
        return 0;
    };
    for (index, leg) in legs {
        let end = prev.end_pose();
        if !end.is_near(&leg.start, LEG_TOLERANCE_IN, LEG_TOLERANCE_DEG) {
            warn!(
                "leg {} starts at ({}, {}) but previous ends at ({}, {})",
                index,
                leg.start.x,
                leg.start.y,
                end.x,
                end.y
            );
            gaps += 1;
        }
        prev = leg;
    }
    gaps
}

/// Build the root action for a mission
pub fn build(
    config: &MissionConfig,
    devices: &Devices,
    trajectories: &mut dyn TrajectoryProvider,
) -> Sequential {
    check_continuity(config);

    let mut root = Sequential::new("routine").then(preload(config, devices, trajectories));
    for c in &config.cycles {
        root.push(cycle(c, config.volley_pause_ms, devices, trajectories));
    }
    debug!("routine built: {} phases", root.len());
    root
}

/// Bind devices and build a runner for the configured routine
///
/// The configuration is validated before any output is touched, so a bad
/// value is reported here instead of faulting mid-routine.
pub fn prepare(
    config: &RoutineConfig,
    hw: &mut dyn HardwareMap,
    trajectories: &mut dyn TrajectoryProvider,
) -> Result<Runner<Sequential, Devices>, SetupError> {
    if let Err(e) = config.validate() {
        warn!("routine config rejected: {}", e);
        return Err(e.into());
    }
    let devices = Devices::bind(config, hw)?;
    let root = build(&config.mission, &devices, trajectories);
    Ok(Runner::new(root, devices)
        .with_period_limit(config.timing.period_limit_ms)
        .with_interval(config.timing.tick_interval_ms))
}
