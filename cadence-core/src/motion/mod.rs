//! Trajectory boundary
//!
//! The core never plans or follows paths itself. It describes each leg of
//! the routine and hands it to a [`TrajectoryProvider`], which returns an
//! opaque action that drives the robot along it.

pub mod path;
pub mod provider;

pub use path::{Leg, PathDirective, Pose, MAX_DIRECTIVES};
pub use provider::TrajectoryProvider;
