//! Trajectory provider trait

use super::Leg;
use crate::action::BoxedAction;

/// Builds drive actions for path legs
///
/// Implementations own the path follower and localization. The returned
/// action is polled like any other and reports `Done` once the leg has
/// been driven; the core makes no assumption about how long that takes.
pub trait TrajectoryProvider {
    /// Build the action that drives `leg`
    fn build(&mut self, leg: &Leg) -> BoxedAction;
}
