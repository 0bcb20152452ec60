//! Poses and path legs

use heapless::Vec;
use serde::Deserialize;

/// Maximum directives in one leg
pub const MAX_DIRECTIVES: usize = 4;

/// Field position and heading
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pose {
    /// Field x in inches
    pub x: f32,
    /// Field y in inches
    pub y: f32,
    /// Heading in degrees
    pub heading_deg: f32,
}

impl Pose {
    pub const fn new(x: f32, y: f32, heading_deg: f32) -> Self {
        Self { x, y, heading_deg }
    }

    /// Check if `other` is within `distance` and `heading_deg` of this pose
    pub fn is_near(&self, other: &Pose, distance: f32, heading_deg: f32) -> bool {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        if dx * dx + dy * dy > distance * distance {
            return false;
        }

        // Smallest signed angle between the two headings
        let mut dh = (self.heading_deg - other.heading_deg) % 360.0;
        if dh > 180.0 {
            dh -= 360.0;
        } else if dh < -180.0 {
            dh += 360.0;
        }
        -heading_deg <= dh && dh <= heading_deg
    }
}

/// One segment of a leg
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathDirective {
    /// Drive straight, keeping heading, until x is reached
    LineToX { x: f32 },
    /// Drive straight, keeping heading, until y is reached
    LineToY { y: f32 },
    /// Translate and turn to a pose
    StrafeTo { x: f32, y: f32, heading_deg: f32 },
}

impl PathDirective {
    /// Pose reached after following this directive from `from`
    pub fn apply(&self, from: Pose) -> Pose {
        match *self {
            PathDirective::LineToX { x } => Pose { x, ..from },
            PathDirective::LineToY { y } => Pose { y, ..from },
            PathDirective::StrafeTo { x, y, heading_deg } => Pose::new(x, y, heading_deg),
        }
    }
}

/// A trajectory segment from a start pose
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Leg {
    pub start: Pose,
    #[serde(default)]
    pub path: Vec<PathDirective, MAX_DIRECTIVES>,
}

impl Leg {
    /// Leg with no directives yet
    pub fn starting_at(start: Pose) -> Self {
        Self {
            start,
            path: Vec::new(),
        }
    }

    /// Append a directive
    ///
    /// Directives past [`MAX_DIRECTIVES`] are dropped with a warning.
    pub fn then(mut self, directive: PathDirective) -> Self {
        if self.path.push(directive).is_err() {
            warn!("leg full, directive dropped");
        }
        self
    }

    pub fn line_to_x(self, x: f32) -> Self {
        self.then(PathDirective::LineToX { x })
    }

    pub fn line_to_y(self, y: f32) -> Self {
        self.then(PathDirective::LineToY { y })
    }

    pub fn strafe_to(self, x: f32, y: f32, heading_deg: f32) -> Self {
        self.then(PathDirective::StrafeTo { x, y, heading_deg })
    }

    /// Pose at the end of the leg
    pub fn end_pose(&self) -> Pose {
        self.path.iter().fold(self.start, |pose, d| d.apply(pose))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_pose_follows_directives() {
        let leg = Leg::starting_at(Pose::new(38.0, 74.5, 163.0)).line_to_y(82.0);
        assert_eq!(leg.end_pose(), Pose::new(38.0, 82.0, 163.0));

        let leg = Leg::starting_at(Pose::new(21.0, 124.0, 125.0))
            .line_to_x(40.0)
            .strafe_to(38.0, 74.5, 163.0);
        assert_eq!(leg.end_pose(), Pose::new(38.0, 74.5, 163.0));
    }

    #[test]
    fn test_empty_leg_ends_at_start() {
        let start = Pose::new(1.0, 2.0, 3.0);
        assert_eq!(Leg::starting_at(start).end_pose(), start);
    }

    #[test]
    fn test_directive_capacity() {
        let mut leg = Leg::starting_at(Pose::default());
        for i in 0..6 {
            leg = leg.line_to_x(i as f32);
        }
        assert_eq!(leg.path.len(), MAX_DIRECTIVES);
        assert_eq!(leg.end_pose().x, 3.0);
    }

    #[test]
    fn test_is_near() {
        let a = Pose::new(38.0, 82.0, 163.0);
        assert!(a.is_near(&Pose::new(38.0, 83.0, 164.0), 1.5, 2.0));
        assert!(!a.is_near(&Pose::new(38.0, 84.0, 163.0), 1.5, 2.0));
        assert!(!a.is_near(&Pose::new(38.0, 82.0, 170.0), 1.5, 2.0));
    }

    #[test]
    fn test_is_near_wraps_heading() {
        let a = Pose::new(0.0, 0.0, 359.0);
        assert!(a.is_near(&Pose::new(0.0, 0.0, 1.0), 0.1, 3.0));
    }
}
