//! Servo driver implementations

pub mod pwm;

pub use pwm::{PwmServo, ServoConfig};
