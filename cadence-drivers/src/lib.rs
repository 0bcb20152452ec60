//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the output traits
//! defined in cadence-core:
//!
//! - DC motors behind an H-bridge with two PWM inputs
//! - Hobby servos on a PWM channel
//! - A named output map implementing `HardwareMap`
//! - A defmt telemetry sink (`defmt` feature)
//! - An embassy timebase and async driver loop (`embassy` feature)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod motor;
pub mod outputs;
pub mod servo;
pub mod telemetry;

#[cfg(feature = "embassy")]
pub mod timebase;

pub use motor::{HBridgeConfig, HBridgeMotor};
pub use outputs::OutputMap;
pub use servo::{PwmServo, ServoConfig};
pub use telemetry::Sampler;
