//! Motor driver implementations
//!
//! DC motors driven through a two-input H-bridge (DRV8833, TB6612 in
//! PWM-only mode and similar).

pub mod hbridge;

pub use hbridge::{HBridgeConfig, HBridgeMotor};
