//! Hardware and telemetry boundary traits
//!
//! These traits define the interface between the scheduling core and
//! board-specific implementations.

pub mod output;
pub mod telemetry;

pub use output::{
    check_position, check_power, Direction, HardwareMap, MotorOutput, OutputError, RunMode,
    ServoOutput, ZeroPowerBehavior,
};
pub use telemetry::{NullTelemetry, Telemetry, Value};
