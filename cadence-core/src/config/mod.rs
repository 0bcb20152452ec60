//! Configuration types
//!
//! Routine configuration is read from TOML at startup. Missing keys fall
//! back to the defaults of the competition routine.

pub mod load;
pub mod mission;
pub mod types;

pub use load::parse_routine;
pub use mission::{CycleConfig, MissionConfig, MAX_CYCLES};
pub use types::*;
