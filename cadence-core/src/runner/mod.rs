//! Driver loop
//!
//! The runner owns the root action and polls it once per tick until it
//! finishes, a stop is requested, the autonomous period runs out, or an
//! output fails.

pub mod driver;
pub mod timebase;

pub use driver::{
    Outcome, RunReport, Runner, Step, DEFAULT_TICK_INTERVAL_MS, ELAPSED_TELEMETRY, TICK_TELEMETRY,
};
pub use timebase::{deadline_reached, Timebase};
