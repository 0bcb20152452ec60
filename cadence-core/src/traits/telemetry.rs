//! Telemetry sink
//!
//! Telemetry is a side channel: actions may report values every poll, but
//! nothing read from telemetry ever affects control flow.

/// A telemetry value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value {
    /// Duration in milliseconds
    Millis(u32),
    /// Plain counter
    Count(u32),
    /// Arbitrary measurement
    Float(f32),
    /// Short static label
    Label(&'static str),
}

/// Accepts key/value pairs for observability
pub trait Telemetry {
    /// Record a value under a key for the current tick
    fn put(&mut self, key: &'static str, value: Value);
}

/// Telemetry sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTelemetry;

impl Telemetry for NullTelemetry {
    fn put(&mut self, _key: &'static str, _value: Value) {}
}
