//! Telemetry over defmt
//!
//! Each value becomes one `defmt` log line, so telemetry shows up in the
//! same probe-rs stream as the rest of the firmware logs.

/// Lets one value out of every `every` through (0 or 1 passes all)
#[derive(Debug, Clone, Default)]
pub struct Sampler {
    every: u32,
    count: u32,
}

impl Sampler {
    pub const fn new(every: u32) -> Self {
        Self { every, count: 0 }
    }

    /// Count one value and report whether it should be logged
    pub fn admit(&mut self) -> bool {
        let n = self.count;
        self.count = self.count.wrapping_add(1);
        self.every <= 1 || n % self.every == 0
    }
}

#[cfg(feature = "defmt")]
pub use defmt_sink::DefmtTelemetry;

#[cfg(feature = "defmt")]
mod defmt_sink {
    use super::Sampler;
    use cadence_core::traits::{Telemetry, Value};

    /// Logs every `put`, optionally thinned out
    #[derive(Debug, Clone, Default)]
    pub struct DefmtTelemetry {
        sampler: Sampler,
    }

    impl DefmtTelemetry {
        pub const fn new() -> Self {
            Self {
                sampler: Sampler::new(1),
            }
        }

        /// Log only every `every`-th value
        pub const fn sampled(every: u32) -> Self {
            Self {
                sampler: Sampler::new(every),
            }
        }
    }

    impl Telemetry for DefmtTelemetry {
        fn put(&mut self, key: &'static str, value: Value) {
            if !self.sampler.admit() {
                return;
            }
            match value {
                Value::Millis(ms) => defmt::debug!("{=str}: {} ms", key, ms),
                Value::Count(c) => defmt::debug!("{=str}: {}", key, c),
                Value::Float(f) => defmt::debug!("{=str}: {}", key, f),
                Value::Label(s) => defmt::debug!("{=str}: {=str}", key, s),
            }
        }
    }
}
