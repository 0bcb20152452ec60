//! Safety monitor implementation
//!
//! Watches for stop requests and the end of the autonomous period. Once a
//! stop condition has been seen it stays latched.

/// Length of the autonomous period
pub const AUTONOMOUS_PERIOD_MS: u32 = 30_000;

/// Why a routine was stopped early
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopReason {
    /// External stop signal
    Requested,
    /// Autonomous period exceeded
    Timeout,
}

/// Safety condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SafetyStatus {
    /// Keep running
    Ok,
    /// Stop the routine
    Stop(StopReason),
}

/// Stop condition tracking for one routine run
#[derive(Debug, Clone)]
pub struct SafetyMonitor {
    /// Period limit (None disables the watchdog)
    period_limit_ms: Option<u32>,
    /// Timestamp of the first update
    start_ms: Option<u32>,
    /// Time since the first update
    elapsed_ms: u32,
    /// Stop requested from outside
    stop_requested: bool,
    /// First stop condition seen
    latched: Option<StopReason>,
}

impl Default for SafetyMonitor {
    fn default() -> Self {
        Self::new(AUTONOMOUS_PERIOD_MS)
    }
}

impl SafetyMonitor {
    /// Create a monitor; a limit of 0 disables the watchdog
    pub fn new(period_limit_ms: u32) -> Self {
        Self {
            period_limit_ms: (period_limit_ms > 0).then_some(period_limit_ms),
            start_ms: None,
            elapsed_ms: 0,
            stop_requested: false,
            latched: None,
        }
    }

    /// Update time tracking
    ///
    /// The first call sets the start of the period.
    pub fn update_time(&mut self, now_ms: u32) {
        let start = *self.start_ms.get_or_insert(now_ms);
        self.elapsed_ms = now_ms.wrapping_sub(start);
    }

    /// Record an external stop request
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    /// Check all stop conditions
    ///
    /// A stop request takes precedence over a timeout seen in the same tick.
    pub fn check(&mut self) -> SafetyStatus {
        if let Some(reason) = self.latched {
            return SafetyStatus::Stop(reason);
        }

        let reason = if self.stop_requested {
            StopReason::Requested
        } else if self.period_limit_ms.is_some_and(|limit| self.elapsed_ms >= limit) {
            StopReason::Timeout
        } else {
            return SafetyStatus::Ok;
        };

        self.latched = Some(reason);
        SafetyStatus::Stop(reason)
    }

    /// Time since the first update
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Period limit, if enabled
    pub fn period_limit_ms(&self) -> Option<u32> {
        self.period_limit_ms
    }

    /// Check if a stop condition has been latched
    pub fn is_stopped(&self) -> bool {
        self.latched.is_some()
    }
}
