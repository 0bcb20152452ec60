//! Clock abstraction for the blocking loop

/// Millisecond clock the runner can sleep on
pub trait Timebase {
    /// Current time in milliseconds (wrapping)
    fn now_ms(&self) -> u32;

    /// Block until `deadline_ms`
    ///
    /// Returns immediately if the deadline has already passed.
    fn wait_until(&mut self, deadline_ms: u32);
}

/// Check if `now_ms` is at or past `deadline_ms`, tolerating wraparound
///
/// Deadlines more than half the clock range in the past look like
/// future deadlines.
pub fn deadline_reached(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) >= 0
}
