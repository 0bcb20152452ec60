//! External stop requests

use core::sync::atomic::{AtomicBool, Ordering};

/// Checked by the runner between ticks
pub trait StopSignal {
    /// Check if the routine should stop now
    fn stop_requested(&self) -> bool;
}

/// Flag set from an interrupt or another task
impl StopSignal for AtomicBool {
    fn stop_requested(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<F: Fn() -> bool> StopSignal for F {
    fn stop_requested(&self) -> bool {
        self()
    }
}

/// Stop signal that never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl StopSignal for Never {
    fn stop_requested(&self) -> bool {
        false
    }
}
