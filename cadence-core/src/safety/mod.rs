//! Safety and shutdown
//!
//! A routine can end three ways besides completing: an external stop
//! request, the autonomous period running out, or a hardware fault. In
//! every case the runner drives the outputs to a safe state.

pub mod monitor;
pub mod stop;

use crate::traits::{HardwareMap, OutputError};

pub use monitor::{SafetyMonitor, SafetyStatus, StopReason, AUTONOMOUS_PERIOD_MS};
pub use stop::{Never, StopSignal};

/// Something that can put its outputs into a harmless state
///
/// `make_safe` must be callable at any time, including before anything was
/// started and after a previous failure. Implementations should attempt
/// every output and report the first error.
pub trait SafeState {
    fn make_safe(&self, hardware: &mut dyn HardwareMap) -> Result<(), OutputError>;
}

/// No outputs to make safe
impl SafeState for () {
    fn make_safe(&self, _hardware: &mut dyn HardwareMap) -> Result<(), OutputError> {
        Ok(())
    }
}

impl<T: SafeState + ?Sized> SafeState for &T {
    fn make_safe(&self, hardware: &mut dyn HardwareMap) -> Result<(), OutputError> {
        (**self).make_safe(hardware)
    }
}
