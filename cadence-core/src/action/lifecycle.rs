//! Leaf action lifecycle
//!
//! Every leaf action carries one of these instead of loose
//! `initialized`/`start_time` fields. A finished action is `Done` and stays
//! there: polling it again is a no-op rather than a restart.

/// Lifecycle of a leaf action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lifecycle {
    /// Never polled
    #[default]
    NotStarted,
    /// First polled at `start_ms`, currently in `stage`
    Running {
        /// Tick timestamp of the first poll
        start_ms: u32,
        /// Stage index for multi-stage actions (0 otherwise)
        stage: u8,
    },
    /// Finished or cancelled
    Done,
}

impl Lifecycle {
    /// Running state entered at `now_ms`
    pub const fn started(now_ms: u32) -> Self {
        Lifecycle::Running {
            start_ms: now_ms,
            stage: 0,
        }
    }

    /// Move from `NotStarted` to `Running`
    ///
    /// Returns true only on the poll that actually started the action.
    pub fn start(&mut self, now_ms: u32) -> bool {
        if *self == Lifecycle::NotStarted {
            *self = Lifecycle::started(now_ms);
            true
        } else {
            false
        }
    }

    /// Time since the first poll, if running
    pub fn elapsed_ms(&self, now_ms: u32) -> Option<u32> {
        match *self {
            Lifecycle::Running { start_ms, .. } => Some(now_ms.wrapping_sub(start_ms)),
            _ => None,
        }
    }

    /// Current stage, if running
    pub fn stage(&self) -> Option<u8> {
        match *self {
            Lifecycle::Running { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// Record the stage a running action is in
    pub fn set_stage(&mut self, next: u8) {
        if let Lifecycle::Running { stage, .. } = self {
            *stage = next;
        }
    }

    /// Mark finished
    pub fn finish(&mut self) {
        *self = Lifecycle::Done;
    }

    /// Check if the action has been polled and not yet finished
    pub fn is_running(&self) -> bool {
        matches!(self, Lifecycle::Running { .. })
    }

    /// Check if the action is finished
    pub fn is_done(&self) -> bool {
        *self == Lifecycle::Done
    }
}
