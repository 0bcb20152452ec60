//! Elapsed-time stage tables
//!
//! A multi-stage action maps the time since its first poll onto a command.
//! The table holds the window upper bounds in ascending order plus the
//! command issued once the last bound is reached.

use heapless::Vec;
use serde::Deserialize;

/// Maximum number of windows in one table
pub const MAX_STAGES: usize = 8;

/// How elapsed time exactly on a window bound is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Windows are `[from, until)`; every tick commands something
    #[default]
    HalfOpen,
    /// Windows are `(from, until)`; ticks landing exactly on a bound
    /// (including the first poll at 0) command nothing
    Exclusive,
}

/// One window of a stage table
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window<C> {
    /// Upper bound of the window, in ms since the first poll
    pub until_ms: u32,
    /// Command held for the duration of the window
    pub command: C,
}

/// Result of looking up an elapsed time
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lookup<C> {
    /// Inside window `index`
    Stage(u8, C),
    /// Exactly on a bound with [`Boundary::Exclusive`]
    Gap,
    /// At or past the last bound
    Finished(C),
}

/// Errors building a stage table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StageError {
    /// More than [`MAX_STAGES`] windows
    Capacity,
    /// Bounds are not strictly increasing
    Order,
}

/// Ordered elapsed-time windows with a final command
#[derive(Debug, Clone)]
pub struct StageTable<C> {
    windows: Vec<Window<C>, MAX_STAGES>,
    finish: C,
    boundary: Boundary,
}

impl<C: Copy> StageTable<C> {
    /// Create a table with no windows
    ///
    /// An empty table is finished at any elapsed time.
    pub fn new(finish: C, boundary: Boundary) -> Self {
        Self {
            windows: Vec::new(),
            finish,
            boundary,
        }
    }

    /// Append a window ending at `until_ms`
    pub fn window(mut self, until_ms: u32, command: C) -> Result<Self, StageError> {
        if until_ms <= self.end_ms() {
            return Err(StageError::Order);
        }
        self.windows
            .push(Window { until_ms, command })
            .map_err(|_| StageError::Capacity)?;
        Ok(self)
    }

    /// Elapsed time at which the table is finished
    pub fn end_ms(&self) -> u32 {
        self.windows.last().map_or(0, |w| w.until_ms)
    }

    /// Command issued once the table is finished
    pub fn finish(&self) -> C {
        self.finish
    }

    /// Boundary policy in use
    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Windows in order
    pub fn windows(&self) -> &[Window<C>] {
        &self.windows
    }

    /// Classify an elapsed time
    pub fn lookup(&self, elapsed_ms: u32) -> Lookup<C> {
        if elapsed_ms >= self.end_ms() {
            return Lookup::Finished(self.finish);
        }

        let mut from = 0;
        for (index, window) in self.windows.iter().enumerate() {
            if elapsed_ms < window.until_ms {
                let on_bound = elapsed_ms == from;
                return match self.boundary {
                    Boundary::Exclusive if on_bound => Lookup::Gap,
                    _ => Lookup::Stage(index as u8, window.command),
                };
            }
            from = window.until_ms;
        }

        Lookup::Finished(self.finish)
    }
}
