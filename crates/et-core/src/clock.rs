//! Monotonic time sources for session timers.
//!
//! Timers never read wall-clock time directly; they ask a [`Clock`] for a
//! monotonic reading and only ever compare readings taken from the same clock.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// A monotonic time source.
pub trait Clock {
    /// Returns the current reading, measured from an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Clock backed by [`Instant`].
///
/// For embedders that feed the tracker live host events as they happen.
/// Log replay derives time from event timestamps and uses [`ManualClock`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose origin is the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Virtual clock that only moves when told to.
///
/// Clones share the same reading, so every timer handed a clone observes the
/// same advances. Used by tests and by log replay, where time comes from the
/// recorded event timestamps.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    reading: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Creates a clock reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.reading.set(self.reading.get().saturating_add(by));
    }

    /// Sets the reading to `to`.
    ///
    /// Moving backwards is allowed; timers saturate rather than underflow.
    pub fn set(&self, to: Duration) {
        self.reading.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.reading.get()
    }
}
