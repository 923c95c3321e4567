//! Nullable clock: deterministic time for testing.

use std::cell::Cell;
use ubi_types::Timestamp;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to, and never goes backwards.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            current: Cell::new(initial_secs),
        }
    }

    /// Get the current time.
    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.current.get())
    }

    /// Advance time by a number of seconds.
    pub fn advance(&self, secs: u64) -> Timestamp {
        self.current.set(self.current.get().saturating_add(secs));
        self.now()
    }

    /// Move the clock to `secs`. Earlier values are ignored.
    pub fn set(&self, secs: u64) -> Timestamp {
        self.current.set(self.current.get().max(secs));
        self.now()
    }
}
