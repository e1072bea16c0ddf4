//! Single-writer, single-reader cell holding the published VBUS mode.
//!
//! The sampling path stores, the control loop loads. The mode travels as one
//! byte so a reader sees either the previous or the new value, never a torn
//! one.

use portable_atomic::{AtomicU8, Ordering};

use crate::vbus::VbusMode;

/// Atomic holder for the last debounced [`VbusMode`].
#[derive(Debug)]
pub struct ModeCell {
    raw: AtomicU8,
}

impl ModeCell {
    /// Creates a cell holding [`VbusMode::Wait`]; usable in a `static`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw: AtomicU8::new(VbusMode::Wait.as_raw()),
        }
    }

    /// Stores a newly published mode.
    pub fn publish(&self, mode: VbusMode) {
        self.raw.store(mode.as_raw(), Ordering::Release);
    }

    /// Loads the most recently published mode.
    ///
    /// An undecodable byte reads as [`VbusMode::Wait`], which holds all outputs.
    #[must_use]
    pub fn load(&self) -> VbusMode {
        VbusMode::from_raw(self.raw.load(Ordering::Acquire)).unwrap_or(VbusMode::Wait)
    }
}

impl Default for ModeCell {
    fn default() -> Self {
        Self::new()
    }
}
