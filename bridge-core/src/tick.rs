//! Millisecond tick counter shared by the debouncer and the sequencer.
//!
//! The board's tick source is a free-running 16-bit millisecond counter that
//! wraps silently every 65 536 ms. All comparisons go through modular
//! subtraction so deadlines keep working across the wrap.

use core::fmt;

/// Longest interval (in milliseconds) that [`Tick::has_reached`] can order.
pub const MAX_HOLD_MS: u16 = i16::MAX as u16;

/// Point in time on the wrapping millisecond counter.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Tick(u16);

impl Tick {
    /// Counter value at reset.
    pub const ZERO: Self = Self(0);

    /// Wraps a raw counter value.
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Truncates a wide monotonic millisecond count into the 16-bit counter.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis as u16)
    }

    /// Returns the raw counter value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns the tick `ms` milliseconds after `self`, wrapping.
    #[must_use]
    pub const fn wrapping_add_ms(self, ms: u16) -> Self {
        Self(self.0.wrapping_add(ms))
    }

    /// Milliseconds elapsed from `earlier` to `self`, modulo the counter width.
    #[must_use]
    pub const fn elapsed_since(self, earlier: Self) -> u16 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Returns `true` once `self` is at or past `deadline`.
    ///
    /// Only meaningful while the two ticks are less than [`MAX_HOLD_MS`] apart.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn has_reached(self, deadline: Self) -> bool {
        (self.0.wrapping_sub(deadline.0) as i16) >= 0
    }

    /// Milliseconds left until `deadline`, or zero once it has been reached.
    #[must_use]
    pub const fn remaining_until(self, deadline: Self) -> u16 {
        if self.has_reached(deadline) {
            0
        } else {
            deadline.0.wrapping_sub(self.0)
        }
    }
}

impl From<u16> for Tick {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Monotonic millisecond counter provided by the board.
pub trait TickSource {
    /// Returns the current counter value.
    fn now(&self) -> Tick;
}
