#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Board revision selection and clock conversion.

use bridge_core::profile::BoardProfile;
use bridge_core::tick::Tick;
use embassy_time::{Duration, Instant};

/// Profile compiled into this image.
#[cfg(feature = "board-r1")]
pub const PROFILE: BoardProfile = BoardProfile::R1;

/// Profile compiled into this image.
#[cfg(not(feature = "board-r1"))]
pub const PROFILE: BoardProfile = BoardProfile::R2;

/// Interval between sample pairs and between control-loop iterations.
pub const LOOP_PERIOD: Duration = Duration::from_millis(1);

/// Truncates the embassy monotonic clock into the wrapping tick counter.
#[must_use]
pub fn tick_at(instant: Instant) -> Tick {
    Tick::from_millis(instant.as_millis())
}

/// Tick source backed by the embassy time driver.
#[cfg(target_os = "none")]
pub struct MonotonicClock;

#[cfg(target_os = "none")]
impl bridge_core::tick::TickSource for MonotonicClock {
    fn now(&self) -> Tick {
        tick_at(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_profile_is_valid() {
        assert_eq!(PROFILE.validate(), Ok(()));
    }

    #[test]
    fn tick_wraps_with_the_clock() {
        assert_eq!(tick_at(Instant::from_millis(65_536 + 7)), Tick::new(7));
        assert_eq!(tick_at(Instant::from_micros(1_999)), Tick::new(1));
    }
}
