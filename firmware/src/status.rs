#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Shared status storage for the firmware target.
//!
//! The sampler task is the only writer of [`PUBLISHED_MODE`]; the control task
//! is the only writer of the charge flag. Each side reads the other's value
//! through a lock-free atomic, so neither task ever blocks the other.

use bridge_core::publisher::ModeCell;
use bridge_core::vbus::VbusMode;
use portable_atomic::{AtomicBool, Ordering};

/// Debounced VBUS mode handed from the sampler to the control loop.
pub static PUBLISHED_MODE: ModeCell = ModeCell::new();

/// Mirrors the charge switch output for the diode-drop classifier.
static CHARGE_ENABLED: AtomicBool = AtomicBool::new(false);

/// Records the level last driven onto the charge switch.
pub fn record_charge_enabled(enabled: bool) {
    CHARGE_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Returns the charge switch level as last driven.
#[must_use]
pub fn charge_enabled() -> bool {
    CHARGE_ENABLED.load(Ordering::Relaxed)
}

/// Returns the most recently published mode.
#[must_use]
pub fn published_mode() -> VbusMode {
    PUBLISHED_MODE.load()
}
