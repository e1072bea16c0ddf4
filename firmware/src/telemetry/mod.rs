#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Telemetry recording and logging helpers.
//!
//! Wraps the shared telemetry ring from `bridge-core` and mirrors every
//! recorded event to defmt (or stdout on host builds) so bring-up sessions
//! can follow mode changes and hub resets over RTT.

use core::time::Duration;

use bridge_core::profile::{BoardProfile, ProfileError};
use bridge_core::sequencer::TransitionEvent;
use bridge_core::telemetry::{EventId, TelemetryPayload, TelemetryRecorder};
use bridge_core::tick::Tick;
use bridge_core::vbus::VbusMode;

/// Telemetry ring keyed by the wrapping tick counter.
pub type FirmwareRecorder = TelemetryRecorder<Tick>;

/// Records control-loop telemetry and emits a log line per event.
pub struct FirmwareTelemetry {
    recorder: FirmwareRecorder,
}

impl FirmwareTelemetry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            recorder: TelemetryRecorder::new(),
        }
    }

    /// Underlying ring buffer.
    #[must_use]
    pub fn recorder(&self) -> &FirmwareRecorder {
        &self.recorder
    }

    /// Records a newly observed published mode.
    pub fn mode_published(&mut self, mode: VbusMode, now: Tick) -> EventId {
        let id = self.recorder.record_mode_published(mode, now);
        emit_mode(mode.label(), now.as_u16());
        id
    }

    /// Records a hub-reset edge reported by the sequencer.
    pub fn transition(&mut self, event: TransitionEvent, now: Tick) -> EventId {
        let id = self.recorder.record_transition(event, now);
        let elapsed = match self.recorder.latest().map(|record| record.details) {
            Some(TelemetryPayload::Transition(details)) => details.elapsed_since_previous,
            _ => None,
        };
        log_transition(event, now, elapsed);
        id
    }
}

impl Default for FirmwareTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

/// Logs the profile compiled into the image.
pub fn log_boot(profile: &BoardProfile) {
    emit_boot(
        profile.name,
        profile.debounce_threshold,
        profile.hold_ms,
        profile.diode_window.min_drop_mv,
        profile.diode_window.max_drop_mv,
    );
}

/// Logs a profile that failed validation.
pub fn log_profile_error(profile: &BoardProfile, error: ProfileError) {
    emit_profile_error(profile.name, error);
}

fn log_transition(event: TransitionEvent, now: Tick, elapsed: Option<Duration>) {
    let (action, mode) = match event {
        TransitionEvent::ResetAsserted { to, .. } => ("assert", to),
        TransitionEvent::ResetRestarted { to, .. } => ("restart", to),
        TransitionEvent::ResetReleased { mode } => ("release", mode),
    };
    let delta_ms = elapsed.map(|value| u64::try_from(value.as_millis()).unwrap_or(u64::MAX));
    emit_transition(action, mode.label(), now.as_u16(), delta_ms);
}

#[cfg(target_os = "none")]
fn emit_boot(name: &'static str, debounce: u16, hold_ms: u16, diode_min: u32, diode_max: u32) {
    defmt::info!(
        "boot: profile {} debounce={} hold={}ms diode={}..{}mV",
        name,
        debounce,
        hold_ms,
        diode_min,
        diode_max
    );
}

#[cfg(not(target_os = "none"))]
fn emit_boot(name: &'static str, debounce: u16, hold_ms: u16, diode_min: u32, diode_max: u32) {
    println!(
        "boot: profile {name} debounce={debounce} hold={hold_ms}ms diode={diode_min}..{diode_max}mV"
    );
}

#[cfg(target_os = "none")]
fn emit_profile_error(name: &'static str, error: ProfileError) {
    defmt::error!(
        "boot: profile {} rejected: {}",
        name,
        defmt::Display2Format(&error)
    );
}

#[cfg(not(target_os = "none"))]
fn emit_profile_error(name: &'static str, error: ProfileError) {
    println!("boot: profile {name} rejected: {error}");
}

#[cfg(target_os = "none")]
fn emit_mode(mode: &'static str, timestamp_ms: u16) {
    defmt::info!("telemetry:vbus {} t={}ms", mode, timestamp_ms);
}

#[cfg(not(target_os = "none"))]
fn emit_mode(mode: &'static str, timestamp_ms: u16) {
    println!("telemetry:vbus {mode} t={timestamp_ms}ms");
}

#[cfg(target_os = "none")]
fn emit_transition(action: &'static str, mode: &'static str, timestamp_ms: u16, delta_ms: Option<u64>) {
    if let Some(delta) = delta_ms {
        defmt::info!(
            "telemetry:hub-reset {} {} t={}ms Δ={}ms",
            action,
            mode,
            timestamp_ms,
            delta
        );
    } else {
        defmt::info!(
            "telemetry:hub-reset {} {} t={}ms",
            action,
            mode,
            timestamp_ms
        );
    }
}

#[cfg(not(target_os = "none"))]
fn emit_transition(action: &'static str, mode: &'static str, timestamp_ms: u16, delta_ms: Option<u64>) {
    if let Some(delta) = delta_ms {
        println!("telemetry:hub-reset {action} {mode} t={timestamp_ms}ms Δ={delta}ms");
    } else {
        println!("telemetry:hub-reset {action} {mode} t={timestamp_ms}ms");
    }
}
