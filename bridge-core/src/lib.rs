#![no_std]

// Shared logic for the USB debug-bridge board.
//
// VBUS classification, debouncing, mode publishing and the hub-reset
// transition sequencer live here so the MCU firmware and the host bench
// emulator run exactly the same code. Nothing in this crate touches hardware;
// collaborators are reached through the traits in `tick`, `sampler` and
// `ports`.

pub mod debounce;
pub mod ports;
pub mod profile;
pub mod publisher;
pub mod sampler;
pub mod sequencer;
pub mod telemetry;
pub mod tick;
pub mod vbus;
