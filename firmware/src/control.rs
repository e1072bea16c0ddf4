#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Control-loop glue: published mode in, port writes and telemetry out.

use bridge_core::ports::PortDriver;
use bridge_core::profile::BoardProfile;
use bridge_core::sequencer::{SequencerPhase, TransitionSequencer};
use bridge_core::tick::Tick;
use bridge_core::vbus::VbusMode;

use crate::telemetry::FirmwareTelemetry;

/// One instance runs inside the control task.
pub struct ControlLoop {
    sequencer: TransitionSequencer,
    telemetry: FirmwareTelemetry,
    observed: VbusMode,
}

impl ControlLoop {
    #[must_use]
    pub const fn new(profile: &BoardProfile) -> Self {
        Self {
            sequencer: profile.sequencer(),
            telemetry: FirmwareTelemetry::new(),
            observed: VbusMode::Wait,
        }
    }

    /// Runs one iteration against `driver` and logs anything that changed.
    pub fn iterate<D>(&mut self, mode: VbusMode, now: Tick, driver: &mut D) -> SequencerPhase
    where
        D: PortDriver + ?Sized,
    {
        if mode != self.observed {
            self.observed = mode;
            self.telemetry.mode_published(mode, now);
        }

        let report = self.sequencer.step(mode, now, driver);
        for event in report.events {
            self.telemetry.transition(event, now);
        }
        report.phase
    }

    #[must_use]
    pub const fn telemetry(&self) -> &FirmwareTelemetry {
        &self.telemetry
    }
}
