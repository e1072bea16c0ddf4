#![cfg_attr(not(target_os = "none"), allow(dead_code))]

//! Sampling-side glue between the ADC scan and the mode cell.

use bridge_core::debounce::SamplePipeline;
use bridge_core::profile::BoardProfile;
use bridge_core::publisher::ModeCell;
use bridge_core::sampler::SampleSource;
use bridge_core::vbus::VbusMode;

/// Owns the classify-and-debounce pipeline run by the sampler task.
pub struct Sampler {
    pipeline: SamplePipeline,
}

impl Sampler {
    #[must_use]
    pub const fn new(profile: &BoardProfile) -> Self {
        Self {
            pipeline: profile.pipeline(),
        }
    }

    /// Pulls one pair from `source` and feeds it through the pipeline.
    ///
    /// Returns the mode published into `cell` by this call, if any.
    pub fn poll<S>(&mut self, source: &mut S, charge_enabled: bool, cell: &ModeCell) -> Option<VbusMode>
    where
        S: SampleSource + ?Sized,
    {
        let pair = source.fetch()?;
        self.pipeline.ingest(pair, charge_enabled, cell)
    }

    #[must_use]
    pub const fn pipeline(&self) -> &SamplePipeline {
        &self.pipeline
    }
}
