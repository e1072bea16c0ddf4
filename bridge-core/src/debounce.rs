//! Consecutive-agreement debouncing of classified VBUS modes.
//!
//! A single noisy sample pair must never change the published mode, so a
//! candidate is only published after the classifier has agreed on it for a
//! full run of `threshold` consecutive samples. Worst-case detection latency is
//! `threshold * sample_period`.

use crate::publisher::ModeCell;
use crate::vbus::{ClassifierConfig, RawSamplePair, VbusMode, classify};

/// Stateful filter between the classifier and the mode publisher.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Debouncer {
    last_candidate: VbusMode,
    consecutive_count: u16,
    published: VbusMode,
    threshold: u16,
}

impl Debouncer {
    /// Creates a debouncer that publishes after `threshold` agreeing samples.
    ///
    /// A zero threshold behaves like 1.
    #[must_use]
    pub const fn new(threshold: u16) -> Self {
        Self {
            last_candidate: VbusMode::Wait,
            consecutive_count: 0,
            published: VbusMode::Wait,
            threshold: if threshold == 0 { 1 } else { threshold },
        }
    }

    /// Feeds one classification. Returns the mode when this call publishes it.
    pub fn feed(&mut self, candidate: VbusMode) -> Option<VbusMode> {
        if candidate != self.last_candidate {
            self.last_candidate = candidate;
            self.consecutive_count = 0;
        }

        self.consecutive_count = self.consecutive_count.saturating_add(1);
        if self.consecutive_count >= self.threshold {
            self.consecutive_count = 0;
            self.published = candidate;
            Some(candidate)
        } else {
            None
        }
    }

    /// Last published mode ([`VbusMode::Wait`] until the first run completes).
    #[must_use]
    pub const fn published(&self) -> VbusMode {
        self.published
    }

    /// Candidate currently accumulating agreement.
    #[must_use]
    pub const fn last_candidate(&self) -> VbusMode {
        self.last_candidate
    }

    /// Length of the current agreeing run.
    #[must_use]
    pub const fn consecutive_count(&self) -> u16 {
        self.consecutive_count
    }

    /// Configured run length.
    #[must_use]
    pub const fn threshold(&self) -> u16 {
        self.threshold
    }
}

/// Sampling-side path: classify, debounce, publish.
///
/// This is the only writer of the [`ModeCell`]; the caller runs it once per
/// completed sample pair.
#[derive(Clone, Debug)]
pub struct SamplePipeline {
    classifier: ClassifierConfig,
    debouncer: Debouncer,
}

impl SamplePipeline {
    #[must_use]
    pub const fn new(classifier: ClassifierConfig, debounce_threshold: u16) -> Self {
        Self {
            classifier,
            debouncer: Debouncer::new(debounce_threshold),
        }
    }

    /// Processes one sample pair and publishes into `cell` when the debounced
    /// mode is (re)confirmed. Returns the published mode, if any.
    pub fn ingest(
        &mut self,
        pair: RawSamplePair,
        charge_enabled: bool,
        cell: &ModeCell,
    ) -> Option<VbusMode> {
        let candidate = classify(pair, charge_enabled, &self.classifier);
        let published = self.debouncer.feed(candidate)?;
        cell.publish(published);
        Some(published)
    }

    #[must_use]
    pub const fn classifier(&self) -> &ClassifierConfig {
        &self.classifier
    }

    #[must_use]
    pub const fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }
}
