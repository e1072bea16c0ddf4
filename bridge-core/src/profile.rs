//! Board revision profiles.
//!
//! Every revision-dependent constant lives in one `const` [`BoardProfile`] so
//! firmware and emulator build their pipelines from the same numbers.

use core::fmt;

use crate::debounce::SamplePipeline;
use crate::ports::{ChargeState, OutputPolicy};
use crate::sequencer::{DEFAULT_HOLD_MS, TransitionSequencer};
use crate::tick::MAX_HOLD_MS;
use crate::vbus::{AdcScale, ClassifierConfig, DiodePolarity, DiodeWindow};

/// VBUS level above which a rail counts as present.
pub const VALID_THRESHOLD_MV: u32 = 4_000;

/// Revision-specific tuning of the sensing and sequencing path.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BoardProfile {
    pub name: &'static str,
    pub adc: AdcScale,
    pub valid_threshold_mv: u32,
    pub diode_window: DiodeWindow,
    pub diode_polarity: DiodePolarity,
    pub debounce_threshold: u16,
    pub hold_ms: u16,
    pub output: OutputPolicy,
}

impl BoardProfile {
    /// First revision: short debounce run, diode detection with charge off.
    pub const R1: Self = Self {
        name: "r1",
        adc: AdcScale::TEN_BIT_6V6,
        valid_threshold_mv: VALID_THRESHOLD_MV,
        diode_window: DiodeWindow::new(250, 850),
        diode_polarity: DiodePolarity::RequiresChargeDisabled,
        debounce_threshold: 20,
        hold_ms: DEFAULT_HOLD_MS,
        output: OutputPolicy::new(ChargeState::Disabled, false),
    };

    /// Second revision: 255-sample debounce, diode detection with charge on.
    pub const R2: Self = Self {
        name: "r2",
        adc: AdcScale::TEN_BIT_6V6,
        valid_threshold_mv: VALID_THRESHOLD_MV,
        diode_window: DiodeWindow::new(450, 850),
        diode_polarity: DiodePolarity::RequiresChargeEnabled,
        debounce_threshold: 255,
        hold_ms: DEFAULT_HOLD_MS,
        output: OutputPolicy::new(ChargeState::Disabled, false),
    };

    /// Every built-in profile. All of them keep the default DEBUG_ONLY
    /// outputs; see [`OutputPolicy`] for the charging and blinking options.
    pub const ALL: [BoardProfile; 2] = [Self::R1, Self::R2];

    /// Looks up a built-in profile by name (case-insensitive).
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .find(|profile| profile.name.eq_ignore_ascii_case(name))
            .copied()
    }

    /// Checks the profile for values the pipeline cannot honour.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProfileError`] found.
    pub const fn validate(&self) -> Result<(), ProfileError> {
        if self.adc.max_count == 0 || self.adc.full_scale_mv == 0 {
            return Err(ProfileError::EmptyAdcScale);
        }
        if self.valid_threshold_mv > self.adc.full_scale_mv {
            return Err(ProfileError::ThresholdAboveFullScale {
                threshold_mv: self.valid_threshold_mv,
                full_scale_mv: self.adc.full_scale_mv,
            });
        }
        if self.diode_window.min_drop_mv >= self.diode_window.max_drop_mv {
            return Err(ProfileError::EmptyDiodeWindow {
                min_drop_mv: self.diode_window.min_drop_mv,
                max_drop_mv: self.diode_window.max_drop_mv,
            });
        }
        if self.debounce_threshold == 0 {
            return Err(ProfileError::ZeroDebounceThreshold);
        }
        if self.hold_ms > MAX_HOLD_MS {
            return Err(ProfileError::HoldTooLong {
                hold_ms: self.hold_ms,
            });
        }
        Ok(())
    }

    /// Classifier thresholds converted into ADC counts.
    #[must_use]
    pub const fn classifier(&self) -> ClassifierConfig {
        ClassifierConfig::from_millivolts(
            &self.adc,
            self.valid_threshold_mv,
            self.diode_window,
            self.diode_polarity,
        )
    }

    /// Sampling-side pipeline for this profile.
    #[must_use]
    pub const fn pipeline(&self) -> SamplePipeline {
        SamplePipeline::new(self.classifier(), self.debounce_threshold)
    }

    /// Control-loop sequencer for this profile.
    #[must_use]
    pub const fn sequencer(&self) -> TransitionSequencer {
        TransitionSequencer::new(self.hold_ms, self.output)
    }
}

/// Reasons a [`BoardProfile`] is rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ProfileError {
    EmptyAdcScale,
    ThresholdAboveFullScale {
        threshold_mv: u32,
        full_scale_mv: u32,
    },
    EmptyDiodeWindow {
        min_drop_mv: u32,
        max_drop_mv: u32,
    },
    ZeroDebounceThreshold,
    HoldTooLong {
        hold_ms: u16,
    },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::EmptyAdcScale => f.write_str("ADC scale has no range"),
            ProfileError::ThresholdAboveFullScale {
                threshold_mv,
                full_scale_mv,
            } => write!(
                f,
                "valid threshold {threshold_mv} mV exceeds ADC full scale {full_scale_mv} mV"
            ),
            ProfileError::EmptyDiodeWindow {
                min_drop_mv,
                max_drop_mv,
            } => write!(
                f,
                "diode window {min_drop_mv}-{max_drop_mv} mV is empty"
            ),
            ProfileError::ZeroDebounceThreshold => f.write_str("debounce threshold must be non-zero"),
            ProfileError::HoldTooLong { hold_ms } => {
                write!(f, "reset hold {hold_ms} ms exceeds {MAX_HOLD_MS} ms")
            }
        }
    }
}
