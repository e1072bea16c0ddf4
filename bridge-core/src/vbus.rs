//! VBUS data model and the sample-pair classifier.
//!
//! The board senses both VBUS rails through resistor dividers on two ADC
//! inputs. A raw `(pixc, dbg)` pair is mapped onto one of the discrete
//! [`VbusMode`] values; debouncing happens later in [`crate::debounce`].

use core::fmt;

/// Discrete VBUS topology observed on the two ports.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VbusMode {
    /// No debounced mode delivered yet.
    Wait,
    /// Neither rail is valid.
    None,
    /// Only the PixC port carries a valid VBUS.
    PixcOnly,
    /// Only the debug port carries a valid VBUS.
    DebugOnly,
    /// Both ports are independently powered.
    Both,
    /// PixC is powered and the debug rail only leaks through the load
    /// switch's body diode.
    BothDiode,
}

impl VbusMode {
    /// Every mode, in code order.
    pub const ALL: [VbusMode; 6] = [
        VbusMode::Wait,
        VbusMode::None,
        VbusMode::PixcOnly,
        VbusMode::DebugOnly,
        VbusMode::Both,
        VbusMode::BothDiode,
    ];

    /// Single-byte code used by the atomic mode cell.
    #[must_use]
    pub const fn as_raw(self) -> u8 {
        match self {
            VbusMode::Wait => 0,
            VbusMode::None => 1,
            VbusMode::PixcOnly => 2,
            VbusMode::DebugOnly => 3,
            VbusMode::Both => 4,
            VbusMode::BothDiode => 5,
        }
    }

    /// Decodes a code produced by [`VbusMode::as_raw`].
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(VbusMode::Wait),
            1 => Some(VbusMode::None),
            2 => Some(VbusMode::PixcOnly),
            3 => Some(VbusMode::DebugOnly),
            4 => Some(VbusMode::Both),
            5 => Some(VbusMode::BothDiode),
            _ => None,
        }
    }

    /// Short lowercase label used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            VbusMode::Wait => "wait",
            VbusMode::None => "none",
            VbusMode::PixcOnly => "pixc-only",
            VbusMode::DebugOnly => "debug-only",
            VbusMode::Both => "both",
            VbusMode::BothDiode => "both-diode",
        }
    }
}

impl fmt::Display for VbusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One full scan of both sense channels, in raw ADC counts.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RawSamplePair {
    pub pixc: u16,
    pub dbg: u16,
}

impl RawSamplePair {
    #[must_use]
    pub const fn new(pixc: u16, dbg: u16) -> Self {
        Self { pixc, dbg }
    }
}

/// Relationship between ADC counts and millivolts on the sensed rail.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AdcScale {
    /// Highest count the converter produces (1023 for 10-bit).
    pub max_count: u16,
    /// Rail voltage, after the divider, that reads as `max_count`.
    pub full_scale_mv: u32,
}

impl AdcScale {
    /// 10-bit converter, 3.3 V reference behind a 1:2 divider.
    pub const TEN_BIT_6V6: Self = Self::new(1023, 6_600);

    #[must_use]
    pub const fn new(max_count: u16, full_scale_mv: u32) -> Self {
        Self {
            max_count,
            full_scale_mv,
        }
    }

    /// Converts a rail voltage into ADC counts, rounding down.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn counts_for_millivolts(&self, millivolts: u32) -> u16 {
        if self.full_scale_mv == 0 {
            return 0;
        }
        let counts = (millivolts as u64 * self.max_count as u64) / self.full_scale_mv as u64;
        if counts > self.max_count as u64 {
            self.max_count
        } else {
            counts as u16
        }
    }

    /// Converts ADC counts back into a rail voltage, rounding down.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn millivolts_for_counts(&self, counts: u16) -> u32 {
        if self.max_count == 0 {
            return 0;
        }
        ((counts as u64 * self.full_scale_mv as u64) / self.max_count as u64) as u32
    }
}

/// Voltage drop range (PixC minus debug) that indicates body-diode leakage.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DiodeWindow {
    pub min_drop_mv: u32,
    pub max_drop_mv: u32,
}

impl DiodeWindow {
    #[must_use]
    pub const fn new(min_drop_mv: u32, max_drop_mv: u32) -> Self {
        Self {
            min_drop_mv,
            max_drop_mv,
        }
    }
}

/// Charge-switch state under which a diode-drop reading is trusted.
///
/// Board revisions disagree on this, so there is deliberately no default.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DiodePolarity {
    RequiresChargeEnabled,
    RequiresChargeDisabled,
}

impl DiodePolarity {
    /// Returns `true` when the charge switch state permits diode detection.
    #[must_use]
    pub const fn admits(self, charge_enabled: bool) -> bool {
        match self {
            DiodePolarity::RequiresChargeEnabled => charge_enabled,
            DiodePolarity::RequiresChargeDisabled => !charge_enabled,
        }
    }
}

/// Classifier thresholds expressed in ADC counts.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ClassifierConfig {
    pub valid_threshold: u16,
    pub diode_min_drop: u16,
    pub diode_max_drop: u16,
    pub polarity: DiodePolarity,
}

impl ClassifierConfig {
    /// Converts voltage-domain thresholds through `scale`.
    #[must_use]
    pub const fn from_millivolts(
        scale: &AdcScale,
        valid_threshold_mv: u32,
        window: DiodeWindow,
        polarity: DiodePolarity,
    ) -> Self {
        Self {
            valid_threshold: scale.counts_for_millivolts(valid_threshold_mv),
            diode_min_drop: scale.counts_for_millivolts(window.min_drop_mv),
            diode_max_drop: scale.counts_for_millivolts(window.max_drop_mv),
            polarity,
        }
    }

    /// Returns `true` when `dbg` sits inside the diode window below `pixc`
    /// and the charge switch polarity admits it.
    #[must_use]
    pub const fn is_diode(&self, pair: RawSamplePair, charge_enabled: bool) -> bool {
        let drop = pair.pixc as i32 - pair.dbg as i32;
        drop > self.diode_min_drop as i32
            && drop < self.diode_max_drop as i32
            && self.polarity.admits(charge_enabled)
    }
}

/// Maps one raw sample pair onto a [`VbusMode`].
///
/// `(pixc valid, dbg invalid, diode)` still classifies as a diode reading:
/// PixC was marginal enough that the diode-fed rail fell under the valid
/// threshold.
#[must_use]
pub const fn classify(
    pair: RawSamplePair,
    charge_enabled: bool,
    config: &ClassifierConfig,
) -> VbusMode {
    let pixc_valid = pair.pixc >= config.valid_threshold;
    let dbg_valid = pair.dbg >= config.valid_threshold;
    let diode = config.is_diode(pair, charge_enabled);

    match (pixc_valid, dbg_valid, diode) {
        (false, false, _) => VbusMode::None,
        (false, true, _) => VbusMode::DebugOnly,
        (true, false, false) => VbusMode::PixcOnly,
        (true, false, true) | (true, true, true) => VbusMode::BothDiode,
        (true, true, false) => VbusMode::Both,
    }
}
