//! Port configuration derived from the published VBUS mode.
//!
//! The control loop recomputes a [`PortConfiguration`] every iteration and
//! pushes it through a [`PortDriver`]. Writes are plain digital outputs, so
//! applying the same configuration repeatedly is harmless.

use crate::tick::Tick;
use crate::vbus::VbusMode;

/// Half period of the optional device-LED blink (about 3 Hz).
pub const BLINK_HALF_PERIOD_MS: u16 = 166;

/// Termination applied to a USB-C CC line.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PullState {
    Open,
    Down,
    Up,
    /// Neutral level used while hubs are held in reset.
    Mid,
}

/// USB data mux routing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MuxSelect {
    Normal,
    Debug,
}

/// Software-controlled charge switch feeding the debug port.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChargeState {
    Disabled,
    Enabled,
}

impl ChargeState {
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, ChargeState::Enabled)
    }
}

/// Status LED indication.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LedIndicator {
    Off,
    Host,
    Device,
}

/// Port role layout.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Topology {
    Host,
    Device,
}

/// Revision-dependent output choices.
///
/// Neither shipped board revision charges or blinks in DEBUG_ONLY. Both
/// options exist for bench profiles and for reworked boards that power the
/// downstream port from the debug side.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OutputPolicy {
    /// Charge switch state while only the debug port is powered.
    pub debug_only_charge: ChargeState,
    /// Blink the device LED while only the debug port is powered.
    pub blink_debug_led: bool,
}

impl OutputPolicy {
    #[must_use]
    pub const fn new(debug_only_charge: ChargeState, blink_debug_led: bool) -> Self {
        Self {
            debug_only_charge,
            blink_debug_led,
        }
    }
}

/// Complete set of output directives.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PortConfiguration {
    pub mux: MuxSelect,
    pub charge: ChargeState,
    pub cc1: PullState,
    pub cc2: PullState,
    pub hub_reset: bool,
    pub hub1_feed: bool,
    pub hub2_feed: bool,
    pub led: LedIndicator,
}

impl PortConfiguration {
    /// Safe state driven right after power-on: hubs in reset, nothing fed.
    pub const POWER_ON: Self = Self {
        mux: MuxSelect::Normal,
        charge: ChargeState::Disabled,
        cc1: PullState::Open,
        cc2: PullState::Open,
        hub_reset: true,
        hub1_feed: false,
        hub2_feed: false,
        led: LedIndicator::Off,
    };

    /// Builds the steady-state layout for `topology`.
    #[must_use]
    pub const fn with_topology(topology: Topology, charge: ChargeState, led: LedIndicator) -> Self {
        match topology {
            Topology::Host => Self {
                mux: MuxSelect::Normal,
                charge,
                cc1: PullState::Down,
                cc2: PullState::Open,
                hub_reset: false,
                hub1_feed: true,
                hub2_feed: false,
                led,
            },
            Topology::Device => Self {
                mux: MuxSelect::Debug,
                charge,
                cc1: PullState::Down,
                cc2: PullState::Down,
                hub_reset: false,
                hub1_feed: false,
                hub2_feed: true,
                led,
            },
        }
    }

    /// Steady-state configuration for a published mode; `None` for WAIT.
    #[must_use]
    pub const fn for_mode(mode: VbusMode, now: Tick, policy: &OutputPolicy) -> Option<Self> {
        let config = match mode {
            VbusMode::Wait => return None,
            VbusMode::None => {
                Self::with_topology(Topology::Host, ChargeState::Disabled, LedIndicator::Off)
            }
            VbusMode::PixcOnly | VbusMode::BothDiode => {
                Self::with_topology(Topology::Host, ChargeState::Disabled, LedIndicator::Host)
            }
            VbusMode::DebugOnly => {
                let led = if policy.blink_debug_led && !blink_lit(now) {
                    LedIndicator::Off
                } else {
                    LedIndicator::Device
                };
                Self::with_topology(Topology::Device, policy.debug_only_charge, led)
            }
            VbusMode::Both => {
                Self::with_topology(Topology::Device, ChargeState::Enabled, LedIndicator::Device)
            }
        };
        Some(config)
    }

    /// Topology implied by the mux selection.
    #[must_use]
    pub const fn topology(&self) -> Topology {
        match self.mux {
            MuxSelect::Normal => Topology::Host,
            MuxSelect::Debug => Topology::Device,
        }
    }
}

const fn blink_lit(now: Tick) -> bool {
    now.as_u16() % (2 * BLINK_HALF_PERIOD_MS) < BLINK_HALF_PERIOD_MS
}

/// Output primitives of the board.
pub trait PortDriver {
    fn set_mux(&mut self, select: MuxSelect);

    fn set_charge(&mut self, state: ChargeState);

    /// Current state of the charge switch, as last driven.
    fn charge_enabled(&self) -> bool;

    fn set_cc1(&mut self, pull: PullState);

    fn set_cc2(&mut self, pull: PullState);

    /// `true` holds both hubs in reset.
    fn set_hub_reset(&mut self, asserted: bool);

    fn set_hub1_feed(&mut self, fed: bool);

    fn set_hub2_feed(&mut self, fed: bool);

    fn set_led(&mut self, led: LedIndicator);

    /// Drives every output from `config`.
    fn apply(&mut self, config: &PortConfiguration) {
        self.set_led(config.led);
        self.set_charge(config.charge);
        self.set_mux(config.mux);
        self.set_hub1_feed(config.hub1_feed);
        self.set_hub2_feed(config.hub2_feed);
        self.set_cc1(config.cc1);
        self.set_cc2(config.cc2);
        self.set_hub_reset(config.hub_reset);
    }

    /// Holds the hubs in reset and parks both CC lines at the neutral level.
    fn enter_reset_hold(&mut self) {
        self.set_hub_reset(true);
        self.set_cc1(PullState::Mid);
        self.set_cc2(PullState::Mid);
    }
}

/// Port driver that performs no hardware interaction.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopPortDriver {
    charge: bool,
}

impl NoopPortDriver {
    #[must_use]
    pub const fn new() -> Self {
        Self { charge: false }
    }
}

impl PortDriver for NoopPortDriver {
    fn set_mux(&mut self, _: MuxSelect) {}

    fn set_charge(&mut self, state: ChargeState) {
        self.charge = state.is_enabled();
    }

    fn charge_enabled(&self) -> bool {
        self.charge
    }

    fn set_cc1(&mut self, _: PullState) {}

    fn set_cc2(&mut self, _: PullState) {}

    fn set_hub_reset(&mut self, _: bool) {}

    fn set_hub1_feed(&mut self, _: bool) {}

    fn set_hub2_feed(&mut self, _: bool) {}

    fn set_led(&mut self, _: LedIndicator) {}
}
