//! GPIO and ADC wiring for the STM32G0 debug bridge.
//!
//! Pin assignment (all active high unless noted):
//!
//! | Signal            | Pin  |
//! |-------------------|------|
//! | debug-port charge | PA0  |
//! | PixC VBUS sense   | PA1  |
//! | hub 2 VBUS detect | PA2  |
//! | hub reset (low)   | PA3  |
//! | LED B             | PA4  |
//! | USB mux select    | PA5  |
//! | LED A             | PA6  |
//! | debug VBUS sense  | PA7  |
//! | CC2               | PB0  |
//! | CC1               | PB1  |
//! | hub 1 VBUS detect | PB2  |

#![cfg(target_os = "none")]

pub mod adc;

use bridge_core::ports::{
    ChargeState, LedIndicator, MuxSelect, PortConfiguration, PortDriver, PullState,
};
use embassy_stm32::Peri;
use embassy_stm32::gpio::{Flex, Level, Output, Pin, Pull, Speed};

use crate::status;

/// Board outputs driven by the control loop.
pub struct BoardPorts<'d> {
    mux: Output<'d>,
    charge: Output<'d>,
    hub_reset_n: Output<'d>,
    hub1_feed: Output<'d>,
    hub2_feed: Output<'d>,
    led_a: Output<'d>,
    led_b: Output<'d>,
    cc1: Flex<'d>,
    cc2: Flex<'d>,
}

/// Output pins in the order listed in the module table.
pub struct BoardPins<'d> {
    pub charge: Output<'d>,
    pub hub2_feed: Output<'d>,
    pub hub_reset_n: Output<'d>,
    pub led_b: Output<'d>,
    pub mux: Output<'d>,
    pub led_a: Output<'d>,
    pub cc2: Flex<'d>,
    pub cc1: Flex<'d>,
    pub hub1_feed: Output<'d>,
}

impl<'d> BoardPorts<'d> {
    /// Takes ownership of the pins and drives the power-on state: LEDs off,
    /// mux normal, charge off, hubs in reset with no VBUS detect, CC open.
    pub fn new(pins: BoardPins<'d>) -> Self {
        let BoardPins {
            charge,
            hub2_feed,
            hub_reset_n,
            led_b,
            mux,
            led_a,
            cc2,
            cc1,
            hub1_feed,
        } = pins;

        let mut ports = Self {
            mux,
            charge,
            hub_reset_n,
            hub1_feed,
            hub2_feed,
            led_a,
            led_b,
            cc1,
            cc2,
        };
        ports.apply(&PortConfiguration::POWER_ON);
        ports
    }

    /// Builds an output already at the power-on level.
    pub fn output(pin: Peri<'d, impl Pin>) -> Output<'d> {
        Output::new(pin, Level::Low, Speed::Low)
    }

    /// Builds a CC line left floating.
    pub fn cc_line(pin: Peri<'d, impl Pin>) -> Flex<'d> {
        let mut line = Flex::new(pin);
        line.set_as_input(Pull::None);
        line
    }
}

fn drive(pin: &mut Output<'_>, high: bool) {
    if high {
        pin.set_high();
    } else {
        pin.set_low();
    }
}

fn terminate(line: &mut Flex<'_>, pull: PullState) {
    match pull {
        PullState::Open => line.set_as_input(Pull::None),
        PullState::Down => {
            line.set_low();
            line.set_as_output(Speed::Low);
        }
        PullState::Up => {
            line.set_high();
            line.set_as_output(Speed::Low);
        }
        PullState::Mid => line.set_as_input(Pull::Down),
    }
}

impl PortDriver for BoardPorts<'_> {
    fn set_mux(&mut self, select: MuxSelect) {
        drive(&mut self.mux, select == MuxSelect::Debug);
    }

    fn set_charge(&mut self, state: ChargeState) {
        drive(&mut self.charge, state.is_enabled());
        status::record_charge_enabled(state.is_enabled());
    }

    fn charge_enabled(&self) -> bool {
        self.charge.is_set_high()
    }

    fn set_cc1(&mut self, pull: PullState) {
        terminate(&mut self.cc1, pull);
    }

    fn set_cc2(&mut self, pull: PullState) {
        terminate(&mut self.cc2, pull);
    }

    fn set_hub_reset(&mut self, asserted: bool) {
        drive(&mut self.hub_reset_n, !asserted);
    }

    fn set_hub1_feed(&mut self, fed: bool) {
        drive(&mut self.hub1_feed, fed);
    }

    fn set_hub2_feed(&mut self, fed: bool) {
        drive(&mut self.hub2_feed, fed);
    }

    fn set_led(&mut self, led: LedIndicator) {
        let (a, b) = match led {
            LedIndicator::Off => (false, false),
            LedIndicator::Host => (true, false),
            LedIndicator::Device => (false, true),
        };
        drive(&mut self.led_a, a);
        drive(&mut self.led_b, b);
    }
}
