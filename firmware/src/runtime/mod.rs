use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::adc::{Adc, AdcChannel};

use crate::board::PROFILE;
use crate::control::ControlLoop;
use crate::hw::adc::VbusAdc;
use crate::hw::{BoardPins, BoardPorts};
use crate::sampling::Sampler;
use crate::telemetry;

mod control_task;
mod sampler_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let hal::Peripherals {
        PA0,
        PA1,
        PA2,
        PA3,
        PA4,
        PA5,
        PA6,
        PA7,
        PB0,
        PB1,
        PB2,
        ADC1,
        ..
    } = hal::init(hal::Config::default());

    // Outputs reach their safe levels before anything else runs.
    let ports = BoardPorts::new(BoardPins {
        charge: BoardPorts::output(PA0),
        hub2_feed: BoardPorts::output(PA2),
        hub_reset_n: BoardPorts::output(PA3),
        led_b: BoardPorts::output(PA4),
        mux: BoardPorts::output(PA5),
        led_a: BoardPorts::output(PA6),
        cc2: BoardPorts::cc_line(PB0),
        cc1: BoardPorts::cc_line(PB1),
        hub1_feed: BoardPorts::output(PB2),
    });

    if let Err(error) = PROFILE.validate() {
        telemetry::log_profile_error(&PROFILE, error);
        core::future::pending::<()>().await;
    }
    telemetry::log_boot(&PROFILE);

    let adc = VbusAdc::new(Adc::new(ADC1), PA1.degrade_adc(), PA7.degrade_adc());

    spawner
        .spawn(sampler_task::run(adc, Sampler::new(&PROFILE)))
        .expect("failed to spawn sampler task");

    spawner
        .spawn(control_task::run(ports, ControlLoop::new(&PROFILE)))
        .expect("failed to spawn control task");

    core::future::pending::<()>().await;
}
