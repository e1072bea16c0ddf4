use bridge_core::tick::TickSource;
use embassy_time::Ticker;

use crate::board::{LOOP_PERIOD, MonotonicClock};
use crate::control::ControlLoop;
use crate::hw::BoardPorts;
use crate::status;

#[embassy_executor::task]
pub async fn run(mut ports: BoardPorts<'static>, mut control: ControlLoop) -> ! {
    let mut ticker = Ticker::every(LOOP_PERIOD);
    loop {
        let now = MonotonicClock.now();
        control.iterate(status::published_mode(), now, &mut ports);
        ticker.next().await;
    }
}
