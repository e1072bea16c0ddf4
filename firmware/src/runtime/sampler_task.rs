use embassy_time::Ticker;

use crate::board::LOOP_PERIOD;
use crate::hw::adc::VbusAdc;
use crate::sampling::Sampler;
use crate::status;

#[embassy_executor::task]
pub async fn run(mut adc: VbusAdc<'static>, mut sampler: Sampler) -> ! {
    let mut ticker = Ticker::every(LOOP_PERIOD);
    loop {
        sampler.poll(&mut adc, status::charge_enabled(), &status::PUBLISHED_MODE);
        ticker.next().await;
    }
}
