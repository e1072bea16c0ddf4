//! Two-channel VBUS sensing on ADC1.

use bridge_core::sampler::{ChannelScan, SampleSource, SenseChannel};
use bridge_core::vbus::RawSamplePair;
use embassy_stm32::adc::{Adc, AnyAdcChannel, Resolution, SampleTime};
use embassy_stm32::peripherals::ADC1;

/// Alternating PixC/debug conversions producing complete sample pairs.
pub struct VbusAdc<'d> {
    adc: Adc<'d, ADC1>,
    pixc: AnyAdcChannel<ADC1>,
    dbg: AnyAdcChannel<ADC1>,
    scan: ChannelScan,
}

impl<'d> VbusAdc<'d> {
    /// Configures 10-bit conversions so counts match the board profile scale.
    pub fn new(mut adc: Adc<'d, ADC1>, pixc: AnyAdcChannel<ADC1>, dbg: AnyAdcChannel<ADC1>) -> Self {
        adc.set_sample_time(SampleTime::CYCLES160_5);
        adc.set_resolution(Resolution::BITS10);
        Self {
            adc,
            pixc,
            dbg,
            scan: ChannelScan::new(),
        }
    }

    fn convert(&mut self, channel: SenseChannel) -> u16 {
        match channel {
            SenseChannel::Pixc => self.adc.blocking_read(&mut self.pixc),
            SenseChannel::Dbg => self.adc.blocking_read(&mut self.dbg),
        }
    }
}

impl SampleSource for VbusAdc<'_> {
    fn fetch(&mut self) -> Option<RawSamplePair> {
        // A full cycle is at most two conversions.
        for _ in 0..2 {
            let conversion = self.convert(self.scan.current_channel());
            if let Some(pair) = self.scan.record(conversion).pair {
                return Some(pair);
            }
        }
        None
    }
}
