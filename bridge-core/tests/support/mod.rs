#![allow(dead_code)]

use bridge_core::ports::{
    ChargeState, LedIndicator, MuxSelect, PortConfiguration, PortDriver, PullState,
};
use heapless::{HistoryBuf, Vec};

pub const WRITE_LOG_CAPACITY: usize = 64;

/// Single output write observed by [`RecordingPorts`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PortWrite {
    Mux(MuxSelect),
    Charge(ChargeState),
    Cc1(PullState),
    Cc2(PullState),
    HubReset(bool),
    Hub1Feed(bool),
    Hub2Feed(bool),
    Led(LedIndicator),
}

/// Port driver that mirrors output state and keeps the most recent writes.
#[derive(Debug)]
pub struct RecordingPorts {
    pub state: PortConfiguration,
    log: HistoryBuf<PortWrite, WRITE_LOG_CAPACITY>,
    total_writes: usize,
}

impl RecordingPorts {
    pub fn new() -> Self {
        Self {
            state: PortConfiguration::POWER_ON,
            log: HistoryBuf::new(),
            total_writes: 0,
        }
    }

    /// Writes since the last [`clear_log`](Self::clear_log), oldest first.
    /// Only the newest `WRITE_LOG_CAPACITY` are kept.
    pub fn writes(&self) -> Vec<PortWrite, WRITE_LOG_CAPACITY> {
        self.log.oldest_ordered().copied().collect()
    }

    /// Every write since construction, including ones evicted from the log.
    pub fn total_writes(&self) -> usize {
        self.total_writes
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    fn log(&mut self, write: PortWrite) {
        self.log.write(write);
        self.total_writes += 1;
    }
}

impl PortDriver for RecordingPorts {
    fn set_mux(&mut self, select: MuxSelect) {
        self.state.mux = select;
        self.log(PortWrite::Mux(select));
    }

    fn set_charge(&mut self, state: ChargeState) {
        self.state.charge = state;
        self.log(PortWrite::Charge(state));
    }

    fn charge_enabled(&self) -> bool {
        self.state.charge.is_enabled()
    }

    fn set_cc1(&mut self, pull: PullState) {
        self.state.cc1 = pull;
        self.log(PortWrite::Cc1(pull));
    }

    fn set_cc2(&mut self, pull: PullState) {
        self.state.cc2 = pull;
        self.log(PortWrite::Cc2(pull));
    }

    fn set_hub_reset(&mut self, asserted: bool) {
        self.state.hub_reset = asserted;
        self.log(PortWrite::HubReset(asserted));
    }

    fn set_hub1_feed(&mut self, fed: bool) {
        self.state.hub1_feed = fed;
        self.log(PortWrite::Hub1Feed(fed));
    }

    fn set_hub2_feed(&mut self, fed: bool) {
        self.state.hub2_feed = fed;
        self.log(PortWrite::Hub2Feed(fed));
    }

    fn set_led(&mut self, led: LedIndicator) {
        self.state.led = led;
        self.log(PortWrite::Led(led));
    }
}
