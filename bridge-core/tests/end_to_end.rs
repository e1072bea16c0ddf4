mod support;

use bridge_core::debounce::SamplePipeline;
use bridge_core::ports::{ChargeState, LedIndicator, MuxSelect, PortDriver, PullState, Topology};
use bridge_core::profile::BoardProfile;
use bridge_core::publisher::ModeCell;
use bridge_core::sequencer::{SequencerPhase, TransitionEvent, TransitionSequencer};
use bridge_core::tick::Tick;
use bridge_core::vbus::{RawSamplePair, VbusMode};

use support::{PortWrite, RecordingPorts, WRITE_LOG_CAPACITY};

const PROFILE: BoardProfile = BoardProfile::R2;

/// Sampling and control paths wired together over one mode cell, one
/// sample pair and one control iteration per simulated millisecond.
struct Bench {
    cell: ModeCell,
    pipeline: SamplePipeline,
    sequencer: TransitionSequencer,
    ports: RecordingPorts,
    now: Tick,
}

impl Bench {
    fn new() -> Self {
        Self {
            cell: ModeCell::new(),
            pipeline: PROFILE.pipeline(),
            sequencer: PROFILE.sequencer(),
            ports: RecordingPorts::new(),
            now: Tick::ZERO,
        }
    }

    fn run(&mut self, pair: RawSamplePair, ms: u32) -> SequencerPhase {
        let mut phase = SequencerPhase::Waiting;
        for _ in 0..ms {
            let charge = self.ports.charge_enabled();
            self.pipeline.ingest(pair, charge, &self.cell);
            phase = self
                .sequencer
                .step(self.cell.load(), self.now, &mut self.ports)
                .phase;
            self.now = self.now.wrapping_add_ms(1);
        }
        phase
    }

    fn settle(&mut self, pair: RawSamplePair) -> SequencerPhase {
        self.run(
            pair,
            u32::from(PROFILE.debounce_threshold) + u32::from(PROFILE.hold_ms),
        )
    }
}

fn pair_mv(pixc_mv: u32, dbg_mv: u32) -> RawSamplePair {
    RawSamplePair::new(
        PROFILE.adc.counts_for_millivolts(pixc_mv),
        PROFILE.adc.counts_for_millivolts(dbg_mv),
    )
}

#[test]
fn idle_rails_settle_into_host_topology() {
    let mut bench = Bench::new();
    let idle = RawSamplePair::new(0, 0);

    let phase = bench.run(idle, u32::from(PROFILE.debounce_threshold) - 1);
    assert_eq!(phase, SequencerPhase::Waiting);
    assert_eq!(bench.ports.total_writes(), 0);

    let phase = bench.settle(idle);
    assert_eq!(phase, SequencerPhase::Steady(VbusMode::None));
    assert_eq!(bench.cell.load(), VbusMode::None);
    // Steady state re-applies the whole configuration every iteration.
    assert!(bench.ports.total_writes() > WRITE_LOG_CAPACITY);
    assert_eq!(bench.ports.writes().len(), WRITE_LOG_CAPACITY);

    let state = bench.ports.state;
    assert_eq!(state.mux, MuxSelect::Normal);
    assert_eq!(state.cc1, PullState::Down);
    assert_eq!(state.cc2, PullState::Open);
    assert_eq!(state.charge, ChargeState::Disabled);
    assert_eq!(state.led, LedIndicator::Off);
    assert!(!state.hub_reset);
}

#[test]
fn both_rails_powered_enable_charge_in_device_topology() {
    let mut bench = Bench::new();
    let powered = pair_mv(4_500, 4_500);
    assert!(!bench.ports.charge_enabled());

    let phase = bench.settle(powered);
    assert_eq!(phase, SequencerPhase::Steady(VbusMode::Both));

    let released_after = bench.ports.total_writes();
    let state = bench.ports.state;
    assert_eq!(state.charge, ChargeState::Enabled);
    assert_eq!(state.mux, MuxSelect::Debug);
    assert_eq!(state.cc1, PullState::Down);
    assert_eq!(state.cc2, PullState::Down);
    assert_eq!(state.led, LedIndicator::Device);
    assert!(state.hub2_feed);

    // Charging now on; equal rails still fall outside the diode window.
    bench.settle(powered);
    assert_eq!(bench.cell.load(), VbusMode::Both);
    assert!(bench.ports.total_writes() > released_after);
    assert!(!bench.ports.state.hub_reset);
}

#[test]
fn switching_to_debug_only_holds_hubs_in_reset_first() {
    let mut bench = Bench::new();
    bench.settle(RawSamplePair::new(0, 0));
    assert_eq!(bench.cell.load(), VbusMode::None);

    let debug_only = pair_mv(0, 5_000);
    bench.run(debug_only, u32::from(PROFILE.debounce_threshold) - 1);
    assert_eq!(bench.cell.load(), VbusMode::None);

    bench.ports.clear_log();
    bench.pipeline.ingest(debug_only, false, &bench.cell);
    assert_eq!(bench.cell.load(), VbusMode::DebugOnly);
    let flipped_at = bench.now;
    let report = bench
        .sequencer
        .step(VbusMode::DebugOnly, flipped_at, &mut bench.ports);
    bench.now = bench.now.wrapping_add_ms(1);

    assert_eq!(
        report.events.as_slice(),
        &[TransitionEvent::ResetAsserted {
            from: VbusMode::None,
            to: VbusMode::DebugOnly,
            deadline: flipped_at.wrapping_add_ms(PROFILE.hold_ms),
        }]
    );
    assert_eq!(
        bench.ports.writes().as_slice(),
        &[
            PortWrite::HubReset(true),
            PortWrite::Cc1(PullState::Mid),
            PortWrite::Cc2(PullState::Mid),
        ]
    );

    let phase = bench.run(debug_only, u32::from(PROFILE.hold_ms) - 1);
    assert!(matches!(phase, SequencerPhase::Holding { remaining_ms: 1, .. }));
    assert!(bench.ports.state.hub_reset);
    assert_eq!(bench.ports.state.mux, MuxSelect::Normal);

    let phase = bench.run(debug_only, 1);
    assert_eq!(phase, SequencerPhase::Steady(VbusMode::DebugOnly));
    let state = bench.ports.state;
    assert!(!state.hub_reset);
    assert_eq!(state.topology(), Topology::Device);
    assert_eq!(state.cc2, PullState::Down);
    assert_eq!(state.led, LedIndicator::Device);
    assert_eq!(state.charge, ChargeState::Disabled);
}
