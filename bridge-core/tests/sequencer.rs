mod support;

use bridge_core::ports::{
    ChargeState, LedIndicator, MuxSelect, OutputPolicy, PortConfiguration, PullState, Topology,
};
use bridge_core::sequencer::{
    DEFAULT_HOLD_MS, MAX_STEP_EVENTS, SequencerPhase, TransitionEvent, TransitionSequencer,
};
use bridge_core::tick::{MAX_HOLD_MS, Tick};
use bridge_core::vbus::VbusMode;

use support::{PortWrite, RecordingPorts};

const POLICY: OutputPolicy = OutputPolicy::new(ChargeState::Disabled, false);

#[test]
fn wait_leaves_outputs_untouched() {
    let mut sequencer = TransitionSequencer::new(DEFAULT_HOLD_MS, POLICY);
    let mut ports = RecordingPorts::new();

    for ms in 0..50 {
        let report = sequencer.step(VbusMode::Wait, Tick::new(ms), &mut ports);
        assert_eq!(report.phase, SequencerPhase::Waiting);
        assert!(report.events.is_empty());
        assert_eq!(report.applied, None);
    }
    assert_eq!(ports.total_writes(), 0);
    assert_eq!(ports.state, PortConfiguration::POWER_ON);
}

#[test]
fn first_mode_after_wait_holds_reset_before_applying() {
    let mut sequencer = TransitionSequencer::new(DEFAULT_HOLD_MS, POLICY);
    let mut ports = RecordingPorts::new();

    let report = sequencer.step(VbusMode::PixcOnly, Tick::new(1_000), &mut ports);
    assert_eq!(
        report.events.as_slice(),
        &[TransitionEvent::ResetAsserted {
            from: VbusMode::Wait,
            to: VbusMode::PixcOnly,
            deadline: Tick::new(1_500),
        }]
    );
    assert_eq!(
        report.phase,
        SequencerPhase::Holding {
            target: VbusMode::PixcOnly,
            remaining_ms: 500,
        }
    );
    assert_eq!(
        ports.writes().as_slice(),
        &[
            PortWrite::HubReset(true),
            PortWrite::Cc1(PullState::Mid),
            PortWrite::Cc2(PullState::Mid),
        ]
    );

    let report = sequencer.step(VbusMode::PixcOnly, Tick::new(1_500), &mut ports);
    assert_eq!(
        report.events.as_slice(),
        &[TransitionEvent::ResetReleased {
            mode: VbusMode::PixcOnly
        }]
    );
    assert_eq!(report.phase, SequencerPhase::Steady(VbusMode::PixcOnly));
    let applied = report.applied.expect("configuration applied after hold");
    assert_eq!(applied.topology(), Topology::Host);
    assert!(!ports.state.hub_reset);
    assert_eq!(ports.state.led, LedIndicator::Host);
}

#[test]
fn hold_deadline_survives_counter_wrap() {
    let mut sequencer = TransitionSequencer::new(DEFAULT_HOLD_MS, POLICY);
    let mut ports = RecordingPorts::new();

    let start = Tick::new(65_400);
    sequencer.step(VbusMode::None, start, &mut ports);
    assert_eq!(sequencer.state().reset_deadline, Tick::new(364));

    let mut now = start;
    let mut elapsed = 0_u16;
    loop {
        now = now.wrapping_add_ms(1);
        elapsed += 1;
        let report = sequencer.step(VbusMode::None, now, &mut ports);
        if elapsed < DEFAULT_HOLD_MS {
            assert!(
                matches!(report.phase, SequencerPhase::Holding { .. }),
                "released early at {now}"
            );
            assert!(ports.state.hub_reset);
        } else {
            assert_eq!(report.phase, SequencerPhase::Steady(VbusMode::None));
            break;
        }
    }
    assert_eq!(now, Tick::new(364));
    assert!(!ports.state.hub_reset);
}

#[test]
fn mode_change_during_hold_restarts_toward_newest_mode() {
    let mut sequencer = TransitionSequencer::new(DEFAULT_HOLD_MS, POLICY);
    let mut ports = RecordingPorts::new();

    sequencer.step(VbusMode::None, Tick::new(0), &mut ports);
    let report = sequencer.step(VbusMode::DebugOnly, Tick::new(200), &mut ports);
    assert_eq!(
        report.events.as_slice(),
        &[TransitionEvent::ResetRestarted {
            to: VbusMode::DebugOnly,
            deadline: Tick::new(700),
        }]
    );

    // The first deadline passes without releasing the hubs.
    let report = sequencer.step(VbusMode::DebugOnly, Tick::new(500), &mut ports);
    assert_eq!(
        report.phase,
        SequencerPhase::Holding {
            target: VbusMode::DebugOnly,
            remaining_ms: 200,
        }
    );
    assert!(ports.state.hub_reset);

    let report = sequencer.step(VbusMode::DebugOnly, Tick::new(700), &mut ports);
    assert_eq!(report.phase, SequencerPhase::Steady(VbusMode::DebugOnly));
    assert_eq!(ports.state.mux, MuxSelect::Debug);
    assert_eq!(ports.state.cc2, PullState::Down);
}

#[test]
fn steady_mode_reapplies_without_new_reset() {
    let mut sequencer = TransitionSequencer::new(0, POLICY);
    let mut ports = RecordingPorts::new();

    let report = sequencer.step(VbusMode::Both, Tick::new(10), &mut ports);
    assert_eq!(report.events.len(), MAX_STEP_EVENTS);
    assert_eq!(
        report.events.as_slice(),
        &[
            TransitionEvent::ResetAsserted {
                from: VbusMode::Wait,
                to: VbusMode::Both,
                deadline: Tick::new(10),
            },
            TransitionEvent::ResetReleased {
                mode: VbusMode::Both
            },
        ]
    );
    assert_eq!(report.phase, SequencerPhase::Steady(VbusMode::Both));

    ports.clear_log();
    let report = sequencer.step(VbusMode::Both, Tick::new(11), &mut ports);
    assert!(report.events.is_empty());
    assert!(report.applied.is_some());
    assert!(!ports.writes().contains(&PortWrite::HubReset(true)));
    assert_eq!(ports.state.charge, ChargeState::Enabled);
}

#[test]
fn oversized_hold_is_clamped() {
    let sequencer = TransitionSequencer::new(u16::MAX, POLICY);
    assert_eq!(sequencer.hold_ms(), MAX_HOLD_MS);
}
