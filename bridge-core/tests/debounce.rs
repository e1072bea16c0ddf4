use bridge_core::debounce::{Debouncer, SamplePipeline};
use bridge_core::profile::BoardProfile;
use bridge_core::publisher::ModeCell;
use bridge_core::vbus::{RawSamplePair, VbusMode};

#[test]
fn publishes_exactly_on_threshold_call() {
    for threshold in [1_u16, 2, 20, 255] {
        let mut debouncer = Debouncer::new(threshold);
        for call in 1..threshold {
            assert_eq!(
                debouncer.feed(VbusMode::PixcOnly),
                None,
                "threshold={threshold} call={call}"
            );
        }
        assert_eq!(debouncer.feed(VbusMode::PixcOnly), Some(VbusMode::PixcOnly));
        assert_eq!(debouncer.published(), VbusMode::PixcOnly);
    }
}

#[test]
fn interrupted_run_never_publishes_first_candidate() {
    let threshold = 20;
    let mut debouncer = Debouncer::new(threshold);
    for _ in 0..threshold - 1 {
        assert_eq!(debouncer.feed(VbusMode::Both), None);
    }
    assert_eq!(debouncer.feed(VbusMode::None), None);
    assert_eq!(debouncer.published(), VbusMode::Wait);
    assert_eq!(debouncer.last_candidate(), VbusMode::None);
    assert_eq!(debouncer.consecutive_count(), 1);

    // The new candidate needs its own full run.
    for _ in 0..threshold - 2 {
        assert_eq!(debouncer.feed(VbusMode::None), None);
    }
    assert_eq!(debouncer.feed(VbusMode::None), Some(VbusMode::None));
}

#[test]
fn pipeline_publishes_into_cell() {
    let cell = ModeCell::new();
    let mut pipeline = BoardProfile::R1.pipeline();
    let threshold = BoardProfile::R1.debounce_threshold;
    let idle = RawSamplePair::new(0, 0);

    for _ in 1..threshold {
        assert_eq!(pipeline.ingest(idle, false, &cell), None);
        assert_eq!(cell.load(), VbusMode::Wait);
    }
    assert_eq!(pipeline.ingest(idle, false, &cell), Some(VbusMode::None));
    assert_eq!(cell.load(), VbusMode::None);
}

#[test]
fn single_noisy_pair_does_not_change_published_mode() {
    let cell = ModeCell::new();
    let mut pipeline = SamplePipeline::new(BoardProfile::R2.classifier(), 5);
    let host = RawSamplePair::new(800, 0);
    let noise = RawSamplePair::new(800, 900);

    for _ in 0..5 {
        pipeline.ingest(host, false, &cell);
    }
    assert_eq!(cell.load(), VbusMode::PixcOnly);

    assert_eq!(pipeline.ingest(noise, false, &cell), None);
    for _ in 0..4 {
        assert_eq!(pipeline.ingest(host, false, &cell), None);
    }
    assert_eq!(cell.load(), VbusMode::PixcOnly);
    assert_eq!(pipeline.ingest(host, false, &cell), Some(VbusMode::PixcOnly));
}
