//! Telemetry event catalog and ring buffer shared by firmware and host targets.
//!
//! Mode publications and hub-reset edges are recorded into a fixed-capacity
//! history so the firmware log and the bench emulator can narrate what the
//! sequencer did without allocating.

use core::{fmt, time::Duration};

use heapless::{HistoryBuf, OldestOrdered};

use crate::sequencer::TransitionEvent;
use crate::tick::Tick;
use crate::vbus::VbusMode;

/// Identifier assigned to each recorded event.
pub type EventId = u32;

/// Total number of telemetry entries retained in memory.
pub const TELEMETRY_RING_CAPACITY: usize = 32;

/// Discriminated telemetry events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TelemetryEventKind {
    ModePublished(VbusMode),
    HubResetAsserted(VbusMode),
    HubResetRestarted(VbusMode),
    HubResetReleased(VbusMode),
}

impl fmt::Display for TelemetryEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryEventKind::ModePublished(mode) => write!(f, "mode-published {mode}"),
            TelemetryEventKind::HubResetAsserted(mode) => write!(f, "hub-reset-asserted {mode}"),
            TelemetryEventKind::HubResetRestarted(mode) => {
                write!(f, "hub-reset-restarted {mode}")
            }
            TelemetryEventKind::HubResetReleased(mode) => write!(f, "hub-reset-released {mode}"),
        }
    }
}

impl From<TransitionEvent> for TelemetryEventKind {
    fn from(event: TransitionEvent) -> Self {
        match event {
            TransitionEvent::ResetAsserted { to, .. } => TelemetryEventKind::HubResetAsserted(to),
            TransitionEvent::ResetRestarted { to, .. } => {
                TelemetryEventKind::HubResetRestarted(to)
            }
            TransitionEvent::ResetReleased { mode } => TelemetryEventKind::HubResetReleased(mode),
        }
    }
}

/// Payloads carried alongside telemetry events.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TelemetryPayload {
    /// No additional metadata accompanies the event.
    None,
    /// Details describing a hub-reset edge.
    Transition(TransitionTelemetry),
}

/// Hub-reset edge payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransitionTelemetry {
    pub event: TransitionEvent,
    pub elapsed_since_previous: Option<Duration>,
}

/// Monotonic instant wrappers usable as telemetry timestamps.
pub trait TelemetryInstant: Copy {
    /// Returns the duration from `earlier` to `self`.
    fn saturating_duration_since(&self, earlier: Self) -> Duration;
}

impl TelemetryInstant for Tick {
    fn saturating_duration_since(&self, earlier: Self) -> Duration {
        Duration::from_millis(u64::from(self.elapsed_since(earlier)))
    }
}

/// Telemetry record stored in the ring buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TelemetryRecord<TInstant>
where
    TInstant: Copy,
{
    pub id: EventId,
    pub timestamp: TInstant,
    pub event: TelemetryEventKind,
    pub details: TelemetryPayload,
}

/// Telemetry ring buffer type alias.
pub type TelemetryRing<TInstant, const CAPACITY: usize = TELEMETRY_RING_CAPACITY> =
    HistoryBuf<TelemetryRecord<TInstant>, CAPACITY>;

/// Records telemetry events into a fixed-size ring buffer.
pub struct TelemetryRecorder<TInstant, const CAPACITY: usize = TELEMETRY_RING_CAPACITY>
where
    TInstant: Copy,
{
    ring: TelemetryRing<TInstant, CAPACITY>,
    last_transition_at: Option<TInstant>,
    next_event_id: EventId,
}

impl<TInstant, const CAPACITY: usize> TelemetryRecorder<TInstant, CAPACITY>
where
    TInstant: Copy + TelemetryInstant,
{
    /// Creates a new telemetry recorder with an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuf::new(),
            last_transition_at: None,
            next_event_id: 0,
        }
    }

    /// Returns an iterator over the recorded telemetry in chronological order.
    pub fn oldest_first(&self) -> OldestOrdered<'_, TelemetryRecord<TInstant>> {
        self.ring.oldest_ordered()
    }

    /// Returns the most recent telemetry record, if available.
    pub fn latest(&self) -> Option<&TelemetryRecord<TInstant>> {
        self.ring.recent()
    }

    /// Returns the number of records currently stored.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns `true` when no telemetry records are stored.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Records a debounced mode publication.
    pub fn record_mode_published(&mut self, mode: VbusMode, timestamp: TInstant) -> EventId {
        self.record(
            TelemetryEventKind::ModePublished(mode),
            TelemetryPayload::None,
            timestamp,
        )
    }

    /// Records a hub-reset edge and the time since the previous one.
    pub fn record_transition(&mut self, event: TransitionEvent, timestamp: TInstant) -> EventId {
        let elapsed = self
            .last_transition_at
            .map(|previous| timestamp.saturating_duration_since(previous));
        self.last_transition_at = Some(timestamp);

        let payload = TelemetryPayload::Transition(TransitionTelemetry {
            event,
            elapsed_since_previous: elapsed,
        });
        self.record(event.into(), payload, timestamp)
    }

    /// Records an arbitrary telemetry event with the supplied payload.
    pub fn record(
        &mut self,
        event: TelemetryEventKind,
        payload: TelemetryPayload,
        timestamp: TInstant,
    ) -> EventId {
        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);

        self.ring.write(TelemetryRecord {
            id,
            timestamp,
            event,
            details: payload,
        });

        id
    }
}

impl<TInstant, const CAPACITY: usize> Default for TelemetryRecorder<TInstant, CAPACITY>
where
    TInstant: Copy + TelemetryInstant,
{
    fn default() -> Self {
        Self::new()
    }
}
