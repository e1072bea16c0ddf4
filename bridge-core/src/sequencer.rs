//! Hub-reset transition sequencer driven from the main control loop.
//!
//! Each published-mode change first holds the hubs in reset with both CC lines
//! parked at [`PullState::Mid`](crate::ports::PullState::Mid) for a fixed hold
//! time, then applies the port configuration of the new mode. The hold is
//! tracked as a deadline on the wrapping tick counter, so [`TransitionSequencer::step`]
//! never blocks and a further mode change during the hold restarts the window
//! toward the newest mode.

use heapless::Vec;

use crate::ports::{OutputPolicy, PortConfiguration, PortDriver};
use crate::tick::{MAX_HOLD_MS, Tick};
use crate::vbus::VbusMode;

/// Default reset hold applied on every mode change.
pub const DEFAULT_HOLD_MS: u16 = 500;

/// Upper bound on transition events reported by a single step: one assert or
/// restart, then one release when the hold has already elapsed.
pub const MAX_STEP_EVENTS: usize = 2;

/// State owned exclusively by the sequencer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TransitionState {
    pub last_published_mode: VbusMode,
    pub reset_in_progress: bool,
    pub reset_deadline: Tick,
}

impl TransitionState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_published_mode: VbusMode::Wait,
            reset_in_progress: false,
            reset_deadline: Tick::ZERO,
        }
    }
}

impl Default for TransitionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the sequencer stands after a step.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SequencerPhase {
    /// No mode published yet; outputs untouched.
    Waiting,
    /// Hubs held in reset ahead of applying `target`.
    Holding { target: VbusMode, remaining_ms: u16 },
    /// Configuration for the mode is applied.
    Steady(VbusMode),
}

/// Edge emitted when the reset sequence changes state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TransitionEvent {
    ResetAsserted {
        from: VbusMode,
        to: VbusMode,
        deadline: Tick,
    },
    ResetRestarted {
        to: VbusMode,
        deadline: Tick,
    },
    ResetReleased {
        mode: VbusMode,
    },
}

/// Outcome of one control-loop iteration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StepReport {
    pub phase: SequencerPhase,
    pub events: Vec<TransitionEvent, MAX_STEP_EVENTS>,
    pub applied: Option<PortConfiguration>,
}

impl StepReport {
    fn new(phase: SequencerPhase) -> Self {
        Self {
            phase,
            events: Vec::new(),
            applied: None,
        }
    }

    fn record(&mut self, event: TransitionEvent) {
        let pushed = self.events.push(event);
        debug_assert!(pushed.is_ok(), "more than MAX_STEP_EVENTS in one step");
    }
}

/// Non-blocking reset-and-settle sequencer.
#[derive(Clone, Debug)]
pub struct TransitionSequencer {
    hold_ms: u16,
    policy: OutputPolicy,
    state: TransitionState,
}

impl TransitionSequencer {
    /// Creates a sequencer; holds longer than [`MAX_HOLD_MS`] are clamped.
    #[must_use]
    pub const fn new(hold_ms: u16, policy: OutputPolicy) -> Self {
        Self {
            hold_ms: if hold_ms > MAX_HOLD_MS {
                MAX_HOLD_MS
            } else {
                hold_ms
            },
            policy,
            state: TransitionState::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &TransitionState {
        &self.state
    }

    #[must_use]
    pub const fn hold_ms(&self) -> u16 {
        self.hold_ms
    }

    /// Runs one control-loop iteration for the published `mode` at `now`.
    pub fn step<D>(&mut self, mode: VbusMode, now: Tick, driver: &mut D) -> StepReport
    where
        D: PortDriver + ?Sized,
    {
        if mode == VbusMode::Wait {
            return StepReport::new(SequencerPhase::Waiting);
        }

        let mut report = StepReport::new(SequencerPhase::Steady(mode));

        if mode != self.state.last_published_mode {
            let deadline = now.wrapping_add_ms(self.hold_ms);
            let event = if self.state.reset_in_progress {
                TransitionEvent::ResetRestarted { to: mode, deadline }
            } else {
                TransitionEvent::ResetAsserted {
                    from: self.state.last_published_mode,
                    to: mode,
                    deadline,
                }
            };
            report.record(event);

            self.state.last_published_mode = mode;
            self.state.reset_in_progress = true;
            self.state.reset_deadline = deadline;
            driver.enter_reset_hold();
        }

        if self.state.reset_in_progress {
            if !now.has_reached(self.state.reset_deadline) {
                report.phase = SequencerPhase::Holding {
                    target: mode,
                    remaining_ms: now.remaining_until(self.state.reset_deadline),
                };
                return report;
            }

            self.state.reset_in_progress = false;
            driver.set_hub_reset(false);
            report.record(TransitionEvent::ResetReleased { mode });
        }

        if let Some(config) = PortConfiguration::for_mode(mode, now, &self.policy) {
            driver.apply(&config);
            report.applied = Some(config);
        }

        report
    }
}
