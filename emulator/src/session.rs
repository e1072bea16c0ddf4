use std::fmt;

use bridge_core::debounce::SamplePipeline;
use bridge_core::ports::{
    ChargeState, LedIndicator, MuxSelect, PortConfiguration, PortDriver, PullState,
};
use bridge_core::profile::{BoardProfile, ProfileError};
use bridge_core::publisher::ModeCell;
use bridge_core::sequencer::{SequencerPhase, TransitionSequencer};
use bridge_core::telemetry::{TelemetryPayload, TelemetryRecord, TelemetryRecorder};
use bridge_core::tick::{Tick, TickSource};
use bridge_core::vbus::{RawSamplePair, VbusMode};

use crate::command::{self, BenchCommand, SyntaxError};

/// Longest single `run` accepted, in simulated milliseconds.
pub const MAX_RUN_MS: u32 = 600_000;

pub const HELP_TOPICS: &[(&str, &str)] = &[
    (
        "vbus",
        "vbus <pixc_volts> <dbg_volts>  - set both sensed VBUS rails",
    ),
    (
        "run",
        "run <ms>                       - advance the simulated clock",
    ),
    (
        "status",
        "status                         - show mode, sequencer and outputs",
    ),
    (
        "profile",
        "profile <r1|r2>                - restart the bench with a board profile",
    ),
    (
        "help",
        "help                           - list commands",
    ),
    (
        "exit",
        "exit                           - leave the emulator",
    ),
];

/// Reasons a bench command is refused.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BenchError {
    Syntax(SyntaxError),
    UnknownProfile(String),
    Profile(ProfileError),
    RunTooLong { requested: u32 },
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::Syntax(error) => write!(f, "syntax {error}"),
            BenchError::UnknownProfile(name) => write!(f, "profile unknown `{name}`"),
            BenchError::Profile(error) => write!(f, "profile {error}"),
            BenchError::RunTooLong { requested } => {
                write!(f, "run {requested} ms exceeds {MAX_RUN_MS} ms")
            }
        }
    }
}

impl From<SyntaxError> for BenchError {
    fn from(error: SyntaxError) -> Self {
        BenchError::Syntax(error)
    }
}

impl From<ProfileError> for BenchError {
    fn from(error: ProfileError) -> Self {
        BenchError::Profile(error)
    }
}

/// What the caller should do after a command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Reply {
    Lines(Vec<String>),
    Exit,
}

/// Host stand-in for the board outputs; keeps the last value of each.
#[derive(Clone, Debug)]
pub struct SimulatedBoard {
    outputs: PortConfiguration,
    writes: u64,
}

impl SimulatedBoard {
    pub fn new() -> Self {
        Self {
            outputs: PortConfiguration::POWER_ON,
            writes: 0,
        }
    }

    pub fn outputs(&self) -> &PortConfiguration {
        &self.outputs
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    fn touch(&mut self) {
        self.writes = self.writes.wrapping_add(1);
    }
}

impl Default for SimulatedBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl PortDriver for SimulatedBoard {
    fn set_mux(&mut self, select: MuxSelect) {
        self.outputs.mux = select;
        self.touch();
    }

    fn set_charge(&mut self, state: ChargeState) {
        self.outputs.charge = state;
        self.touch();
    }

    fn charge_enabled(&self) -> bool {
        self.outputs.charge.is_enabled()
    }

    fn set_cc1(&mut self, pull: PullState) {
        self.outputs.cc1 = pull;
        self.touch();
    }

    fn set_cc2(&mut self, pull: PullState) {
        self.outputs.cc2 = pull;
        self.touch();
    }

    fn set_hub_reset(&mut self, asserted: bool) {
        self.outputs.hub_reset = asserted;
        self.touch();
    }

    fn set_hub1_feed(&mut self, fed: bool) {
        self.outputs.hub1_feed = fed;
        self.touch();
    }

    fn set_hub2_feed(&mut self, fed: bool) {
        self.outputs.hub2_feed = fed;
        self.touch();
    }

    fn set_led(&mut self, led: LedIndicator) {
        self.outputs.led = led;
        self.touch();
    }
}

/// Sampling and control paths of one board, stepped once per simulated ms.
pub struct Session {
    profile: BoardProfile,
    cell: ModeCell,
    pipeline: SamplePipeline,
    sequencer: TransitionSequencer,
    board: SimulatedBoard,
    telemetry: TelemetryRecorder<Tick>,
    input_mv: (u32, u32),
    observed: VbusMode,
    phase: SequencerPhase,
    clock_ms: u64,
}

impl Session {
    /// Creates a bench with both rails at 0 V.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Profile`] when `profile` fails validation.
    pub fn new(profile: BoardProfile) -> Result<Self, BenchError> {
        profile.validate()?;
        Ok(Self {
            profile,
            cell: ModeCell::new(),
            pipeline: profile.pipeline(),
            sequencer: profile.sequencer(),
            board: SimulatedBoard::new(),
            telemetry: TelemetryRecorder::new(),
            input_mv: (0, 0),
            observed: VbusMode::Wait,
            phase: SequencerPhase::Waiting,
            clock_ms: 0,
        })
    }

    pub fn profile(&self) -> &BoardProfile {
        &self.profile
    }

    pub fn published_mode(&self) -> VbusMode {
        self.cell.load()
    }

    /// Parses and executes one line. Failures come back as `ERR` lines.
    pub fn handle_command(&mut self, line: &str) -> Reply {
        match self.execute(line) {
            Ok(reply) => reply,
            Err(error) => Reply::Lines(vec![format!("ERR {error}")]),
        }
    }

    fn execute(&mut self, line: &str) -> Result<Reply, BenchError> {
        let lines = match command::parse(line)? {
            BenchCommand::Vbus { pixc_mv, dbg_mv } => {
                self.input_mv = (pixc_mv, dbg_mv);
                let pair = self.sample_pair();
                vec![format!(
                    "OK vbus pixc={} ({}) dbg={} ({})",
                    format_volts(pixc_mv),
                    pair.pixc,
                    format_volts(dbg_mv),
                    pair.dbg
                )]
            }
            BenchCommand::Run { ms } => {
                if ms > MAX_RUN_MS {
                    return Err(BenchError::RunTooLong { requested: ms });
                }
                let mut lines = self.run(ms);
                lines.push(format!(
                    "OK run {ms} ms -> {} mode={}",
                    self.clock_ms,
                    self.published_mode()
                ));
                lines
            }
            BenchCommand::Status => self.status_lines(),
            BenchCommand::Profile(name) => {
                let profile = BoardProfile::by_name(name)
                    .ok_or_else(|| BenchError::UnknownProfile(name.to_string()))?;
                let clock_ms = self.clock_ms;
                *self = Session::new(profile)?;
                self.clock_ms = clock_ms;
                vec![format!("OK profile {}", profile.name)]
            }
            BenchCommand::Help => HELP_TOPICS
                .iter()
                .map(|(_, text)| (*text).to_string())
                .collect(),
            BenchCommand::Exit => return Ok(Reply::Exit),
        };
        Ok(Reply::Lines(lines))
    }

    /// Advances the clock by `ms`, narrating every telemetry event.
    pub fn run(&mut self, ms: u32) -> Vec<String> {
        let mut narration = Vec::new();
        for _ in 0..ms {
            self.step_once(&mut narration);
        }
        narration
    }

    fn step_once(&mut self, narration: &mut Vec<String>) {
        let now = self.now();
        let pair = self.sample_pair();
        self.pipeline
            .ingest(pair, self.board.charge_enabled(), &self.cell);

        let mode = self.cell.load();
        if mode != self.observed {
            self.observed = mode;
            self.telemetry.record_mode_published(mode, now);
            self.narrate(narration);
        }

        let report = self.sequencer.step(mode, now, &mut self.board);
        for event in report.events {
            self.telemetry.record_transition(event, now);
            self.narrate(narration);
        }
        self.phase = report.phase;
        self.clock_ms += 1;
    }

    fn narrate(&self, narration: &mut Vec<String>) {
        if let Some(record) = self.telemetry.latest() {
            narration.push(describe_record(record, self.clock_ms));
        }
    }

    fn sample_pair(&self) -> RawSamplePair {
        let (pixc_mv, dbg_mv) = self.input_mv;
        RawSamplePair::new(
            self.profile.adc.counts_for_millivolts(pixc_mv),
            self.profile.adc.counts_for_millivolts(dbg_mv),
        )
    }

    fn status_lines(&self) -> Vec<String> {
        let (pixc_mv, dbg_mv) = self.input_mv;
        let pair = self.sample_pair();
        let outputs = self.board.outputs();
        vec![
            format!(
                "profile {} debounce={} hold={}ms",
                self.profile.name, self.profile.debounce_threshold, self.profile.hold_ms
            ),
            format!(
                "clock {} ms tick={}",
                self.clock_ms,
                self.now()
            ),
            format!(
                "vbus pixc={} ({}) dbg={} ({})",
                format_volts(pixc_mv),
                pair.pixc,
                format_volts(dbg_mv),
                pair.dbg
            ),
            format!("mode {}", self.published_mode()),
            format!("phase {}", describe_phase(self.phase)),
            format!(
                "outputs mux={} charge={} cc1={} cc2={} hub-reset={} hub1-feed={} hub2-feed={} led={}",
                mux_label(outputs.mux),
                on_off(outputs.charge.is_enabled()),
                pull_label(outputs.cc1),
                pull_label(outputs.cc2),
                if outputs.hub_reset { "asserted" } else { "released" },
                on_off(outputs.hub1_feed),
                on_off(outputs.hub2_feed),
                led_label(outputs.led),
            ),
            format!(
                "telemetry {} events, {} output writes",
                self.telemetry.len(),
                self.board.writes()
            ),
        ]
    }
}

impl TickSource for Session {
    fn now(&self) -> Tick {
        Tick::from_millis(self.clock_ms)
    }
}

fn describe_record(record: &TelemetryRecord<Tick>, clock_ms: u64) -> String {
    let elapsed = match record.details {
        TelemetryPayload::Transition(details) => details
            .elapsed_since_previous
            .map(|value| format!(" (+{} ms)", value.as_millis()))
            .unwrap_or_default(),
        TelemetryPayload::None => String::new(),
    };
    format!(
        "[{clock_ms:>8} ms] #{} {}{elapsed}",
        record.id, record.event
    )
}

fn describe_phase(phase: SequencerPhase) -> String {
    match phase {
        SequencerPhase::Waiting => "waiting".to_string(),
        SequencerPhase::Holding {
            target,
            remaining_ms,
        } => format!("holding {target} {remaining_ms} ms left"),
        SequencerPhase::Steady(mode) => format!("steady {mode}"),
    }
}

fn format_volts(millivolts: u32) -> String {
    format!("{}.{:03}V", millivolts / 1_000, millivolts % 1_000)
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

fn mux_label(select: MuxSelect) -> &'static str {
    match select {
        MuxSelect::Normal => "normal",
        MuxSelect::Debug => "debug",
    }
}

fn pull_label(pull: PullState) -> &'static str {
    match pull {
        PullState::Open => "open",
        PullState::Down => "down",
        PullState::Up => "up",
        PullState::Mid => "mid",
    }
}

fn led_label(led: LedIndicator) -> &'static str {
    match led {
        LedIndicator::Off => "off",
        LedIndicator::Host => "host",
        LedIndicator::Device => "device",
    }
}

#[cfg(test)]
impl Session {
    fn board(&self) -> &SimulatedBoard {
        &self.board
    }

    fn phase(&self) -> SequencerPhase {
        self.phase
    }

    fn clock_ms(&self) -> u64 {
        self.clock_ms
    }
}
