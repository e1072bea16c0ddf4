//! Bench command grammar.
//!
//! ```text
//! vbus <pixc_volts> <dbg_volts>
//! run <ms>
//! status
//! profile <name>
//! help
//! exit | quit
//! ```
//!
//! Keywords are case-insensitive. Voltages accept up to two integer digits
//! and up to three decimals (`5`, `4.5`, `0.275`).

use std::fmt;

use winnow::ascii::{Caseless, dec_uint, space1};
use winnow::combinator::{alt, cut_err, opt, preceded, separated_pair};
use winnow::prelude::*;
use winnow::token::take_while;

/// Parsed bench command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BenchCommand<'a> {
    /// Sets both sensed rails, in millivolts.
    Vbus { pixc_mv: u32, dbg_mv: u32 },
    /// Advances the simulated clock.
    Run { ms: u32 },
    Status,
    /// Switches to the named board profile.
    Profile(&'a str),
    Help,
    Exit,
}

/// Syntax failure with the byte offset where parsing stopped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SyntaxError {
    pub offset: usize,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unexpected input at column {}", self.offset + 1)
    }
}

/// Parses one trimmed command line.
///
/// # Errors
///
/// Returns [`SyntaxError`] when the line does not match the grammar.
pub fn parse(line: &str) -> Result<BenchCommand<'_>, SyntaxError> {
    command.parse(line.trim()).map_err(|error| SyntaxError {
        offset: error.offset(),
    })
}

fn command<'a>(input: &mut &'a str) -> ModalResult<BenchCommand<'a>> {
    alt((
        preceded(
            (Caseless("vbus"), space1),
            cut_err(separated_pair(volts, space1, volts)),
        )
        .map(|(pixc_mv, dbg_mv)| BenchCommand::Vbus { pixc_mv, dbg_mv }),
        preceded((Caseless("run"), space1), cut_err(dec_uint)).map(|ms| BenchCommand::Run { ms }),
        preceded(
            (Caseless("profile"), space1),
            cut_err(take_while(1.., |c: char| c.is_ascii_alphanumeric())),
        )
        .map(BenchCommand::Profile),
        Caseless("status").value(BenchCommand::Status),
        Caseless("help").value(BenchCommand::Help),
        alt((Caseless("exit"), Caseless("quit"))).value(BenchCommand::Exit),
    ))
    .parse_next(input)
}

fn volts(input: &mut &str) -> ModalResult<u32> {
    (
        take_while(1..=2, '0'..='9').parse_to::<u32>(),
        opt(preceded('.', take_while(1..=3, '0'..='9'))),
    )
        .map(|(whole, fraction)| whole * 1_000 + fraction.map_or(0, fraction_millivolts))
        .parse_next(input)
}

fn fraction_millivolts(digits: &str) -> u32 {
    digits
        .bytes()
        .zip([100, 10, 1])
        .map(|(digit, scale)| u32::from(digit - b'0') * scale)
        .sum()
}
