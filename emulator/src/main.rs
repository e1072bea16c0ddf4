mod command;
mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use bridge_core::profile::BoardProfile;
use session::{Reply, Session};

fn main() -> io::Result<()> {
    let profile = parse_profile().unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("Usage: bridge-emulator [--profile <r1|r2>] | bridge-emulator <r1|r2>");
        process::exit(2);
    });

    let mut session = Session::new(profile).unwrap_or_else(|err| {
        eprintln!("{err}");
        process::exit(2);
    });

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut line = String::new();

    writeln!(
        writer,
        "Debug Bridge Emulator ready (profile {}). Type `help` for commands or `exit` to quit.",
        session.profile().name
    )?;

    loop {
        line.clear();
        write!(writer, "> ")?;
        writer.flush()?;

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(writer)?;
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match session.handle_command(trimmed) {
            Reply::Lines(responses) => {
                for response in responses {
                    writeln!(writer, "{response}")?;
                }
            }
            Reply::Exit => {
                writeln!(writer, "Session closed.")?;
                break;
            }
        }
    }

    Ok(())
}

fn parse_profile() -> Result<BoardProfile, String> {
    let mut args = env::args().skip(1);
    let tag = match args.next() {
        Some(arg) => {
            if let Some(value) = arg.strip_prefix("--profile=") {
                value.to_string()
            } else if arg == "--profile" {
                args.next()
                    .ok_or_else(|| "Expected value after --profile".to_string())?
            } else {
                arg
            }
        }
        None => return Ok(BoardProfile::R2),
    };
    BoardProfile::by_name(&tag).ok_or_else(|| format!("Unknown board profile `{tag}`"))
}
