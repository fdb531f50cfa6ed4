//! Printing parse outcomes and terminating the process.

use crate::config::ArgTable;
use crate::help::{generate_attribution, generate_error, generate_help};
use crate::hooks::Hooks;
use crate::matches::Matches;
use crate::parser::{parse_args, ParseError, ParseOutcome};
use std::fmt::Display;
use std::io::Write;
use tracing::debug;

/// Exit status after help or attribution output.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status after an error report.
pub const EXIT_FAILURE: i32 = 1;

/// Where terminal output is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Text to print before the process exits with `code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub code: i32,
    pub stream: Stream,
    pub text: String,
}

impl Exit {
    fn help(text: String) -> Self {
        Self {
            code: EXIT_SUCCESS,
            stream: Stream::Stdout,
            text,
        }
    }

    fn error(text: String) -> Self {
        Self {
            code: EXIT_FAILURE,
            stream: Stream::Stderr,
            text,
        }
    }

    /// Print the text to its stream and exit the process.
    pub fn print_and_exit(&self) -> ! {
        debug!(code = self.code, "exiting");
        // Nothing useful can be done if the terminal is gone.
        let _ = match self.stream {
            Stream::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(self.text.as_bytes()).and_then(|_| out.flush())
            }
            Stream::Stderr => {
                let mut err = std::io::stderr().lock();
                err.write_all(self.text.as_bytes()).and_then(|_| err.flush())
            }
        };
        std::process::exit(self.code)
    }
}

/// Turn a parse result into matches, or the text and status to exit with.
pub fn finish(
    table: &ArgTable,
    argv: &[String],
    result: Result<ParseOutcome, ParseError>,
) -> Result<Matches, Exit> {
    let program = table.effective_program_name(argv);
    match result {
        Ok(ParseOutcome::Parsed(matches)) => Ok(matches),
        Ok(ParseOutcome::Help) => Err(Exit::help(generate_help(table, program))),
        Ok(ParseOutcome::Attribution) => Err(Exit::help(generate_attribution())),
        Err(e) => Err(Exit::error(generate_error(table, program, &e))),
    }
}

/// Parse `argv`, printing help or errors and exiting the process when needed.
pub fn parse_or_exit(table: &ArgTable, argv: &[String], hooks: &mut Hooks<'_>) -> Matches {
    match finish(table, argv, parse_args(table, argv, hooks)) {
        Ok(matches) => matches,
        Err(exit) => exit.print_and_exit(),
    }
}

/// Print the help text to stdout and exit successfully.
pub fn exit_with_help(table: &ArgTable, program: &str) -> ! {
    Exit::help(generate_help(table, program)).print_and_exit()
}

/// Print an error report for `detail` to stderr and exit with failure.
pub fn exit_with_error(table: &ArgTable, program: &str, detail: &dyn Display) -> ! {
    Exit::error(generate_error(table, program, detail)).print_and_exit()
}
