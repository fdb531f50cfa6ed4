//! declargs - Declarative command-line argument parsing.
//!
//! Programs describe their options and positional arguments as an
//! [`ArgTable`], either built in code or loaded from JSON. The parser scans
//! the argument vector once, converts and validates values, and returns a
//! [`ParseOutcome`]; [`parse_or_exit`] adds the usual print-and-exit
//! behavior for help requests and errors.

pub mod config;
pub mod help;
pub mod hooks;
pub mod matches;
pub mod output;
pub mod parser;
mod validate;

pub use config::{ArgSpec, ArgTable, Bounds, ConfigError, ValueType};
pub use help::{generate_attribution, generate_error, generate_help, generate_usage};
pub use hooks::Hooks;
pub use matches::{ArgResult, Matches, Value};
pub use output::{exit_with_error, exit_with_help, parse_or_exit};
pub use parser::{parse_args, ParseError, ParseOutcome};
pub use validate::parse_int_literal;
