//! Argument scanning and positional assignment.

use crate::config::{ArgTable, ATTRIBUTION_NAME, HELP_NAME, HELP_SHORT};
use crate::hooks::Hooks;
use crate::matches::{ArgResult, Matches};
use crate::validate;
use thiserror::Error;
use tracing::debug;

/// Errors that end a parse. The `Display` text is the detail shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Unknown option: {code} in {token}")]
    UnknownShortOption { code: String, token: String },

    #[error("No value provided for option: {0}")]
    MissingValue(String),

    #[error("{code} requires a value, so it cannot be used in group, but you entered: {token}")]
    CannotGroup { code: String, token: String },

    #[error("Invalid value for option '{name}', '{value}' is not in '{allowed}'.")]
    NotAllowed {
        name: String,
        value: String,
        allowed: String,
    },

    #[error("Invalid value for option '{name}', '{value}' is not an integer.")]
    NotAnInteger { name: String, value: String },

    #[error("Invalid value for option '{name}', '{value}' is not a number.")]
    NotANumber { name: String, value: String },

    #[error("Invalid value for option '{name}', '{value}' is out of range. (min value: {min}, max value: {max})")]
    IntOutOfRange {
        name: String,
        value: String,
        min: i64,
        max: i64,
    },

    #[error("Invalid value for option '{name}', '{value}' is out of range. (min value: {min:.6}, max value: {max:.6})")]
    FloatOutOfRange {
        name: String,
        value: String,
        min: f64,
        max: f64,
    },

    #[error("Invalid value for option {name}, '{value}' is not a boolean. (accepted: {accepted})")]
    NotABoolean {
        name: String,
        value: String,
        accepted: String,
    },

    #[error("Option '{0}' is required but you did not specify it.")]
    MissingRequired(String),

    #[error("At least {required} positional arguments are required, but you gave {given} arguments.")]
    TooFewPositionals { required: usize, given: usize },

    #[error("Only {accepted} positional arguments are accepted, but you gave '{value}'")]
    TooManyPositionals { accepted: usize, value: String },

    #[error("{0}")]
    Rejected(String),
}

/// Outcome of a parse that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Every argument resolved.
    Parsed(Matches),
    /// The user asked for help (--help or -h).
    Help,
    /// The user asked for the library attribution notice.
    Attribution,
}

/// Parse a full argument vector (program name first) against `table`.
///
/// Help and attribution requests stop the scan immediately and are returned
/// as outcomes; every other problem is a `ParseError`.
pub fn parse_args(
    table: &ArgTable,
    argv: &[String],
    hooks: &mut Hooks<'_>,
) -> Result<ParseOutcome, ParseError> {
    let mut parser = Parser::new(table, hooks);
    parser.parse(table.scanned_args(argv))
}

/// What a single scanning step did with the token under the cursor.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    /// The token (and possibly its value) was consumed.
    Consumed(usize),
    /// The token is a plain value.
    Plain,
    Help,
    Attribution,
}

/// Internal parser state for one call.
struct Parser<'t, 'h, 'a> {
    table: &'t ArgTable,
    hooks: &'h mut Hooks<'a>,
    options: Vec<ArgResult>,
    positionals: Vec<ArgResult>,
    positional_index: usize,
    options_ended: bool,
}

impl<'t, 'h, 'a> Parser<'t, 'h, 'a> {
    fn new(table: &'t ArgTable, hooks: &'h mut Hooks<'a>) -> Self {
        Self {
            table,
            hooks,
            options: vec![ArgResult::default(); table.options.len()],
            positionals: vec![ArgResult::default(); table.positionals.len()],
            positional_index: 0,
            options_ended: false,
        }
    }

    fn parse(&mut self, args: &[String]) -> Result<ParseOutcome, ParseError> {
        let mut cursor = 0;
        let mut remaining = Vec::new();

        while cursor < args.len() {
            let rest = &args[cursor..];
            let step = if self.options_ended {
                Step::Plain
            } else {
                self.match_option(rest)?
            };

            match step {
                Step::Consumed(n) => cursor += n,
                Step::Help => return Ok(ParseOutcome::Help),
                Step::Attribution => return Ok(ParseOutcome::Attribution),
                Step::Plain => {
                    cursor += 1;
                    if self.assign_positional(&rest[0])? {
                        remaining = args[cursor..].to_vec();
                        debug!(count = remaining.len(), "last positional filled, scan stopped");
                        break;
                    }
                }
            }
        }

        if self.positional_index < self.table.min_positionals {
            return Err(ParseError::TooFewPositionals {
                required: self.table.min_positionals,
                given: self.positional_index,
            });
        }

        validate::resolve(
            self.table,
            self.hooks,
            &mut self.options,
            &mut self.positionals,
        )?;

        Ok(ParseOutcome::Parsed(self.collect(remaining)))
    }

    /// Classify the token at the head of `rest` and consume it if it is an option.
    fn match_option(&mut self, rest: &[String]) -> Result<Step, ParseError> {
        let token = &rest[0];

        if !self.table.end_of_options.is_empty() && *token == self.table.end_of_options {
            debug!("end of options marker");
            self.options_ended = true;
            return Ok(Step::Consumed(1));
        }

        if !self.table.long_prefix.is_empty() {
            if let Some(name) = token.strip_prefix(self.table.long_prefix.as_str()) {
                return self.match_long(name, rest);
            }
        }

        if !self.table.short_prefix.is_empty() {
            if let Some(cluster) = token.strip_prefix(self.table.short_prefix.as_str()) {
                if !cluster.is_empty() {
                    return self.match_short(cluster, rest);
                }
            }
        }

        Ok(Step::Plain)
    }

    fn match_long(&mut self, name: &str, rest: &[String]) -> Result<Step, ParseError> {
        let token = &rest[0];

        if name == ATTRIBUTION_NAME {
            return Ok(Step::Attribution);
        }
        if !self.table.no_help && name == HELP_NAME {
            return Ok(Step::Help);
        }

        let index = self
            .table
            .options
            .iter()
            .position(|o| o.name == name)
            .ok_or_else(|| ParseError::UnknownOption(token.clone()))?;

        if self.table.options[index].takes_value() {
            let value = rest
                .get(1)
                .ok_or_else(|| ParseError::MissingValue(token.clone()))?;
            debug!(option = name, value = %value, "matched long option");
            self.options[index].record(value);
            Ok(Step::Consumed(2))
        } else {
            debug!(option = name, "matched long flag");
            self.options[index].record("");
            Ok(Step::Consumed(1))
        }
    }

    fn match_short(&mut self, cluster: &str, rest: &[String]) -> Result<Step, ParseError> {
        let token = &rest[0];
        let prefix = &self.table.short_prefix;
        let mut grouped = false;

        for (i, c) in cluster.char_indices() {
            if !self.table.no_help && c == HELP_SHORT {
                return Ok(Step::Help);
            }

            let index = self
                .table
                .options
                .iter()
                .position(|o| o.short == Some(c))
                .ok_or_else(|| ParseError::UnknownShortOption {
                    code: format!("{}{}", prefix, c),
                    token: token.clone(),
                })?;

            if !self.table.options[index].takes_value() {
                debug!(option = %c, "matched short flag");
                self.options[index].record("");
                grouped = true;
                continue;
            }

            if grouped && !self.table.group_values {
                return Err(ParseError::CannotGroup {
                    code: format!("{}{}", prefix, c),
                    token: token.clone(),
                });
            }

            // The value is whatever follows in this token, else the next token.
            let attached = &cluster[i + c.len_utf8()..];
            if !attached.is_empty() {
                debug!(option = %c, value = attached, "matched short option");
                self.options[index].record(attached);
                return Ok(Step::Consumed(1));
            }

            let value = rest
                .get(1)
                .ok_or_else(|| ParseError::MissingValue(token.clone()))?;
            debug!(option = %c, value = %value, "matched short option");
            self.options[index].record(value);
            return Ok(Step::Consumed(2));
        }

        Ok(Step::Consumed(1))
    }

    /// Place a plain token into the next positional slot.
    ///
    /// Returns true when scanning should stop because the last slot was filled
    /// in stop-at-last-positional mode.
    fn assign_positional(&mut self, token: &str) -> Result<bool, ParseError> {
        let declared = self.table.positionals.len();

        if self.positional_index < declared {
            debug!(
                positional = %self.table.positionals[self.positional_index].name,
                value = token,
                "assigned positional"
            );
            self.positionals[self.positional_index].record(token);
        } else {
            match self.hooks.extra_value.as_mut() {
                Some(hook) => {
                    debug!(value = token, "extra value");
                    hook(token);
                }
                None => {
                    return Err(ParseError::TooManyPositionals {
                        accepted: declared,
                        value: token.to_string(),
                    })
                }
            }
        }

        self.positional_index += 1;
        Ok(self.table.stop_at_last_positional && self.positional_index == declared)
    }

    fn collect(&mut self, remaining: Vec<String>) -> Matches {
        let options = self
            .table
            .options
            .iter()
            .zip(std::mem::take(&mut self.options))
            .map(|(spec, result)| (spec.name.clone(), result))
            .collect();
        let positionals = self
            .table
            .positionals
            .iter()
            .zip(std::mem::take(&mut self.positionals))
            .map(|(spec, result)| (spec.name.clone(), result))
            .collect();

        Matches {
            options,
            positionals,
            remaining,
        }
    }
}
