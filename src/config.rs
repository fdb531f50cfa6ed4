//! Argument table types, defaults and validation for declargs.

use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

/// Long name of the always-available attribution option.
pub const ATTRIBUTION_NAME: &str = "declargs";
/// Long name of the built-in help option.
pub const HELP_NAME: &str = "help";
/// Short code of the built-in help option.
pub const HELP_SHORT: char = 'h';

const DEFAULT_SHORT_PREFIX: &str = "-";
const DEFAULT_LONG_PREFIX: &str = "--";
const DEFAULT_END_OF_OPTIONS: &str = "--";
const DEFAULT_TRUE_SYNONYMS: &[&str] = &["1", "true", "True", "TRUE", "y", "Y", "yes", "Yes", "YES"];
const DEFAULT_FALSE_SYNONYMS: &[&str] = &["0", "false", "False", "FALSE", "n", "N", "no", "No", "NO"];

/// Errors in an argument table that make it unusable for parsing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse JSON argument table: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("duplicate option name: {0}")]
    DuplicateOption(String),

    #[error("duplicate positional argument name: {0}")]
    DuplicatePositional(String),

    #[error("short option '{0}' is used by both '{1}' and '{2}'")]
    DuplicateShort(char, String, String),

    #[error("invalid short option '{0}' on '{1}': must be a single visible character")]
    InvalidShortOption(char, String),

    #[error("option name '{0}' is reserved")]
    ReservedName(String),

    #[error("short option '{0}' on '{1}' is reserved for help")]
    ReservedShort(char, String),

    #[error("field '{0}' cannot be used on positional argument '{1}'")]
    FieldOnPositional(String, String),

    #[error("min_positionals is {0}, but only {1} positional arguments are declared")]
    TooManyRequiredPositionals(usize, usize),

    #[error("short and long option prefixes are both '{0}'")]
    AmbiguousPrefixes(String),

    #[error("'choices' on argument '{0}' is empty: must have at least one valid value")]
    EmptyChoices(String),

    #[error("'choices' on argument '{0}' has duplicate value: {1}")]
    DuplicateChoice(String, String),

    #[error("'{0}' on argument '{1}' requires value_type '{2}'")]
    BoundsWithoutType(String, String, String),

    #[error("bounds on argument '{0}' have min greater than max")]
    InvertedBounds(String),

    #[error("'{0}' is listed as both a true and a false synonym")]
    AmbiguousSynonym(String),
}

/// Value type an argument is converted to after scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Raw string, no conversion
    #[default]
    String,
    /// Signed 64-bit integer
    Int,
    /// 64-bit float
    Float,
    /// Boolean, matched against the table's synonym lists
    Bool,
}

/// Accepted numeric range for an `int` or `float` argument.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Bounds<T> {
    /// Any representable value
    #[default]
    Unbounded,
    /// Inclusive `[min, max]`
    Between(T, T),
    /// A single accepted value
    Exactly(T),
}

impl<T: Copy + PartialOrd> Bounds<T> {
    /// The inclusive `(min, max)` pair, if any limit applies.
    pub fn limits(&self) -> Option<(T, T)> {
        match *self {
            Bounds::Unbounded => None,
            Bounds::Between(min, max) => Some((min, max)),
            Bounds::Exactly(v) => Some((v, v)),
        }
    }

    /// Whether `value` lies within these bounds.
    pub fn contains(&self, value: T) -> bool {
        match self.limits() {
            None => true,
            Some((min, max)) => min <= value && value <= max,
        }
    }

    fn is_inverted(&self) -> bool {
        matches!(self, Bounds::Between(min, max) if min > max)
    }

    fn is_bounded(&self) -> bool {
        !matches!(self, Bounds::Unbounded)
    }
}

/// Specification of a single option or positional argument.
#[derive(Debug, Clone, Deserialize)]
pub struct ArgSpec {
    /// Long name for options, display name for positionals
    pub name: String,
    /// Help text shown next to the argument
    pub help: Option<String>,
    /// Short option character (e.g., 'v' for -v); options only
    pub short: Option<char>,
    /// Whether the option must be given; options only
    #[serde(default)]
    pub required: bool,
    /// Whether the option is followed by a value
    #[serde(default)]
    pub needs_value: bool,
    /// Conversion applied to the raw value
    #[serde(default)]
    pub value_type: ValueType,
    /// Exact values the raw value must match
    pub choices: Option<Vec<String>>,
    #[serde(default)]
    pub int_bounds: Bounds<i64>,
    #[serde(default)]
    pub float_bounds: Bounds<f64>,
    /// Raw value used when the argument is not given
    pub default: Option<String>,
}

impl ArgSpec {
    /// Create a value-less specification with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
            short: None,
            required: false,
            needs_value: false,
            value_type: ValueType::String,
            choices: None,
            int_bounds: Bounds::Unbounded,
            float_bounds: Bounds::Unbounded,
            default: None,
        }
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn needs_value(mut self) -> Self {
        self.needs_value = true;
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn int_bounds(mut self, bounds: Bounds<i64>) -> Self {
        self.int_bounds = bounds;
        self
    }

    pub fn float_bounds(mut self, bounds: Bounds<f64>) -> Self {
        self.float_bounds = bounds;
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Whether the option consumes a value, taking type and choices into account.
    pub fn takes_value(&self) -> bool {
        self.needs_value || self.value_type != ValueType::String || self.choices.is_some()
    }
}

fn default_short_prefix() -> String {
    DEFAULT_SHORT_PREFIX.to_string()
}

fn default_long_prefix() -> String {
    DEFAULT_LONG_PREFIX.to_string()
}

fn default_end_of_options() -> String {
    DEFAULT_END_OF_OPTIONS.to_string()
}

fn default_true_synonyms() -> Vec<String> {
    DEFAULT_TRUE_SYNONYMS.iter().map(|s| s.to_string()).collect()
}

fn default_false_synonyms() -> Vec<String> {
    DEFAULT_FALSE_SYNONYMS.iter().map(|s| s.to_string()).collect()
}

/// Top-level argument table for a program.
#[derive(Debug, Clone, Deserialize)]
pub struct ArgTable {
    /// Fixed program name; when set, the first token is scanned like any other
    pub program_name: Option<String>,
    /// Text printed before the generated help
    pub description: Option<String>,
    /// Replaces the generated usage line
    pub usage: Option<String>,
    /// Text printed after the generated help
    pub epilog: Option<String>,
    /// Prefix of short options; empty disables short options
    #[serde(default = "default_short_prefix")]
    pub short_prefix: String,
    /// Prefix of long options; empty disables long options
    #[serde(default = "default_long_prefix")]
    pub long_prefix: String,
    /// Token after which every argument is positional; empty disables it
    #[serde(default = "default_end_of_options")]
    pub end_of_options: String,
    #[serde(default = "default_true_synonyms")]
    pub true_synonyms: Vec<String>,
    #[serde(default = "default_false_synonyms")]
    pub false_synonyms: Vec<String>,
    /// Disable the built-in --help / -h
    #[serde(default)]
    pub no_help: bool,
    /// Stop scanning once the last positional slot is filled
    #[serde(default)]
    pub stop_at_last_positional: bool,
    /// Allow a value-taking short option after flags in the same cluster
    #[serde(default)]
    pub group_values: bool,
    /// Minimum number of positional arguments
    #[serde(default)]
    pub min_positionals: usize,
    #[serde(default)]
    pub options: Vec<ArgSpec>,
    #[serde(default)]
    pub positionals: Vec<ArgSpec>,
}

impl Default for ArgTable {
    fn default() -> Self {
        Self {
            program_name: None,
            description: None,
            usage: None,
            epilog: None,
            short_prefix: default_short_prefix(),
            long_prefix: default_long_prefix(),
            end_of_options: default_end_of_options(),
            true_synonyms: default_true_synonyms(),
            false_synonyms: default_false_synonyms(),
            no_help: false,
            stop_at_last_positional: false,
            group_values: false,
            min_positionals: 0,
            options: Vec::new(),
            positionals: Vec::new(),
        }
    }
}

impl ArgTable {
    /// Parse a JSON string into an ArgTable.
    pub fn from_json(json: &str) -> Result<ArgTable, ConfigError> {
        let table: ArgTable = serde_json::from_str(json)?;
        Ok(table)
    }

    /// Check the table for caller mistakes the parser does not detect at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.short_prefix.is_empty() && self.short_prefix == self.long_prefix {
            return Err(ConfigError::AmbiguousPrefixes(self.short_prefix.clone()));
        }

        let mut names = HashSet::new();
        let mut shorts: Vec<(char, &str)> = Vec::new();

        for opt in &self.options {
            if !names.insert(opt.name.as_str()) {
                return Err(ConfigError::DuplicateOption(opt.name.clone()));
            }
            if opt.name == ATTRIBUTION_NAME || (!self.no_help && opt.name == HELP_NAME) {
                return Err(ConfigError::ReservedName(opt.name.clone()));
            }

            if let Some(short) = opt.short {
                if short.is_whitespace() || short.is_control() {
                    return Err(ConfigError::InvalidShortOption(short, opt.name.clone()));
                }
                if !self.no_help && short == HELP_SHORT {
                    return Err(ConfigError::ReservedShort(short, opt.name.clone()));
                }
                if let Some((_, other)) = shorts.iter().find(|(c, _)| *c == short) {
                    return Err(ConfigError::DuplicateShort(
                        short,
                        other.to_string(),
                        opt.name.clone(),
                    ));
                }
                shorts.push((short, &opt.name));
            }

            Self::validate_arg(opt)?;
        }

        let mut positional_names = HashSet::new();
        for pos in &self.positionals {
            if !positional_names.insert(pos.name.as_str()) {
                return Err(ConfigError::DuplicatePositional(pos.name.clone()));
            }
            if pos.short.is_some() {
                return Err(ConfigError::FieldOnPositional(
                    "short".to_string(),
                    pos.name.clone(),
                ));
            }
            if pos.required {
                return Err(ConfigError::FieldOnPositional(
                    "required".to_string(),
                    pos.name.clone(),
                ));
            }
            Self::validate_arg(pos)?;
        }

        if self.min_positionals > self.positionals.len() {
            return Err(ConfigError::TooManyRequiredPositionals(
                self.min_positionals,
                self.positionals.len(),
            ));
        }

        if let Some(both) = self
            .true_synonyms
            .iter()
            .find(|s| self.false_synonyms.contains(s))
        {
            return Err(ConfigError::AmbiguousSynonym(both.clone()));
        }

        Ok(())
    }

    /// Validate the value constraints of a single argument.
    fn validate_arg(arg: &ArgSpec) -> Result<(), ConfigError> {
        if let Some(ref choices) = arg.choices {
            if choices.is_empty() {
                return Err(ConfigError::EmptyChoices(arg.name.clone()));
            }

            let mut seen = HashSet::new();
            for choice in choices {
                if !seen.insert(choice) {
                    return Err(ConfigError::DuplicateChoice(
                        arg.name.clone(),
                        choice.clone(),
                    ));
                }
            }
        }

        if arg.int_bounds.is_bounded() && arg.value_type != ValueType::Int {
            return Err(ConfigError::BoundsWithoutType(
                "int_bounds".to_string(),
                arg.name.clone(),
                "int".to_string(),
            ));
        }
        if arg.float_bounds.is_bounded() && arg.value_type != ValueType::Float {
            return Err(ConfigError::BoundsWithoutType(
                "float_bounds".to_string(),
                arg.name.clone(),
                "float".to_string(),
            ));
        }
        if arg.int_bounds.is_inverted() || arg.float_bounds.is_inverted() {
            return Err(ConfigError::InvertedBounds(arg.name.clone()));
        }

        Ok(())
    }

    /// Program name shown in usage and error text.
    ///
    /// A configured `program_name` wins; otherwise the first token of `argv`.
    pub fn effective_program_name<'a>(&'a self, argv: &'a [String]) -> &'a str {
        self.program_name
            .as_deref()
            .or_else(|| argv.first().map(String::as_str))
            .unwrap_or("")
    }

    /// Tokens that are scanned, with the program name elided unless it is fixed.
    pub fn scanned_args<'a>(&self, argv: &'a [String]) -> &'a [String] {
        if self.program_name.is_some() || argv.is_empty() {
            argv
        } else {
            &argv[1..]
        }
    }

    /// Name of an option as written on the command line, e.g. `--output`.
    pub fn option_display_name(&self, spec: &ArgSpec) -> String {
        format!("{}{}", self.long_prefix, spec.name)
    }
}
