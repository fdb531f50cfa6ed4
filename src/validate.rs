//! Post-scan defaults, requiredness, allowed values and type conversion.

use crate::config::{ArgSpec, ArgTable, ValueType};
use crate::hooks::{Hooks, ResolveHook};
use crate::matches::{ArgResult, Value};
use crate::parser::ParseError;
use std::collections::HashMap;
use std::num::IntErrorKind;
use tracing::debug;

/// Resolve every option, then every positional argument, in declaration order.
///
/// Stops at the first failure.
pub(crate) fn resolve(
    table: &ArgTable,
    hooks: &mut Hooks<'_>,
    options: &mut [ArgResult],
    positionals: &mut [ArgResult],
) -> Result<(), ParseError> {
    for name in hooks.options.keys() {
        if !table.options.iter().any(|o| &o.name == name) {
            debug!(option = %name, "hook registered for an undeclared option is never called");
        }
    }
    for name in hooks.positionals.keys() {
        if !table.positionals.iter().any(|p| &p.name == name) {
            debug!(positional = %name, "hook registered for an undeclared positional is never called");
        }
    }

    for (spec, result) in table.options.iter().zip(options.iter_mut()) {
        let name = table.option_display_name(spec);
        resolve_one(table, spec, result, &name, spec.takes_value(), &mut hooks.options)?;
    }

    // Positionals always carry a value and are reported without a prefix.
    for (spec, result) in table.positionals.iter().zip(positionals.iter_mut()) {
        resolve_one(table, spec, result, &spec.name, true, &mut hooks.positionals)?;
    }

    Ok(())
}

fn resolve_one(
    table: &ArgTable,
    spec: &ArgSpec,
    result: &mut ArgResult,
    name: &str,
    takes_value: bool,
    hooks: &mut HashMap<String, ResolveHook<'_>>,
) -> Result<(), ParseError> {
    if !result.specified {
        match spec.default {
            Some(ref default) if takes_value => {
                debug!(argument = name, default = %default, "applied default");
                result.record(default);
            }
            _ if spec.required => return Err(ParseError::MissingRequired(name.to_string())),
            _ => return Ok(()),
        }
    }

    if takes_value {
        let raw = result.raw.as_deref().unwrap_or_default();
        check_choices(spec, name, raw)?;
        result.value = convert(table, spec, name, raw)?;
    }

    if let Some(hook) = hooks.get_mut(&spec.name) {
        hook(spec, &*result).map_err(ParseError::Rejected)?;
    }

    Ok(())
}

fn check_choices(spec: &ArgSpec, name: &str, raw: &str) -> Result<(), ParseError> {
    match spec.choices {
        Some(ref choices) if !choices.iter().any(|c| c == raw) => Err(ParseError::NotAllowed {
            name: name.to_string(),
            value: raw.to_string(),
            allowed: choices.join(" "),
        }),
        _ => Ok(()),
    }
}

fn convert(
    table: &ArgTable,
    spec: &ArgSpec,
    name: &str,
    raw: &str,
) -> Result<Option<Value>, ParseError> {
    let value = match spec.value_type {
        ValueType::String => return Ok(None),
        ValueType::Int => Value::Int(convert_int(spec, name, raw)?),
        ValueType::Float => Value::Float(convert_float(spec, name, raw)?),
        ValueType::Bool => Value::Bool(convert_bool(table, name, raw)?),
    };
    debug!(argument = name, ?value, "converted value");
    Ok(Some(value))
}

fn convert_int(spec: &ArgSpec, name: &str, raw: &str) -> Result<i64, ParseError> {
    let (min, max) = spec.int_bounds.limits().unwrap_or((i64::MIN, i64::MAX));
    let out_of_range = || ParseError::IntOutOfRange {
        name: name.to_string(),
        value: raw.to_string(),
        min,
        max,
    };

    match parse_int_literal(raw) {
        Ok(value) if spec.int_bounds.contains(value) => Ok(value),
        Ok(_) => Err(out_of_range()),
        Err(IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => Err(out_of_range()),
        Err(_) => Err(ParseError::NotAnInteger {
            name: name.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Parse the integer literal at the start of `raw`, C-style.
///
/// Reads leading whitespace, an optional sign, then `0x`/`0X` hex digits,
/// `0`-prefixed octal digits or decimal digits, and ignores whatever follows.
/// Fails with `InvalidDigit` when no digit is read.
pub fn parse_int_literal(raw: &str) -> Result<i64, IntErrorKind> {
    let s = raw.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    // "0x" without a hex digit after it reads as a plain 0.
    let (radix, digits) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) if hex.starts_with(|c: char| c.is_ascii_hexdigit()) => (16, hex),
        _ if s.starts_with('0') => (8, s),
        _ => (10, s),
    };

    let mut read = 0;
    let mut value = Some(0i64);
    for digit in digits.chars().map_while(|c| c.to_digit(radix)) {
        read += 1;
        // Accumulate toward the sign so i64::MIN is reachable.
        value = value
            .and_then(|v| v.checked_mul(i64::from(radix)))
            .and_then(|v| {
                if negative {
                    v.checked_sub(i64::from(digit))
                } else {
                    v.checked_add(i64::from(digit))
                }
            });
    }

    match value {
        _ if read == 0 => Err(IntErrorKind::InvalidDigit),
        Some(value) => Ok(value),
        None if negative => Err(IntErrorKind::NegOverflow),
        None => Err(IntErrorKind::PosOverflow),
    }
}

/// Parse the longest prefix of `raw` (after leading whitespace) that is a float.
fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    s.char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .rev()
        .find_map(|end| s[..end].parse().ok())
}

fn convert_float(spec: &ArgSpec, name: &str, raw: &str) -> Result<f64, ParseError> {
    let value = parse_float_prefix(raw).ok_or_else(|| ParseError::NotANumber {
        name: name.to_string(),
        value: raw.to_string(),
    })?;

    match spec.float_bounds.limits() {
        Some((min, max)) if !spec.float_bounds.contains(value) => {
            Err(ParseError::FloatOutOfRange {
                name: name.to_string(),
                value: raw.to_string(),
                min,
                max,
            })
        }
        _ => Ok(value),
    }
}

fn convert_bool(table: &ArgTable, name: &str, raw: &str) -> Result<bool, ParseError> {
    if table.true_synonyms.iter().any(|s| s == raw) {
        Ok(true)
    } else if table.false_synonyms.iter().any(|s| s == raw) {
        Ok(false)
    } else {
        Err(ParseError::NotABoolean {
            name: name.to_string(),
            value: raw.to_string(),
            accepted: format!(
                "{} {}",
                table.true_synonyms.join(" "),
                table.false_synonyms.join(" ")
            ),
        })
    }
}
