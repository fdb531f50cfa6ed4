//! Per-argument results produced by a parse.

use serde::Serialize;
use std::collections::BTreeMap;

/// A converted argument value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// What the parser resolved for one argument specification.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArgResult {
    /// Whether the argument was given or defaulted
    pub specified: bool,
    /// Raw text, `""` for a flag that was given
    pub raw: Option<String>,
    /// Converted value for `int`, `float` and `bool` arguments
    pub value: Option<Value>,
}

impl ArgResult {
    pub(crate) fn record(&mut self, raw: &str) {
        self.specified = true;
        self.raw = Some(raw.to_string());
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.value {
            Some(Value::Int(v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.value {
            Some(Value::Float(v)) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Some(Value::Bool(v)) => Some(v),
            _ => None,
        }
    }
}

/// Resolved options and positional arguments, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Matches {
    pub(crate) options: BTreeMap<String, ArgResult>,
    pub(crate) positionals: BTreeMap<String, ArgResult>,
    pub(crate) remaining: Vec<String>,
}

impl Matches {
    pub fn option(&self, name: &str) -> Option<&ArgResult> {
        self.options.get(name)
    }

    pub fn positional(&self, name: &str) -> Option<&ArgResult> {
        self.positionals.get(name)
    }

    /// Whether the option was given on the command line or defaulted.
    pub fn is_present(&self, name: &str) -> bool {
        self.option(name).is_some_and(|r| r.specified)
    }

    pub fn options(&self) -> &BTreeMap<String, ArgResult> {
        &self.options
    }

    pub fn positionals(&self) -> &BTreeMap<String, ArgResult> {
        &self.positionals
    }

    /// Tokens left unscanned after the last positional slot was filled.
    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_marks_specified() {
        let mut result = ArgResult::default();
        assert!(!result.specified);
        assert_eq!(result.raw(), None);

        result.record("file.txt");
        assert!(result.specified);
        assert_eq!(result.raw(), Some("file.txt"));
    }

    #[test]
    fn test_typed_accessors() {
        let result = ArgResult {
            specified: true,
            raw: Some("0x10".to_string()),
            value: Some(Value::Int(16)),
        };
        assert_eq!(result.as_int(), Some(16));
        assert_eq!(result.as_float(), None);
        assert_eq!(result.as_bool(), None);
    }

    #[test]
    fn test_serialize_matches() {
        let mut matches = Matches::default();
        matches.options.insert(
            "depth".to_string(),
            ArgResult {
                specified: true,
                raw: Some("5".to_string()),
                value: Some(Value::Int(5)),
            },
        );
        matches.positionals.insert("root".to_string(), ArgResult::default());

        let json = serde_json::to_value(&matches).unwrap();
        assert_eq!(json["options"]["depth"]["value"], 5);
        assert_eq!(json["options"]["depth"]["raw"], "5");
        assert_eq!(json["positionals"]["root"]["specified"], false);
        assert!(json["positionals"]["root"]["raw"].is_null());
        assert!(json["remaining"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_is_present() {
        let mut matches = Matches::default();
        matches.options.insert("quiet".to_string(), ArgResult::default());
        let mut verbose = ArgResult::default();
        verbose.record("");
        matches.options.insert("verbose".to_string(), verbose);

        assert!(matches.is_present("verbose"));
        assert!(!matches.is_present("quiet"));
        assert!(!matches.is_present("missing"));
    }
}
