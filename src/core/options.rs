//! Dynamic blueprint options.
//!
//! Blueprints declare named options with defaults (`build_vfs_win = false`,
//! `build_number = ""`); callers override them per invocation. Setting an
//! option a blueprint never declared is an error.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptionError {
    #[error("Unknown option: {0}")]
    Unknown(String),

    #[error("Invalid option assignment (expected key=value): {0}")]
    BadAssignment(String),

    #[error("Option {name} expects a boolean, got: {value}")]
    NotABool { name: String, value: String },
}

/// Value of a dynamic option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Flag(bool),
    Text(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(b) => write!(f, "{b}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Declared options with their current values.
#[derive(Debug, Clone, Default)]
pub struct Options {
    values: BTreeMap<String, OptionValue>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an option with its default value.
    pub fn register(&mut self, name: &str, default: OptionValue) {
        self.values.entry(name.to_string()).or_insert(default);
    }

    /// Declare a boolean option.
    pub fn register_flag(&mut self, name: &str, default: bool) {
        self.register(name, OptionValue::Flag(default));
    }

    /// Declare a string option.
    pub fn register_text(&mut self, name: &str, default: &str) {
        self.register(name, OptionValue::Text(default.to_string()));
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// True if the option is a flag set to true, or a non-empty text value.
    pub fn enabled(&self, name: &str) -> bool {
        match self.values.get(name) {
            Some(OptionValue::Flag(b)) => *b,
            Some(OptionValue::Text(s)) => !s.is_empty(),
            None => false,
        }
    }

    /// Text value of an option, empty string if unset or a flag.
    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(OptionValue::Text(s)) => s.as_str(),
            _ => "",
        }
    }

    /// Set a declared option, coercing to its declared type.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), OptionError> {
        let current = self
            .values
            .get(name)
            .ok_or_else(|| OptionError::Unknown(name.to_string()))?;

        let value = match current {
            OptionValue::Flag(_) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => OptionValue::Flag(true),
                "0" | "false" | "off" | "no" => OptionValue::Flag(false),
                _ => {
                    return Err(OptionError::NotABool {
                        name: name.to_string(),
                        value: raw.to_string(),
                    });
                }
            },
            OptionValue::Text(_) => OptionValue::Text(raw.to_string()),
        };
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Apply a `key=value` assignment as given on the command line.
    pub fn set_assignment(&mut self, assignment: &str) -> Result<(), OptionError> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| OptionError::BadAssignment(assignment.to_string()))?;
        self.set(key.trim(), value.trim())
    }

    /// Overlay values from `CRAFT_BP_OPT_<NAME>` environment variables.
    pub fn apply_env(&mut self) -> Result<(), OptionError> {
        let names: Vec<String> = self.values.keys().cloned().collect();
        for name in names {
            let var = format!("CRAFT_BP_OPT_{}", name.to_uppercase());
            if let Ok(raw) = std::env::var(&var) {
                self.set(&name, &raw)?;
            }
        }
        Ok(())
    }

    /// Iterate over declared options in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
