// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain string, integer and boolean flag values.

use crate::domain::config_value::parse_bool;
use crate::domain::{ConfigError, Result};
use crate::flags::FlagValue;
use std::any::Any;
use std::fmt;

/// A string flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringValue(String);

impl StringValue {
    /// Creates a value holding `default`.
    pub fn new(default: impl Into<String>) -> Self {
        StringValue(default.into())
    }

    /// The current value.
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl FlagValue for StringValue {
    fn set(&mut self, value: &str) -> Result<()> {
        self.0 = value.to_string();
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "string"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for StringValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A signed integer flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntValue(i64);

impl IntValue {
    /// Creates a value holding `default`.
    pub fn new(default: i64) -> Self {
        IntValue(default)
    }

    /// The current value.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl FlagValue for IntValue {
    fn set(&mut self, value: &str) -> Result<()> {
        self.0 = value
            .trim()
            .parse()
            .map_err(|e| ConfigError::from_parse_int_error(value, e))?;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "int"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for IntValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A boolean flag. May be given without a value on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolValue(bool);

impl BoolValue {
    /// Creates a value holding `default`.
    pub fn new(default: bool) -> Self {
        BoolValue(default)
    }

    /// The current value.
    pub fn get(&self) -> bool {
        self.0
    }
}

impl FlagValue for BoolValue {
    fn set(&mut self, value: &str) -> Result<()> {
        self.0 = parse_bool(value)?;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "bool"
    }

    fn is_bool(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for BoolValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string() {
        let mut value = StringValue::new("a");
        value.set("b").unwrap();
        assert_eq!(value.get(), "b");
        assert_eq!(value.to_string(), "b");
    }

    #[test]
    fn test_int() {
        let mut value = IntValue::new(1);
        value.set(" 42 ").unwrap();
        assert_eq!(value.get(), 42);
        assert!(value.set("4.2").is_err());
        assert_eq!(value.get(), 42);
    }

    #[test]
    fn test_bool() {
        let mut value = BoolValue::new(false);
        value.set("T").unwrap();
        assert!(value.get());
        value.set("0").unwrap();
        assert!(!value.get());
        assert!(value.set("maybe").is_err());
        assert!(value.is_bool());
    }
}
