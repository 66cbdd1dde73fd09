// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value tree.
//!
//! This module provides the `ConfigValue` type, the format-independent
//! representation of a parsed configuration document. Format adapters convert
//! their own value types into this tree, and the flag merge engine renders
//! leaves back into strings for the flags' own setters.

use crate::domain::errors::{ConfigError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A parsed configuration document: top-level keys to values.
///
/// Top-level tables are the "sections" of a configuration file.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A single node of a parsed configuration document.
///
/// # Examples
///
/// ```
/// use toolcfg::domain::config_value::ConfigValue;
///
/// let value = ConfigValue::from(3000);
/// assert_eq!(value.to_string(), "3000");
/// assert_eq!(value.as_i64().unwrap(), 3000);
///
/// let hosts = ConfigValue::Array(vec!["a:3000".into(), "b:3000".into()]);
/// assert_eq!(hosts.to_string(), "a:3000,b:3000");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// A string scalar.
    String(String),
    /// An integer scalar.
    Integer(i64),
    /// A floating point scalar.
    Float(f64),
    /// A boolean scalar.
    Boolean(bool),
    /// An ordered list of values.
    Array(Vec<ConfigValue>),
    /// A nested table.
    Table(ConfigMap),
}

impl ConfigValue {
    /// Returns the string if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested table if this value is one.
    pub fn as_table(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Returns a mutable reference to the nested table if this value is one.
    pub fn as_table_mut(&mut self) -> Option<&mut ConfigMap> {
        match self {
            ConfigValue::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Returns true for tables.
    pub fn is_table(&self) -> bool {
        matches!(self, ConfigValue::Table(_))
    }

    /// Converts the value to a boolean.
    ///
    /// Strings are accepted case-insensitively as `true`/`false`, `t`/`f`,
    /// `yes`/`no`, `on`/`off` and `1`/`0`.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            ConfigValue::Boolean(b) => Ok(*b),
            ConfigValue::Integer(0) => Ok(false),
            ConfigValue::Integer(1) => Ok(true),
            other => parse_bool(&other.to_string()),
        }
    }

    /// Converts the value to an `i64`.
    pub fn as_i64(&self) -> Result<i64> {
        match self {
            ConfigValue::Integer(i) => Ok(*i),
            other => {
                let s = other.to_string();
                s.trim()
                    .parse::<i64>()
                    .map_err(|e| ConfigError::from_parse_int_error(s, e))
            }
        }
    }

    /// Converts the value to an `f64`.
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            ConfigValue::Float(f) => Ok(*f),
            ConfigValue::Integer(i) => Ok(*i as f64),
            other => {
                let s = other.to_string();
                s.trim()
                    .parse::<f64>()
                    .map_err(|e| ConfigError::from_parse_float_error(s, e))
            }
        }
    }

    /// Looks up `name` inside the table `section` of a map.
    pub fn lookup<'a>(map: &'a ConfigMap, section: &str, name: &str) -> Option<&'a ConfigValue> {
        map.get(section)?.as_table()?.get(name)
    }
}

/// Parses the boolean spellings accepted by flags and configuration values.
pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "t" | "yes" | "on" | "1" => Ok(true),
        "false" | "f" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::invalid_bool(s)),
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Integer(i)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Boolean(b)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(t: ConfigMap) -> Self {
        ConfigValue::Table(t)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) => write!(f, "{}", s),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Float(v) => write!(f, "{}", v),
            ConfigValue::Boolean(b) => write!(f, "{}", b),
            ConfigValue::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            ConfigValue::Table(t) => {
                write!(f, "{{")?;
                for (i, (k, v)) in t.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}
