// SPDX-License-Identifier: MIT OR Apache-2.0

//! TOML unmarshaller.

use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result};
use crate::ports::ConfigUnmarshaller;

/// Decodes TOML documents.
///
/// Datetimes are kept as their TOML text.
///
/// # Examples
///
/// ```rust
/// use toolcfg::adapters::TomlUnmarshaller;
/// use toolcfg::domain::ConfigValue;
/// use toolcfg::ports::ConfigUnmarshaller;
///
/// let map = TomlUnmarshaller.unmarshal(b"[cluster]\nport = 3000\n").unwrap();
/// assert_eq!(
///     ConfigValue::lookup(&map, "cluster", "port"),
///     Some(&ConfigValue::Integer(3000))
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlUnmarshaller;

impl TomlUnmarshaller {
    fn convert(value: toml::Value) -> ConfigValue {
        match value {
            toml::Value::String(s) => ConfigValue::String(s),
            toml::Value::Integer(i) => ConfigValue::Integer(i),
            toml::Value::Float(f) => ConfigValue::Float(f),
            toml::Value::Boolean(b) => ConfigValue::Boolean(b),
            toml::Value::Datetime(d) => ConfigValue::String(d.to_string()),
            toml::Value::Array(items) => {
                ConfigValue::Array(items.into_iter().map(Self::convert).collect())
            }
            toml::Value::Table(table) => ConfigValue::Table(Self::convert_table(table)),
        }
    }

    fn convert_table(table: toml::Table) -> ConfigMap {
        table
            .into_iter()
            .map(|(k, v)| (k, Self::convert(v)))
            .collect()
    }
}

impl ConfigUnmarshaller for TomlUnmarshaller {
    fn format(&self) -> &str {
        "toml"
    }

    fn unmarshal(&self, data: &[u8]) -> Result<ConfigMap> {
        let content = std::str::from_utf8(data).map_err(|e| ConfigError::ParseError {
            message: "TOML document is not valid UTF-8".to_string(),
            source: Some(Box::new(e)),
        })?;

        let table: toml::Table = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse TOML: {}", e),
            source: Some(Box::new(e)),
        })?;

        Ok(Self::convert_table(table))
    }
}
