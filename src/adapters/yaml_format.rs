// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML unmarshaller.

use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result};
use crate::ports::ConfigUnmarshaller;

/// Decodes YAML documents.
///
/// The document must be a mapping, or empty. Non-string keys are rendered to
/// strings, nulls become empty strings and tags are dropped.
///
/// # Examples
///
/// ```rust
/// use toolcfg::adapters::YamlUnmarshaller;
/// use toolcfg::domain::ConfigValue;
/// use toolcfg::ports::ConfigUnmarshaller;
///
/// let map = YamlUnmarshaller.unmarshal(b"cluster:\n  host: 127.0.0.1\n").unwrap();
/// assert_eq!(
///     ConfigValue::lookup(&map, "cluster", "host"),
///     Some(&ConfigValue::from("127.0.0.1"))
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlUnmarshaller;

impl YamlUnmarshaller {
    fn convert(value: serde_yaml::Value) -> ConfigValue {
        match value {
            serde_yaml::Value::Null => ConfigValue::String(String::new()),
            serde_yaml::Value::Bool(b) => ConfigValue::Boolean(b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ConfigValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    ConfigValue::Float(f)
                } else {
                    ConfigValue::String(n.to_string())
                }
            }
            serde_yaml::Value::String(s) => ConfigValue::String(s),
            serde_yaml::Value::Sequence(seq) => {
                ConfigValue::Array(seq.into_iter().map(Self::convert).collect())
            }
            serde_yaml::Value::Mapping(map) => ConfigValue::Table(Self::convert_mapping(map)),
            serde_yaml::Value::Tagged(tagged) => Self::convert(tagged.value),
        }
    }

    fn convert_mapping(map: serde_yaml::Mapping) -> ConfigMap {
        map.into_iter()
            .map(|(k, v)| (Self::key_string(k), Self::convert(v)))
            .collect()
    }

    fn key_string(key: serde_yaml::Value) -> String {
        match key {
            serde_yaml::Value::String(s) => s,
            other => Self::convert(other).to_string(),
        }
    }
}

impl ConfigUnmarshaller for YamlUnmarshaller {
    fn format(&self) -> &str {
        "yaml"
    }

    fn unmarshal(&self, data: &[u8]) -> Result<ConfigMap> {
        let value: serde_yaml::Value =
            serde_yaml::from_slice(data).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        match value {
            serde_yaml::Value::Null => Ok(ConfigMap::new()),
            serde_yaml::Value::Mapping(map) => Ok(Self::convert_mapping(map)),
            _ => Err(ConfigError::ParseError {
                message: "YAML document is not a mapping".to_string(),
                source: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_sections() {
        let yaml = b"
cluster:
  host: 1.1.1.1:3001
  port: 3000
  tls-enable: false
uda:
  store-file: default1.store
";
        let map = YamlUnmarshaller.unmarshal(yaml).unwrap();
        assert_eq!(
            ConfigValue::lookup(&map, "cluster", "host"),
            Some(&ConfigValue::from("1.1.1.1:3001"))
        );
        assert_eq!(
            ConfigValue::lookup(&map, "cluster", "port"),
            Some(&ConfigValue::Integer(3000))
        );
        assert_eq!(
            ConfigValue::lookup(&map, "cluster", "tls-enable"),
            Some(&ConfigValue::Boolean(false))
        );
        assert_eq!(
            ConfigValue::lookup(&map, "uda", "store-file"),
            Some(&ConfigValue::from("default1.store"))
        );
    }

    #[test]
    fn test_sequence_of_hosts() {
        let map = YamlUnmarshaller
            .unmarshal(b"cluster:\n  host:\n    - 1.1.1.1:3001\n    - 2.2.2.2:3002\n")
            .unwrap();
        let host = ConfigValue::lookup(&map, "cluster", "host").unwrap();
        assert_eq!(host.to_string(), "1.1.1.1:3001,2.2.2.2:3002");
    }

    #[test]
    fn test_non_string_keys_and_nulls() {
        let map = YamlUnmarshaller.unmarshal(b"1: one\nempty:\n").unwrap();
        assert_eq!(map["1"], ConfigValue::from("one"));
        assert_eq!(map["empty"], ConfigValue::from(""));
    }

    #[test]
    fn test_empty_document() {
        assert!(YamlUnmarshaller.unmarshal(b"").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_scalar_document() {
        let result = YamlUnmarshaller.unmarshal(b"hi");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_rejects_invalid_yaml() {
        assert!(YamlUnmarshaller.unmarshal(b"key: [unclosed").is_err());
    }
}
