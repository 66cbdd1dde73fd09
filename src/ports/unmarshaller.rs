// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration unmarshaller trait definition.
//!
//! An unmarshaller turns raw configuration bytes into a [`ConfigMap`]. Loaders
//! try their unmarshallers in order and keep the first result, so the format of
//! a file never has to be declared up front.

use crate::domain::{ConfigMap, Result};

/// A decoder for one configuration format.
///
/// # Document Shape
///
/// Implementations return the top level of the document as a map. Nested tables
/// stay nested; they are the sections the scoped view filters on. An empty
/// document should decode to an empty map when the format allows it.
///
/// # Examples
///
/// ```rust
/// use toolcfg::ports::ConfigUnmarshaller;
/// use toolcfg::domain::{ConfigMap, Result};
///
/// struct Empty;
///
/// impl ConfigUnmarshaller for Empty {
///     fn format(&self) -> &str {
///         "empty"
///     }
///
///     fn unmarshal(&self, _data: &[u8]) -> Result<ConfigMap> {
///         Ok(ConfigMap::new())
///     }
/// }
///
/// assert!(Empty.unmarshal(b"").unwrap().is_empty());
/// ```
pub trait ConfigUnmarshaller: Send + Sync {
    /// Returns the format name, such as `toml` or `yaml`.
    fn format(&self) -> &str;

    /// Decodes `data` into a configuration map.
    fn unmarshal(&self, data: &[u8]) -> Result<ConfigMap>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigError, ConfigValue};

    // Accepts `key=value` lines only.
    struct KeyValue;

    impl ConfigUnmarshaller for KeyValue {
        fn format(&self) -> &str {
            "kv"
        }

        fn unmarshal(&self, data: &[u8]) -> Result<ConfigMap> {
            let text = std::str::from_utf8(data).map_err(|e| ConfigError::ParseError {
                message: "not utf-8".to_string(),
                source: Some(Box::new(e)),
            })?;
            let mut map = ConfigMap::new();
            for line in text.lines() {
                let (k, v) = line.split_once('=').ok_or_else(|| ConfigError::ParseError {
                    message: format!("bad line: {}", line),
                    source: None,
                })?;
                map.insert(k.to_string(), ConfigValue::from(v));
            }
            Ok(map)
        }
    }

    #[test]
    fn test_unmarshal() {
        let map = KeyValue.unmarshal(b"a=1\nb=2").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&ConfigValue::from("1")));
    }

    #[test]
    fn test_unmarshal_empty() {
        assert!(KeyValue.unmarshal(b"").unwrap().is_empty());
    }

    #[test]
    fn test_unmarshal_error() {
        assert!(KeyValue.unmarshal(b"nope").is_err());
    }
}
