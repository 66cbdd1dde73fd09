// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration source chain.
//!
//! A [`Loader`] holds an ordered list of getters and an ordered list of
//! unmarshallers. Loading keeps the bytes of the first getter that succeeds and
//! the map of the first unmarshaller that accepts them.

use crate::adapters::{BytesGetter, FileGetter};
use crate::domain::{ConfigError, ConfigMap, Result};
use crate::ports::{ConfigGetter, ConfigUnmarshaller};
use std::path::{Path, PathBuf};

/// Something that can produce a configuration map.
///
/// [`Loader`] is the usual implementation. [`Config`](crate::service::Config)
/// only depends on this trait, which keeps it testable with counting mocks.
pub trait ConfigLoader: Send + Sync {
    /// Reads and decodes the configuration.
    fn load(&self) -> Result<LoadedConfig>;
}

/// The result of a successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    /// The decoded document.
    pub data: ConfigMap,
    /// The file the document came from, when the winning getter reads files.
    pub origin: Option<PathBuf>,
    /// The format of the winning unmarshaller.
    pub format: String,
}

/// An ordered getter chain followed by an ordered unmarshaller chain.
///
/// # Examples
///
/// ```rust
/// use toolcfg::adapters::{BytesGetter, FileGetter, TomlUnmarshaller, YamlUnmarshaller};
/// use toolcfg::service::{ConfigLoader, Loader};
///
/// let loader = Loader::new()
///     .with_getter(FileGetter::new("/nonexistent/tools.conf"))
///     .with_getter(BytesGetter::new("cluster:\n  user: admin\n"))
///     .with_unmarshaller(TomlUnmarshaller)
///     .with_unmarshaller(YamlUnmarshaller);
///
/// let loaded = loader.load().unwrap();
/// assert_eq!(loaded.format, "yaml");
/// ```
#[derive(Default)]
pub struct Loader {
    getters: Vec<Box<dyn ConfigGetter>>,
    unmarshallers: Vec<Box<dyn ConfigUnmarshaller>>,
}

impl Loader {
    /// Creates a loader with empty chains.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a getter to the chain.
    pub fn with_getter(mut self, getter: impl ConfigGetter + 'static) -> Self {
        self.getters.push(Box::new(getter));
        self
    }

    /// Appends an already boxed getter to the chain.
    pub fn with_boxed_getter(mut self, getter: Box<dyn ConfigGetter>) -> Self {
        self.getters.push(getter);
        self
    }

    /// Appends an unmarshaller to the chain.
    pub fn with_unmarshaller(mut self, unmarshaller: impl ConfigUnmarshaller + 'static) -> Self {
        self.unmarshallers.push(Box::new(unmarshaller));
        self
    }

    /// Appends an already boxed unmarshaller to the chain.
    pub fn with_boxed_unmarshaller(mut self, unmarshaller: Box<dyn ConfigUnmarshaller>) -> Self {
        self.unmarshallers.push(unmarshaller);
        self
    }

    /// Builds a loader for a single file.
    ///
    /// The unmarshaller order follows the extension: `.yaml` and `.yml` try YAML
    /// first, everything else (including `.conf`) tries TOML first.
    pub fn for_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::with_formats_for(path, Self::new().with_getter(FileGetter::new(path)))
    }

    /// Builds a loader reading `path`, falling back to `default` if `path` cannot
    /// be read. The unmarshaller order follows the extension of `path`.
    pub fn for_file_with_default<P: AsRef<Path>, D: AsRef<Path>>(path: P, default: D) -> Self {
        let path = path.as_ref();
        let loader = Self::new()
            .with_getter(FileGetter::new(path))
            .with_getter(FileGetter::new(default));
        Self::with_formats_for(path, loader)
    }

    /// Builds a loader over an in-memory document, trying TOML then YAML.
    pub fn for_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::new()
            .with_getter(BytesGetter::new(data))
            .with_default_formats(false)
    }

    fn with_formats_for(path: &Path, loader: Self) -> Self {
        let yaml_first = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        loader.with_default_formats(yaml_first)
    }

    #[allow(unused_mut)]
    fn with_default_formats(mut self, yaml_first: bool) -> Self {
        let mut formats: Vec<Box<dyn ConfigUnmarshaller>> = Vec::new();
        #[cfg(feature = "toml")]
        formats.push(Box::new(crate::adapters::TomlUnmarshaller));
        #[cfg(feature = "yaml")]
        {
            let yaml: Box<dyn ConfigUnmarshaller> = Box::new(crate::adapters::YamlUnmarshaller);
            if yaml_first {
                formats.insert(0, yaml);
            } else {
                formats.push(yaml);
            }
        }
        #[cfg(not(feature = "yaml"))]
        let _ = yaml_first;

        self.unmarshallers.extend(formats);
        self
    }

    fn get_bytes(&self) -> Result<(Vec<u8>, Option<PathBuf>)> {
        let mut last_error = None;
        for getter in &self.getters {
            match getter.get_bytes() {
                Ok(bytes) => {
                    tracing::debug!(
                        "Read {} bytes of configuration from '{}'",
                        bytes.len(),
                        getter.name()
                    );
                    return Ok((bytes, getter.origin().map(Path::to_path_buf)));
                }
                Err(e) => {
                    tracing::debug!("Configuration getter '{}' failed: {}", getter.name(), e);
                    last_error = Some(e);
                }
            }
        }
        Err(ConfigError::SourceUnavailable {
            source: last_error.map(Box::new),
        })
    }

    fn unmarshal(&self, data: &[u8]) -> Result<(ConfigMap, String)> {
        let mut last_error = None;
        for unmarshaller in &self.unmarshallers {
            match unmarshaller.unmarshal(data) {
                Ok(map) => return Ok((map, unmarshaller.format().to_string())),
                Err(e) => {
                    tracing::debug!(
                        "Configuration is not valid {}: {}",
                        unmarshaller.format(),
                        e
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(ConfigError::FormatUnrecognized {
            source: last_error.map(Box::new),
        })
    }
}

impl ConfigLoader for Loader {
    fn load(&self) -> Result<LoadedConfig> {
        let (bytes, origin) = self.get_bytes()?;
        let (data, format) = self.unmarshal(&bytes)?;
        Ok(LoadedConfig {
            data,
            origin,
            format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigValue;
    use std::io::Write;
    use tempfile::Builder;

    struct Failing(&'static str);

    impl ConfigGetter for Failing {
        fn name(&self) -> &str {
            self.0
        }

        fn get_bytes(&self) -> Result<Vec<u8>> {
            Err(ConfigError::SourceError {
                source_name: self.0.to_string(),
                message: "unavailable".to_string(),
                source: None,
            })
        }
    }

    struct Rejecting;

    impl ConfigUnmarshaller for Rejecting {
        fn format(&self) -> &str {
            "rejecting"
        }

        fn unmarshal(&self, _data: &[u8]) -> Result<ConfigMap> {
            Err(ConfigError::ParseError {
                message: "rejected".to_string(),
                source: None,
            })
        }
    }

    #[test]
    fn test_no_getters() {
        let err = Loader::new().load().unwrap_err();
        assert!(matches!(err, ConfigError::SourceUnavailable { source: None }));
    }

    #[test]
    fn test_all_getters_fail_wraps_last() {
        let err = Loader::new()
            .with_getter(Failing("first"))
            .with_getter(Failing("second"))
            .load()
            .unwrap_err();
        match err {
            ConfigError::SourceUnavailable { source: Some(last) } => {
                assert!(last.to_string().contains("second"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_all_unmarshallers_fail() {
        let err = Loader::new()
            .with_getter(BytesGetter::new("x"))
            .with_unmarshaller(Rejecting)
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FormatUnrecognized { source: Some(_) }));
    }

    #[test]
    fn test_no_unmarshallers() {
        let err = Loader::new()
            .with_getter(BytesGetter::new("x"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FormatUnrecognized { source: None }));
    }

    #[test]
    #[cfg(all(feature = "toml", feature = "yaml"))]
    fn test_for_bytes_detects_format() {
        let loaded = Loader::for_bytes("[cluster]\nport = 3000\n").load().unwrap();
        assert_eq!(loaded.format, "toml");
        assert_eq!(
            ConfigValue::lookup(&loaded.data, "cluster", "port"),
            Some(&ConfigValue::Integer(3000))
        );

        let loaded = Loader::for_bytes("cluster:\n  port: 3000\n").load().unwrap();
        assert_eq!(loaded.format, "yaml");
    }

    #[test]
    #[cfg(all(feature = "toml", feature = "yaml"))]
    fn test_for_bytes_empty_document() {
        let loaded = Loader::for_bytes("").load().unwrap();
        assert!(loaded.data.is_empty());
        assert_eq!(loaded.format, "toml");
    }

    #[test]
    #[cfg(all(feature = "toml", feature = "yaml"))]
    fn test_for_file_reports_origin() {
        let mut file = Builder::new().suffix(".conf").tempfile().unwrap();
        writeln!(file, "[cluster]\nuser = \"admin\"").unwrap();

        let loaded = Loader::for_file(file.path()).load().unwrap();
        assert_eq!(loaded.origin.as_deref(), Some(file.path()));
        assert_eq!(loaded.format, "toml");
    }

    #[test]
    #[cfg(all(feature = "toml", feature = "yaml"))]
    fn test_yaml_extension_tries_yaml_first() {
        // Valid in both formats; the extension decides.
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "").unwrap();

        let loaded = Loader::for_file(file.path()).load().unwrap();
        assert_eq!(loaded.format, "yaml");
    }

    #[test]
    #[cfg(feature = "toml")]
    fn test_for_file_with_default_falls_back() {
        let mut default = Builder::new().suffix(".conf").tempfile().unwrap();
        writeln!(default, "[uda]\nagent-port = 8001").unwrap();

        let loaded = Loader::for_file_with_default("/nonexistent/tools.conf", default.path())
            .load()
            .unwrap();
        assert_eq!(loaded.origin.as_deref(), Some(default.path()));
        assert_eq!(
            ConfigValue::lookup(&loaded.data, "uda", "agent-port"),
            Some(&ConfigValue::Integer(8001))
        );
    }
}
