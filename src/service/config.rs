// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cached configuration with explicit refresh and schema validation.

use crate::domain::{ConfigMap, Result};
use crate::service::loader::{ConfigLoader, LoadedConfig};
use std::path::Path;

/// A configuration document loaded once and kept until refreshed.
///
/// `load` does nothing after the first success. `refresh` forgets the cached
/// document so the next access reads and decodes everything again.
///
/// # Examples
///
/// ```rust
/// use toolcfg::service::{Config, Loader};
///
/// # fn main() -> toolcfg::domain::Result<()> {
/// let mut config = Config::new(Loader::for_bytes("[cluster]\nuser = \"admin\"\n"));
/// let data = config.get_config()?;
/// assert!(data.contains_key("cluster"));
/// # Ok(())
/// # }
/// ```
pub struct Config {
    loader: Box<dyn ConfigLoader>,
    loaded: Option<LoadedConfig>,
}

impl Config {
    /// Creates an unloaded configuration backed by `loader`.
    pub fn new(loader: impl ConfigLoader + 'static) -> Self {
        Config {
            loader: Box::new(loader),
            loaded: None,
        }
    }

    /// Creates an unloaded configuration backed by a boxed loader.
    pub fn from_boxed(loader: Box<dyn ConfigLoader>) -> Self {
        Config {
            loader,
            loaded: None,
        }
    }

    /// Loads the document unless it is already loaded.
    pub fn load(&mut self) -> Result<()> {
        if self.loaded.is_none() {
            self.loaded = Some(self.loader.load()?);
        }
        Ok(())
    }

    /// Forgets the cached document.
    pub fn refresh(&mut self) {
        self.loaded = None;
    }

    /// Returns true once a document is cached.
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Loads if needed and returns the document.
    pub fn get_config(&mut self) -> Result<&ConfigMap> {
        let loaded = match self.loaded.take() {
            Some(loaded) => loaded,
            None => self.loader.load()?,
        };
        Ok(&self.loaded.insert(loaded).data)
    }

    /// Returns the file the cached document came from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.loaded.as_ref().and_then(|l| l.origin.as_deref())
    }

    /// Returns the format of the cached document, if loaded.
    pub fn format(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.format.as_str())
    }

    /// Validates the document against every JSON Schema in `schemas`.
    ///
    /// Every violation of every schema is collected into a single
    /// [`SchemaViolation`](crate::domain::ConfigError::SchemaViolation).
    #[cfg(feature = "schema")]
    pub fn validate(&mut self, schemas: &[&str]) -> Result<()> {
        let data = self.get_config()?;
        crate::service::schema::validate(data, schemas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigError, ConfigValue};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl ConfigLoader for Counting {
        fn load(&self) -> Result<LoadedConfig> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ConfigError::SourceUnavailable { source: None });
            }
            let mut data = ConfigMap::new();
            data.insert("key".to_string(), ConfigValue::from("value"));
            Ok(LoadedConfig {
                data,
                origin: None,
                format: "mock".to_string(),
            })
        }
    }

    fn counting(fail: bool) -> (Config, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let config = Config::new(Counting {
            calls: calls.clone(),
            fail,
        });
        (config, calls)
    }

    #[test]
    fn test_load_is_idempotent() {
        let (mut config, calls) = counting(false);
        config.load().unwrap();
        config.load().unwrap();
        config.get_config().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(config.is_loaded());
        assert_eq!(config.format(), Some("mock"));
    }

    #[test]
    fn test_refresh_forces_reload() {
        let (mut config, calls) = counting(false);
        config.load().unwrap();
        config.refresh();
        assert!(!config.is_loaded());
        config.load().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let (mut config, calls) = counting(true);
        assert!(config.load().is_err());
        assert!(config.load().is_err());
        assert!(!config.is_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_get_config() {
        let (mut config, _) = counting(false);
        let data = config.get_config().unwrap();
        assert_eq!(data.get("key"), Some(&ConfigValue::from("value")));
        assert!(config.origin().is_none());
    }
}
