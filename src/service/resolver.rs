// SPDX-License-Identifier: MIT OR Apache-2.0

//! Binding flags to configuration keys.
//!
//! A [`FlagResolver`] remembers which configuration section each flag belongs
//! to. Once the command line is parsed, [`FlagResolver::init_config`] loads the
//! configuration file and fills in every bound flag the user did not set, so
//! the precedence is command line, then configuration file, then the flag's
//! built-in default.

use crate::adapters::ConfigLocations;
use crate::domain::{ConfigKey, ConfigValue, Result};
use crate::flags::FlagSet;
use crate::service::config::Config;
use crate::service::loader::Loader;
use crate::service::scoped::{apply_values, filter_instance};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// The binding table and the default-file search it loads from.
///
/// # Examples
///
/// ```rust
/// use std::io::Write;
/// use toolcfg::flags::FlagSet;
/// use toolcfg::service::FlagResolver;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut file = tempfile::Builder::new().suffix(".conf").tempfile()?;
/// writeln!(file, "[cluster]\nuser = \"admin\"")?;
///
/// let mut flags = FlagSet::new("cluster");
/// flags.string("user", Some('U'), "", "User name")?;
///
/// let mut resolver = FlagResolver::new();
/// resolver.bind_flags(&flags, "cluster");
/// resolver.init_config(Some(file.path()), "", &mut flags)?;
/// assert_eq!(flags.get_string("user")?, "admin");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlagResolver {
    bindings: BTreeMap<String, ConfigKey>,
    locations: ConfigLocations,
}

impl FlagResolver {
    /// Creates a resolver with no bindings and the default search locations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver searching `locations` when no file is named.
    pub fn with_locations(locations: ConfigLocations) -> Self {
        FlagResolver {
            bindings: BTreeMap::new(),
            locations,
        }
    }

    /// Binds every flag of `flags` to `section.<flag name>`.
    ///
    /// An empty section binds flags to the section named by the instance, or to
    /// top-level keys when no instance is active. Binding a flag name again
    /// replaces its earlier binding.
    pub fn bind_flags(&mut self, flags: &FlagSet, section: &str) {
        for name in flags.names() {
            let key = ConfigKey::compose(section, &name);
            tracing::trace!("Binding flag '{}' to '{}'", name, key);
            self.bindings.insert(name, key);
        }
    }

    /// Returns the key bound to `flag`.
    pub fn binding(&self, flag: &str) -> Option<&ConfigKey> {
        self.bindings.get(flag)
    }

    /// Forgets every binding.
    pub fn reset(&mut self) {
        self.bindings.clear();
    }

    /// Loads the configuration and applies it to every bound flag of `flags`
    /// not set on the command line.
    ///
    /// `config_file` names the file to read; a missing file is an error. Without
    /// it the search locations are tried, and finding nothing leaves the flags
    /// alone. Returns the file that was read.
    ///
    /// All flags are attempted even when some reject their value; the last
    /// error is returned.
    pub fn init_config(
        &self,
        config_file: Option<&Path>,
        instance: &str,
        flags: &mut FlagSet,
    ) -> Result<Option<PathBuf>> {
        let path = match config_file {
            Some(path) => path.to_path_buf(),
            None => match self.locations.find() {
                Some(path) => path,
                None => {
                    tracing::debug!("No configuration file found, using flag defaults");
                    return Ok(None);
                }
            },
        };

        let mut config = Config::new(Loader::for_file(&path));
        let raw = config.get_config()?;
        let scoped = filter_instance(raw.clone(), instance);
        tracing::debug!("Using configuration file {}", path.display());

        apply_values(flags, |flag| {
            let key = self.bindings.get(flag)?;
            let value = match (key.section(), instance) {
                ("", "") => raw.get(key.name()),
                ("", instance) => ConfigValue::lookup(raw, instance, key.name()),
                (section, _) => ConfigValue::lookup(&scoped, section, key.name()),
            };
            value.cloned()
        })?;

        Ok(Some(path))
    }
}

static DEFAULT_RESOLVER: Lazy<Mutex<FlagResolver>> =
    Lazy::new(|| Mutex::new(FlagResolver::new()));

/// Runs `f` with the process-wide default resolver.
///
/// Meant for the outermost command-line entry point only; libraries and tests
/// should own a [`FlagResolver`].
pub fn with_default_resolver<R>(f: impl FnOnce(&mut FlagResolver) -> R) -> R {
    let mut resolver = DEFAULT_RESOLVER
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    f(&mut resolver)
}

/// Clears every binding of the default resolver.
pub fn reset_default_resolver() {
    with_default_resolver(FlagResolver::reset);
}
