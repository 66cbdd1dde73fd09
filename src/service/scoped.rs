// SPDX-License-Identifier: MIT OR Apache-2.0

//! Instance and section scoping of a configuration document.
//!
//! One file can describe several deployments. A section called `cluster_prod`
//! overrides `cluster` when the tools run with instance `prod`:
//!
//! ```toml
//! [cluster]
//! host = "127.0.0.1:3000"
//!
//! [cluster_prod]
//! host = "10.0.0.1:3000"
//! ```
//!
//! With an instance selected, every section without the `_<instance>` suffix is
//! dropped and the suffix is stripped from the rest. A section allow-list can
//! then narrow the document further.

use crate::domain::{ConfigMap, ConfigValue, Result};
use crate::flags::FlagSet;
use crate::service::config::Config;
use crate::service::loader::ConfigLoader;

/// Keeps only the sections of `instance`, renamed to their base names.
///
/// An empty instance leaves the map untouched.
pub fn filter_instance(raw: ConfigMap, instance: &str) -> ConfigMap {
    if instance.is_empty() {
        return raw;
    }

    let suffix = format!("_{}", instance);
    raw.into_iter()
        .filter_map(|(name, value)| {
            name.strip_suffix(&suffix)
                .map(|base| (base.to_string(), value))
        })
        .collect()
}

/// Keeps only the named sections. An empty list keeps everything.
pub fn filter_sections(raw: ConfigMap, sections: &[String]) -> ConfigMap {
    if sections.is_empty() {
        return raw;
    }

    raw.into_iter()
        .filter(|(name, _)| sections.contains(name))
        .collect()
}

/// Applies the instance filter and then the section filter.
///
/// The map is consumed; reload or clone it to scope it differently.
///
/// # Examples
///
/// ```
/// use toolcfg::domain::{ConfigMap, ConfigValue};
/// use toolcfg::service::scope;
///
/// let mut a = ConfigMap::new();
/// a.insert("host".to_string(), "a".into());
/// let mut b = ConfigMap::new();
/// b.insert("host".to_string(), "b".into());
///
/// let mut raw = ConfigMap::new();
/// raw.insert("cluster".to_string(), a.into());
/// raw.insert("cluster_x".to_string(), b.clone().into());
///
/// let scoped = scope(raw, "x", &[]);
/// assert_eq!(scoped.len(), 1);
/// assert_eq!(scoped["cluster"], ConfigValue::Table(b));
/// ```
pub fn scope(raw: ConfigMap, instance: &str, sections: &[String]) -> ConfigMap {
    filter_sections(filter_instance(raw, instance), sections)
}

/// A configuration document seen through an instance and a section list.
///
/// The raw document is loaded once through [`Config`]. The scoped view is
/// recomputed from it whenever the instance or the section list changes, and
/// after every reload.
///
/// # Examples
///
/// ```rust
/// use toolcfg::service::{Loader, ToolsConfig};
///
/// # fn main() -> toolcfg::domain::Result<()> {
/// let toml = "[cluster]\nuser = \"a\"\n[cluster_prod]\nuser = \"b\"\n";
/// let mut config = ToolsConfig::new(Loader::for_bytes(toml), "prod", vec![]);
/// let scoped = config.get_config()?;
/// assert_eq!(scoped["cluster"].as_table().unwrap()["user"].to_string(), "b");
/// # Ok(())
/// # }
/// ```
pub struct ToolsConfig {
    config: Config,
    instance: String,
    sections: Vec<String>,
    scoped: Option<ConfigMap>,
}

impl ToolsConfig {
    /// Creates an unloaded view over `loader`.
    pub fn new(
        loader: impl ConfigLoader + 'static,
        instance: impl Into<String>,
        sections: Vec<String>,
    ) -> Self {
        Self::from_config(Config::new(loader), instance, sections)
    }

    /// Creates a view over an existing [`Config`].
    pub fn from_config(config: Config, instance: impl Into<String>, sections: Vec<String>) -> Self {
        ToolsConfig {
            config,
            instance: instance.into(),
            sections,
            scoped: None,
        }
    }

    /// Returns the active instance.
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Returns the configured section list.
    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    /// Changes the instance. The view is recomputed on next access.
    pub fn set_instance(&mut self, instance: impl Into<String>) {
        self.instance = instance.into();
        self.scoped = None;
    }

    /// Changes the section list. The view is recomputed on next access.
    pub fn set_sections(&mut self, sections: Vec<String>) {
        self.sections = sections;
        self.scoped = None;
    }

    /// Loads the document and computes the view, unless both are cached.
    pub fn load(&mut self) -> Result<()> {
        self.get_config().map(|_| ())
    }

    /// Forgets the document and the view.
    pub fn refresh(&mut self) {
        self.config.refresh();
        self.scoped = None;
    }

    /// Returns true once the view is computed.
    pub fn is_loaded(&self) -> bool {
        self.scoped.is_some() && self.config.is_loaded()
    }

    /// Returns the scoped view, loading it if needed.
    pub fn get_config(&mut self) -> Result<&ConfigMap> {
        let scoped = match self.scoped.take() {
            Some(scoped) if self.config.is_loaded() => scoped,
            _ => {
                let raw = self.config.get_config()?.clone();
                scope(raw, &self.instance, &self.sections)
            }
        };
        Ok(self.scoped.insert(scoped))
    }

    /// Returns the underlying unscoped configuration.
    pub fn raw(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Writes configuration values into the flags of `flags`.
    ///
    /// The sections to read are `sections`, else the configured section list,
    /// else every top-level section of the view. They are merged in order, later
    /// sections overriding earlier ones on name collisions, and non-table
    /// entries are skipped. Each flag whose name appears in the merged table and
    /// that was not set on the command line is set from the configuration value.
    ///
    /// Every flag is attempted. The last error, if any, is returned.
    pub fn set_flags(&mut self, sections: &[String], flags: &mut FlagSet) -> Result<()> {
        let configured = self.sections.clone();
        let scoped = self.get_config()?;

        let names: Vec<String> = if !sections.is_empty() {
            sections.to_vec()
        } else if !configured.is_empty() {
            configured
        } else {
            scoped.keys().cloned().collect()
        };

        let mut merged = ConfigMap::new();
        for name in &names {
            match scoped.get(name).and_then(ConfigValue::as_table) {
                Some(table) => merged.extend(table.iter().map(|(k, v)| (k.clone(), v.clone()))),
                None => tracing::trace!("Skipping section '{}': not a table", name),
            }
        }

        apply_values(flags, |flag| merged.get(flag).cloned())
    }

    /// Validates the unscoped document against every schema in `schemas`.
    #[cfg(feature = "schema")]
    pub fn validate_config(&mut self, schemas: &[&str]) -> Result<()> {
        self.config.validate(schemas)
    }
}

/// Sets every flag not changed on the command line to the value `lookup`
/// returns for its name. Returns the last setter error.
pub(crate) fn apply_values<F>(flags: &mut FlagSet, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<ConfigValue>,
{
    let mut last_error = None;
    for name in flags.names() {
        if flags.changed(&name) {
            continue;
        }
        let Some(value) = lookup(&name) else {
            continue;
        };
        if let Err(e) = flags.set_from_config(&name, &value.to_string()) {
            tracing::debug!("Failed to apply configuration to flag '{}': {}", name, e);
            last_error = Some(e);
        }
    }
    last_error.map_or(Ok(()), Err)
}
