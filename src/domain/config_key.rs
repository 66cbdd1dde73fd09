// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key newtype for dotted `section.name` keys.
//!
//! Flags are bound to configuration keys of the form `section.name`, where
//! `section` is a top-level table of the configuration file. A key without a dot
//! addresses a top-level entry directly.

use std::fmt;

/// A type-safe wrapper for dotted configuration keys.
///
/// # Examples
///
/// ```
/// use toolcfg::domain::config_key::ConfigKey;
///
/// let key = ConfigKey::from("cluster.host");
/// assert_eq!(key.section(), "cluster");
/// assert_eq!(key.name(), "host");
///
/// let key = ConfigKey::compose("", "host");
/// assert_eq!(key.as_str(), "host");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey` from a `String`.
    pub fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Builds a key from a section and a name. An empty section yields a bare name.
    pub fn compose(section: &str, name: &str) -> Self {
        if section.is_empty() {
            ConfigKey(name.to_string())
        } else {
            ConfigKey(format!("{}.{}", section, name))
        }
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the section part, which is empty for a top-level key.
    pub fn section(&self) -> &str {
        match self.0.split_once('.') {
            Some((section, _)) => section,
            None => "",
        }
    }

    /// Returns the name part, after the first dot.
    pub fn name(&self) -> &str {
        match self.0.split_once('.') {
            Some((_, name)) => name,
            None => &self.0,
        }
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey(s.to_string())
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
