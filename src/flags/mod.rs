// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed command-line flags.
//!
//! A [`FlagSet`] owns named flags. Each flag's value implements [`FlagValue`]
//! and parses its own strings, so the command line and the configuration file
//! go through the same setter. The set remembers which flags were given on the
//! command line; configuration values never override those.

pub mod auth_mode;
pub mod cluster;
pub mod host;
pub mod secret;
pub mod tls;
pub mod values;

pub use auth_mode::{AuthMode, AuthModeValue};
pub use cluster::{ClusterFlags, ConfFileFlags};
pub use host::HostListValue;
pub use secret::{CertPathValue, CertValue, PasswordValue};
pub use tls::TlsProtocolsValue;
pub use values::{BoolValue, IntValue, StringValue};

use crate::domain::{ConfigError, Result};
use std::any::Any;
use std::fmt;

/// The value behind a flag.
///
/// `Display` renders the current value; it is also used as the flag's default
/// when the flag is registered.
pub trait FlagValue: fmt::Display + Send + Sync + 'static {
    /// Parses `value` and stores it.
    fn set(&mut self, value: &str) -> Result<()>;

    /// A short type name for help and error messages.
    fn type_name(&self) -> &'static str;

    /// True for flags that may be given without a value.
    fn is_bool(&self) -> bool {
        false
    }

    /// Allows typed access through [`FlagSet::value`].
    fn as_any(&self) -> &dyn Any;
}

/// A registered flag.
pub struct Flag {
    name: String,
    short: Option<char>,
    usage: String,
    default: String,
    changed: bool,
    value: Box<dyn FlagValue>,
}

impl Flag {
    /// The long name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The single-character name, if any.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// The help text.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The value rendered at registration time.
    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// True once the flag was set from the command line.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// The current value.
    pub fn value(&self) -> &dyn FlagValue {
        self.value.as_ref()
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("short", &self.short)
            .field("type", &self.value.type_name())
            .field("changed", &self.changed)
            .finish()
    }
}

/// An ordered collection of flags.
///
/// # Examples
///
/// ```rust
/// use toolcfg::flags::FlagSet;
///
/// # fn main() -> toolcfg::domain::Result<()> {
/// let mut flags = FlagSet::new("demo");
/// flags.int("port", Some('p'), 3000, "Server port")?;
///
/// flags.set_from_config("port", "3001")?;
/// assert_eq!(flags.get_int("port")?, 3001);
/// assert!(!flags.changed("port"));
///
/// flags.set("port", "3002")?;
/// assert!(flags.changed("port"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct FlagSet {
    name: String,
    flags: Vec<Flag>,
}

impl FlagSet {
    /// Creates an empty set.
    pub fn new(name: impl Into<String>) -> Self {
        FlagSet {
            name: name.into(),
            flags: Vec::new(),
        }
    }

    /// The name of the set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a flag. Names and short names must be unique within the set.
    pub fn add(
        &mut self,
        name: &str,
        short: Option<char>,
        usage: &str,
        value: impl FlagValue,
    ) -> Result<()> {
        self.add_boxed(name, short, usage, Box::new(value))
    }

    fn add_boxed(
        &mut self,
        name: &str,
        short: Option<char>,
        usage: &str,
        value: Box<dyn FlagValue>,
    ) -> Result<()> {
        if self.lookup(name).is_some() {
            return Err(ConfigError::FlagError {
                message: format!("flag redefined: {}", name),
                source: None,
            });
        }
        if let Some(c) = short {
            if self.flags.iter().any(|f| f.short == Some(c)) {
                return Err(ConfigError::FlagError {
                    message: format!("shorthand -{} for flag {} is already used", c, name),
                    source: None,
                });
            }
        }

        self.flags.push(Flag {
            name: name.to_string(),
            short,
            usage: usage.to_string(),
            default: value.to_string(),
            changed: false,
            value,
        });
        Ok(())
    }

    /// Registers a string flag.
    pub fn string(&mut self, name: &str, short: Option<char>, default: &str, usage: &str) -> Result<()> {
        self.add(name, short, usage, StringValue::new(default))
    }

    /// Registers an integer flag.
    pub fn int(&mut self, name: &str, short: Option<char>, default: i64, usage: &str) -> Result<()> {
        self.add(name, short, usage, IntValue::new(default))
    }

    /// Registers a boolean flag.
    pub fn bool(&mut self, name: &str, short: Option<char>, default: bool, usage: &str) -> Result<()> {
        self.add(name, short, usage, BoolValue::new(default))
    }

    /// Moves every flag of `other` into this set.
    pub fn merge(&mut self, other: FlagSet) -> Result<()> {
        for flag in other.flags {
            self.add_boxed(&flag.name, flag.short, &flag.usage, flag.value)?;
        }
        Ok(())
    }

    /// Looks up a flag by long name.
    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name == name)
    }

    fn lookup_mut(&mut self, name: &str) -> Result<&mut Flag> {
        self.flags
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| ConfigError::ConfigKeyNotFound {
                key: name.to_string(),
            })
    }

    /// Iterates over the flags in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.iter()
    }

    /// The long names of every flag, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.flags.iter().map(|f| f.name.clone()).collect()
    }

    /// Sets a flag as if given on the command line.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let flag = self.lookup_mut(name)?;
        Self::apply(flag, value)?;
        flag.changed = true;
        Ok(())
    }

    /// Sets a flag from configuration. The flag does not count as changed.
    pub fn set_from_config(&mut self, name: &str, value: &str) -> Result<()> {
        let flag = self.lookup_mut(name)?;
        Self::apply(flag, value)
    }

    fn apply(flag: &mut Flag, value: &str) -> Result<()> {
        flag.value
            .set(value)
            .map_err(|e| ConfigError::InvalidFlagValue {
                flag: flag.name.clone(),
                value: value.to_string(),
                source: Box::new(e),
            })
    }

    /// True if the flag exists and was set from the command line.
    pub fn changed(&self, name: &str) -> bool {
        self.lookup(name).map_or(false, Flag::changed)
    }

    /// Returns the typed value of a flag.
    pub fn value<T: FlagValue>(&self, name: &str) -> Result<&T> {
        let flag = self.lookup(name).ok_or_else(|| ConfigError::ConfigKeyNotFound {
            key: name.to_string(),
        })?;
        flag.value
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| ConfigError::FlagError {
                message: format!(
                    "flag {} is of type {}, not the requested type",
                    name,
                    flag.value.type_name()
                ),
                source: None,
            })
    }

    /// Returns any flag's value rendered as a string.
    pub fn get_string(&self, name: &str) -> Result<String> {
        self.lookup(name)
            .map(|f| f.value.to_string())
            .ok_or_else(|| ConfigError::ConfigKeyNotFound {
                key: name.to_string(),
            })
    }

    /// Returns the value of an integer flag.
    pub fn get_int(&self, name: &str) -> Result<i64> {
        self.value::<IntValue>(name).map(IntValue::get)
    }

    /// Returns the value of a boolean flag.
    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.value::<BoolValue>(name).map(BoolValue::get)
    }

    /// Parses command-line arguments, without the program name, into the set.
    #[cfg(feature = "cli")]
    pub fn parse<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<std::ffi::OsString> + Clone,
    {
        let adapter = crate::adapters::CommandLineAdapter::new(self);
        adapter.parse(args, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FlagSet {
        let mut flags = FlagSet::new("sample");
        flags.string("user", Some('U'), "admin", "User").unwrap();
        flags.int("port", Some('p'), 3000, "Port").unwrap();
        flags.bool("tls-enable", None, false, "TLS").unwrap();
        flags
    }

    #[test]
    fn test_defaults() {
        let flags = sample();
        assert_eq!(flags.get_string("user").unwrap(), "admin");
        assert_eq!(flags.get_int("port").unwrap(), 3000);
        assert!(!flags.get_bool("tls-enable").unwrap());
        assert_eq!(flags.lookup("port").unwrap().default_value(), "3000");
        assert_eq!(flags.names(), vec!["user", "port", "tls-enable"]);
    }

    #[test]
    fn test_set_marks_changed() {
        let mut flags = sample();
        flags.set("port", "4000").unwrap();
        assert!(flags.changed("port"));
        assert_eq!(flags.get_int("port").unwrap(), 4000);
    }

    #[test]
    fn test_set_from_config_does_not_mark_changed() {
        let mut flags = sample();
        flags.set_from_config("user", "cfg").unwrap();
        assert!(!flags.changed("user"));
        assert_eq!(flags.get_string("user").unwrap(), "cfg");
    }

    #[test]
    fn test_invalid_value_is_wrapped() {
        let mut flags = sample();
        let err = flags.set("port", "abc").unwrap_err();
        match err {
            ConfigError::InvalidFlagValue { flag, value, .. } => {
                assert_eq!(flag, "port");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!flags.changed("port"));
        assert_eq!(flags.get_int("port").unwrap(), 3000);
    }

    #[test]
    fn test_unknown_flag() {
        let mut flags = sample();
        assert!(matches!(
            flags.set("nope", "x"),
            Err(ConfigError::ConfigKeyNotFound { .. })
        ));
        assert!(!flags.changed("nope"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut flags = sample();
        assert!(flags.string("user", None, "", "").is_err());
        assert!(flags.string("other", Some('U'), "", "").is_err());
    }

    #[test]
    fn test_wrong_type_access() {
        let flags = sample();
        assert!(matches!(
            flags.get_int("user"),
            Err(ConfigError::FlagError { .. })
        ));
    }

    #[test]
    fn test_merge() {
        let mut flags = sample();
        let mut more = FlagSet::new("more");
        more.string("instance", None, "", "").unwrap();
        flags.merge(more).unwrap();
        assert!(flags.lookup("instance").is_some());

        let mut clash = FlagSet::new("clash");
        clash.string("user", None, "", "").unwrap();
        assert!(flags.merge(clash).is_err());
    }
}
