// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line parsing for a [`FlagSet`].
//!
//! Every flag of the set becomes a `clap` argument with its long name and
//! optional short name. The accepted forms are:
//! - `--name=value` and `--name value`
//! - `-s value`
//! - `--bool-flag` alone, meaning `true`, or `--bool-flag=false`
//!
//! A flag may be repeated; each occurrence is applied in order, which is how
//! `-h a -h b` accumulates seed hosts. Applied values mark the flag as changed
//! so configuration files never override them.

use crate::domain::{ConfigError, Result};
use crate::flags::FlagSet;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, Command};
use std::ffi::OsString;

/// A `clap` command mirroring the flags of a [`FlagSet`].
///
/// # Examples
///
/// ```rust
/// use toolcfg::adapters::CommandLineAdapter;
/// use toolcfg::flags::FlagSet;
///
/// # fn main() -> toolcfg::domain::Result<()> {
/// let mut flags = FlagSet::new("tool");
/// flags.string("user", Some('U'), "", "User name")?;
/// flags.bool("verbose", None, false, "Verbose output")?;
///
/// let adapter = CommandLineAdapter::new(&flags);
/// adapter.parse(["-U", "admin", "--verbose"], &mut flags)?;
/// assert_eq!(flags.get_string("user")?, "admin");
/// assert!(flags.get_bool("verbose")?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CommandLineAdapter {
    command: Command,
}

impl CommandLineAdapter {
    /// Builds the command for every flag currently in `flags`.
    pub fn new(flags: &FlagSet) -> Self {
        let mut command = Command::new(flags.name().to_string())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true);

        for flag in flags.iter() {
            let mut arg = Arg::new(flag.name().to_string())
                .long(flag.name().to_string())
                .help(flag.usage().to_string())
                .value_name(flag.value().type_name())
                .action(ArgAction::Append);
            if let Some(short) = flag.short() {
                arg = arg.short(short);
            }
            arg = if flag.value().is_bool() {
                arg.num_args(0..=1)
                    .require_equals(true)
                    .default_missing_value("true")
            } else {
                arg.allow_hyphen_values(true)
            };
            command = command.arg(arg);
        }

        CommandLineAdapter { command }
    }

    /// Parses `args`, without the program name, and sets every flag given.
    ///
    /// Unknown flags, positional arguments and missing values are errors. A
    /// value a flag rejects stops parsing with that flag's error.
    pub fn parse<I, S>(&self, args: I, flags: &mut FlagSet) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .clone()
            .try_get_matches_from(args)
            .map_err(|e| ConfigError::FlagError {
                message: e.to_string().trim_end().to_string(),
                source: Some(Box::new(e)),
            })?;

        for name in flags.names() {
            if matches.value_source(&name) != Some(ValueSource::CommandLine) {
                continue;
            }
            let values: Vec<String> = matches
                .get_many::<String>(&name)
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            for value in values {
                tracing::trace!("Setting flag '{}' from the command line", name);
                flags.set(&name, &value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> FlagSet {
        let mut flags = FlagSet::new("test");
        flags.string("user", Some('U'), "default", "").unwrap();
        flags.int("port", Some('p'), 3000, "").unwrap();
        flags.bool("tls-enable", None, false, "").unwrap();
        flags.string("tls-protocols", None, "", "").unwrap();
        flags
    }

    fn parse(args: &[&str]) -> Result<FlagSet> {
        let mut flags = flags();
        CommandLineAdapter::new(&flags).parse(args.iter().copied(), &mut flags)?;
        Ok(flags)
    }

    #[test]
    fn test_long_forms() {
        let flags = parse(&["--user=alice", "--port", "3100"]).unwrap();
        assert_eq!(flags.get_string("user").unwrap(), "alice");
        assert_eq!(flags.get_int("port").unwrap(), 3100);
        assert!(flags.changed("user"));
        assert!(flags.changed("port"));
    }

    #[test]
    fn test_short_form() {
        let flags = parse(&["-U", "bob"]).unwrap();
        assert_eq!(flags.get_string("user").unwrap(), "bob");
        assert!(!flags.changed("port"));
    }

    #[test]
    fn test_bool_forms() {
        let flags = parse(&["--tls-enable"]).unwrap();
        assert!(flags.get_bool("tls-enable").unwrap());
        assert!(flags.changed("tls-enable"));

        let flags = parse(&["--tls-enable=false"]).unwrap();
        assert!(!flags.get_bool("tls-enable").unwrap());
        assert!(flags.changed("tls-enable"));
    }

    #[test]
    fn test_hyphenated_value() {
        let flags = parse(&["--tls-protocols", "-all +TLSv1.3"]).unwrap();
        assert_eq!(flags.get_string("tls-protocols").unwrap(), "-all +TLSv1.3");
    }

    #[test]
    fn test_repeated_flag_applies_each_value() {
        let flags = parse(&["-U", "first", "-U", "second"]).unwrap();
        assert_eq!(flags.get_string("user").unwrap(), "second");
    }

    #[test]
    fn test_nothing_given() {
        let flags = parse(&[]).unwrap();
        assert!(flags.names().iter().all(|name| !flags.changed(name)));
        assert_eq!(flags.get_string("user").unwrap(), "default");
    }

    #[test]
    fn test_unknown_flag() {
        assert!(matches!(
            parse(&["--nope", "x"]),
            Err(ConfigError::FlagError { .. })
        ));
    }

    #[test]
    fn test_invalid_value() {
        assert!(matches!(
            parse(&["--port", "abc"]),
            Err(ConfigError::InvalidFlagValue { .. })
        ));
    }
}
