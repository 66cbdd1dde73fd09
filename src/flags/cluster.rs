// SPDX-License-Identifier: MIT OR Apache-2.0

//! The flag sets shared by every tool.

use crate::domain::endpoint::DEFAULT_PORT;
use crate::domain::Result;
use crate::flags::{
    AuthModeValue, CertPathValue, CertValue, FlagSet, HostListValue, PasswordValue,
    TlsProtocolsValue,
};
use std::path::PathBuf;

/// Names of the cluster connection flags.
pub struct ClusterFlags;

impl ClusterFlags {
    /// Configuration section the cluster flags are read from.
    pub const SECTION: &'static str = "cluster";

    /// Seed hosts.
    pub const HOST: &'static str = "host";
    /// Default seed port.
    pub const PORT: &'static str = "port";
    /// User name.
    pub const USER: &'static str = "user";
    /// Password, resolved through secret references.
    pub const PASSWORD: &'static str = "password";
    /// Authentication mode.
    pub const AUTH: &'static str = "auth";
    /// Enables TLS.
    pub const TLS_ENABLE: &'static str = "tls-enable";
    /// Default TLS name for seeds.
    pub const TLS_NAME: &'static str = "tls-name";
    /// Allowed TLS protocol versions.
    pub const TLS_PROTOCOLS: &'static str = "tls-protocols";
    /// CA certificate.
    pub const TLS_CAFILE: &'static str = "tls-cafile";
    /// Directory of CA certificates.
    pub const TLS_CAPATH: &'static str = "tls-capath";
    /// Client certificate.
    pub const TLS_CERTFILE: &'static str = "tls-certfile";
    /// Client private key.
    pub const TLS_KEYFILE: &'static str = "tls-keyfile";
    /// Passphrase of the client key.
    pub const TLS_KEYFILE_PASSWORD: &'static str = "tls-keyfile-password";

    /// Builds a set holding every cluster connection flag at its default.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toolcfg::flags::ClusterFlags;
    ///
    /// let flags = ClusterFlags::flag_set().unwrap();
    /// assert_eq!(flags.get_string("host").unwrap(), "127.0.0.1:3000");
    /// assert_eq!(flags.get_int("port").unwrap(), 3000);
    /// ```
    pub fn flag_set() -> Result<FlagSet> {
        let mut flags = FlagSet::new(Self::SECTION);
        flags.add(
            Self::HOST,
            Some('h'),
            "The database seed hosts, as a comma separated list of host[:tls-name][:port].\n\
             IPv6 addresses must be enclosed in square brackets.",
            HostListValue::default(),
        )?;
        flags.int(
            Self::PORT,
            Some('p'),
            i64::from(DEFAULT_PORT),
            "The default port for seed hosts without one.",
        )?;
        flags.string(Self::USER, Some('U'), "", "The database user.")?;
        flags.add(
            Self::PASSWORD,
            Some('P'),
            "The database password.",
            PasswordValue::new(),
        )?;
        flags.add(
            Self::AUTH,
            None,
            "The authentication mode used by the server.",
            AuthModeValue::default(),
        )?;
        flags.bool(Self::TLS_ENABLE, None, false, "Enable TLS.")?;
        flags.string(
            Self::TLS_NAME,
            None,
            "",
            "The server TLS name, used for seed hosts without one.",
        )?;
        flags.add(
            Self::TLS_PROTOCOLS,
            None,
            "The TLS protocol selection, e.g. \"-all +TLSv1.2 +TLSv1.3\".",
            TlsProtocolsValue::new(),
        )?;
        flags.add(
            Self::TLS_CAFILE,
            None,
            "The CA used when connecting to the database.",
            CertValue::new(),
        )?;
        flags.add(
            Self::TLS_CAPATH,
            None,
            "A directory of CA certificates used when connecting to the database.",
            CertPathValue::new(),
        )?;
        flags.add(
            Self::TLS_CERTFILE,
            None,
            "The certificate used for mutual TLS.",
            CertValue::new(),
        )?;
        flags.add(
            Self::TLS_KEYFILE,
            None,
            "The key used for mutual TLS.",
            CertValue::new(),
        )?;
        flags.add(
            Self::TLS_KEYFILE_PASSWORD,
            None,
            "The password used to decrypt the key file if encrypted.",
            PasswordValue::new(),
        )?;
        Ok(flags)
    }
}

/// Names of the flags selecting the configuration file.
pub struct ConfFileFlags;

impl ConfFileFlags {
    /// Configuration file path.
    pub const CONFIG_FILE: &'static str = "config-file";
    /// Instance suffix.
    pub const INSTANCE: &'static str = "instance";

    /// Builds a set holding `config-file` and `instance`.
    pub fn flag_set() -> Result<FlagSet> {
        let mut flags = FlagSet::new("config");
        flags.string(
            Self::CONFIG_FILE,
            None,
            "",
            "The configuration file to read. Without it the default locations are searched.",
        )?;
        flags.string(
            Self::INSTANCE,
            None,
            "",
            "Read sections suffixed with _<instance> in place of the base sections.",
        )?;
        Ok(flags)
    }

    /// The configuration file named on the command line, if any.
    pub fn config_file(flags: &FlagSet) -> Option<PathBuf> {
        flags
            .get_string(Self::CONFIG_FILE)
            .ok()
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }

    /// The selected instance, empty when none.
    pub fn instance(flags: &FlagSet) -> String {
        flags.get_string(Self::INSTANCE).unwrap_or_default()
    }
}
