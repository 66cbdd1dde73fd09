// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cluster connection settings assembled from resolved flags.

use crate::domain::{ConfigError, EndpointList, Result, TlsProtocols};
use crate::flags::{
    AuthMode, AuthModeValue, CertPathValue, CertValue, ClusterFlags, FlagSet, HostListValue,
    PasswordValue, TlsProtocolsValue,
};
use std::fmt;

#[cfg(feature = "tls")]
use crate::client::tls::{Identity, TlsMaterial, TrustPool};

/// Connection settings for one cluster.
///
/// Built once the command line and the configuration file have both been
/// applied to a [`ClusterFlags`] set.
///
/// # Examples
///
/// ```rust
/// use toolcfg::client::ClusterConfig;
/// use toolcfg::flags::ClusterFlags;
///
/// # fn main() -> toolcfg::domain::Result<()> {
/// let mut flags = ClusterFlags::flag_set()?;
/// flags.set("host", "10.0.0.1,10.0.0.2:3100")?;
/// flags.set("port", "4000")?;
///
/// let config = ClusterConfig::from_flags(&flags)?;
/// assert_eq!(config.seeds.to_string(), "10.0.0.1:4000,10.0.0.2:3100");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Seed hosts, each with a port and TLS name filled in.
    pub seeds: EndpointList,
    /// User name, empty when not authenticating.
    pub user: String,
    /// Password bytes.
    pub password: Vec<u8>,
    /// Authentication mode.
    pub auth_mode: AuthMode,
    /// CA certificates in PEM form, one entry per file.
    pub root_cas: Vec<Vec<u8>>,
    /// Client certificate chain in PEM form.
    pub cert: Vec<u8>,
    /// Client private key in PEM form, possibly encrypted.
    pub key: Vec<u8>,
    /// Passphrase for `key`.
    pub key_pass: Vec<u8>,
    /// Allowed TLS protocol range.
    pub tls_protocols: TlsProtocols,
}

impl ClusterConfig {
    /// Reads the cluster flags of `flags`.
    ///
    /// Seeds without a port get the `port` flag, seeds without a TLS name get
    /// the `tls-name` flag. TLS material is only copied when `tls-enable` is
    /// set.
    pub fn from_flags(flags: &FlagSet) -> Result<Self> {
        let port = flags.get_int(ClusterFlags::PORT)?;
        let port = u16::try_from(port).map_err(|e| ConfigError::TypeConversionError {
            value: port.to_string(),
            target_type: "port".to_string(),
            source: Box::new(e),
        })?;
        let tls_name = flags.get_string(ClusterFlags::TLS_NAME)?;

        let mut seeds = flags
            .value::<HostListValue>(ClusterFlags::HOST)?
            .hosts()
            .clone();
        for seed in seeds.iter_mut() {
            if seed.port == 0 {
                seed.port = port;
            }
            if seed.tls_name.is_empty() {
                seed.tls_name = tls_name.clone();
            }
        }

        let mut config = ClusterConfig {
            seeds,
            user: flags.get_string(ClusterFlags::USER)?,
            password: flags
                .value::<PasswordValue>(ClusterFlags::PASSWORD)?
                .get()
                .to_vec(),
            auth_mode: flags.value::<AuthModeValue>(ClusterFlags::AUTH)?.get(),
            ..ClusterConfig::default()
        };

        if flags.get_bool(ClusterFlags::TLS_ENABLE)? {
            let cafile = flags.value::<CertValue>(ClusterFlags::TLS_CAFILE)?;
            if !cafile.is_empty() {
                config.root_cas.push(cafile.get().to_vec());
            }
            config.root_cas.extend(
                flags
                    .value::<CertPathValue>(ClusterFlags::TLS_CAPATH)?
                    .certs()
                    .iter()
                    .cloned(),
            );
            config.cert = flags
                .value::<CertValue>(ClusterFlags::TLS_CERTFILE)?
                .get()
                .to_vec();
            config.key = flags
                .value::<CertValue>(ClusterFlags::TLS_KEYFILE)?
                .get()
                .to_vec();
            config.key_pass = flags
                .value::<PasswordValue>(ClusterFlags::TLS_KEYFILE_PASSWORD)?
                .get()
                .to_vec();
            config.tls_protocols = flags
                .value::<TlsProtocolsValue>(ClusterFlags::TLS_PROTOCOLS)?
                .get();
        }

        Ok(config)
    }

    /// Returns true when any CA, certificate or key is present.
    pub fn has_tls(&self) -> bool {
        !self.root_cas.is_empty() || !self.cert.is_empty() || !self.key.is_empty()
    }

    /// Builds the TLS material, or `None` when TLS is not configured.
    ///
    /// A client identity is built when a certificate or a key is present. A
    /// missing half is a [`ConfigError::TlsMaterial`] error.
    #[cfg(feature = "tls")]
    pub fn tls_material(&self) -> Result<Option<TlsMaterial>> {
        if !self.has_tls() {
            return Ok(None);
        }

        let trust_pool = TrustPool::from_pem_blobs(&self.root_cas);
        let identity = if !self.cert.is_empty() || !self.key.is_empty() {
            Some(Identity::from_pem(&self.cert, &self.key, &self.key_pass)?)
        } else {
            None
        };

        Ok(Some(TlsMaterial::new(trust_pool, identity, self.tls_protocols)))
    }
}

impl fmt::Debug for ClusterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterConfig")
            .field("seeds", &self.seeds.to_string())
            .field("user", &self.user)
            .field("auth_mode", &self.auth_mode)
            .field("root_cas", &self.root_cas.len())
            .field("has_cert", &!self.cert.is_empty())
            .field("has_key", &!self.key.is_empty())
            .field("tls_protocols", &self.tls_protocols.to_string())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let flags = ClusterFlags::flag_set().unwrap();
        let config = ClusterConfig::from_flags(&flags).unwrap();
        assert_eq!(config.seeds.to_string(), "127.0.0.1:3000");
        assert_eq!(config.auth_mode, AuthMode::Internal);
        assert!(config.password.is_empty());
        assert!(!config.has_tls());
    }

    #[test]
    fn test_seed_defaults_filled_in() {
        let mut flags = ClusterFlags::flag_set().unwrap();
        flags.set("host", "a,b:tls-b:3100,[::1]").unwrap();
        flags.set("port", "4000").unwrap();
        flags.set("tls-name", "cluster-tls").unwrap();

        let config = ClusterConfig::from_flags(&flags).unwrap();
        let seeds = config.seeds.as_slice();
        assert_eq!(seeds[0].port, 4000);
        assert_eq!(seeds[0].tls_name, "cluster-tls");
        assert_eq!(seeds[1].port, 3100);
        assert_eq!(seeds[1].tls_name, "tls-b");
        assert_eq!(seeds[2].host, "::1");
        assert_eq!(seeds[2].port, 4000);
    }

    #[test]
    fn test_port_out_of_range() {
        let mut flags = ClusterFlags::flag_set().unwrap();
        flags.set("port", "70000").unwrap();
        assert!(ClusterConfig::from_flags(&flags).is_err());
    }

    #[test]
    fn test_tls_material_ignored_unless_enabled() {
        let mut flags = ClusterFlags::flag_set().unwrap();
        flags.set("tls-cafile", "b64:Y2E=").unwrap();
        let config = ClusterConfig::from_flags(&flags).unwrap();
        assert!(config.root_cas.is_empty());

        flags.set("tls-enable", "true").unwrap();
        let config = ClusterConfig::from_flags(&flags).unwrap();
        assert_eq!(config.root_cas, vec![b"ca".to_vec()]);
    }

    #[test]
    fn test_root_cas_cafile_then_capath() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("1.pem"), "one").unwrap();
        fs::write(dir.path().join("2.pem"), "two").unwrap();

        let mut flags = ClusterFlags::flag_set().unwrap();
        flags.set("tls-enable", "true").unwrap();
        flags.set("tls-cafile", "b64:Y2E=").unwrap();
        flags.set("tls-capath", dir.path().to_str().unwrap()).unwrap();
        flags.set("tls-protocols", "TLSv1.3").unwrap();

        let config = ClusterConfig::from_flags(&flags).unwrap();
        assert_eq!(
            config.root_cas,
            vec![b"ca".to_vec(), b"one".to_vec(), b"two".to_vec()]
        );
        assert_eq!(config.tls_protocols.to_string(), "TLSv1.3");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut flags = ClusterFlags::flag_set().unwrap();
        flags.set("password", "hunter2").unwrap();
        let config = ClusterConfig::from_flags(&flags).unwrap();
        assert_eq!(config.password, b"hunter2");
        assert!(!format!("{:?}", config).contains("hunter2"));
    }

    #[cfg(feature = "tls")]
    #[test]
    fn test_no_tls_material_without_tls() {
        let config = ClusterConfig::default();
        assert!(config.tls_material().unwrap().is_none());
    }

    #[cfg(feature = "tls")]
    #[test]
    fn test_half_identity_is_an_error() {
        let cert_only = ClusterConfig {
            cert: b"-----BEGIN CERTIFICATE-----\n".to_vec(),
            ..ClusterConfig::default()
        };
        assert!(matches!(
            cert_only.tls_material(),
            Err(ConfigError::TlsMaterial { .. })
        ));

        let key_only = ClusterConfig {
            key: b"not a key".to_vec(),
            ..ClusterConfig::default()
        };
        assert!(matches!(
            key_only.tls_material(),
            Err(ConfigError::TlsMaterial { .. })
        ));
    }
}
