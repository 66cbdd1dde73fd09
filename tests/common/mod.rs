// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::env;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use tempfile::NamedTempFile;
use toolcfg::domain::{ConfigError, ConfigMap, ConfigValue, Result};
use toolcfg::ports::{ConfigGetter, ConfigUnmarshaller};

static TRACING: Once = Once::new();

/// Installs a subscriber writing to the test output, once per binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    });
}

/// A getter returning fixed bytes or failing, counting its calls.
#[derive(Debug, Clone)]
pub struct MockGetter {
    name: String,
    data: Option<Vec<u8>>,
    calls: Arc<AtomicUsize>,
}

impl MockGetter {
    /// A getter that succeeds with `data`.
    pub fn ok(name: &str, data: impl Into<Vec<u8>>) -> Self {
        MockGetter {
            name: name.to_string(),
            data: Some(data.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A getter that always fails.
    pub fn failing(name: &str) -> Self {
        MockGetter {
            name: name.to_string(),
            data: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A handle on the call counter, usable after the getter is moved.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl ConfigGetter for MockGetter {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_bytes(&self) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.data.clone().ok_or_else(|| ConfigError::SourceError {
            source_name: self.name.clone(),
            message: format!("{} unavailable", self.name),
            source: None,
        })
    }
}

/// An unmarshaller accepting only documents that start with its prefix.
///
/// An accepted document becomes `{ "format": <name>, "body": <rest> }`.
#[derive(Debug, Clone)]
pub struct PrefixUnmarshaller {
    name: String,
    prefix: String,
    calls: Arc<AtomicUsize>,
}

impl PrefixUnmarshaller {
    pub fn new(name: &str, prefix: &str) -> Self {
        PrefixUnmarshaller {
            name: name.to_string(),
            prefix: prefix.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl ConfigUnmarshaller for PrefixUnmarshaller {
    fn format(&self) -> &str {
        &self.name
    }

    fn unmarshal(&self, data: &[u8]) -> Result<ConfigMap> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let text = String::from_utf8_lossy(data);
        let Some(body) = text.strip_prefix(self.prefix.as_str()) else {
            return Err(ConfigError::ParseError {
                message: format!("{}: missing prefix '{}'", self.name, self.prefix),
                source: None,
            });
        };
        let mut map = ConfigMap::new();
        map.insert("format".to_string(), ConfigValue::from(self.name.as_str()));
        map.insert("body".to_string(), ConfigValue::from(body));
        Ok(map)
    }
}

/// Sets environment variables and removes them on drop.
pub struct EnvGuard {
    keys: Vec<String>,
}

impl EnvGuard {
    pub fn new() -> Self {
        EnvGuard { keys: Vec::new() }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        env::set_var(key, value);
        self.keys.push(key.to_string());
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for key in &self.keys {
            env::remove_var(key);
        }
    }
}

/// Writes `content` to a temporary file with the given suffix, e.g. ".yaml".
pub fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

#[cfg(feature = "tls")]
pub mod certs {
    //! Throwaway certificates.

    use openssl::asn1::Asn1Time;
    use openssl::bn::BigNum;
    use openssl::hash::MessageDigest;
    use openssl::pkey::{PKey, Private};
    use openssl::rsa::Rsa;
    use openssl::symm::Cipher;
    use openssl::x509::{X509Builder, X509NameBuilder, X509};

    /// A self-signed certificate and its RSA key.
    pub struct TestCert {
        pub cert: X509,
        pub rsa: Rsa<Private>,
    }

    impl TestCert {
        pub fn generate(cn: &str) -> Self {
            let rsa = Rsa::generate(2048).unwrap();
            let key = PKey::from_rsa(rsa.clone()).unwrap();
            let mut name = X509NameBuilder::new().unwrap();
            name.append_entry_by_text("CN", cn).unwrap();
            let name = name.build();

            let mut builder = X509Builder::new().unwrap();
            builder.set_version(2).unwrap();
            let serial = BigNum::from_u32(7).unwrap().to_asn1_integer().unwrap();
            builder.set_serial_number(&serial).unwrap();
            builder.set_subject_name(&name).unwrap();
            builder.set_issuer_name(&name).unwrap();
            builder.set_pubkey(&key).unwrap();
            builder
                .set_not_before(&Asn1Time::days_from_now(0).unwrap())
                .unwrap();
            builder
                .set_not_after(&Asn1Time::days_from_now(30).unwrap())
                .unwrap();
            builder.sign(&key, MessageDigest::sha256()).unwrap();

            TestCert {
                cert: builder.build(),
                rsa,
            }
        }

        pub fn cert_pem(&self) -> Vec<u8> {
            self.cert.to_pem().unwrap()
        }

        pub fn key_pem(&self) -> Vec<u8> {
            self.rsa.private_key_to_pem().unwrap()
        }

        /// The key in legacy `Proc-Type: 4,ENCRYPTED` form.
        pub fn encrypted_key_pem(&self, passphrase: &[u8]) -> Vec<u8> {
            self.rsa
                .private_key_to_pem_passphrase(Cipher::aes_128_cbc(), passphrase)
                .unwrap()
        }

        /// The key in PKCS#8 `ENCRYPTED PRIVATE KEY` form.
        pub fn pkcs8_encrypted_key_pem(&self, passphrase: &[u8]) -> Vec<u8> {
            PKey::from_rsa(self.rsa.clone())
                .unwrap()
                .private_key_to_pem_pkcs8_passphrase(Cipher::aes_256_cbc(), passphrase)
                .unwrap()
        }
    }
}
