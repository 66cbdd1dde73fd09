// SPDX-License-Identifier: MIT OR Apache-2.0

//! TLS material for cluster connections.
//!
//! The flags deliver PEM bytes: CA certificates, a client certificate chain and
//! a private key that may be encrypted. This module turns them into a trust
//! store, a verified client identity and an [`SslConnector`] restricted to the
//! selected protocol range.

use crate::domain::{ConfigError, Result, TlsProtocols, TlsVersion};
use openssl::pkey::{PKey, Private};
use openssl::ssl::{SslConnector, SslMethod, SslVersion};
use openssl::x509::store::{X509Store, X509StoreBuilder};
use openssl::x509::X509;

const PEM_BEGIN: &str = "-----BEGIN ";
const LEGACY_ENCRYPTED: &str = "Proc-Type: 4,ENCRYPTED";
const PKCS8_ENCRYPTED: &str = "ENCRYPTED PRIVATE KEY";

/// CA certificates trusted in addition to the platform defaults.
#[derive(Debug, Clone, Default)]
pub struct TrustPool {
    certs: Vec<X509>,
}

impl TrustPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pool from PEM blobs, each holding one or more certificates.
    ///
    /// Blobs that hold no parsable certificate are skipped.
    pub fn from_pem_blobs(blobs: &[Vec<u8>]) -> Self {
        let mut pool = TrustPool::new();
        for (i, blob) in blobs.iter().enumerate() {
            match pool.add_pem(blob) {
                Ok(n) => tracing::trace!("Added {} CA certificate(s) from blob {}", n, i),
                Err(e) => tracing::debug!("Skipping CA blob {}: {}", i, e),
            }
        }
        pool
    }

    /// Adds every certificate of a PEM blob. Returns how many were added.
    pub fn add_pem(&mut self, pem: &[u8]) -> Result<usize> {
        let certs = X509::stack_from_pem(pem)
            .map_err(|e| ConfigError::tls("failed to parse CA certificate", e))?;
        if certs.is_empty() {
            return Err(ConfigError::TlsMaterial {
                message: "no certificate found in PEM data".to_string(),
                source: None,
            });
        }
        let n = certs.len();
        self.certs.extend(certs);
        Ok(n)
    }

    /// The certificates added so far.
    pub fn certificates(&self) -> &[X509] {
        &self.certs
    }

    /// Returns the number of certificates.
    pub fn len(&self) -> usize {
        self.certs.len()
    }

    /// Returns true when no certificate was added.
    pub fn is_empty(&self) -> bool {
        self.certs.is_empty()
    }

    /// Builds a store holding the platform roots and every certificate of the
    /// pool. Duplicates are ignored.
    pub fn build_store(&self) -> Result<X509Store> {
        let mut builder = X509StoreBuilder::new()
            .map_err(|e| ConfigError::tls("failed to create certificate store", e))?;
        if let Err(e) = builder.set_default_paths() {
            tracing::debug!("Platform CA certificates unavailable: {}", e);
        }
        for cert in &self.certs {
            if let Err(e) = builder.add_cert(cert.clone()) {
                tracing::trace!("Certificate not added to store: {}", e);
            }
        }
        Ok(builder.build())
    }
}

/// A client certificate chain and its private key.
#[derive(Debug, Clone)]
pub struct Identity {
    chain: Vec<X509>,
    key: PKey<Private>,
}

impl Identity {
    /// Builds an identity from PEM data.
    ///
    /// An encrypted key, in either the legacy `Proc-Type` form or PKCS#8
    /// `ENCRYPTED PRIVATE KEY` form, is decrypted with `passphrase`. The first
    /// certificate of `cert` must carry the key's public half.
    pub fn from_pem(cert: &[u8], key: &[u8], passphrase: &[u8]) -> Result<Self> {
        let Some(label) = pem_label(key) else {
            return Err(ConfigError::TlsMaterial {
                message: "failed to decode PEM data".to_string(),
                source: None,
            });
        };

        let encrypted =
            label == PKCS8_ENCRYPTED || String::from_utf8_lossy(key).contains(LEGACY_ENCRYPTED);
        let key = if encrypted {
            PKey::private_key_from_pem_passphrase(key, passphrase)
                .map_err(|e| ConfigError::tls("failed to decrypt private key", e))?
        } else {
            PKey::private_key_from_pem(key)
                .map_err(|e| ConfigError::tls("failed to parse private key", e))?
        };

        let chain = X509::stack_from_pem(cert)
            .map_err(|e| ConfigError::tls("failed to parse certificate", e))?;
        let Some(leaf) = chain.first() else {
            return Err(ConfigError::TlsMaterial {
                message: "no certificate found in PEM data".to_string(),
                source: None,
            });
        };
        let public = leaf
            .public_key()
            .map_err(|e| ConfigError::tls("failed to read certificate public key", e))?;
        if !public.public_eq(&key) {
            return Err(ConfigError::TlsMaterial {
                message: "certificate and private key do not match".to_string(),
                source: None,
            });
        }

        Ok(Identity { chain, key })
    }

    /// The leaf certificate.
    pub fn certificate(&self) -> &X509 {
        &self.chain[0]
    }

    /// The leaf followed by any intermediates.
    pub fn chain(&self) -> &[X509] {
        &self.chain
    }

    /// The decrypted private key.
    pub fn private_key(&self) -> &PKey<Private> {
        &self.key
    }

    /// The private key as unencrypted PKCS#8 PEM.
    pub fn key_pem(&self) -> Result<Vec<u8>> {
        self.key
            .private_key_to_pem_pkcs8()
            .map_err(|e| ConfigError::tls("failed to encode private key", e))
    }
}

// Label of the first PEM block, e.g. "RSA PRIVATE KEY".
fn pem_label(data: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(data);
    let start = text.find(PEM_BEGIN)? + PEM_BEGIN.len();
    let len = text[start..].find("-----")?;
    Some(text[start..start + len].to_string())
}

fn ssl_version(version: TlsVersion) -> SslVersion {
    match version {
        TlsVersion::Tls1_0 => SslVersion::TLS1,
        TlsVersion::Tls1_1 => SslVersion::TLS1_1,
        TlsVersion::Tls1_2 => SslVersion::TLS1_2,
        TlsVersion::Tls1_3 => SslVersion::TLS1_3,
    }
}

/// Everything needed to open TLS connections to a cluster.
#[derive(Debug, Clone)]
pub struct TlsMaterial {
    trust_pool: TrustPool,
    identity: Option<Identity>,
    protocols: TlsProtocols,
}

impl TlsMaterial {
    /// Bundles the parts.
    pub fn new(trust_pool: TrustPool, identity: Option<Identity>, protocols: TlsProtocols) -> Self {
        TlsMaterial {
            trust_pool,
            identity,
            protocols,
        }
    }

    /// The extra trusted CAs.
    pub fn trust_pool(&self) -> &TrustPool {
        &self.trust_pool
    }

    /// The client identity for mutual TLS, if any.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The allowed protocol range.
    pub fn protocols(&self) -> TlsProtocols {
        self.protocols
    }

    /// Builds a client connector enforcing the trust store, the identity and
    /// the protocol range.
    pub fn connector(&self) -> Result<SslConnector> {
        let mut builder = SslConnector::builder(SslMethod::tls())
            .map_err(|e| ConfigError::tls("failed to create TLS connector", e))?;

        builder
            .set_min_proto_version(Some(ssl_version(self.protocols.min())))
            .map_err(|e| ConfigError::tls("failed to set minimum TLS version", e))?;
        builder
            .set_max_proto_version(Some(ssl_version(self.protocols.max())))
            .map_err(|e| ConfigError::tls("failed to set maximum TLS version", e))?;

        builder.set_cert_store(self.trust_pool.build_store()?);

        if let Some(identity) = &self.identity {
            builder
                .set_certificate(identity.certificate())
                .map_err(|e| ConfigError::tls("failed to set client certificate", e))?;
            for cert in identity.chain().iter().skip(1) {
                builder
                    .add_extra_chain_cert(cert.clone())
                    .map_err(|e| ConfigError::tls("failed to add chain certificate", e))?;
            }
            builder
                .set_private_key(identity.private_key())
                .map_err(|e| ConfigError::tls("failed to set client key", e))?;
        }

        Ok(builder.build())
    }
}
