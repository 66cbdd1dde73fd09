// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret reference resolution.
//!
//! Secret-bearing flag values may be typed literally or point somewhere else:
//!
//! - `env:NAME` reads the environment variable `NAME`
//! - `env-b64:NAME` reads `NAME` and base64-decodes it
//! - `b64:DATA` base64-decodes `DATA`
//! - `file:PATH` reads the file at `PATH`
//!
//! The value is split once on the first colon. A value without a colon is a
//! literal. A value whose scheme is unknown, or not allowed by the caller's
//! [`SecretFormats`], is not a reference at all: [`SecretReference::parse`]
//! returns `None` and the caller decides what the raw string means (a password
//! flag uses it verbatim, a certificate flag reads it as a file path).

use crate::domain::errors::{ConfigError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt;
use std::fs;
use std::ops::BitOr;
use std::path::PathBuf;

/// A set of reference schemes a caller accepts.
///
/// # Examples
///
/// ```
/// use toolcfg::domain::secret::SecretFormats;
///
/// let formats = SecretFormats::B64 | SecretFormats::FILE;
/// assert!(formats.contains(SecretFormats::FILE));
/// assert!(!formats.contains(SecretFormats::ENV));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SecretFormats(u8);

impl SecretFormats {
    /// `env:NAME`
    pub const ENV: SecretFormats = SecretFormats(1);
    /// `env-b64:NAME`
    pub const ENV_B64: SecretFormats = SecretFormats(1 << 1);
    /// `b64:DATA`
    pub const B64: SecretFormats = SecretFormats(1 << 2);
    /// `file:PATH`
    pub const FILE: SecretFormats = SecretFormats(1 << 3);
    /// Every scheme; used for passwords.
    pub const ALL: SecretFormats = SecretFormats(0b1111);
    /// Schemes accepted by certificate and key flags.
    pub const CERT: SecretFormats = SecretFormats(0b1110);

    /// Returns true if every scheme in `other` is also in `self`.
    pub fn contains(self, other: SecretFormats) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SecretFormats {
    type Output = SecretFormats;

    fn bitor(self, rhs: Self) -> Self::Output {
        SecretFormats(self.0 | rhs.0)
    }
}

/// A parsed secret-bearing value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SecretReference {
    /// A value used as typed.
    Literal(String),
    /// The name of an environment variable holding the value.
    EnvVar(String),
    /// The name of an environment variable holding the base64-encoded value.
    EnvVarBase64(String),
    /// A base64-encoded value.
    Base64(String),
    /// A path to a file holding the value.
    FileRef(PathBuf),
}

impl SecretReference {
    /// Parses `raw` against the schemes in `formats`.
    ///
    /// Returns `Some(Literal)` when `raw` has no colon and `None` when the
    /// scheme is unknown or not allowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use toolcfg::domain::secret::{SecretFormats, SecretReference};
    ///
    /// assert_eq!(
    ///     SecretReference::parse("env:PASS", SecretFormats::ALL),
    ///     Some(SecretReference::EnvVar("PASS".to_string()))
    /// );
    /// assert_eq!(SecretReference::parse("env:PASS", SecretFormats::CERT), None);
    /// assert_eq!(
    ///     SecretReference::parse("hunter2", SecretFormats::ALL),
    ///     Some(SecretReference::Literal("hunter2".to_string()))
    /// );
    /// ```
    pub fn parse(raw: &str, formats: SecretFormats) -> Option<SecretReference> {
        let Some((scheme, payload)) = raw.split_once(':') else {
            return Some(SecretReference::Literal(raw.to_string()));
        };

        let payload = payload.to_string();
        match scheme {
            "env" if formats.contains(SecretFormats::ENV) => Some(SecretReference::EnvVar(payload)),
            "env-b64" if formats.contains(SecretFormats::ENV_B64) => {
                Some(SecretReference::EnvVarBase64(payload))
            }
            "b64" if formats.contains(SecretFormats::B64) => Some(SecretReference::Base64(payload)),
            "file" if formats.contains(SecretFormats::FILE) => {
                Some(SecretReference::FileRef(PathBuf::from(payload)))
            }
            _ => None,
        }
    }

    /// Resolves the reference to the bytes it stands for.
    pub fn resolve(&self) -> Result<Vec<u8>> {
        match self {
            SecretReference::Literal(s) => Ok(s.as_bytes().to_vec()),
            SecretReference::EnvVar(name) => Ok(read_env(self, name)?.into_bytes()),
            SecretReference::EnvVarBase64(name) => {
                let encoded = read_env(self, name)?;
                decode_base64(self, &encoded)
            }
            SecretReference::Base64(data) => decode_base64(self, data),
            SecretReference::FileRef(path) => {
                let mut data = fs::read(path).map_err(|e| ConfigError::SecretUnresolved {
                    reference: self.to_string(),
                    message: "failed to read file".to_string(),
                    source: Some(Box::new(e)),
                })?;
                if data.last() == Some(&b'\n') {
                    data.pop();
                }
                Ok(data)
            }
        }
    }
}

impl fmt::Display for SecretReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretReference::Literal(_) => write!(f, "<literal>"),
            SecretReference::EnvVar(name) => write!(f, "env:{}", name),
            SecretReference::EnvVarBase64(name) => write!(f, "env-b64:{}", name),
            SecretReference::Base64(_) => write!(f, "b64:<data>"),
            SecretReference::FileRef(path) => write!(f, "file:{}", path.display()),
        }
    }
}

/// Resolves `raw` against `formats`.
///
/// A value that is not a reference under `formats` yields empty bytes and no
/// error, so callers can fall through to their next interpretation.
///
/// # Examples
///
/// ```
/// use toolcfg::domain::secret::{resolve, SecretFormats};
///
/// assert_eq!(resolve("b64:dGVzdA==", SecretFormats::ALL).unwrap(), b"test");
/// assert_eq!(resolve("plainvalue", SecretFormats::ALL).unwrap(), b"plainvalue");
/// assert!(resolve("vault:secret", SecretFormats::ALL).unwrap().is_empty());
/// ```
pub fn resolve(raw: &str, formats: SecretFormats) -> Result<Vec<u8>> {
    match SecretReference::parse(raw, formats) {
        Some(reference) => reference.resolve(),
        None => Ok(Vec::new()),
    }
}

fn read_env(reference: &SecretReference, name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        Ok(_) => Err(ConfigError::SecretUnresolved {
            reference: reference.to_string(),
            message: format!("environment variable {} is empty", name),
            source: None,
        }),
        Err(e) => Err(ConfigError::SecretUnresolved {
            reference: reference.to_string(),
            message: format!("environment variable {} not found", name),
            source: Some(Box::new(e)),
        }),
    }
}

// One trailing newline is dropped, matching what `base64` emits for piped input.
fn decode_base64(reference: &SecretReference, data: &str) -> Result<Vec<u8>> {
    let mut decoded = STANDARD
        .decode(data.trim())
        .map_err(|e| ConfigError::SecretUnresolved {
            reference: reference.to_string(),
            message: "failed to decode base64 value".to_string(),
            source: Some(Box::new(e)),
        })?;
    if decoded.last() == Some(&b'\n') {
        decoded.pop();
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_formats_combine() {
        assert_eq!(
            SecretFormats::B64 | SecretFormats::ENV_B64 | SecretFormats::FILE,
            SecretFormats::CERT
        );
        assert_eq!(SecretFormats::CERT | SecretFormats::ENV, SecretFormats::ALL);
        assert!(!SecretFormats::CERT.contains(SecretFormats::ENV));
    }

    #[test]
    fn test_literal_without_colon() {
        assert_eq!(resolve("plainvalue", SecretFormats::ALL).unwrap(), b"plainvalue");
        assert_eq!(resolve("", SecretFormats::ALL).unwrap(), b"");
    }

    #[test]
    fn test_unknown_scheme_falls_through() {
        assert_eq!(SecretReference::parse("http://host", SecretFormats::ALL), None);
        assert!(resolve("http://host", SecretFormats::ALL).unwrap().is_empty());
    }

    #[test]
    fn test_disallowed_scheme_falls_through() {
        assert_eq!(SecretReference::parse("env:HOME", SecretFormats::CERT), None);
        assert!(resolve("env:HOME", SecretFormats::CERT).unwrap().is_empty());
    }

    #[test]
    fn test_b64() {
        assert_eq!(resolve("b64:dGVzdA==", SecretFormats::ALL).unwrap(), b"test");
    }

    #[test]
    fn test_b64_strips_one_trailing_newline() {
        // "test-password\n"
        assert_eq!(
            resolve("b64:dGVzdC1wYXNzd29yZAo=", SecretFormats::ALL).unwrap(),
            b"test-password"
        );
    }

    #[test]
    fn test_b64_invalid() {
        let err = resolve("b64:!!!", SecretFormats::ALL).unwrap_err();
        assert!(matches!(err, ConfigError::SecretUnresolved { .. }));
        assert!(!err.to_string().contains("!!!"));
    }

    #[test]
    fn test_env() {
        std::env::set_var("TOOLCFG_SECRET_TEST_ENV", "s3cret");
        assert_eq!(
            resolve("env:TOOLCFG_SECRET_TEST_ENV", SecretFormats::ALL).unwrap(),
            b"s3cret"
        );
        std::env::remove_var("TOOLCFG_SECRET_TEST_ENV");
    }

    #[test]
    fn test_env_unset() {
        let err = resolve("env:TOOLCFG_SECRET_TEST_UNSET", SecretFormats::ALL).unwrap_err();
        assert!(matches!(err, ConfigError::SecretUnresolved { .. }));
        assert!(err.to_string().contains("TOOLCFG_SECRET_TEST_UNSET"));
    }

    #[test]
    fn test_env_empty() {
        std::env::set_var("TOOLCFG_SECRET_TEST_EMPTY", "");
        let err = resolve("env:TOOLCFG_SECRET_TEST_EMPTY", SecretFormats::ALL).unwrap_err();
        assert!(err.to_string().contains("empty"));
        std::env::remove_var("TOOLCFG_SECRET_TEST_EMPTY");
    }

    #[test]
    fn test_env_b64() {
        std::env::set_var("TOOLCFG_SECRET_TEST_B64", "dGVzdC1wYXNzd29yZAo=");
        assert_eq!(
            resolve("env-b64:TOOLCFG_SECRET_TEST_B64", SecretFormats::ALL).unwrap(),
            b"test-password"
        );
        std::env::remove_var("TOOLCFG_SECRET_TEST_B64");
    }

    #[test]
    fn test_file_trims_exactly_one_newline() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "password\n\n").unwrap();
        let raw = format!("file:{}", file.path().display());
        assert_eq!(resolve(&raw, SecretFormats::ALL).unwrap(), b"password\n");
    }

    #[test]
    fn test_file_missing() {
        let err = resolve("file:/nonexistent/secret", SecretFormats::ALL).unwrap_err();
        assert!(matches!(err, ConfigError::SecretUnresolved { .. }));
    }

    #[test]
    fn test_payload_keeps_later_colons() {
        assert_eq!(
            SecretReference::parse("file:C:/secret", SecretFormats::ALL),
            Some(SecretReference::FileRef(PathBuf::from("C:/secret")))
        );
    }
}
