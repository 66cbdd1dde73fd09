// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flags holding secrets and certificate material.

use crate::domain::secret::{self, SecretFormats, SecretReference};
use crate::domain::{ConfigError, Result};
use crate::flags::FlagValue;
use std::any::Any;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// A password flag.
///
/// Accepts every secret reference scheme. Anything that does not resolve to
/// bytes is taken as the password itself.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PasswordValue(Vec<u8>);

impl PasswordValue {
    /// Creates an empty password.
    pub fn new() -> Self {
        Self::default()
    }

    /// The resolved password.
    pub fn get(&self) -> &[u8] {
        &self.0
    }
}

impl FlagValue for PasswordValue {
    fn set(&mut self, value: &str) -> Result<()> {
        let resolved = secret::resolve(value, SecretFormats::ALL)?;
        self.0 = if resolved.is_empty() {
            value.as_bytes().to_vec()
        } else {
            resolved
        };
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "env-b64:<env-var>,b64:<b64-pass>,file:<pass-file>,<clear-pass>"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for PasswordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for PasswordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordValue(<redacted>)")
    }
}

/// A certificate or key flag.
///
/// Accepts `b64:`, `env-b64:` and `file:` references. A value that is not one
/// of those, or that resolves to nothing, is read as a file path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertValue(Vec<u8>);

impl CertValue {
    /// Creates an empty value.
    pub fn new() -> Self {
        Self::default()
    }

    /// The PEM bytes, empty when unset.
    pub fn get(&self) -> &[u8] {
        &self.0
    }

    /// True when no material was loaded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FlagValue for CertValue {
    fn set(&mut self, value: &str) -> Result<()> {
        let resolved = match SecretReference::parse(value, SecretFormats::CERT) {
            Some(SecretReference::Literal(_)) | None => Vec::new(),
            Some(reference) => reference.resolve()?,
        };
        self.0 = if resolved.is_empty() {
            SecretReference::FileRef(PathBuf::from(value)).resolve()?
        } else {
            resolved
        };
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "env-b64:<cert>,b64:<cert>,<cert-file-name>"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for CertValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// A directory of CA certificates.
///
/// Setting it reads every regular file in the directory, in file name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertPathValue {
    path: String,
    certs: Vec<Vec<u8>>,
}

impl CertPathValue {
    /// Creates an empty value.
    pub fn new() -> Self {
        Self::default()
    }

    /// The directory the certificates were read from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The contents of each file.
    pub fn certs(&self) -> &[Vec<u8>] {
        &self.certs
    }
}

fn read_cert_dir(dir: &Path) -> Result<Vec<Vec<u8>>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    files
        .iter()
        .map(|path| -> Result<Vec<u8>> {
            let mut data = fs::read(path).map_err(|e| ConfigError::SourceError {
                source_name: "capath".to_string(),
                message: format!("failed to read {}", path.display()),
                source: Some(Box::new(e)),
            })?;
            if data.last() == Some(&b'\n') {
                data.pop();
            }
            Ok(data)
        })
        .collect()
}

impl FlagValue for CertPathValue {
    fn set(&mut self, value: &str) -> Result<()> {
        let certs = read_cert_dir(Path::new(value))?;
        tracing::trace!("Read {} certificate file(s) from {}", certs.len(), value);
        self.path = value.to_string();
        self.certs = certs;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "path"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for CertPathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}
