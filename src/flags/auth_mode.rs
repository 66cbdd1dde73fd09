// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication mode selection.

use crate::domain::{ConfigError, Result};
use crate::flags::FlagValue;
use std::any::Any;
use std::fmt;
use std::str::FromStr;

/// How the client authenticates to the cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AuthMode {
    /// User and password checked by the server.
    #[default]
    Internal,
    /// User and password checked by an external directory.
    External,
    /// Client certificate only.
    Pki,
}

impl AuthMode {
    /// Every mode, in display order.
    pub const ALL: [AuthMode; 3] = [AuthMode::Internal, AuthMode::External, AuthMode::Pki];

    /// The canonical upper-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            AuthMode::Internal => "INTERNAL",
            AuthMode::External => "EXTERNAL",
            AuthMode::Pki => "PKI",
        }
    }
}

impl FromStr for AuthMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        AuthMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::FlagError {
                message: format!(
                    "invalid authentication mode '{}', expected one of INTERNAL, EXTERNAL, PKI",
                    s
                ),
                source: None,
            })
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A flag holding an [`AuthMode`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthModeValue(AuthMode);

impl AuthModeValue {
    /// Creates a value holding `default`.
    pub fn new(default: AuthMode) -> Self {
        AuthModeValue(default)
    }

    /// The current mode.
    pub fn get(&self) -> AuthMode {
        self.0
    }
}

impl FlagValue for AuthModeValue {
    fn set(&mut self, value: &str) -> Result<()> {
        self.0 = value.parse()?;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "INTERNAL,EXTERNAL,PKI"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for AuthModeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
