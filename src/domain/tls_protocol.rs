// SPDX-License-Identifier: MIT OR Apache-2.0

//! TLS protocol version selection.
//!
//! Versions are chosen with a small whitespace-separated language:
//!
//! - `all` selects every supported version
//! - `+TLSv1.2` adds a version, `-TLSv1` removes one
//! - an unsigned name selects exactly that version, and is only allowed as the
//!   first selection
//!
//! Only a contiguous range can be negotiated, so a selection with a hole in it
//! (`all -TLSv1.1`) is rejected instead of being widened.

use crate::domain::errors::{ConfigError, Result};
use std::fmt;
use std::str::FromStr;

/// A TLS protocol version, ordered from oldest to newest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TlsVersion {
    /// TLS 1.0
    Tls1_0,
    /// TLS 1.1
    Tls1_1,
    /// TLS 1.2
    Tls1_2,
    /// TLS 1.3
    Tls1_3,
}

impl TlsVersion {
    /// Every supported version, oldest first.
    pub const ALL: [TlsVersion; 4] = [
        TlsVersion::Tls1_0,
        TlsVersion::Tls1_1,
        TlsVersion::Tls1_2,
        TlsVersion::Tls1_3,
    ];

    /// Returns the canonical name used in selection strings.
    pub fn name(self) -> &'static str {
        match self {
            TlsVersion::Tls1_0 => "TLSv1",
            TlsVersion::Tls1_1 => "TLSv1.1",
            TlsVersion::Tls1_2 => "TLSv1.2",
            TlsVersion::Tls1_3 => "TLSv1.3",
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The negotiable protocol range, `min <= max`.
///
/// # Examples
///
/// ```
/// use toolcfg::domain::tls_protocol::{TlsProtocols, TlsVersion};
///
/// let protocols = TlsProtocols::parse("all -TLSv1").unwrap();
/// assert_eq!(protocols.min(), TlsVersion::Tls1_1);
/// assert_eq!(protocols.max(), TlsVersion::Tls1_3);
///
/// assert!(TlsProtocols::parse("all -TLSv1.1").is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TlsProtocols {
    min: TlsVersion,
    max: TlsVersion,
}

impl Default for TlsProtocols {
    fn default() -> Self {
        TlsProtocols::only(TlsVersion::Tls1_2)
    }
}

enum Sign {
    Add,
    Remove,
}

impl TlsProtocols {
    /// Creates a range, rejecting `min > max`.
    pub fn new(min: TlsVersion, max: TlsVersion) -> Result<Self> {
        if min > max {
            return Err(ConfigError::InvalidTlsProtocols {
                value: format!("{} {}", min, max),
                message: "minimum version is newer than maximum version".to_string(),
            });
        }
        Ok(TlsProtocols { min, max })
    }

    /// A range holding a single version.
    pub fn only(version: TlsVersion) -> Self {
        TlsProtocols {
            min: version,
            max: version,
        }
    }

    /// The oldest version allowed.
    pub fn min(&self) -> TlsVersion {
        self.min
    }

    /// The newest version allowed.
    pub fn max(&self) -> TlsVersion {
        self.max
    }

    /// Returns true if `version` lies in the range.
    pub fn allows(&self, version: TlsVersion) -> bool {
        self.min <= version && version <= self.max
    }

    /// Parses a selection string. An empty string yields the default range.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = |message: String| ConfigError::InvalidTlsProtocols {
            value: value.to_string(),
            message,
        };

        let mut selected: u8 = 0;
        let mut seen_token = false;

        for token in value.split_whitespace() {
            let (sign, name) = match token.as_bytes()[0] {
                b'+' => (Some(Sign::Add), &token[1..]),
                b'-' => (Some(Sign::Remove), &token[1..]),
                _ => (None, token),
            };

            let bits = match name.to_ascii_lowercase().as_str() {
                "all" => TlsVersion::ALL.iter().fold(0, |acc, v| acc | v.bit()),
                "tlsv1" | "tlsv1.0" => TlsVersion::Tls1_0.bit(),
                "tlsv1.1" => TlsVersion::Tls1_1.bit(),
                "tlsv1.2" => TlsVersion::Tls1_2.bit(),
                "tlsv1.3" => TlsVersion::Tls1_3.bit(),
                "sslv2" | "sslv3" => {
                    return Err(invalid(format!("{} is not supported", name)));
                }
                _ => return Err(invalid(format!("unknown protocol version {}", name))),
            };

            match sign {
                Some(Sign::Add) => selected |= bits,
                Some(Sign::Remove) => selected &= !bits,
                None if selected != 0 => {
                    return Err(invalid(format!(
                        "{} overrides already set parameters",
                        token
                    )));
                }
                None => selected = bits,
            }
            seen_token = true;
        }

        if !seen_token {
            return Ok(TlsProtocols::default());
        }

        let mut enabled = TlsVersion::ALL.iter().filter(|v| selected & v.bit() != 0);
        let Some(&min) = enabled.next() else {
            return Err(invalid("no protocol version selected".to_string()));
        };
        let max = enabled.last().copied().unwrap_or(min);

        let contiguous = TlsVersion::ALL
            .iter()
            .filter(|v| min <= **v && **v <= max)
            .all(|v| selected & v.bit() != 0);
        if !contiguous {
            return Err(invalid(
                "selected versions do not form a contiguous range".to_string(),
            ));
        }

        Ok(TlsProtocols { min, max })
    }
}

impl FromStr for TlsProtocols {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        TlsProtocols::parse(s)
    }
}

impl fmt::Display for TlsProtocols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.min)?;
        for version in TlsVersion::ALL.iter().filter(|v| self.min < **v && **v <= self.max) {
            write!(f, " +{}", version)?;
        }
        Ok(())
    }
}
