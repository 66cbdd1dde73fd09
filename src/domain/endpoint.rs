// SPDX-License-Identifier: MIT OR Apache-2.0

//! Endpoint notation.
//!
//! Seed hosts are written as `host[:tls-name][:port]`, comma separated. IPv6
//! addresses must be bracketed (`[::1]:tls-name:3000`). Forms are tried in a
//! fixed order and the first match wins:
//!
//! 1. `[ipv6]:tls-name:port`
//! 2. `[ipv6]:port`
//! 3. `[ipv6]`
//! 4. `host:tls-name:port`
//! 5. `host:port`
//! 6. `host`

use crate::domain::errors::{ConfigError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Host used when no seed is given.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Port used when neither a seed nor the port flag names one.
pub const DEFAULT_PORT: u16 = 3000;

struct Form {
    regex: Regex,
    tls_name: Option<usize>,
    port: Option<usize>,
}

impl Form {
    fn new(pattern: &str, tls_name: Option<usize>, port: Option<usize>) -> Self {
        Form {
            regex: Regex::new(pattern).expect("valid regex"),
            tls_name,
            port,
        }
    }
}

static FORMS: Lazy<Vec<Form>> = Lazy::new(|| {
    vec![
        Form::new(r"^\[(.*)\]:(.*):(\d+)$", Some(2), Some(3)),
        Form::new(r"^\[(.*)\]:(\d+)$", None, Some(2)),
        Form::new(r"^\[(.*)\]$", None, None),
        Form::new(r"^([^:\[\]]*):(.*):(\d+)$", Some(2), Some(3)),
        Form::new(r"^([^:\[\]]*):(\d+)$", None, Some(2)),
        Form::new(r"^([^:\[\]]*)$", None, None),
    ]
});

/// A single seed endpoint.
///
/// `tls_name` is empty and `port` is zero when the token did not carry them;
/// cluster-wide defaults fill them in later.
///
/// # Examples
///
/// ```
/// use toolcfg::domain::endpoint::Endpoint;
///
/// let ep: Endpoint = "[::1]:tlsA:4333".parse().unwrap();
/// assert_eq!(ep.host, "::1");
/// assert_eq!(ep.tls_name, "tlsA");
/// assert_eq!(ep.port, 4333);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Host name or IP address, never empty.
    pub host: String,
    /// TLS name used to verify the server certificate.
    pub tls_name: String,
    /// Port, `0` when unset.
    pub port: u16,
}

impl Endpoint {
    /// Creates an endpoint without a TLS name.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Endpoint {
            host: host.into(),
            tls_name: String::new(),
            port,
        }
    }

    /// Parses a single `host[:tls-name][:port]` token.
    pub fn parse(token: &str) -> Result<Endpoint> {
        let Some((form, caps)) = FORMS
            .iter()
            .find_map(|form| form.regex.captures(token).map(|caps| (form, caps)))
        else {
            return Err(syntax(token, "does not match any expected formats", None));
        };

        let host = caps.get(1).map_or("", |m| m.as_str());
        if host.is_empty() {
            return Err(syntax(token, "host is empty", None));
        }

        let tls_name = form
            .tls_name
            .and_then(|i| caps.get(i))
            .map_or("", |m| m.as_str());

        let port = match form.port.and_then(|i| caps.get(i)) {
            Some(m) => m.as_str().parse::<u16>().map_err(|e| {
                syntax(token, "failed to parse port", Some(Box::new(e)))
            })?,
            None => 0,
        };

        Ok(Endpoint {
            host: host.to_string(),
            tls_name: tls_name.to_string(),
            port,
        })
    }
}

fn syntax(
    token: &str,
    message: &str,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
) -> ConfigError {
    ConfigError::EndpointSyntax {
        token: token.to_string(),
        message: message.to_string(),
        source,
    }
}

impl FromStr for Endpoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Endpoint::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]", self.host)?;
        } else {
            write!(f, "{}", self.host)?;
        }
        if !self.tls_name.is_empty() {
            write!(f, ":{}", self.tls_name)?;
        }
        if self.port != 0 {
            write!(f, ":{}", self.port)?;
        }
        Ok(())
    }
}

/// An ordered list of seed endpoints.
///
/// Order is preserved and duplicates are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointList(Vec<Endpoint>);

impl EndpointList {
    /// Creates a list from endpoints.
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        EndpointList(endpoints)
    }

    /// Parses a comma separated list of tokens.
    ///
    /// Fails on the first invalid token and returns nothing in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use toolcfg::domain::endpoint::EndpointList;
    ///
    /// let list = EndpointList::parse("10.0.0.1:3000,10.0.0.2:tls1:3001").unwrap();
    /// assert_eq!(list.len(), 2);
    /// assert_eq!(list.as_slice()[1].tls_name, "tls1");
    /// assert!(EndpointList::parse("10.0.0.1,[::1").is_err());
    /// ```
    pub fn parse(list: &str) -> Result<EndpointList> {
        list.split(',')
            .map(Endpoint::parse)
            .collect::<Result<Vec<_>>>()
            .map(EndpointList)
    }

    /// Returns the endpoints as a slice.
    pub fn as_slice(&self) -> &[Endpoint] {
        &self.0
    }

    /// Returns the endpoints mutably, for filling in defaults.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Endpoint> {
        self.0.iter_mut()
    }

    /// Appends every endpoint of `other`.
    pub fn extend(&mut self, other: EndpointList) {
        self.0.extend(other.0);
    }

    /// Returns the number of endpoints.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the list holds no endpoint.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the list.
    pub fn into_vec(self) -> Vec<Endpoint> {
        self.0
    }
}

impl FromStr for EndpointList {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        EndpointList::parse(s)
    }
}

impl fmt::Display for EndpointList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, endpoint) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", endpoint)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a EndpointList {
    type Item = &'a Endpoint;
    type IntoIter = std::slice::Iter<'a, Endpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
