// SPDX-License-Identifier: MIT OR Apache-2.0

//! The seed host list flag.

use crate::domain::endpoint::{Endpoint, EndpointList, DEFAULT_HOST, DEFAULT_PORT};
use crate::domain::Result;
use crate::flags::FlagValue;
use std::any::Any;
use std::fmt;

/// A comma-separated list of `host[:tls-name][:port]` endpoints.
///
/// The list starts out holding its default. The first value set replaces the
/// default; every later value is appended, so `-h a -h b` yields both hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostListValue {
    hosts: EndpointList,
    use_default: bool,
}

impl HostListValue {
    /// Creates a list holding `default` until the first value is set.
    pub fn new(default: EndpointList) -> Self {
        HostListValue {
            hosts: default,
            use_default: true,
        }
    }

    /// The current hosts.
    pub fn hosts(&self) -> &EndpointList {
        &self.hosts
    }
}

impl Default for HostListValue {
    fn default() -> Self {
        Self::new(EndpointList::new(vec![Endpoint::new(DEFAULT_HOST, DEFAULT_PORT)]))
    }
}

impl FlagValue for HostListValue {
    fn set(&mut self, value: &str) -> Result<()> {
        let parsed = EndpointList::parse(value)?;
        if self.use_default {
            self.hosts = parsed;
            self.use_default = false;
        } else {
            self.hosts.extend(parsed);
        }
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "host[:tls-name][:port][,...]"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for HostListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hosts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_seed() {
        let value = HostListValue::default();
        assert_eq!(value.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_first_set_replaces_default() {
        let mut value = HostListValue::default();
        value.set("10.0.0.1:3100").unwrap();
        assert_eq!(value.hosts().len(), 1);
        assert_eq!(value.hosts().as_slice()[0], Endpoint::new("10.0.0.1", 3100));
    }

    #[test]
    fn test_later_sets_append() {
        let mut value = HostListValue::default();
        value.set("a").unwrap();
        value.set("b:tls-b:4000,c").unwrap();
        let hosts = value.hosts().as_slice();
        assert_eq!(hosts.len(), 3);
        assert_eq!(hosts[0].host, "a");
        assert_eq!(hosts[0].port, 0);
        assert_eq!(hosts[1].tls_name, "tls-b");
        assert_eq!(hosts[2].host, "c");
    }

    #[test]
    fn test_invalid_value_leaves_list_alone() {
        let mut value = HostListValue::default();
        assert!(value.set("[::1").is_err());
        assert_eq!(value.to_string(), "127.0.0.1:3000");
        value.set("b").unwrap();
        assert_eq!(value.hosts().len(), 1);
    }
}
