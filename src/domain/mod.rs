// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and parsing logic.
//!
//! This module holds the configuration value tree, the error taxonomy and the
//! small notations the tools accept on the command line: secret references,
//! endpoints and TLS protocol selections. It is independent of any file format
//! or flag library.

pub mod config_key;
pub mod config_value;
pub mod endpoint;
pub mod errors;
pub mod secret;
pub mod tls_protocol;

// Re-export commonly used types
pub use config_key::ConfigKey;
pub use config_value::{ConfigMap, ConfigValue};
pub use endpoint::{Endpoint, EndpointList};
pub use errors::{ConfigError, Result};
pub use secret::{SecretFormats, SecretReference};
pub use tls_protocol::{TlsProtocols, TlsVersion};
