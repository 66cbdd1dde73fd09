// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration resolution for database command-line tools.
//!
//! A family of tools shares one way of being configured: typed command-line
//! flags, a TOML or YAML configuration file with per-instance overrides, and
//! secrets that may live in the environment, in a file or inline in base64.
//! This crate reconciles those into resolved flags and then into connection
//! settings, seeds, credentials and TLS material.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: the configuration value tree, errors, secret references,
//!   endpoint notation and TLS protocol selections
//! - **Ports**: the [`ConfigGetter`](ports::ConfigGetter) and
//!   [`ConfigUnmarshaller`](ports::ConfigUnmarshaller) traits
//! - **Adapters**: file and in-memory getters, TOML and YAML unmarshallers and
//!   the command-line parser
//! - **Service**: the loader chain, the cached [`Config`](service::Config), the
//!   scoped [`ToolsConfig`](service::ToolsConfig) view and the
//!   [`FlagResolver`](service::FlagResolver)
//! - **Flags** and **Client**: typed flag values and the connection settings
//!   built from them
//!
//! # Precedence
//!
//! A value given on the command line always wins. Otherwise the configuration
//! file supplies it, and otherwise the flag keeps its built-in default.
//!
//! # Feature Flags
//!
//! - `toml`: TOML configuration files (default)
//! - `yaml`: YAML configuration files (default)
//! - `cli`: command-line parsing with `clap` (default)
//! - `tls`: TLS material with `openssl` (default)
//! - `schema`: JSON schema validation of configuration files (default)
//! - `full`: all of the above
//!
//! # Quick Start
//!
//! ```rust
//! use std::io::Write;
//! use toolcfg::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let mut file = tempfile::Builder::new().suffix(".conf").tempfile()?;
//! writeln!(file, "[cluster]\nhost = \"10.0.0.1:3000\"\nuser = \"admin\"")?;
//!
//! let mut flags = ClusterFlags::flag_set()?;
//! flags.parse(["-U", "operator"])?;
//!
//! let mut resolver = FlagResolver::new();
//! resolver.bind_flags(&flags, ClusterFlags::SECTION);
//! resolver.init_config(Some(file.path()), "", &mut flags)?;
//!
//! let cluster = ClusterConfig::from_flags(&flags)?;
//! assert_eq!(cluster.seeds.to_string(), "10.0.0.1:3000");
//! assert_eq!(cluster.user, "operator");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod client;
pub mod domain;
pub mod flags;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::client::ClusterConfig;
    pub use crate::domain::{
        ConfigError, ConfigKey, ConfigMap, ConfigValue, Endpoint, EndpointList, Result,
        SecretFormats, SecretReference, TlsProtocols, TlsVersion,
    };
    pub use crate::flags::{ClusterFlags, ConfFileFlags, FlagSet, FlagValue};
    pub use crate::ports::{ConfigGetter, ConfigUnmarshaller};
    pub use crate::service::{Config, ConfigLoader, FlagResolver, Loader, ToolsConfig};

    // Re-export adapters based on feature flags
    pub use crate::adapters::{BytesGetter, ConfigLocations, FileGetter};
    #[cfg(feature = "cli")]
    pub use crate::adapters::CommandLineAdapter;
    #[cfg(feature = "tls")]
    pub use crate::client::TlsMaterial;
    #[cfg(feature = "toml")]
    pub use crate::adapters::TomlUnmarshaller;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlUnmarshaller;
}
