// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer tying getters, unmarshallers and flags together.
//!
//! The loader chain produces a configuration document, [`Config`] caches it,
//! [`ToolsConfig`] scopes it to an instance and a set of sections, and
//! [`FlagResolver`] writes it into the flags the user did not set.

pub mod config;
pub mod loader;
pub mod resolver;
#[cfg(feature = "schema")]
pub mod schema;
pub mod scoped;

// Re-export commonly used types
pub use config::Config;
pub use loader::{ConfigLoader, LoadedConfig, Loader};
pub use resolver::{reset_default_resolver, with_default_resolver, FlagResolver};
#[cfg(feature = "schema")]
pub use schema::CLUSTER_SCHEMA;
pub use scoped::{filter_instance, filter_sections, scope, ToolsConfig};
