// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing getter and unmarshaller implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: getters for files and in-memory documents, unmarshallers for
//! the supported file formats, and the command-line parser for flag sets.

#[cfg(feature = "cli")]
pub mod cli;
pub mod file;
#[cfg(feature = "toml")]
pub mod toml_format;
#[cfg(feature = "yaml")]
pub mod yaml_format;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::CommandLineAdapter;
pub use file::{BytesGetter, ConfigLocations, FileGetter};
#[cfg(feature = "toml")]
pub use toml_format::TomlUnmarshaller;
#[cfg(feature = "yaml")]
pub use yaml_format::YamlUnmarshaller;
