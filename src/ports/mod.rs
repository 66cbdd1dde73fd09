// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the two seams of the configuration loader: getters,
//! which produce raw bytes, and unmarshallers, which decode them. Adapters in the
//! adapters layer implement them for files and concrete formats.

pub mod getter;
pub mod unmarshaller;

// Re-export commonly used types
pub use getter::ConfigGetter;
pub use unmarshaller::ConfigUnmarshaller;
