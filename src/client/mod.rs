// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side connection settings.
//!
//! Turns resolved flags into seeds, credentials and TLS material ready to hand
//! to a database client.

pub mod config;
#[cfg(feature = "tls")]
pub mod tls;

pub use config::ClusterConfig;
#[cfg(feature = "tls")]
pub use tls::{Identity, TlsMaterial, TrustPool};
