// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration getter trait definition.
//!
//! A getter produces the raw bytes of a configuration document. Loaders hold an
//! ordered list of getters and keep the bytes of the first one that succeeds,
//! which lets a tool say "this explicit file, else the well-known default".

use crate::domain::Result;
use std::path::Path;

/// A source of raw configuration bytes.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow for use in multi-threaded contexts.
///
/// # Examples
///
/// ```rust
/// use toolcfg::ports::ConfigGetter;
/// use toolcfg::domain::Result;
///
/// struct Inline;
///
/// impl ConfigGetter for Inline {
///     fn name(&self) -> &str {
///         "inline"
///     }
///
///     fn get_bytes(&self) -> Result<Vec<u8>> {
///         Ok(b"[cluster]\nhost = \"127.0.0.1\"\n".to_vec())
///     }
/// }
///
/// assert!(!Inline.get_bytes().unwrap().is_empty());
/// ```
pub trait ConfigGetter: Send + Sync {
    /// Returns a short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Returns the configuration bytes.
    ///
    /// An `Ok` with empty content is a success: the loader stops here and hands
    /// the empty document to its unmarshallers.
    fn get_bytes(&self) -> Result<Vec<u8>>;

    /// Returns the file this getter reads, if it reads one.
    fn origin(&self) -> Option<&Path> {
        None
    }
}
