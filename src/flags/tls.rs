// SPDX-License-Identifier: MIT OR Apache-2.0

//! TLS protocol selection.

use crate::domain::{Result, TlsProtocols};
use crate::flags::FlagValue;
use std::any::Any;
use std::fmt;

/// A TLS protocol selection such as `"-all +TLSv1.2 +TLSv1.3"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TlsProtocolsValue(TlsProtocols);

impl TlsProtocolsValue {
    /// Creates a value holding the default selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current selection.
    pub fn get(&self) -> TlsProtocols {
        self.0
    }
}

impl FlagValue for TlsProtocolsValue {
    fn set(&mut self, value: &str) -> Result<()> {
        self.0 = TlsProtocols::parse(value)?;
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        "\"[[+][-]all] [[+][-]TLSv1] [[+][-]TLSv1.1] [[+][-]TLSv1.2] [[+][-]TLSv1.3]\""
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for TlsProtocolsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
