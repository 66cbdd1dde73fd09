// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! This module defines the error types that can occur while loading configuration,
//! resolving secret references, parsing endpoints and building TLS material.
//! All errors use `thiserror` for proper error handling and conversion.

use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// Boxed error used as the underlying cause of a [`ConfigError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for configuration operations.
///
/// Every variant carries enough context to identify what failed, and wraps the
/// underlying cause where one exists so callers can print the whole chain. It is
/// marked as `#[non_exhaustive]` to allow for future additions without breaking
/// backwards compatibility.
///
/// # Examples
///
/// ```
/// use toolcfg::domain::errors::ConfigError;
///
/// fn get_config_value() -> Result<String, ConfigError> {
///     Err(ConfigError::ConfigKeyNotFound {
///         key: "cluster.host".to_string(),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The requested configuration key or flag was not found.
    #[error("Configuration key not found: {key}")]
    ConfigKeyNotFound {
        /// The key that was not found
        key: String,
    },

    /// Failed to convert a raw string to the requested type.
    #[error("Failed to convert value '{value}' to type {target_type}: {source}")]
    TypeConversionError {
        /// The value being converted
        value: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: BoxError,
    },

    /// An error occurred in a single configuration getter.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<BoxError>,
    },

    /// Failed to parse a configuration document or value.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<BoxError>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Every getter in a loader chain failed.
    #[error("failed to get config")]
    SourceUnavailable {
        /// The error returned by the last getter tried
        #[source]
        source: Option<Box<ConfigError>>,
    },

    /// Every unmarshaller in a loader chain rejected the configuration bytes.
    #[error("failed to unmarshal config")]
    FormatUnrecognized {
        /// The error returned by the last unmarshaller tried
        #[source]
        source: Option<Box<ConfigError>>,
    },

    /// A secret reference could not be resolved.
    #[error("failed to resolve secret reference '{reference}': {message}")]
    SecretUnresolved {
        /// The reference as written, without its payload for base64 blobs
        reference: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<BoxError>,
    },

    /// An endpoint token did not match any supported notation.
    #[error("invalid endpoint '{token}': {message}")]
    EndpointSyntax {
        /// The offending token
        token: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<BoxError>,
    },

    /// A TLS protocol selection string was rejected.
    #[error("invalid TLS protocols '{value}': {message}")]
    InvalidTlsProtocols {
        /// The selection string as given
        value: String,
        /// The error message
        message: String,
    },

    /// Certificate or key material could not be turned into a TLS bundle.
    #[error("invalid TLS material: {message}")]
    TlsMaterial {
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<BoxError>,
    },

    /// The configuration failed schema validation.
    ///
    /// All violations are reported together.
    #[error("configuration failed schema validation: {}", violations.join("; "))]
    SchemaViolation {
        /// Every violated rule, one entry per failure
        violations: Vec<String>,
    },

    /// A flag rejected the value it was given.
    #[error("invalid value '{value}' for flag '{flag}': {source}")]
    InvalidFlagValue {
        /// The flag name
        flag: String,
        /// The rejected value
        value: String,
        /// The error returned by the flag's setter
        #[source]
        source: Box<ConfigError>,
    },

    /// A flag set could not be built or parsed.
    #[error("flag error: {message}")]
    FlagError {
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<BoxError>,
    },
}

// Implement conversions from common parsing errors to TypeConversionError
impl ConfigError {
    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(value: impl Into<String>, err: ParseIntError) -> Self {
        ConfigError::TypeConversionError {
            value: value.into(),
            target_type: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseFloatError.
    pub fn from_parse_float_error(value: impl Into<String>, err: ParseFloatError) -> Self {
        ConfigError::TypeConversionError {
            value: value.into(),
            target_type: "float".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError for a value that is not a recognized boolean.
    pub fn invalid_bool(value: impl Into<String>) -> Self {
        let value = value.into();
        ConfigError::TypeConversionError {
            source: format!("'{}' is not a boolean", value).into(),
            value,
            target_type: "boolean".to_string(),
        }
    }

    /// Creates a TlsMaterial error with the given message and cause.
    pub fn tls(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ConfigError::TlsMaterial {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
