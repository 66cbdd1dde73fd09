// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON Schema validation of configuration documents.

use crate::domain::{ConfigError, ConfigMap, Result};

/// Schema for the standard cluster connection section.
///
/// Applies to `cluster` and to every instance override `cluster_<instance>`.
pub const CLUSTER_SCHEMA: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "object",
  "patternProperties": {
    "^cluster(_.+)?$": {
      "type": "object",
      "properties": {
        "host": { "type": ["string", "array"] },
        "port": { "type": "integer", "minimum": 0, "maximum": 65535 },
        "user": { "type": "string" },
        "password": { "type": "string" },
        "auth": { "type": "string", "enum": ["INTERNAL", "EXTERNAL", "PKI", "internal", "external", "pki"] },
        "tls-enable": { "type": "boolean" },
        "tls-name": { "type": "string" },
        "tls-protocols": { "type": "string" },
        "tls-cafile": { "type": "string" },
        "tls-capath": { "type": "string" },
        "tls-certfile": { "type": "string" },
        "tls-keyfile": { "type": "string" },
        "tls-keyfile-password": { "type": "string" }
      },
      "additionalProperties": false
    }
  }
}"#;

/// Validates `data` against each schema and reports every violation.
pub fn validate(data: &ConfigMap, schemas: &[&str]) -> Result<()> {
    let instance = serde_json::to_value(data).map_err(|e| ConfigError::ParseError {
        message: "Failed to convert configuration to JSON".to_string(),
        source: Some(Box::new(e)),
    })?;

    let mut violations = Vec::new();
    for schema in schemas {
        let schema: serde_json::Value =
            serde_json::from_str(schema).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse schema: {}", e),
                source: Some(Box::new(e)),
            })?;

        let validator =
            jsonschema::validator_for(&schema).map_err(|e| ConfigError::ParseError {
                message: format!("Invalid schema: {}", e),
                source: None,
            })?;

        violations.extend(validator.iter_errors(&instance).map(|e| {
            let path = e.instance_path.to_string();
            if path.is_empty() {
                e.to_string()
            } else {
                format!("{}: {}", path, e)
            }
        }));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        tracing::debug!("Configuration has {} schema violation(s)", violations.len());
        Err(ConfigError::SchemaViolation { violations })
    }
}
