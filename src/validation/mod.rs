// ABOUTME: Permissive JSON-Schema validation wrapper for execute_tool's argument check (spec §4.D).
// ABOUTME: Collects every error, tolerates unknown keywords, and never throws on a bad schema.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use jsonschema::JSONSchema;
use serde_json::Value;

/// One formatted validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// JSON Pointer to the offending value, or `"(root)"` when the error
    /// applies to the whole instance.
    pub instance_path: String,
    /// Human-readable explanation.
    pub message: String,
}

impl ValidationError {
    fn schema_error(message: impl Into<String>) -> Self {
        Self {
            instance_path: "(root)".to_owned(),
            message: message.into(),
        }
    }
}

/// The schema assumed when a tool declares no `inputSchema` at all (spec
/// §4.D).
#[must_use]
pub fn permissive_object_schema() -> Value {
    serde_json::json!({"type": "object", "additionalProperties": true})
}

/// Validate `arguments` against `schema` (or, when `schema` is `None`, the
/// implicit "any object" schema), collecting every error rather than
/// stopping at the first.
///
/// A schema that fails to compile is reported as a single
/// `{instance_path: "(root)", message: "Invalid tool schema: ..."}` error —
/// never as a Rust `Err`, matching spec §4.D point 3.
#[must_use]
pub fn validate_arguments(schema: Option<&Value>, arguments: &Value) -> Vec<ValidationError> {
    let owned_default;
    let effective_schema = match schema {
        Some(schema) => schema,
        None => {
            owned_default = permissive_object_schema();
            &owned_default
        }
    };

    let compiled = match JSONSchema::compile(effective_schema) {
        Ok(compiled) => compiled,
        Err(error) => {
            return vec![ValidationError::schema_error(format!(
                "Invalid tool schema: {error}"
            ))]
        }
    };

    let result = match compiled.validate(arguments) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|error| {
                let pointer = error.instance_path.to_string();
                let instance_path = if pointer.is_empty() {
                    "(root)".to_owned()
                } else {
                    pointer
                };
                ValidationError {
                    instance_path,
                    message: error.to_string(),
                }
            })
            .collect(),
    };
    result
}
