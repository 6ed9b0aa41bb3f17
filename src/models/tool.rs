// ABOUTME: The upstream-supplied tool shape shared by search, middleware, and dispatch.
// ABOUTME: Immutable once fetched from upstream; flag application always clones.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};

/// An MCP tool as advertised by an upstream server (or a built-in).
///
/// `input_schema` is kept as a raw [`serde_json::Value`] rather than a typed
/// schema struct because upstream servers may use arbitrary JSON-Schema
/// keywords this crate has no business modeling — only the built-in
/// `execute_tool` validator needs to interpret it, and it does so
/// permissively (see [`crate::validation`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamTool {
    /// Public tool name, unique within one advertised list.
    pub name: String,
    /// Human-readable description shown to the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input arguments.
    #[serde(rename = "inputSchema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<serde_json::Value>,
    /// Hint that a client may omit the full schema from its context until
    /// needed. Per spec §6, this field is omitted entirely when `false` and
    /// is always the literal `true` when present — so it is represented as
    /// `Option<True>`-shaped via `skip_serializing_if`, never serialized as
    /// `false`.
    #[serde(rename = "defer_loading", skip_serializing_if = "Option::is_none")]
    pub defer_loading: Option<bool>,
}

impl UpstreamTool {
    /// Construct a tool with no schema, description, or defer flag.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: None,
            defer_loading: None,
        }
    }

    /// Builder-style description setter.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder-style schema setter.
    #[must_use]
    pub fn with_input_schema(mut self, schema: serde_json::Value) -> Self {
        self.input_schema = Some(schema);
        self
    }

    /// A clone of this tool with `defer_loading` set to `Some(true)`.
    ///
    /// Never mutates `self` — upstream tool objects must never be mutated in
    /// place (spec §5, "Immutability rules"); every flag application is a
    /// fresh clone.
    #[must_use]
    pub fn with_defer_loading_flag(&self) -> Self {
        let mut clone = self.clone();
        clone.defer_loading = Some(true);
        clone
    }

    /// Description text to use when none was supplied, per spec §4.C.
    #[must_use]
    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or("No description available")
    }
}
