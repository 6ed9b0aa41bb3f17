// ABOUTME: Domain entities for the tool-discovery configuration hierarchy.
// ABOUTME: Namespace, Endpoint, ToolMapping, ToolSearchConfig, and the resolved per-request view.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Data Model
//!
//! Mirrors the entities of the specification's §3: [`Namespace`] and
//! [`Endpoint`] carry the inheritable defaults, [`ToolMapping`] carries the
//! per-(namespace, server, tool) `defer_loading` override, and
//! [`ToolSearchConfig`] tunes the search provider per namespace.
//! [`ResolvedConfig`] is the ephemeral, inheritance-free view a single
//! request operates on.

mod sanitize;
mod tool;

pub use sanitize::{public_tool_name, sanitize};
pub use tool::UpstreamTool;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// `tool_search_method` enumeration (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchMethod {
    /// Search disabled; every available tool is returned verbatim.
    None,
    /// Literal-substring / configured-pattern matching.
    Regex,
    /// Okapi BM25 ranked retrieval.
    Bm25,
    /// Reserved; not implemented.
    Embeddings,
}

impl SearchMethod {
    /// Short tag used in log fields and provider cache keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Regex => "REGEX",
            Self::Bm25 => "BM25",
            Self::Embeddings => "EMBEDDINGS",
        }
    }
}

/// Tri-state inherit sentinel. Never collapse this into a nullable `bool` —
/// that representation cannot distinguish "unset" from "deliberately false"
/// (spec §9, "Tri-state inherit sentinels").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tristate {
    /// Defer to the parent layer's value.
    #[default]
    Inherit,
    /// Explicitly on.
    Enabled,
    /// Explicitly off.
    Disabled,
}

impl Tristate {
    /// Resolve against a fallback, returning `None` when this value is
    /// [`Tristate::Inherit`] so the caller can fall through to the next
    /// layer.
    #[must_use]
    pub const fn resolve(self) -> Option<bool> {
        match self {
            Self::Inherit => None,
            Self::Enabled => Some(true),
            Self::Disabled => Some(false),
        }
    }
}

/// `tool_visibility_mode` enumeration (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolVisibility {
    /// All tools (subject to per-tool overrides) are advertised.
    #[default]
    All,
    /// Only enabled built-in tools are advertised.
    SearchOnly,
}

/// Tri-state override of [`ToolVisibility`], carried on an [`Endpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolVisibilityOverride {
    /// Defer to the namespace default.
    #[default]
    Inherit,
    /// All tools.
    All,
    /// Built-ins only.
    SearchOnly,
}

/// Tri-state override of [`SearchMethod`], carried on an [`Endpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchMethodOverride {
    /// Defer to the namespace default.
    #[default]
    Inherit,
    /// Disable search.
    None,
    /// Literal / configured-pattern matching.
    Regex,
    /// BM25 ranked retrieval.
    Bm25,
    /// Reserved.
    Embeddings,
}

impl SearchMethodOverride {
    /// Collapse into a concrete [`SearchMethod`] unless this is `Inherit`.
    #[must_use]
    pub const fn resolve(self) -> Option<SearchMethod> {
        match self {
            Self::Inherit => None,
            Self::None => Some(SearchMethod::None),
            Self::Regex => Some(SearchMethod::Regex),
            Self::Bm25 => Some(SearchMethod::Bm25),
            Self::Embeddings => Some(SearchMethod::Embeddings),
        }
    }
}

/// Logical grouping of upstream MCP servers, carrying namespace-wide
/// defaults that endpoints and tool mappings may override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    /// Stable identifier.
    pub uuid: Uuid,
    /// Default defer-loading behavior for endpoints that don't override it.
    pub default_defer_loading: bool,
    /// Default search method for endpoints that don't override it.
    pub default_search_method: SearchMethod,
    /// Default tool visibility for endpoints that don't override it.
    pub default_tool_visibility: ToolVisibility,
}

/// A client-visible view bound to exactly one namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Stable identifier.
    pub uuid: Uuid,
    /// Namespace this endpoint projects.
    pub namespace_uuid: Uuid,
    /// Defer-loading override.
    pub override_defer_loading: Tristate,
    /// Search-method override.
    pub override_search_method: SearchMethodOverride,
    /// Visibility override.
    pub override_tool_visibility: ToolVisibilityOverride,
}

/// Per-tool activation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolStatus {
    /// Tool is mapped and available.
    Active,
    /// Tool is mapped but hidden from discovery and dispatch.
    Inactive,
}

/// Per (namespace, upstream-server, tool) record.
///
/// Uniqueness: `tool_uuid` alone is the stable identity a caller addresses a
/// mapping by (spec §4.H's per-tool-uuid CRUD contract); `(namespace_uuid,
/// server_uuid, tool_name)` remains unique as well, since a server never
/// advertises the same tool name twice. The canonical public tool name is
/// `sanitize(server_name) + "__" + tool_name` (see [`public_tool_name`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMapping {
    /// Stable identifier a caller addresses this mapping by, independent of
    /// its (namespace, server, name) coordinates.
    pub tool_uuid: Uuid,
    /// Namespace this mapping belongs to.
    pub namespace_uuid: Uuid,
    /// Upstream server identifier.
    pub server_uuid: Uuid,
    /// Upstream server name, used to derive the public tool name.
    pub server_name: String,
    /// Upstream tool name.
    pub tool_name: String,
    /// Activation state.
    pub status: ToolStatus,
    /// Per-tool defer-loading override.
    pub defer_loading: Tristate,
}

impl ToolMapping {
    /// The stable, namespace-unique public name for this mapping.
    #[must_use]
    pub fn public_name(&self) -> String {
        public_tool_name(&self.server_name, &self.tool_name)
    }
}

/// Per-namespace search tuning (uniqueness: `namespace_uuid`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSearchConfig {
    /// Namespace this configuration tunes.
    pub namespace_uuid: Uuid,
    /// Maximum number of results a search may return, in `[1, 20]`.
    pub max_results: u32,
    /// Opaque, method-specific provider configuration.
    pub provider_config: Option<serde_json::Value>,
}

/// Default `max_results` when no [`ToolSearchConfig`] exists for a namespace.
pub const DEFAULT_MAX_RESULTS: u32 = 5;
/// Inclusive lower bound for `max_results`.
pub const MIN_MAX_RESULTS: u32 = 1;
/// Inclusive upper bound for `max_results`.
pub const MAX_MAX_RESULTS: u32 = 20;

/// Ephemeral, per-endpoint, inheritance-free snapshot used by a single
/// request. Built by [`crate::config::ConfigResolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Whether defer-loading is active for this endpoint.
    pub defer_loading_enabled: bool,
    /// The effective search method for this endpoint.
    pub search_method: SearchMethod,
    /// The effective tool-visibility mode for this endpoint.
    pub tool_visibility: ToolVisibility,
    /// Per-tool defer-loading overrides, keyed by public tool name.
    /// Contains only `true`/`false` entries — `Tristate::Inherit` never
    /// appears here (spec invariant 3).
    pub tool_overrides: HashMap<String, bool>,
    /// Effective `max_results` for search.
    pub max_results: u32,
    /// Effective provider configuration for search.
    pub provider_config: Option<serde_json::Value>,
}

impl ResolvedConfig {
    /// The fail-safe configuration returned when a namespace is missing or
    /// the backing fetch fails (spec §4.E). Deliberately the most
    /// conservative configuration: search disabled, defer-loading off,
    /// everything visible.
    #[must_use]
    pub fn fail_safe() -> Self {
        Self {
            defer_loading_enabled: false,
            search_method: SearchMethod::None,
            tool_visibility: ToolVisibility::All,
            tool_overrides: HashMap::new(),
            max_results: DEFAULT_MAX_RESULTS,
            provider_config: None,
        }
    }

    /// Whether `search_tools` should be advertised under this configuration
    /// (spec invariant 4).
    #[must_use]
    pub const fn search_tools_enabled(&self) -> bool {
        self.defer_loading_enabled && !matches!(self.search_method, SearchMethod::None)
    }
}
