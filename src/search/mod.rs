// ABOUTME: Pluggable ranked-retrieval over a tool pool: the SearchProvider contract and its types.
// ABOUTME: See registry.rs for provider instantiation/caching and service.rs for the NONE-aware facade.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Search Providers
//!
//! A provider has a stable name identifying its method and three operations:
//! [`SearchProvider::initialize`], [`SearchProvider::search`], and
//! [`SearchProvider::dispose`]. `initialize` is idempotent for the same
//! config. Providers must not retain references to the tool list between
//! calls (spec §4.A).

mod bm25;
mod embeddings;
pub mod registry;
mod regex_provider;
pub mod service;

pub use bm25::Bm25Provider;
pub use embeddings::EmbeddingsProvider;
pub use registry::ProviderRegistry;
pub use regex_provider::RegexProvider;
pub use service::SearchService;

use crate::errors::AppResult;
use crate::models::UpstreamTool;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default `maxResults` applied when a [`SearchQuery`] doesn't specify one.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// `matchReason` used by both REGEX and BM25 for an empty query (spec §4.A,
/// "Empty-query policy").
pub const EMPTY_QUERY_MATCH_REASON: &str = "No search query provided";

/// Input to [`SearchProvider::search`].
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Free-text query; empty string triggers the empty-query policy.
    pub query: String,
    /// Caps the number of returned results; defaults to
    /// [`DEFAULT_MAX_RESULTS`] when absent.
    pub max_results: Option<usize>,
    /// Namespace this search is scoped to, for logging only.
    pub namespace_uuid: Option<Uuid>,
    /// Endpoint this search is scoped to, for logging only.
    pub endpoint_uuid: Option<Uuid>,
}

impl SearchQuery {
    /// Build a query with no result cap and no logging context.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: None,
            namespace_uuid: None,
            endpoint_uuid: None,
        }
    }

    /// The effective result cap: `max_results` if set, else the default.
    #[must_use]
    pub fn effective_max_results(&self) -> usize {
        self.max_results.unwrap_or(DEFAULT_MAX_RESULTS)
    }
}

/// A candidate tool paired with the upstream server it came from.
#[derive(Debug, Clone)]
pub struct AvailableTool {
    /// The tool definition as advertised by its upstream server.
    pub tool: UpstreamTool,
    /// The upstream server this tool belongs to.
    pub server_uuid: Uuid,
}

/// One ranked hit.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The matched tool.
    pub tool: UpstreamTool,
    /// The upstream server the tool belongs to.
    pub server_uuid: Uuid,
    /// Relevance score in `[0, 1]`.
    pub score: f64,
    /// Human-readable explanation of why this tool matched.
    pub match_reason: String,
}

/// `provider_config` shape used when the resolved search method is BM25
/// (spec §3, ToolSearchConfig schema).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Bm25Config {
    /// Term-frequency saturation parameter, `[0, 3]`.
    #[serde(default = "Bm25Config::default_k1")]
    pub k1: f64,
    /// Length-normalization parameter, `[0, 1]`.
    #[serde(default = "Bm25Config::default_b")]
    pub b: f64,
}

impl Bm25Config {
    const fn default_k1() -> f64 {
        1.2
    }

    const fn default_b() -> f64 {
        0.75
    }
}

impl Default for Bm25Config {
    fn default() -> Self {
        Self {
            k1: Self::default_k1(),
            b: Self::default_b(),
        }
    }
}

/// Fields BM25 and REGEX concatenate/search over, when not overridden by
/// `provider_config.fields` (spec §4.A.1, §4.A.2 both default to
/// `{name, description}`).
#[must_use]
pub fn default_search_fields() -> Vec<String> {
    vec!["name".to_owned(), "description".to_owned()]
}

/// Extract an optional `fields` array from an opaque provider config,
/// falling back to [`default_search_fields`] when absent or malformed.
#[must_use]
pub fn configured_fields(config: Option<&serde_json::Value>) -> Vec<String> {
    config
        .and_then(|c| c.get("fields"))
        .and_then(|f| f.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect::<Vec<_>>()
        })
        .filter(|fields| !fields.is_empty())
        .unwrap_or_else(default_search_fields)
}

/// Capability set every search provider implements (spec §4.A, §9 "Provider
/// polymorphism").
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Stable identifier for this provider's method, used in log fields and
    /// provider cache keys.
    fn name(&self) -> &'static str;

    /// Apply (or re-apply) a configuration. Idempotent for the same config.
    async fn initialize(&self, config: Option<&serde_json::Value>) -> AppResult<()>;

    /// Rank `available` against `query`, per this provider's method.
    async fn search(
        &self,
        query: &SearchQuery,
        available: &[AvailableTool],
    ) -> AppResult<Vec<SearchHit>>;

    /// Release any resources held by this provider. Called on cache
    /// eviction; disposal errors are logged and swallowed by the caller.
    async fn dispose(&self) -> AppResult<()>;
}

/// Clamp a raw score into the `[0, 1]` range providers must return (spec
/// §4.A).
#[must_use]
pub fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}
