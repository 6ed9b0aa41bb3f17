// ABOUTME: ToolDiscoveryService — the facade wiring config resolution, search, and middleware together.
// ABOUTME: Mirrors ToolSelectionService's with_config/with_ttl constructor family from the teacher.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::config::ConfigResolver;
use crate::errors::AppResult;
use crate::models::{ResolvedConfig, UpstreamTool};
use crate::search::{AvailableTool, ProviderRegistry, SearchService};
use crate::store::ConfigStore;
use crate::tools::{execute_tool as execute_tool_dispatch, search_tools as search_tools_dispatch, ProxyInvoker, ToolCallResult};
use std::sync::Arc;
use uuid::Uuid;

/// Service-construction configuration (spec §AMBIENT-3): not environment or
/// CLI surface, just the knobs a host process may want control over when
/// assembling a [`ToolDiscoveryService`].
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Default `max_results` used when a namespace has no [`crate::models::ToolSearchConfig`].
    pub default_max_results: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_max_results: crate::models::DEFAULT_MAX_RESULTS,
        }
    }
}

/// Ties the config resolver, search service, and middleware together behind
/// one facade, matching the teacher's `ToolSelectionService` shape: a
/// `new`/`with_config` constructor pair plus a handful of focused public
/// operations.
pub struct ToolDiscoveryService {
    resolver: Arc<ConfigResolver>,
    search: SearchService,
    _config: CoreConfig,
}

impl ToolDiscoveryService {
    /// Build a service over `store` with documented defaults: no resolver
    /// cache TTL (correctness requires immediate invalidation, not staleness
    /// tolerance) and a 32-entry provider cache (spec §5's resource budget).
    #[must_use]
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self::with_config(store, CoreConfig::default())
    }

    /// Build a service over `store` with explicit [`CoreConfig`].
    #[must_use]
    pub fn with_config(store: Arc<dyn ConfigStore>, config: CoreConfig) -> Self {
        Self {
            resolver: Arc::new(ConfigResolver::new(store)),
            search: SearchService::with_registry(ProviderRegistry::new()),
            _config: config,
        }
    }

    /// The resolver, so a caller (e.g. an `InMemoryStore`) can be wired as
    /// its [`crate::store::InvalidationSink`].
    #[must_use]
    pub fn resolver(&self) -> Arc<ConfigResolver> {
        Arc::clone(&self.resolver)
    }

    /// Resolve the effective configuration for `endpoint_uuid`.
    pub async fn resolved_config(&self, endpoint_uuid: Uuid) -> Arc<ResolvedConfig> {
        self.resolver.resolve(endpoint_uuid).await
    }

    /// Run the list-tools middleware pipeline for `endpoint_uuid` over
    /// `upstream`.
    pub async fn advertise_tools(
        &self,
        endpoint_uuid: Uuid,
        upstream: &[UpstreamTool],
    ) -> Vec<UpstreamTool> {
        let resolved = self.resolved_config(endpoint_uuid).await;
        crate::middleware::advertise_tools(upstream, &resolved)
    }

    /// Run the built-in `search_tools` tool for `endpoint_uuid`.
    pub async fn search_tools(
        &self,
        endpoint_uuid: Uuid,
        arguments: &serde_json::Value,
        available: &[AvailableTool],
    ) -> AppResult<ToolCallResult> {
        let resolved = self.resolved_config(endpoint_uuid).await;
        search_tools_dispatch(arguments, available, &resolved, &self.search).await
    }

    /// Run the built-in `execute_tool` tool, delegating a valid call to
    /// `proxy`.
    pub async fn execute_tool(
        &self,
        arguments: &serde_json::Value,
        candidates: &[UpstreamTool],
        proxy: &dyn ProxyInvoker,
    ) -> ToolCallResult {
        execute_tool_dispatch(arguments, candidates, proxy).await
    }
}
