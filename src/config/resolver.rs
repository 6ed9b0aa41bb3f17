// ABOUTME: Caching, single-flight wrapper around resolve() keyed by endpoint UUID.
// ABOUTME: Concurrent lookups for the same endpoint coalesce into one store fetch; see spec §4.E.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::config::resolve::resolve;
use crate::errors::AppResult;
use crate::logging::CoreLogger;
use crate::models::ResolvedConfig;
use crate::store::{ConfigStore, InvalidationSink};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

/// Tuning knobs for [`ConfigResolver`]. Currently only a construction-time
/// placeholder; kept as its own type so new knobs (e.g. a TTL) don't become a
/// breaking change to [`ConfigResolver::new`].
#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
    /// Reserved for a future time-based cache expiry; unused today — the
    /// cache is invalidated purely by explicit [`InvalidationSink`] calls.
    pub _reserved: (),
}

/// Resolves and caches [`ResolvedConfig`] per endpoint, coalescing concurrent
/// misses for the same endpoint into a single store fetch (spec §4.E).
///
/// Failed fetches return [`ResolvedConfig::fail_safe`] and are never cached,
/// so the next lookup retries against the store.
pub struct ConfigResolver {
    store: Arc<dyn ConfigStore>,
    cache: DashMap<Uuid, Arc<ResolvedConfig>>,
    in_flight: DashMap<Uuid, Arc<Mutex<()>>>,
    _config: ResolverConfig,
}

impl ConfigResolver {
    /// Build a resolver backed by `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self::with_config(store, ResolverConfig::default())
    }

    /// Build a resolver backed by `store`, with explicit tuning.
    #[must_use]
    pub fn with_config(store: Arc<dyn ConfigStore>, config: ResolverConfig) -> Self {
        Self {
            store,
            cache: DashMap::new(),
            in_flight: DashMap::new(),
            _config: config,
        }
    }

    /// Resolve the effective configuration for `endpoint_uuid`, consulting the
    /// cache first and coalescing concurrent misses.
    ///
    /// Per spec §4.E, a store error never poisons the cache: the caller gets
    /// [`ResolvedConfig::fail_safe`] back and the next call retries from
    /// scratch.
    pub async fn resolve(&self, endpoint_uuid: Uuid) -> Arc<ResolvedConfig> {
        if let Some(hit) = self.cache.get(&endpoint_uuid) {
            CoreLogger::log_resolve_cache(endpoint_uuid, true);
            return Arc::clone(&hit);
        }

        let lock = Arc::clone(
            &self
                .in_flight
                .entry(endpoint_uuid)
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        );
        let _guard = lock.lock().await;

        // Re-check: another caller may have populated the cache while we
        // waited for the lock.
        if let Some(hit) = self.cache.get(&endpoint_uuid) {
            CoreLogger::log_resolve_cache(endpoint_uuid, true);
            return Arc::clone(&hit);
        }

        let resolved = match self.fetch_and_resolve(endpoint_uuid).await {
            Ok(resolved) => {
                let resolved = Arc::new(resolved);
                self.cache.insert(endpoint_uuid, Arc::clone(&resolved));
                CoreLogger::log_resolve_cache(endpoint_uuid, false);
                resolved
            }
            Err(err) => {
                warn!(
                    event_type = "resolve_fail_safe",
                    endpoint_uuid = %endpoint_uuid,
                    error = %err,
                    "config fetch failed, serving fail-safe defaults uncached"
                );
                Arc::new(ResolvedConfig::fail_safe())
            }
        };

        self.in_flight.remove(&endpoint_uuid);
        resolved
    }

    async fn fetch_and_resolve(&self, endpoint_uuid: Uuid) -> AppResult<ResolvedConfig> {
        let endpoint = self.store.find_endpoint(endpoint_uuid).await?;
        let Some(endpoint) = endpoint else {
            return Err(crate::errors::AppError::not_found(format!(
                "endpoint {endpoint_uuid} not found"
            )));
        };
        let namespace = self.store.find_namespace(endpoint.namespace_uuid).await?;
        let Some(namespace) = namespace else {
            return Err(crate::errors::AppError::not_found(format!(
                "namespace {} not found",
                endpoint.namespace_uuid
            )));
        };
        let tool_overrides = self
            .store
            .find_tool_defer_loading_overrides(namespace.uuid)
            .await?;
        let search_config = self.store.find_tool_search_config(namespace.uuid).await?;

        Ok(resolve(
            &namespace,
            Some(&endpoint),
            tool_overrides,
            search_config.as_ref(),
        ))
    }
}

#[async_trait]
impl InvalidationSink for ConfigResolver {
    async fn invalidate_endpoint(&self, endpoint_uuid: Uuid) {
        if self.cache.remove(&endpoint_uuid).is_some() {
            CoreLogger::log_cache_invalidate(Some(endpoint_uuid));
        }
    }

    async fn invalidate_all(&self) {
        self.cache.clear();
        CoreLogger::log_cache_invalidate(None);
    }
}
