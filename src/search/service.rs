// ABOUTME: NONE-aware search facade: one public operation, search() (spec §4.B).
// ABOUTME: Caches initialized providers keyed by (method, canonical-json(config)) with LRU eviction.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::errors::AppResult;
use crate::logging::CoreLogger;
use crate::models::{ResolvedConfig, SearchMethod};
use crate::search::{
    AvailableTool, ProviderRegistry, SearchHit, SearchProvider, SearchQuery,
    DEFAULT_MAX_RESULTS,
};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Bound on the number of distinct (method, config) providers kept warm at
/// once (spec §5, "Resource budget": "Provider caches SHOULD bound their
/// size (e.g., 32 entries) with LRU eviction calling dispose()").
const PROVIDER_CACHE_CAPACITY: usize = 32;

type CacheKey = (SearchMethod, String);

/// The single public search entry point: obtains/creates a provider for the
/// resolved method, special-cases `NONE`, and returns ranked hits.
pub struct SearchService {
    registry: ProviderRegistry,
    cache: Mutex<LruCache<CacheKey, Arc<dyn SearchProvider>>>,
}

impl SearchService {
    /// Build a service around the default [`ProviderRegistry`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(ProviderRegistry::new())
    }

    /// Build a service around a caller-supplied registry (useful for tests
    /// or to register custom provider factories).
    #[must_use]
    pub fn with_registry(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(PROVIDER_CACHE_CAPACITY)
                    .unwrap_or_else(|| NonZeroUsize::new(1).expect("1 is nonzero")),
            )),
        }
    }

    /// Rank `available` against `query` under the method and provider
    /// configuration named by `resolved`.
    ///
    /// If `resolved.search_method` is `NONE`, every available tool is
    /// returned unranked with a neutral score, bypassing the provider cache
    /// entirely (spec §4.B).
    pub async fn search(
        &self,
        mut query: SearchQuery,
        available: &[AvailableTool],
        resolved: &ResolvedConfig,
    ) -> AppResult<Vec<SearchHit>> {
        if query.max_results.is_none() {
            query.max_results = Some(usize::try_from(resolved.max_results).unwrap_or(DEFAULT_MAX_RESULTS));
        }

        if matches!(resolved.search_method, SearchMethod::None) {
            let max_results = query.effective_max_results();
            return Ok(available
                .iter()
                .take(max_results)
                .map(|candidate| SearchHit {
                    tool: candidate.tool.clone(),
                    server_uuid: candidate.server_uuid,
                    score: 0.5,
                    match_reason: "Search disabled (method: NONE)".to_owned(),
                })
                .collect());
        }

        let provider = self
            .provider_for(resolved.search_method, resolved.provider_config.as_ref())
            .await?;
        provider.search(&query, available).await
    }

    async fn provider_for(
        &self,
        method: SearchMethod,
        config: Option<&serde_json::Value>,
    ) -> AppResult<Arc<dyn SearchProvider>> {
        let key = Self::cache_key(method, config);
        {
            let mut cache = self.cache.lock().await;
            if let Some(provider) = cache.get(&key) {
                return Ok(Arc::clone(provider));
            }
        }

        let provider = self.registry.create(method)?;
        provider.initialize(config).await?;

        let mut cache = self.cache.lock().await;
        if let Some((_, evicted)) = cache.push(key, Arc::clone(&provider)) {
            Self::dispose_in_background(evicted);
        }
        Ok(provider)
    }

    fn cache_key(method: SearchMethod, config: Option<&serde_json::Value>) -> CacheKey {
        let canonical = config.map_or_else(|| "null".to_owned(), serde_json::Value::to_string);
        (method, canonical)
    }

    fn dispose_in_background(provider: Arc<dyn SearchProvider>) {
        tokio::spawn(async move {
            if let Err(error) = provider.dispose().await {
                CoreLogger::log_provider_dispose_failure(provider.name(), &error.to_string());
            }
        });
    }

    /// Dispose every cached provider and clear the cache.
    pub async fn clear(&self) {
        let mut cache = self.cache.lock().await;
        for (_, provider) in cache.iter() {
            if let Err(error) = provider.dispose().await {
                CoreLogger::log_provider_dispose_failure(provider.name(), &error.to_string());
            }
        }
        cache.clear();
    }

    /// Dispose and remove only the cached providers for `method`.
    pub async fn clear_method(&self, method: SearchMethod) {
        let mut cache = self.cache.lock().await;
        let keys: Vec<CacheKey> = cache
            .iter()
            .filter(|((m, _), _)| *m == method)
            .map(|(k, _)| k.clone())
            .collect();
        for key in keys {
            if let Some(provider) = cache.pop(&key) {
                if let Err(error) = provider.dispose().await {
                    CoreLogger::log_provider_dispose_failure(method.as_str(), &error.to_string());
                }
            }
        }
    }
}

impl Default for SearchService {
    fn default() -> Self {
        Self::new()
    }
}
