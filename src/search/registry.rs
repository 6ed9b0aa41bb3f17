// ABOUTME: Maps search methods to provider factories (spec §4.B).
// ABOUTME: NONE is always "supported" but has no factory; create("NONE") is an error.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::errors::{AppError, AppResult};
use crate::models::SearchMethod;
use crate::search::{Bm25Provider, RegexProvider, SearchProvider};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds a fresh provider instance for one search method.
pub trait ProviderFactory: Send + Sync {
    /// Instantiate a new, uninitialized provider.
    fn create(&self) -> Arc<dyn SearchProvider>;
}

struct FnFactory<F>(F);

impl<F> ProviderFactory for FnFactory<F>
where
    F: Fn() -> Arc<dyn SearchProvider> + Send + Sync,
{
    fn create(&self) -> Arc<dyn SearchProvider> {
        (self.0)()
    }
}

/// Registry of search-method → provider-factory bindings.
///
/// `NONE` is a non-provider sentinel (spec §9): it is always reported as
/// supported by [`ProviderRegistry::is_supported`] but has no factory, and
/// [`ProviderRegistry::create`] errors if asked to build one — the NONE
/// short-circuit lives in [`crate::search::SearchService`], one layer up.
pub struct ProviderRegistry {
    factories: HashMap<SearchMethod, Box<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    /// Build a registry with the REGEX and BM25 factories registered.
    /// EMBEDDINGS is intentionally left unregistered: `is_supported` reports
    /// `false` for it so callers fail fast instead of constructing a
    /// provider whose every operation errors.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register(SearchMethod::Regex, || {
            Arc::new(RegexProvider::new()) as Arc<dyn SearchProvider>
        });
        registry.register(SearchMethod::Bm25, || {
            Arc::new(Bm25Provider::new()) as Arc<dyn SearchProvider>
        });
        registry
    }

    /// Register (or replace) the factory for `method`.
    pub fn register<F>(&mut self, method: SearchMethod, factory: F)
    where
        F: Fn() -> Arc<dyn SearchProvider> + Send + Sync + 'static,
    {
        self.factories
            .insert(method, Box::new(FnFactory(factory)));
    }

    /// Whether `method` can be used for search. `NONE` is always supported
    /// (handled without a provider); `EMBEDDINGS` is reserved and reports
    /// `false` until a factory is registered for it.
    #[must_use]
    pub fn is_supported(&self, method: SearchMethod) -> bool {
        matches!(method, SearchMethod::None) || self.factories.contains_key(&method)
    }

    /// Instantiate a fresh, uninitialized provider for `method`.
    ///
    /// # Errors
    /// Returns [`crate::errors::ErrorKind::Search`] if `method` is `NONE`
    /// (not a provider) or has no registered factory (e.g. `EMBEDDINGS`).
    pub fn create(&self, method: SearchMethod) -> AppResult<Arc<dyn SearchProvider>> {
        if matches!(method, SearchMethod::None) {
            return Err(AppError::search("NONE is not a provider method"));
        }
        self.factories
            .get(&method)
            .map(|factory| factory.create())
            .ok_or_else(|| {
                AppError::search(format!("unsupported search method: {}", method.as_str()))
            })
    }

    /// Every method with a registered factory, in no particular order.
    #[must_use]
    pub fn list(&self) -> Vec<SearchMethod> {
        self.factories.keys().copied().collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_supported_but_has_no_factory() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_supported(SearchMethod::None));
        assert!(registry.create(SearchMethod::None).is_err());
    }

    #[test]
    fn regex_and_bm25_are_supported() {
        let registry = ProviderRegistry::new();
        assert!(registry.is_supported(SearchMethod::Regex));
        assert!(registry.is_supported(SearchMethod::Bm25));
        assert!(registry.create(SearchMethod::Regex).is_ok());
        assert!(registry.create(SearchMethod::Bm25).is_ok());
    }

    #[test]
    fn embeddings_is_reserved_and_unsupported() {
        let registry = ProviderRegistry::new();
        assert!(!registry.is_supported(SearchMethod::Embeddings));
        assert!(registry.create(SearchMethod::Embeddings).is_err());
    }
}
