// ABOUTME: Reserved EMBEDDINGS provider (spec §4.A.3) — not implemented.
// ABOUTME: Exists so the registry can report EMBEDDINGS as a known-but-unsupported method.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::errors::{AppError, AppResult};
use crate::search::{AvailableTool, SearchHit, SearchProvider, SearchQuery};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reserved `provider_config` shape for EMBEDDINGS, kept in the config
/// surface so stored configurations don't break once the method becomes
/// available (spec §4.A.3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingsConfig {
    /// Embedding model identifier.
    pub model: Option<String>,
    /// Minimum cosine similarity for a hit to be retained, `[0, 1]`.
    pub similarity_threshold: Option<f64>,
}

/// Placeholder provider for the reserved EMBEDDINGS method. Every operation
/// fails with [`crate::errors::ErrorKind::Search`] — the registry is
/// responsible for reporting EMBEDDINGS as unsupported before ever
/// constructing one of these.
pub struct EmbeddingsProvider;

impl EmbeddingsProvider {
    /// Construct the placeholder provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for EmbeddingsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for EmbeddingsProvider {
    fn name(&self) -> &'static str {
        "EMBEDDINGS"
    }

    async fn initialize(&self, _config: Option<&serde_json::Value>) -> AppResult<()> {
        Err(AppError::search("EMBEDDINGS provider is not implemented"))
    }

    async fn search(
        &self,
        _query: &SearchQuery,
        _available: &[AvailableTool],
    ) -> AppResult<Vec<SearchHit>> {
        Err(AppError::search("EMBEDDINGS provider is not implemented"))
    }

    async fn dispose(&self) -> AppResult<()> {
        Ok(())
    }
}
