// ABOUTME: The invalidation callback a ConfigStore write must drive after committing.
// ABOUTME: Decouples the store from the resolver cache it invalidates.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use async_trait::async_trait;
use uuid::Uuid;

/// Receives cache-invalidation signals after a [`super::ConfigStore`] write.
///
/// [`crate::config::ConfigResolver`] implements this trait; a store
/// implementation should be constructed with (or otherwise given) a handle to
/// the resolver in use and call [`InvalidationSink::invalidate_endpoint`] for
/// every endpoint UUID a write affects, per spec §4.G.
#[async_trait]
pub trait InvalidationSink: Send + Sync {
    /// Drop the cached [`crate::models::ResolvedConfig`] for one endpoint.
    async fn invalidate_endpoint(&self, endpoint_uuid: Uuid);

    /// Drop every cached entry.
    async fn invalidate_all(&self);
}
