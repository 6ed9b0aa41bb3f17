// ABOUTME: External contracts the core depends on: persistence (ConfigStore) and CRUD (ToolSearchConfigApi).
// ABOUTME: Out of scope per spec §1 — the core only defines the interfaces; callers supply implementations.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # External Contracts
//!
//! The tool-discovery core never talks to a database directly. It depends on
//! two narrow interfaces, matching spec §4.G and §4.H:
//!
//! - [`ConfigStore`] — read access to namespaces, endpoints, per-tool
//!   defer-loading overrides, and search configs, plus the write operations
//!   that must be followed by a cache-invalidation signal.
//! - [`ToolSearchConfigApi`] — the small CRUD surface exposed to operators
//!   for tuning per-namespace search.
//!
//! [`memory::InMemoryStore`] ships a non-persistent reference implementation
//! of both, used by the demo binary and the integration tests.

mod invalidation;
pub mod memory;

pub use invalidation::InvalidationSink;

use crate::errors::AppResult;
use crate::models::{Endpoint, Namespace, ToolMapping, ToolSearchConfig};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// Read/write access to the persisted configuration hierarchy.
///
/// Implementations own the actual storage layout (spec §6 only prescribes
/// the entities, not the schema) and are responsible for invoking an
/// [`InvalidationSink`] after every write, naming every endpoint UUID the
/// write affects.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Look up a namespace by UUID.
    async fn find_namespace(&self, uuid: Uuid) -> AppResult<Option<Namespace>>;

    /// Look up an endpoint by UUID.
    async fn find_endpoint(&self, uuid: Uuid) -> AppResult<Option<Endpoint>>;

    /// Per-tool defer-loading overrides for a namespace, keyed by public tool
    /// name. Only entries whose `defer_loading` is `ENABLED` or `DISABLED`
    /// are returned — `INHERIT` entries are omitted entirely, matching spec
    /// §4.G.
    async fn find_tool_defer_loading_overrides(
        &self,
        namespace_uuid: Uuid,
    ) -> AppResult<HashMap<String, bool>>;

    /// The search configuration for a namespace, if one has been upserted.
    async fn find_tool_search_config(
        &self,
        namespace_uuid: Uuid,
    ) -> AppResult<Option<ToolSearchConfig>>;

    /// All endpoint UUIDs bound to a namespace, used to drive invalidation
    /// when a namespace-level write occurs.
    async fn endpoints_by_namespace(&self, namespace_uuid: Uuid) -> AppResult<Vec<Uuid>>;

    /// Update a tool mapping's defer-loading override.
    async fn update_tool_defer_loading(
        &self,
        mapping: &ToolMapping,
    ) -> AppResult<()>;

    /// Replace a namespace's stored defaults.
    async fn update_namespace(&self, namespace: &Namespace) -> AppResult<()>;

    /// Replace an endpoint's stored overrides.
    async fn update_endpoint(&self, endpoint: &Endpoint) -> AppResult<()>;

    /// Insert or replace a namespace's search configuration.
    async fn upsert_tool_search_config(&self, config: &ToolSearchConfig) -> AppResult<()>;
}

/// The small CRUD surface for tuning per-namespace search (spec §4.H).
#[async_trait]
pub trait ToolSearchConfigApi: Send + Sync {
    /// Fetch a namespace's search configuration.
    async fn get(&self, namespace_uuid: Uuid) -> CrudResult<Option<ToolSearchConfig>>;

    /// Insert or replace a namespace's search configuration.
    async fn upsert(
        &self,
        namespace_uuid: Uuid,
        max_results: u32,
        provider_config: Option<serde_json::Value>,
    ) -> AppResult<ToolSearchConfig>;

    /// Update a single tool mapping's defer-loading behavior, subject to
    /// ownership-based authorization.
    async fn update_tool_defer_loading(
        &self,
        namespace_uuid: Uuid,
        tool_uuid: Uuid,
        server_uuid: Uuid,
        defer_loading: crate::models::Tristate,
        caller_uuid: Uuid,
    ) -> CrudResult<()>;
}

/// The envelope CRUD operations return for expected failure modes, per spec
/// §7: `NotFound`, `Unauthorized`, and validation failures never surface as a
/// Rust `Err` here — only genuinely unexpected store errors do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrudFailure {
    /// Human-readable explanation, suitable for direct display to an operator.
    pub message: String,
}

/// `{success, data?, message?}`-shaped result for the CRUD surface.
pub type CrudResult<T> = Result<T, CrudFailure>;
