// ABOUTME: Non-persistent reference implementation of ConfigStore + ToolSearchConfigApi.
// ABOUTME: Used by the demo binary and integration tests; not a production persistence layer.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use super::{ConfigStore, CrudFailure, CrudResult, InvalidationSink, ToolSearchConfigApi};
use crate::errors::{AppError, AppResult};
use crate::models::{
    Endpoint, Namespace, ToolMapping, ToolSearchConfig, Tristate, MAX_MAX_RESULTS, MIN_MAX_RESULTS,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// An in-memory, single-process [`ConfigStore`].
///
/// Namespaces may be declared "owned" (spec §4.H: "public-ownership
/// namespaces... accept updates from any caller; owned namespaces reject
/// others") by recording an owner UUID; a namespace absent from `owners` is
/// public.
pub struct InMemoryStore {
    namespaces: DashMap<Uuid, Namespace>,
    endpoints: DashMap<Uuid, Endpoint>,
    mappings: DashMap<(Uuid, Uuid, String), ToolMapping>,
    search_configs: DashMap<Uuid, ToolSearchConfig>,
    owners: DashMap<Uuid, Uuid>,
    invalidation: Option<Arc<dyn InvalidationSink>>,
}

impl InMemoryStore {
    /// Create an empty store with no invalidation sink attached.
    #[must_use]
    pub fn new() -> Self {
        Self {
            namespaces: DashMap::new(),
            endpoints: DashMap::new(),
            mappings: DashMap::new(),
            search_configs: DashMap::new(),
            owners: DashMap::new(),
            invalidation: None,
        }
    }

    /// Attach the cache-invalidation sink that every write must drive.
    #[must_use]
    pub fn with_invalidation(mut self, sink: Arc<dyn InvalidationSink>) -> Self {
        self.invalidation = Some(sink);
        self
    }

    /// Seed a namespace.
    pub fn put_namespace(&self, namespace: Namespace) {
        self.namespaces.insert(namespace.uuid, namespace);
    }

    /// Seed an endpoint.
    pub fn put_endpoint(&self, endpoint: Endpoint) {
        self.endpoints.insert(endpoint.uuid, endpoint);
    }

    /// Seed a tool mapping.
    pub fn put_mapping(&self, mapping: ToolMapping) {
        let key = (
            mapping.namespace_uuid,
            mapping.server_uuid,
            mapping.tool_name.clone(),
        );
        self.mappings.insert(key, mapping);
    }

    /// Record a namespace's owner; namespaces with no recorded owner accept
    /// updates from any caller (spec §4.H).
    pub fn set_owner(&self, namespace_uuid: Uuid, owner_uuid: Uuid) {
        self.owners.insert(namespace_uuid, owner_uuid);
    }

    async fn invalidate_endpoints_for(&self, namespace_uuid: Uuid) -> AppResult<()> {
        if let Some(sink) = &self.invalidation {
            for endpoint_uuid in self.endpoints_by_namespace(namespace_uuid).await? {
                sink.invalidate_endpoint(endpoint_uuid).await;
            }
        }
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for InMemoryStore {
    async fn find_namespace(&self, uuid: Uuid) -> AppResult<Option<Namespace>> {
        Ok(self.namespaces.get(&uuid).map(|e| e.clone()))
    }

    async fn find_endpoint(&self, uuid: Uuid) -> AppResult<Option<Endpoint>> {
        Ok(self.endpoints.get(&uuid).map(|e| e.clone()))
    }

    async fn find_tool_defer_loading_overrides(
        &self,
        namespace_uuid: Uuid,
    ) -> AppResult<std::collections::HashMap<String, bool>> {
        let mut overrides = std::collections::HashMap::new();
        for entry in &self.mappings {
            let mapping = entry.value();
            if mapping.namespace_uuid != namespace_uuid {
                continue;
            }
            if let Some(enabled) = mapping.defer_loading.resolve() {
                overrides.insert(mapping.public_name(), enabled);
            }
        }
        Ok(overrides)
    }

    async fn find_tool_search_config(
        &self,
        namespace_uuid: Uuid,
    ) -> AppResult<Option<ToolSearchConfig>> {
        Ok(self.search_configs.get(&namespace_uuid).map(|e| e.clone()))
    }

    async fn endpoints_by_namespace(&self, namespace_uuid: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .endpoints
            .iter()
            .filter(|e| e.value().namespace_uuid == namespace_uuid)
            .map(|e| *e.key())
            .collect())
    }

    async fn update_tool_defer_loading(&self, mapping: &ToolMapping) -> AppResult<()> {
        let key = (
            mapping.namespace_uuid,
            mapping.server_uuid,
            mapping.tool_name.clone(),
        );
        self.mappings.insert(key, mapping.clone());
        self.invalidate_endpoints_for(mapping.namespace_uuid).await
    }

    async fn update_namespace(&self, namespace: &Namespace) -> AppResult<()> {
        self.namespaces.insert(namespace.uuid, namespace.clone());
        self.invalidate_endpoints_for(namespace.uuid).await
    }

    async fn update_endpoint(&self, endpoint: &Endpoint) -> AppResult<()> {
        self.endpoints.insert(endpoint.uuid, endpoint.clone());
        if let Some(sink) = &self.invalidation {
            sink.invalidate_endpoint(endpoint.uuid).await;
        }
        Ok(())
    }

    async fn upsert_tool_search_config(&self, config: &ToolSearchConfig) -> AppResult<()> {
        self.search_configs
            .insert(config.namespace_uuid, config.clone());
        self.invalidate_endpoints_for(config.namespace_uuid).await
    }
}

#[async_trait]
impl ToolSearchConfigApi for InMemoryStore {
    async fn get(&self, namespace_uuid: Uuid) -> CrudResult<Option<ToolSearchConfig>> {
        Ok(self.search_configs.get(&namespace_uuid).map(|e| e.clone()))
    }

    async fn upsert(
        &self,
        namespace_uuid: Uuid,
        max_results: u32,
        provider_config: Option<serde_json::Value>,
    ) -> AppResult<ToolSearchConfig> {
        if !(MIN_MAX_RESULTS..=MAX_MAX_RESULTS).contains(&max_results) {
            return Err(AppError::invalid(format!(
                "max_results must be in [{MIN_MAX_RESULTS}, {MAX_MAX_RESULTS}], got {max_results}"
            )));
        }
        if self.namespaces.get(&namespace_uuid).is_none() {
            return Err(AppError::store(format!(
                "foreign key violation: namespace {namespace_uuid} does not exist"
            )));
        }
        let config = ToolSearchConfig {
            namespace_uuid,
            max_results,
            provider_config,
        };
        ConfigStore::upsert_tool_search_config(self, &config).await?;
        Ok(config)
    }

    async fn update_tool_defer_loading(
        &self,
        namespace_uuid: Uuid,
        tool_uuid: Uuid,
        server_uuid: Uuid,
        defer_loading: Tristate,
        caller_uuid: Uuid,
    ) -> CrudResult<()> {
        if self.namespaces.get(&namespace_uuid).is_none() {
            return Err(CrudFailure {
                message: "Namespace not found".to_owned(),
            });
        }
        if let Some(owner) = self.owners.get(&namespace_uuid) {
            if *owner != caller_uuid {
                return Err(CrudFailure {
                    message: "Access denied".to_owned(),
                });
            }
        }
        let existing = self
            .mappings
            .iter()
            .find(|e| {
                let m = e.value();
                m.namespace_uuid == namespace_uuid
                    && m.server_uuid == server_uuid
                    && m.tool_uuid == tool_uuid
            })
            .map(|e| e.value().clone());

        let Some(mut mapping) = existing else {
            return Err(CrudFailure {
                message: "Tool not found in namespace".to_owned(),
            });
        };
        mapping.defer_loading = defer_loading;
        ConfigStore::update_tool_defer_loading(self, &mapping)
            .await
            .map_err(|e| CrudFailure { message: e.message })?;
        Ok(())
    }
}
