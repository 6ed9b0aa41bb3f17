// ABOUTME: The pure config-resolution function — namespace x endpoint x tool overrides -> ResolvedConfig.
// ABOUTME: No I/O, no caching; see resolver.rs for the caching, single-flight wrapper around this.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::models::{Endpoint, Namespace, ResolvedConfig, ToolSearchConfig, DEFAULT_MAX_RESULTS};
use std::collections::HashMap;

/// Collapse a namespace's defaults, an optional endpoint's overrides, and a
/// namespace's per-tool defer-loading overrides into a single, inheritance-free
/// [`ResolvedConfig`] (spec §4.E).
///
/// `tool_overrides` must already be filtered to ENABLED/DISABLED entries only
/// (spec §4.G's `findToolDeferLoadingOverrides` contract) — `Tristate::Inherit`
/// entries are not representable here and must never be passed in.
#[must_use]
pub fn resolve(
    namespace: &Namespace,
    endpoint: Option<&Endpoint>,
    tool_overrides: HashMap<String, bool>,
    search_config: Option<&ToolSearchConfig>,
) -> ResolvedConfig {
    let defer_loading_enabled = endpoint
        .and_then(|ep| ep.override_defer_loading.resolve())
        .unwrap_or(namespace.default_defer_loading);

    let search_method = endpoint
        .and_then(|ep| ep.override_search_method.resolve())
        .unwrap_or(namespace.default_search_method);

    let tool_visibility = endpoint
        .and_then(|ep| match ep.override_tool_visibility {
            crate::models::ToolVisibilityOverride::Inherit => None,
            crate::models::ToolVisibilityOverride::All => Some(crate::models::ToolVisibility::All),
            crate::models::ToolVisibilityOverride::SearchOnly => {
                Some(crate::models::ToolVisibility::SearchOnly)
            }
        })
        .unwrap_or(namespace.default_tool_visibility);

    let (max_results, provider_config) = search_config.map_or_else(
        || (DEFAULT_MAX_RESULTS, None),
        |cfg| (cfg.max_results, cfg.provider_config.clone()),
    );

    ResolvedConfig {
        defer_loading_enabled,
        search_method,
        tool_visibility,
        tool_overrides,
        max_results,
        provider_config,
    }
}
