// ABOUTME: Structured logging helpers scoped to this crate's events.
// ABOUTME: Mirrors the teacher's TenantLogger convention: one tracing event, a stable event_type tag.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use tracing::{debug, info, warn};
use uuid::Uuid;

/// Structured logging for the tool-discovery core. Namespaced as an empty
/// struct (rather than free functions) to mirror the teacher's
/// `TenantLogger` convention and leave room for future per-call context
/// (e.g. a request-scoped span) without changing call sites.
pub struct CoreLogger;

impl CoreLogger {
    /// A `search_tools`/provider-level search query, at debug level.
    pub fn log_search_query(
        method: &'static str,
        query: &str,
        result_count: usize,
        duration_ms: u64,
    ) {
        debug!(
            event_type = "search_query",
            method = %method,
            query = %query,
            result_count = %result_count,
            duration_ms = %duration_ms,
            "search query completed"
        );
    }

    /// A [`crate::config::ConfigResolver`] cache hit or miss, at debug level.
    pub fn log_resolve_cache(endpoint_uuid: Uuid, hit: bool) {
        debug!(
            event_type = "resolve_cache",
            endpoint_uuid = %endpoint_uuid,
            hit = %hit,
            "config resolve cache lookup"
        );
    }

    /// A cache invalidation, at info level (writes are comparatively rare
    /// and worth surfacing above debug).
    pub fn log_cache_invalidate(endpoint_uuid: Option<Uuid>) {
        info!(
            event_type = "resolve_cache_invalidate",
            endpoint_uuid = ?endpoint_uuid,
            "config resolve cache invalidated"
        );
    }

    /// A middleware internal failure — always recovered from, per spec §7,
    /// so this is a warning, not an error.
    pub fn log_middleware_failure(reason: &str) {
        warn!(
            event_type = "middleware_failure",
            reason = %reason,
            "advertise-tools middleware failed; returning upstream list unchanged"
        );
    }

    /// An `execute_tool` dispatch outcome, at debug level.
    pub fn log_tool_dispatch(tool_name: &str, success: bool, duration_ms: u64) {
        debug!(
            event_type = "tool_dispatch",
            tool_name = %tool_name,
            success = %success,
            duration_ms = %duration_ms,
            "execute_tool dispatch completed"
        );
    }

    /// A search-provider disposal failure, at warn level — disposal errors
    /// are logged and swallowed (spec §4.B).
    pub fn log_provider_dispose_failure(method: &'static str, error: &str) {
        warn!(
            event_type = "provider_dispose_failed",
            method = %method,
            error = %error,
            "provider disposal failed"
        );
    }
}
