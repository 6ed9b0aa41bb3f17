// ABOUTME: The built-in search_tools dispatch: config -> provider search -> tool_reference blocks.
// ABOUTME: Propagates provider errors to the caller rather than swallowing them (spec §7).
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::errors::AppResult;
use crate::logging::CoreLogger;
use crate::models::ResolvedConfig;
use crate::search::{AvailableTool, SearchQuery, SearchService};
use crate::tools::{ContentBlock, ToolCallResult};
use std::time::Instant;

/// The JSON-Schema `search_tools` advertises for its own arguments (spec
/// §4.C).
#[must_use]
pub fn input_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "required": ["query"],
        "properties": {
            "query": {"type": "string"},
            "max_results": {"type": "number", "minimum": 1, "maximum": 20}
        }
    })
}

/// Run `search_tools`: rank `available` under `resolved`'s method, then
/// package hits as `tool_reference` content blocks.
///
/// `max_results` in `arguments`, if present and numeric, overrides
/// `resolved.max_results` (spec §4.C, last bullet). Provider errors are
/// propagated verbatim — `search_tools` does not swallow them (spec §7).
pub async fn search_tools(
    arguments: &serde_json::Value,
    available: &[AvailableTool],
    resolved: &ResolvedConfig,
    service: &SearchService,
) -> AppResult<ToolCallResult> {
    let query_text = arguments
        .get("query")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_owned();

    let max_results = arguments
        .get("max_results")
        .and_then(serde_json::Value::as_u64)
        .map(|value| value as usize);

    let query_for_log = query_text.clone();
    let query = SearchQuery {
        query: query_text,
        max_results,
        namespace_uuid: None,
        endpoint_uuid: None,
    };

    let started = Instant::now();
    let hits = service.search(query, available, resolved).await?;
    CoreLogger::log_search_query(
        resolved.search_method.as_str(),
        &query_for_log,
        hits.len(),
        u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    );

    let content = hits
        .into_iter()
        .map(|hit| {
            let description = format!(
                "{} (score: {:.2}, {})",
                hit.tool.description_or_default(),
                hit.score,
                hit.match_reason
            );
            ContentBlock::ToolReference {
                name: hit.tool.name,
                description,
            }
        })
        .collect();

    Ok(ToolCallResult::ok(content))
}
