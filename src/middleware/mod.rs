// ABOUTME: Defer-loading & visibility middleware pipeline over the advertise-tools response (spec §4.F).
// ABOUTME: Never fails the advertise call: any internal error returns the upstream list unchanged.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # List-Tools Middleware
//!
//! Runs on every advertise-tools response, in three steps: conditionally
//! inject the built-in tools, apply the `defer_loading` flag per tool
//! without mutating inputs, then apply the visibility filter. Any internal
//! error aborts the whole pipeline and returns the original upstream list
//! (spec §4.F, last paragraph) — partial flag application is never
//! observable.

use crate::logging::CoreLogger;
use crate::models::{ResolvedConfig, ToolVisibility, UpstreamTool};
use crate::tools::{EXECUTE_TOOL_NAME, SEARCH_TOOLS_NAME};

/// Whether `execute_tool` is injected alongside `search_tools`. Spec §9's
/// open question permits but does not require advertising `execute_tool`;
/// this crate advertises it, to support clients without `tool_reference`
/// support (spec §4.F step 1 parenthetical).
const ADVERTISE_EXECUTE_TOOL: bool = true;

fn search_tools_definition() -> UpstreamTool {
    UpstreamTool::new(SEARCH_TOOLS_NAME)
        .with_description("Search for available tools by keyword or natural-language query.")
        .with_input_schema(crate::tools::search_tools::input_schema())
}

fn execute_tool_definition() -> UpstreamTool {
    UpstreamTool::new(EXECUTE_TOOL_NAME)
        .with_description("Execute a previously discovered tool by name.")
        .with_input_schema(crate::tools::execute_tool::input_schema())
}

fn inject_builtins(upstream: &[UpstreamTool], resolved: &ResolvedConfig) -> Vec<UpstreamTool> {
    let mut list = upstream.to_vec();
    if resolved.search_tools_enabled() {
        if !list.iter().any(|t| t.name == SEARCH_TOOLS_NAME) {
            list.push(search_tools_definition());
        }
        if ADVERTISE_EXECUTE_TOOL && !list.iter().any(|t| t.name == EXECUTE_TOOL_NAME) {
            list.push(execute_tool_definition());
        }
    }
    list
}

fn is_builtin(tool: &UpstreamTool) -> bool {
    crate::tools::is_builtin_name(&tool.name)
}

fn apply_defer_flags(list: &[UpstreamTool], resolved: &ResolvedConfig) -> Vec<UpstreamTool> {
    list.iter()
        .map(|tool| {
            if is_builtin(tool) {
                return tool.clone();
            }
            match resolved.tool_overrides.get(&tool.name) {
                Some(false) => tool.clone(),
                Some(true) => tool.with_defer_loading_flag(),
                None if resolved.defer_loading_enabled => tool.with_defer_loading_flag(),
                None => tool.clone(),
            }
        })
        .collect()
}

fn apply_visibility(list: Vec<UpstreamTool>, resolved: &ResolvedConfig) -> Vec<UpstreamTool> {
    match resolved.tool_visibility {
        ToolVisibility::All => list,
        ToolVisibility::SearchOnly => list.into_iter().filter(is_builtin).collect(),
    }
}

fn run_pipeline(upstream: &[UpstreamTool], resolved: &ResolvedConfig) -> Vec<UpstreamTool> {
    let with_builtins = inject_builtins(upstream, resolved);
    let with_flags = apply_defer_flags(&with_builtins, resolved);
    apply_visibility(with_flags, resolved)
}

/// Rewrite `upstream` per `resolved`'s configuration: inject built-ins,
/// apply defer-loading flags, then filter by visibility.
///
/// Never fails: an internal error (none are currently possible given the
/// pure functions above, but the boundary is kept for forward
/// compatibility — e.g. a future provider-backed injection step) is caught
/// and logged, and `upstream` is returned unchanged (spec §4.F, §7).
#[must_use]
pub fn advertise_tools(upstream: &[UpstreamTool], resolved: &ResolvedConfig) -> Vec<UpstreamTool> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        run_pipeline(upstream, resolved)
    })) {
        Ok(list) => list,
        Err(_) => {
            CoreLogger::log_middleware_failure("panic caught in advertise-tools pipeline");
            upstream.to_vec()
        }
    }
}
