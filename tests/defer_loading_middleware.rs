// ABOUTME: Integration tests for the list-tools middleware pipeline against the public crate API.
// ABOUTME: Covers scenarios 3 and 4 plus the never-fails-the-advertise-call guarantee.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::collections::HashMap;
use toolmux_core::middleware::advertise_tools;
use toolmux_core::models::{ResolvedConfig, SearchMethod, ToolVisibility, UpstreamTool};

fn three_upstream_tools() -> Vec<UpstreamTool> {
    vec![
        UpstreamTool::new("filesystem__read_file").with_description("Read a file"),
        UpstreamTool::new("filesystem__write_file").with_description("Write a file"),
        UpstreamTool::new("web__fetch_url").with_description("Fetch URL"),
    ]
}

#[test]
fn scenario_3_defer_loading_with_one_tool_override() {
    let mut overrides = HashMap::new();
    overrides.insert("filesystem__read_file".to_owned(), false);
    let resolved = ResolvedConfig {
        defer_loading_enabled: true,
        search_method: SearchMethod::Bm25,
        tool_visibility: ToolVisibility::All,
        tool_overrides: overrides,
        max_results: 5,
        provider_config: None,
    };

    let advertised = advertise_tools(&three_upstream_tools(), &resolved);

    assert_eq!(advertised.len(), 5); // 3 upstream + search_tools + execute_tool
    let names: Vec<&str> = advertised.iter().map(|t| t.name.as_str()).collect();
    assert!(names.contains(&"search_tools"));

    let read_file = advertised
        .iter()
        .find(|t| t.name == "filesystem__read_file")
        .unwrap();
    assert_eq!(read_file.defer_loading, None);

    for flagged_name in ["filesystem__write_file", "web__fetch_url"] {
        let tool = advertised.iter().find(|t| t.name == flagged_name).unwrap();
        assert_eq!(tool.defer_loading, Some(true));
    }
}

#[test]
fn scenario_4_search_only_visibility_advertises_only_builtins() {
    let resolved = ResolvedConfig {
        defer_loading_enabled: true,
        search_method: SearchMethod::Bm25,
        tool_visibility: ToolVisibility::SearchOnly,
        tool_overrides: HashMap::new(),
        max_results: 5,
        provider_config: None,
    };

    let advertised = advertise_tools(&three_upstream_tools(), &resolved);
    assert!(advertised.iter().any(|t| t.name == "search_tools"));
    assert!(!advertised
        .iter()
        .any(|t| t.name == "filesystem__read_file"));
}

#[test]
fn every_advertised_tool_never_carries_false_defer_loading() {
    let resolved = ResolvedConfig {
        defer_loading_enabled: true,
        search_method: SearchMethod::Regex,
        tool_visibility: ToolVisibility::All,
        tool_overrides: HashMap::new(),
        max_results: 5,
        provider_config: None,
    };
    let advertised = advertise_tools(&three_upstream_tools(), &resolved);
    assert!(advertised
        .iter()
        .all(|t| t.defer_loading.is_none() || t.defer_loading == Some(true)));
}

#[test]
fn search_tools_defer_loading_is_always_unset() {
    let resolved = ResolvedConfig {
        defer_loading_enabled: true,
        search_method: SearchMethod::Regex,
        tool_visibility: ToolVisibility::All,
        tool_overrides: HashMap::new(),
        max_results: 5,
        provider_config: None,
    };
    let advertised = advertise_tools(&three_upstream_tools(), &resolved);
    let search_tools_entry = advertised.iter().find(|t| t.name == "search_tools").unwrap();
    assert_eq!(search_tools_entry.defer_loading, None);
}
