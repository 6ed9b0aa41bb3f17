// ABOUTME: Integration tests for the BM25 search provider against the public crate API.
// ABOUTME: Covers scenario 2 plus boundary behaviors from spec §8.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use toolmux_core::models::UpstreamTool;
use toolmux_core::search::{AvailableTool, Bm25Provider, SearchProvider, SearchQuery};
use uuid::Uuid;

fn tool(name: &str, description: &str) -> AvailableTool {
    AvailableTool {
        tool: UpstreamTool::new(name).with_description(description),
        server_uuid: Uuid::new_v4(),
    }
}

#[tokio::test]
async fn scenario_2_natural_language_query() {
    let provider = Bm25Provider::new();
    provider.initialize(None).await.unwrap();

    let tools = vec![
        tool("filesystem__read_file", "Read a file"),
        tool("filesystem__write_file", "Write a file"),
        tool("web__fetch_url", "Fetch URL"),
        tool("database__query", "Run SQL query"),
    ];

    let query = SearchQuery {
        query: "read a file from disk".to_owned(),
        max_results: Some(3),
        namespace_uuid: None,
        endpoint_uuid: None,
    };
    let hits = provider.search(&query, &tools).await.unwrap();

    assert!(hits.len() <= 3);
    assert_eq!(hits[0].tool.name, "filesystem__read_file");
}

#[tokio::test]
async fn custom_k1_and_b_are_honored() {
    let provider = Bm25Provider::new();
    provider
        .initialize(Some(&serde_json::json!({"k1": 0.0, "b": 0.0})))
        .await
        .unwrap();
    let tools = vec![
        tool("alpha", "apple apple apple apple apple"),
        tool("beta", "apple"),
    ];
    let hits = provider
        .search(&SearchQuery::new("apple"), &tools)
        .await
        .unwrap();
    // With k1 = 0, term frequency saturates immediately: both documents
    // should score identically regardless of repetition.
    assert_eq!(hits.len(), 2);
    assert!((hits[0].score - hits[1].score).abs() < 1e-9);
}

#[tokio::test]
async fn results_sorted_descending_and_bounded_by_max_results() {
    let provider = Bm25Provider::new();
    provider.initialize(None).await.unwrap();
    let tools: Vec<AvailableTool> = (0..10)
        .map(|i| tool(&format!("tool_{i}"), "shared term unique_token"))
        .collect();
    let query = SearchQuery {
        query: "shared".to_owned(),
        max_results: Some(3),
        namespace_uuid: None,
        endpoint_uuid: None,
    };
    let hits = provider.search(&query, &tools).await.unwrap();
    assert_eq!(hits.len(), 3);
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}
