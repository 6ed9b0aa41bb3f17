// ABOUTME: End-to-end tests for the six concrete scenarios, driven entirely through ToolDiscoveryService.
// ABOUTME: Unlike the per-module integration tests, these wire config storage, resolution, search and
// ABOUTME: middleware together the way a real proxy host would.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use async_trait::async_trait;
use std::sync::Arc;
use toolmux_core::models::{
    Endpoint, Namespace, SearchMethod, SearchMethodOverride, ToolMapping, ToolStatus,
    ToolVisibility, ToolVisibilityOverride, Tristate, UpstreamTool,
};
use toolmux_core::search::AvailableTool;
use toolmux_core::store::memory::InMemoryStore;
use toolmux_core::store::InvalidationSink;
use toolmux_core::tools::{ContentBlock, ProxyInvoker};
use toolmux_core::ToolDiscoveryService;
use uuid::Uuid;

fn seeded_service() -> (Arc<InMemoryStore>, ToolDiscoveryService, Uuid) {
    let store = Arc::new(InMemoryStore::new());
    let namespace = Namespace {
        uuid: Uuid::new_v4(),
        default_defer_loading: true,
        default_search_method: SearchMethod::Regex,
        default_tool_visibility: ToolVisibility::All,
    };
    let endpoint = Endpoint {
        uuid: Uuid::new_v4(),
        namespace_uuid: namespace.uuid,
        override_defer_loading: Tristate::Inherit,
        override_search_method: SearchMethodOverride::Inherit,
        override_tool_visibility: ToolVisibilityOverride::Inherit,
    };
    store.put_namespace(namespace);
    store.put_endpoint(endpoint.clone());

    let service = ToolDiscoveryService::new(Arc::clone(&store) as Arc<dyn toolmux_core::store::ConfigStore>);
    (store, service, endpoint.uuid)
}

fn upstream_three() -> Vec<UpstreamTool> {
    vec![
        UpstreamTool::new("filesystem__read_file").with_description("Read a file"),
        UpstreamTool::new("filesystem__write_file").with_description("Write a file"),
        UpstreamTool::new("web__fetch_url").with_description("Fetch a URL"),
    ]
}

fn upstream_three_available() -> Vec<AvailableTool> {
    upstream_three()
        .into_iter()
        .map(|tool| AvailableTool {
            tool,
            server_uuid: Uuid::new_v4(),
        })
        .collect()
}

struct EchoProxy;

#[async_trait]
impl ProxyInvoker for EchoProxy {
    async fn invoke(
        &self,
        tool_name: &str,
        arguments: &serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        Ok(serde_json::json!({"tool": tool_name, "arguments": arguments}))
    }
}

/// Scenario 1: REGEX search ranks literal-substring matches above an
/// unrelated tool and filters non-matches out.
#[tokio::test]
async fn scenario_1_regex_search_for_file_tools() {
    let (_store, service, endpoint_uuid) = seeded_service();
    let available = upstream_three_available();
    let args = serde_json::json!({"query": "file"});
    let result = service
        .search_tools(endpoint_uuid, &args, &available)
        .await
        .unwrap();
    assert!(!result.is_error);
    assert_eq!(result.content.len(), 2);
    let ContentBlock::ToolReference { name, .. } = &result.content[0] else {
        panic!("expected tool_reference");
    };
    assert_eq!(name, "filesystem__read_file");
}

/// Scenario 2: BM25 ranks the document whose terms best match a
/// natural-language query first, after a namespace is switched to BM25.
#[tokio::test]
async fn scenario_2_bm25_natural_language_query_after_switching_methods() {
    let (store, service, endpoint_uuid) = seeded_service();
    let mut namespace = find_namespace_via_endpoint(&store, endpoint_uuid).await;
    namespace.default_search_method = SearchMethod::Bm25;
    toolmux_core::store::ConfigStore::update_namespace(store.as_ref(), &namespace)
        .await
        .unwrap();

    let available = vec![
        AvailableTool {
            tool: UpstreamTool::new("filesystem__read_file").with_description("Read a file from disk"),
            server_uuid: Uuid::new_v4(),
        },
        AvailableTool {
            tool: UpstreamTool::new("database__query").with_description("Run a SQL query"),
            server_uuid: Uuid::new_v4(),
        },
    ];
    let args = serde_json::json!({"query": "read a file from disk"});
    let result = service
        .search_tools(endpoint_uuid, &args, &available)
        .await
        .unwrap();
    let ContentBlock::ToolReference { name, .. } = &result.content[0] else {
        panic!("expected tool_reference");
    };
    assert_eq!(name, "filesystem__read_file");
}

async fn find_namespace_via_endpoint(store: &Arc<InMemoryStore>, endpoint_uuid: Uuid) -> Namespace {
    let endpoint = toolmux_core::store::ConfigStore::find_endpoint(store.as_ref(), endpoint_uuid)
        .await
        .unwrap()
        .unwrap();
    toolmux_core::store::ConfigStore::find_namespace(store.as_ref(), endpoint.namespace_uuid)
        .await
        .unwrap()
        .unwrap()
}

/// Scenario 3: a single tool-mapping override suppresses defer-loading for
/// just that tool while the namespace default flags everything else.
#[tokio::test]
async fn scenario_3_per_tool_defer_loading_override() {
    let (store, service, endpoint_uuid) = seeded_service();
    let namespace = find_namespace_via_endpoint(&store, endpoint_uuid).await;
    let server_uuid = Uuid::new_v4();
    store.put_mapping(ToolMapping {
        tool_uuid: Uuid::new_v4(),
        namespace_uuid: namespace.uuid,
        server_uuid,
        server_name: "filesystem".to_owned(),
        tool_name: "read_file".to_owned(),
        status: ToolStatus::Active,
        defer_loading: Tristate::Disabled,
    });
    service.resolver().invalidate_endpoint(endpoint_uuid).await;

    let advertised = service.advertise_tools(endpoint_uuid, &upstream_three()).await;
    let read_file = advertised
        .iter()
        .find(|t| t.name == "filesystem__read_file")
        .unwrap();
    assert_eq!(read_file.defer_loading, None);
    let write_file = advertised
        .iter()
        .find(|t| t.name == "filesystem__write_file")
        .unwrap();
    assert_eq!(write_file.defer_loading, Some(true));
}

/// Scenario 4: an endpoint override to SEARCH_ONLY visibility hides every
/// non-builtin tool from the advertised list regardless of namespace default.
#[tokio::test]
async fn scenario_4_endpoint_search_only_override() {
    let (store, service, endpoint_uuid) = seeded_service();
    let mut endpoint = toolmux_core::store::ConfigStore::find_endpoint(store.as_ref(), endpoint_uuid)
        .await
        .unwrap()
        .unwrap();
    endpoint.override_tool_visibility = ToolVisibilityOverride::SearchOnly;
    toolmux_core::store::ConfigStore::update_endpoint(store.as_ref(), &endpoint)
        .await
        .unwrap();

    let advertised = service.advertise_tools(endpoint_uuid, &upstream_three()).await;
    assert!(advertised.iter().any(|t| t.name == "search_tools"));
    assert!(!advertised.iter().any(|t| t.name == "filesystem__read_file"));
}

/// Scenario 5: execute_tool against an unknown name reports the candidate
/// pool and points the caller back at search_tools.
#[tokio::test]
async fn scenario_5_execute_tool_unknown_name() {
    let (_store, service, _endpoint_uuid) = seeded_service();
    let args = serde_json::json!({"tool_name": "does_not_exist", "arguments": {}});
    let result = service
        .execute_tool(&args, &upstream_three(), &EchoProxy)
        .await;
    assert!(result.is_error);
    let ContentBlock::Text { text } = &result.content[0] else {
        panic!("expected text block");
    };
    assert!(text.contains("not found"));
    assert!(text.contains("Call search_tools"));
}

/// Scenario 6: execute_tool against a known tool with invalid arguments
/// reports schema errors instead of delegating to the proxy.
#[tokio::test]
async fn scenario_6_execute_tool_invalid_arguments() {
    let (_store, service, _endpoint_uuid) = seeded_service();
    let mut tools = upstream_three();
    tools.push(UpstreamTool::new("database__query").with_input_schema(serde_json::json!({
        "type": "object",
        "required": ["sql"],
        "properties": {"sql": {"type": "string"}}
    })));
    let args = serde_json::json!({"tool_name": "database__query", "arguments": {}});
    let result = service.execute_tool(&args, &tools, &EchoProxy).await;
    assert!(result.is_error);
    let ContentBlock::Text { text } = &result.content[0] else {
        panic!("expected text block");
    };
    assert!(text.contains("Argument validation failed"));
}

/// A full round trip: discover via search_tools, then dispatch the
/// discovered name via execute_tool and get the proxy's result back.
#[tokio::test]
async fn discover_then_execute_round_trip() {
    let (_store, service, endpoint_uuid) = seeded_service();
    let available = upstream_three_available();
    let search_args = serde_json::json!({"query": "file"});
    let search_result = service
        .search_tools(endpoint_uuid, &search_args, &available)
        .await
        .unwrap();
    let ContentBlock::ToolReference { name, .. } = &search_result.content[0] else {
        panic!("expected tool_reference");
    };

    let execute_args = serde_json::json!({"tool_name": name, "arguments": {}});
    let execute_result = service
        .execute_tool(&execute_args, &upstream_three(), &EchoProxy)
        .await;
    assert!(!execute_result.is_error);
}
