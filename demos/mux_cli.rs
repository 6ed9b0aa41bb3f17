// ABOUTME: Demo binary — seeds an InMemoryStore, resolves config, prints the advertised tool list.
// ABOUTME: Not part of the core contract; exists to give the crate an executable surface to sanity-read.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use clap::{Parser, Subcommand};
use std::sync::Arc;
use toolmux_core::errors::AppResult;
use toolmux_core::models::{
    Endpoint, Namespace, SearchMethod, SearchMethodOverride, ToolVisibility,
    ToolVisibilityOverride, Tristate, UpstreamTool,
};
use toolmux_core::search::AvailableTool;
use toolmux_core::store::memory::InMemoryStore;
use toolmux_core::ToolDiscoveryService;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "toolmux-demo")]
#[command(about = "Sanity-read harness for the tool-discovery core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the advertised tool list for the seeded demo endpoint.
    Advertise,
    /// Run `search_tools` against the seeded demo endpoint.
    Search {
        /// Free-text search query.
        query: String,
    },
}

fn seed_upstream_tools() -> Vec<AvailableTool> {
    vec![
        AvailableTool {
            tool: UpstreamTool::new("filesystem__read_file").with_description("Read a file"),
            server_uuid: Uuid::new_v4(),
        },
        AvailableTool {
            tool: UpstreamTool::new("filesystem__write_file").with_description("Write a file"),
            server_uuid: Uuid::new_v4(),
        },
        AvailableTool {
            tool: UpstreamTool::new("web__fetch_url").with_description("Fetch a URL"),
            server_uuid: Uuid::new_v4(),
        },
    ]
}

fn seed_store() -> (Arc<InMemoryStore>, Uuid) {
    let store = Arc::new(InMemoryStore::new());
    let namespace = Namespace {
        uuid: Uuid::new_v4(),
        default_defer_loading: true,
        default_search_method: SearchMethod::Bm25,
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
    (store, endpoint.uuid)
}

#[tokio::main]
async fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let (store, endpoint_uuid) = seed_store();
    let service = ToolDiscoveryService::new(store);
    let available = seed_upstream_tools();
    let upstream: Vec<UpstreamTool> = available.iter().map(|a| a.tool.clone()).collect();

    match cli.command {
        Commands::Advertise => {
            let advertised = service.advertise_tools(endpoint_uuid, &upstream).await;
            for tool in advertised {
                println!(
                    "{}{}",
                    tool.name,
                    if tool.defer_loading == Some(true) {
                        " (defer_loading)"
                    } else {
                        ""
                    }
                );
            }
        }
        Commands::Search { query } => {
            let args = serde_json::json!({"query": query});
            let result = service
                .search_tools(endpoint_uuid, &args, &available)
                .await?;
            for block in result.content {
                println!("{block:?}");
            }
        }
    }

    Ok(())
}
