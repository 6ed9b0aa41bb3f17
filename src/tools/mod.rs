// ABOUTME: Built-in virtual MCP tools: search_tools and execute_tool (spec §4.C, §4.D).
// ABOUTME: Shared result/content types plus the ProxyInvoker contract execute_tool delegates through.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Built-in Tools
//!
//! `search_tools` and `execute_tool` are virtual MCP tools the core itself
//! implements, never proxied to an upstream server. Both names are reserved:
//! [`execute_tool`] refuses to dispatch either one by name, regardless of
//! what the candidate pool contains (spec §9, "Cycle safety").

pub mod execute_tool;
pub mod search_tools;

pub use execute_tool::{execute_tool, ProxyInvoker};
pub use search_tools::search_tools;

use serde::{Deserialize, Serialize};

/// Public name of the built-in search tool. Matches spec §4.C.
pub const SEARCH_TOOLS_NAME: &str = "search_tools";
/// Public name of the built-in dispatch tool. Matches spec §4.D.
pub const EXECUTE_TOOL_NAME: &str = "execute_tool";

/// Whether `name` is one of the two reserved built-in tool names.
#[must_use]
pub fn is_builtin_name(name: &str) -> bool {
    name == SEARCH_TOOLS_NAME || name == EXECUTE_TOOL_NAME
}

/// One block of a tool call's `content` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text, used by `execute_tool`'s error paths.
    Text {
        /// The text payload.
        text: String,
    },
    /// A reference to a discoverable tool, used by `search_tools` (spec
    /// §4.C and the GLOSSARY's "tool_reference block").
    ToolReference {
        /// The tool's public name.
        name: String,
        /// `<description or default> (score: N.NN, matchReason)`.
        description: String,
    },
}

impl ContentBlock {
    /// Build a [`ContentBlock::Text`] block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// The result of a built-in tool call (spec §6, "search_tools call result"
/// and "execute_tool call result").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallResult {
    /// Response content blocks.
    pub content: Vec<ContentBlock>,
    /// Set (and `true`) only on failure; omitted on success.
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolCallResult {
    /// A successful result with the given content blocks.
    #[must_use]
    pub const fn ok(content: Vec<ContentBlock>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    /// A single-block text error result.
    #[must_use]
    pub fn error_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_builtin_name_matches_exactly() {
        assert!(is_builtin_name("search_tools"));
        assert!(is_builtin_name("execute_tool"));
        assert!(!is_builtin_name("filesystem__search_tools"));
    }

    #[test]
    fn successful_result_omits_is_error() {
        let result = ToolCallResult::ok(vec![ContentBlock::text("hi")]);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("isError").is_none());
    }

    #[test]
    fn error_result_sets_is_error_true() {
        let result = ToolCallResult::error_text("boom");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isError"], serde_json::json!(true));
    }
}
