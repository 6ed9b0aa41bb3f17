// ABOUTME: The built-in execute_tool dispatch algorithm: cycle guard, lookup, validate, delegate.
// ABOUTME: Never throws; every failure mode converts to an isError:true ToolCallResult (spec §7).
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::logging::CoreLogger;
use crate::models::UpstreamTool;
use crate::tools::{is_builtin_name, ContentBlock, ToolCallResult};
use crate::validation::validate_arguments;
use async_trait::async_trait;
use std::time::Instant;

/// Upper bound on how many unmatched-tool candidate names `execute_tool`
/// lists before summarizing the rest (spec §4.D point 2).
const MAX_CANDIDATE_NAMES: usize = 10;
/// Upper bound on how many validation errors are listed verbatim before
/// summarizing the rest (spec §4.D point 4).
const MAX_VALIDATION_ERRORS: usize = 10;

/// The JSON-Schema `execute_tool` advertises for its own arguments (spec
/// §4.D).
#[must_use]
pub fn input_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "required": ["tool_name", "arguments"],
        "properties": {
            "tool_name": {"type": "string"},
            "arguments": {"type": "object", "additionalProperties": true}
        }
    })
}

/// External collaborator `execute_tool` delegates a validated call to. The
/// "proxy-invoke" callback of spec §2's execute path.
#[async_trait]
pub trait ProxyInvoker: Send + Sync {
    /// Invoke `tool_name` on its owning upstream server with `arguments`,
    /// returning the upstream's verbatim result or a human-readable error.
    async fn invoke(
        &self,
        tool_name: &str,
        arguments: &serde_json::Value,
    ) -> Result<serde_json::Value, String>;
}

fn validate_call_shape(arguments: &serde_json::Value) -> Option<(String, serde_json::Value)> {
    let object = arguments.as_object()?;
    let tool_name = object.get("tool_name")?.as_str()?.to_owned();
    let call_arguments = object.get("arguments")?;
    if !call_arguments.is_object() {
        return None;
    }
    Some((tool_name, call_arguments.clone()))
}

fn not_found_message(tool_name: &str, candidates: &[&UpstreamTool]) -> String {
    let mut message = format!("Tool \"{tool_name}\" not found.");
    if candidates.is_empty() {
        message.push_str(" No tools are currently available.");
    } else {
        let shown: Vec<&str> = candidates
            .iter()
            .take(MAX_CANDIDATE_NAMES)
            .map(|t| t.name.as_str())
            .collect();
        message.push_str(" Available tools: ");
        message.push_str(&shown.join(", "));
        if candidates.len() > MAX_CANDIDATE_NAMES {
            message.push_str(&format!(
                " ... and {} more tools",
                candidates.len() - MAX_CANDIDATE_NAMES
            ));
        }
        message.push('.');
    }
    message.push_str(" Call search_tools to discover tools.");
    message
}

/// Run `execute_tool` against `candidates`, delegating a validated call to
/// `proxy`.
///
/// Implements spec §4.D's five-step dispatch algorithm: refuse built-in
/// names, find the unique matching tool, validate arguments against its
/// schema, and either report validation errors or delegate and return the
/// upstream result verbatim.
pub async fn execute_tool(
    arguments: &serde_json::Value,
    candidates: &[UpstreamTool],
    proxy: &dyn ProxyInvoker,
) -> ToolCallResult {
    let Some((tool_name, call_arguments)) = validate_call_shape(arguments) else {
        return ToolCallResult::error_text(
            "Invalid execute_tool arguments: expected {tool_name: string, arguments: object}",
        );
    };

    if is_builtin_name(&tool_name) {
        return ToolCallResult::error_text(format!(
            "Cannot execute builtin tool \"{tool_name}\""
        ));
    }

    let matches: Vec<&UpstreamTool> = candidates
        .iter()
        .filter(|candidate| candidate.name == tool_name)
        .collect();

    let Some(tool) = matches.first().copied() else {
        let all: Vec<&UpstreamTool> = candidates.iter().collect();
        return ToolCallResult::error_text(not_found_message(&tool_name, &all));
    };

    let errors = validate_arguments(tool.input_schema.as_ref(), &call_arguments);
    if !errors.is_empty() {
        let mut body = String::from("Argument validation failed:\n");
        for error in errors.iter().take(MAX_VALIDATION_ERRORS) {
            body.push_str(&format!(
                "  - {}: {}\n",
                error.instance_path, error.message
            ));
        }
        if errors.len() > MAX_VALIDATION_ERRORS {
            body.push_str(&format!(
                "  ... and {} more errors\n",
                errors.len() - MAX_VALIDATION_ERRORS
            ));
        }
        let schema = tool
            .input_schema
            .clone()
            .unwrap_or_else(crate::validation::permissive_object_schema);
        let pretty = serde_json::to_string_pretty(&schema)
            .unwrap_or_else(|_| schema.to_string());
        body.push_str(&pretty);
        return ToolCallResult::error_text(body);
    }

    let started = Instant::now();
    let outcome = proxy.invoke(&tool_name, &call_arguments).await;
    CoreLogger::log_tool_dispatch(
        &tool_name,
        outcome.is_ok(),
        u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    );

    match outcome {
        Ok(value) => ToolCallResult::ok(vec![ContentBlock::Text {
            text: value.to_string(),
        }]),
        Err(message) => ToolCallResult::error_text(format!(
            "Error executing tool \"{tool_name}\": {message}"
        )),
    }
}
