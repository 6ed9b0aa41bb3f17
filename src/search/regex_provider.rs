// ABOUTME: Literal-substring / configured-pattern search provider (spec §4.A.1).
// ABOUTME: Field-weighted scoring: name/description weights, position bonus, length bonus.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::errors::AppResult;
use crate::search::{
    clamp_score, configured_fields, AvailableTool, SearchHit, SearchProvider, SearchQuery,
    EMPTY_QUERY_MATCH_REASON,
};
use async_trait::async_trait;
use regex::RegexBuilder;
use serde::Deserialize;
use tokio::sync::RwLock;

/// `provider_config` recognized by [`RegexProvider`]: an optional explicit
/// pattern and case sensitivity (spec §4.A.1).
#[derive(Debug, Clone, Default, Deserialize)]
struct RegexConfig {
    pattern: Option<String>,
    #[serde(default)]
    case_sensitive: bool,
    #[serde(default)]
    fields: Vec<String>,
}

/// Literal-substring (or, if configured, pattern) matcher over tool name and
/// description fields, with field-weighted, position-and-length-bonused
/// scoring.
pub struct RegexProvider {
    config: RwLock<RegexConfig>,
}

impl RegexProvider {
    /// Construct a provider with no configuration applied yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RwLock::new(RegexConfig::default()),
        }
    }

    fn field_weight(field: &str) -> f64 {
        match field {
            "name" => 0.6,
            "description" => 0.3,
            _ => 0.1,
        }
    }

    fn field_value<'a>(tool: &'a crate::models::UpstreamTool, field: &str) -> Option<&'a str> {
        match field {
            "name" => Some(tool.name.as_str()),
            "description" => tool.description.as_deref(),
            _ => None,
        }
    }

    /// Build the regex to search with: the configured pattern if it compiles,
    /// else the query as an escaped literal (spec §4.A.1: "If an explicitly
    /// configured pattern fails to compile, fall back to literal substring of
    /// the query (do not error)").
    fn build_matcher(pattern: Option<&str>, query: &str, case_sensitive: bool) -> regex::Regex {
        if let Some(pattern) = pattern {
            if let Ok(compiled) = RegexBuilder::new(pattern)
                .case_insensitive(!case_sensitive)
                .build()
            {
                return compiled;
            }
        }
        let literal = regex::escape(query);
        RegexBuilder::new(&literal)
            .case_insensitive(!case_sensitive)
            .build()
            .unwrap_or_else(|_| {
                RegexBuilder::new(&regex::escape(""))
                    .build()
                    .expect("escaped empty string always compiles")
            })
    }
}

impl Default for RegexProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for RegexProvider {
    fn name(&self) -> &'static str {
        "REGEX"
    }

    async fn initialize(&self, config: Option<&serde_json::Value>) -> AppResult<()> {
        let parsed = match config {
            Some(value) => serde_json::from_value(value.clone()).unwrap_or_default(),
            None => RegexConfig::default(),
        };
        *self.config.write().await = parsed;
        Ok(())
    }

    async fn search(
        &self,
        query: &SearchQuery,
        available: &[AvailableTool],
    ) -> AppResult<Vec<SearchHit>> {
        let max_results = query.effective_max_results();

        if query.query.trim().is_empty() {
            return Ok(available
                .iter()
                .take(max_results)
                .map(|candidate| SearchHit {
                    tool: candidate.tool.clone(),
                    server_uuid: candidate.server_uuid,
                    score: 0.5,
                    match_reason: EMPTY_QUERY_MATCH_REASON.to_owned(),
                })
                .collect());
        }

        let config = self.config.read().await.clone();
        let fields = if config.fields.is_empty() {
            configured_fields(None)
        } else {
            config.fields.clone()
        };
        let matcher = Self::build_matcher(config.pattern.as_deref(), &query.query, config.case_sensitive);

        let mut hits = Vec::new();
        for candidate in available {
            let mut score = 0.0_f64;
            let mut matched_fields = Vec::new();
            for field in &fields {
                let Some(value) = Self::field_value(&candidate.tool, field) else {
                    continue;
                };
                let Some(m) = matcher.find(value) else {
                    continue;
                };
                let index = m.start();
                let match_length = m.end() - m.start();
                let position_bonus = (0.20 - 0.003 * index as f64).max(0.05);
                let length_bonus = (0.02 * match_length as f64).min(0.20);
                score += Self::field_weight(field) + position_bonus + length_bonus;
                matched_fields.push(field.clone());
            }
            if matched_fields.is_empty() {
                continue;
            }
            hits.push(SearchHit {
                tool: candidate.tool.clone(),
                server_uuid: candidate.server_uuid,
                score: clamp_score(score),
                match_reason: format!("Matched in {}", matched_fields.join(", ")),
            });
        }

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(max_results);
        Ok(hits)
    }

    async fn dispose(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UpstreamTool;
    use uuid::Uuid;

    fn tool(name: &str, description: &str) -> AvailableTool {
        AvailableTool {
            tool: UpstreamTool::new(name).with_description(description),
            server_uuid: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn scenario_1_search_for_files() {
        let provider = RegexProvider::new();
        provider.initialize(None).await.unwrap();
        let tools = vec![
            tool("filesystem__read_file", "Read a file"),
            tool("filesystem__write_file", "Write a file"),
            tool("web__fetch_url", "Fetch URL"),
        ];
        let query = SearchQuery::new("file");
        let hits = provider.search(&query, &tools).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].tool.name, "filesystem__read_file");
        assert_eq!(hits[1].tool.name, "filesystem__write_file");
        for hit in &hits {
            assert_eq!(hit.match_reason, "Matched in name, description");
        }
    }

    #[tokio::test]
    async fn empty_query_returns_neutral_scored_prefix() {
        let provider = RegexProvider::new();
        provider.initialize(None).await.unwrap();
        let tools = vec![tool("a", "x"), tool("b", "y"), tool("c", "z")];
        let query = SearchQuery {
            query: String::new(),
            max_results: Some(2),
            namespace_uuid: None,
            endpoint_uuid: None,
        };
        let hits = provider.search(&query, &tools).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| (h.score - 0.5).abs() < f64::EPSILON));
        assert!(hits
            .iter()
            .all(|h| h.match_reason == EMPTY_QUERY_MATCH_REASON));
    }

    #[tokio::test]
    async fn no_match_excludes_tool() {
        let provider = RegexProvider::new();
        provider.initialize(None).await.unwrap();
        let tools = vec![tool("alpha", "nothing here")];
        let query = SearchQuery::new("zzz_no_match");
        let hits = provider.search(&query, &tools).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn broken_configured_pattern_falls_back_to_literal() {
        let provider = RegexProvider::new();
        provider
            .initialize(Some(&serde_json::json!({"pattern": "(unterminated"})))
            .await
            .unwrap();
        let tools = vec![tool("unterminated_tool", "desc")];
        let query = SearchQuery::new("unterminated");
        let hits = provider.search(&query, &tools).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn scores_are_clamped_and_sorted_descending() {
        let provider = RegexProvider::new();
        provider.initialize(None).await.unwrap();
        let tools = vec![
            tool("file", "file file file file file"),
            tool("other", "nope"),
            tool("z_file", "file"),
        ];
        let query = SearchQuery::new("file");
        let hits = provider.search(&query, &tools).await.unwrap();
        for hit in &hits {
            assert!(hit.score <= 1.0);
            assert!(hit.score > 0.0);
        }
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
