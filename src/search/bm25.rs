// ABOUTME: Okapi BM25 ranked-retrieval search provider (spec §4.A.2).
// ABOUTME: Builds a fresh in-memory index per query; no persistence across calls.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use crate::errors::AppResult;
use crate::search::{
    clamp_score, configured_fields, AvailableTool, Bm25Config, SearchHit, SearchProvider,
    SearchQuery, EMPTY_QUERY_MATCH_REASON,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tokio::sync::RwLock;

static TOKEN_SPLIT: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"[^A-Za-z0-9]+")
        .unwrap_or_else(|e| unreachable!("static BM25 tokenizer pattern must compile: {e}"))
});

fn tokenize(text: &str) -> Vec<String> {
    TOKEN_SPLIT
        .split(&text.to_lowercase())
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

struct ParsedConfig {
    bm25: Bm25Config,
    fields: Vec<String>,
}

/// Okapi BM25 provider. Builds a fresh term-frequency index over the
/// candidate pool on every call to [`SearchProvider::search`] — per spec
/// §4.A.2, indices are never persisted across queries.
pub struct Bm25Provider {
    config: RwLock<(Bm25Config, Vec<String>)>,
}

impl Bm25Provider {
    /// Construct a provider with default `k1`/`b` and the default field set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RwLock::new((Bm25Config::default(), configured_fields(None))),
        }
    }

    fn parse_config(config: Option<&serde_json::Value>) -> ParsedConfig {
        let bm25 = config
            .and_then(|c| serde_json::from_value::<Bm25Config>(c.clone()).ok())
            .unwrap_or_default();
        ParsedConfig {
            bm25,
            fields: configured_fields(config),
        }
    }

    fn field_value<'a>(tool: &'a crate::models::UpstreamTool, field: &str) -> Option<&'a str> {
        match field {
            "name" => Some(tool.name.as_str()),
            "description" => tool.description.as_deref(),
            _ => None,
        }
    }

    fn document_text(tool: &crate::models::UpstreamTool, fields: &[String]) -> String {
        fields
            .iter()
            .filter_map(|field| Self::field_value(tool, field))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Bm25Provider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for Bm25Provider {
    fn name(&self) -> &'static str {
        "BM25"
    }

    async fn initialize(&self, config: Option<&serde_json::Value>) -> AppResult<()> {
        let parsed = Self::parse_config(config);
        *self.config.write().await = (parsed.bm25, parsed.fields);
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

        let query_tokens = tokenize(&query.query);
        if query_tokens.is_empty() {
            // All-non-alphanumeric query: spec §4.A.2 edge case.
            return Ok(Vec::new());
        }

        let (bm25_config, fields) = self.config.read().await.clone();
        let n = available.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let docs: Vec<Vec<String>> = available
            .iter()
            .map(|candidate| tokenize(&Self::document_text(&candidate.tool, &fields)))
            .collect();

        let total_len: usize = docs.iter().map(Vec::len).sum();
        let avgdl = total_len as f64 / n as f64;
        if avgdl == 0.0 {
            return Ok(Vec::new());
        }

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for doc in &docs {
            let unique: std::collections::HashSet<&str> =
                doc.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let idf = |term: &str| -> f64 {
            let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
            let n = n as f64;
            ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
        };

        let normalizer = query_tokens.len() as f64 * (n as f64 + 1.0).ln() * (bm25_config.k1 + 1.0);

        let mut hits = Vec::new();
        for (candidate, doc) in available.iter().zip(docs.iter()) {
            let doc_len = doc.len() as f64;
            let mut term_freq: HashMap<&str, usize> = HashMap::new();
            for term in doc {
                *term_freq.entry(term.as_str()).or_insert(0) += 1;
            }

            let mut raw_score = 0.0_f64;
            let mut matched_terms = Vec::new();
            for term in &query_tokens {
                let tf = term_freq.get(term.as_str()).copied().unwrap_or(0);
                if tf == 0 {
                    continue;
                }
                let tf = tf as f64;
                let numerator = tf * (bm25_config.k1 + 1.0);
                let denominator = tf
                    + bm25_config.k1 * (1.0 - bm25_config.b + bm25_config.b * doc_len / avgdl);
                raw_score += idf(term) * (numerator / denominator);
                matched_terms.push(term.clone());
            }

            if normalizer == 0.0 {
                continue;
            }
            let normalized = clamp_score(raw_score / normalizer);
            if normalized <= 0.0 {
                continue;
            }

            let match_reason = if matched_terms.is_empty() {
                "Matched 0 terms".to_owned()
            } else if matched_terms.len() <= 3 {
                matched_terms
                    .iter()
                    .map(|t| format!("\"{t}\""))
                    .collect::<Vec<_>>()
                    .join(", ")
            } else {
                format!("Matched {} terms", matched_terms.len())
            };

            hits.push(SearchHit {
                tool: candidate.tool.clone(),
                server_uuid: candidate.server_uuid,
                score: normalized,
                match_reason,
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
    async fn scenario_2_natural_language_ranks_best_match_first() {
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
        assert!(!hits.is_empty());
        assert_eq!(hits[0].tool.name, "filesystem__read_file");
        assert!(hits.len() <= 3);
    }

    #[tokio::test]
    async fn empty_query_uses_neutral_policy() {
        let provider = Bm25Provider::new();
        provider.initialize(None).await.unwrap();
        let tools = vec![tool("a", "x"), tool("b", "y")];
        let query = SearchQuery::new("");
        let hits = provider.search(&query, &tools).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| (h.score - 0.5).abs() < f64::EPSILON));
    }

    #[tokio::test]
    async fn all_non_alphanumeric_query_returns_empty() {
        let provider = Bm25Provider::new();
        provider.initialize(None).await.unwrap();
        let tools = vec![tool("a", "x")];
        let query = SearchQuery::new("!!! *** ???");
        let hits = provider.search(&query, &tools).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn no_documents_returns_empty() {
        let provider = Bm25Provider::new();
        provider.initialize(None).await.unwrap();
        let hits = provider
            .search(&SearchQuery::new("anything"), &[])
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn scores_sorted_and_bounded() {
        let provider = Bm25Provider::new();
        provider.initialize(None).await.unwrap();
        let tools = vec![
            tool("alpha", "apple banana cherry"),
            tool("beta", "apple apple apple"),
            tool("gamma", "unrelated words entirely"),
        ];
        let query = SearchQuery::new("apple");
        let hits = provider.search(&query, &tools).await.unwrap();
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for hit in &hits {
            assert!((0.0..=1.0).contains(&hit.score));
        }
    }
}
