// ABOUTME: Derives the stable public tool name from a server name and tool name.
// ABOUTME: sanitize() is load-bearing — it forms part of the public identifier used everywhere.
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use once_cell::sync::Lazy;

static NON_WORD_RUN: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"[^0-9A-Za-z]+").unwrap_or_else(|e| {
        unreachable!("static sanitize pattern must compile: {e}")
    })
});

/// Trim and collapse runs of non-word characters into a single `_`.
///
/// This mapping must stay stable across every component that derives or
/// consumes public tool names (spec §4.E) — changing it silently would
/// invalidate every previously advertised name. See
/// [`public_tool_name`] for the full public-name derivation.
#[must_use]
pub fn sanitize(name: &str) -> String {
    let trimmed = name.trim();
    let replaced = NON_WORD_RUN.replace_all(trimmed, "_");
    replaced.trim_matches('_').to_owned()
}

/// The canonical public tool name: `sanitize(server_name) + "__" + tool_name`.
///
/// Two servers whose names sanitize identically collide (spec §9, open
/// question); this crate does not attempt to detect or prevent that here —
/// callers populating [`crate::models::ToolMapping`] records should enforce
/// sanitized-name uniqueness within a namespace.
#[must_use]
pub fn public_tool_name(server_name: &str, tool_name: &str) -> String {
    format!("{}__{}", sanitize(server_name), tool_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_collapses() {
        assert_eq!(sanitize("  my server!! "), "my_server");
        assert_eq!(sanitize("filesystem"), "filesystem");
        assert_eq!(sanitize("a---b"), "a_b");
        assert_eq!(sanitize("__leading"), "leading");
        assert_eq!(sanitize("trailing__"), "trailing");
    }

    #[test]
    fn public_name_uses_double_underscore_separator() {
        assert_eq!(
            public_tool_name("filesystem", "read_file"),
            "filesystem__read_file"
        );
        assert_eq!(
            public_tool_name("My Web Server", "fetch_url"),
            "My_Web_Server__fetch_url"
        );
    }

    #[test]
    fn collision_when_sanitized_names_match() {
        assert_eq!(sanitize("web-server"), sanitize("web_server"));
    }
}
