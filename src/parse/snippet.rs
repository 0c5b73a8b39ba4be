// src/parse/snippet.rs
//! Splits a reported code snippet into the excerpt and the suggested fix.

use regex::Regex;
use std::sync::LazyLock;

static RECOMMENDATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(.*)\n\nRecommendation:\n\n(.*)").unwrap_or_else(|_| panic!("Invalid Regex"))
});
static CURRENT_NEW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Current: (.*)\nNew: (.*)").unwrap_or_else(|_| panic!("Invalid Regex"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetParts<'a> {
    pub code: &'a str,
    pub recommendation: Option<&'a str>,
}

/// Tries the `Recommendation:` layout, then `Current:`/`New:`. A snippet
/// matching neither is returned whole with no recommendation.
#[must_use]
pub fn split_snippet(snippet: &str) -> SnippetParts<'_> {
    for re in [&*RECOMMENDATION_RE, &*CURRENT_NEW_RE] {
        if let Some(caps) = re.captures(snippet) {
            if let (Some(code), Some(rec)) = (caps.get(1), caps.get(2)) {
                return SnippetParts {
                    code: code.as_str(),
                    recommendation: Some(rec.as_str()),
                };
            }
        }
    }
    SnippetParts {
        code: snippet,
        recommendation: None,
    }
}
