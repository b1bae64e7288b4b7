//! Bibliographic search sources and the shared result renderer.
//!
//! `SearchProvider` is an enum over concrete source adapters, dispatched the
//! same way as `llm::LlmProvider`. Each adapter maps its endpoint's response
//! shape into [`Paper`] records; rendering to the fixed markdown block is
//! shared here. One page of results per query — no retry, no pagination,
//! no caching.

pub mod arxiv;
pub mod semantic_scholar;

use thiserror::Error;

use crate::config::SearchConfig;

/// Fixed message for endpoint failures (non-success status, network, parse).
pub const SEARCH_ERROR_TEXT: &str =
    "Error fetching research papers. Please try again later.";

/// Fixed message for an empty result page.
pub const NO_RESULTS_TEXT: &str =
    "No relevant research papers found. Try a different query.";

/// Abstracts are cut to this many characters in the rendered block.
pub const ABSTRACT_CHAR_BUDGET: usize = 300;

// ── Records ───────────────────────────────────────────────────────────────────

/// One search result item. Transient — mapped straight from the endpoint
/// response and rendered, never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Paper {
    pub title: String,
    pub authors: Vec<String>,
    pub year: Option<u16>,
    pub url: String,
    /// Abstract text; only the archive-style source fills this in.
    pub summary: Option<String>,
}

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("unknown search source: {0}")]
    UnknownSource(String),
    #[error("search request failed: {0}")]
    Network(String),
    #[error("search endpoint returned status {0}")]
    Status(u16),
    #[error("malformed search response: {0}")]
    Parse(String),
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available search source backends.
#[derive(Debug, Clone)]
pub enum SearchProvider {
    SemanticScholar(semantic_scholar::SemanticScholarSource),
    Arxiv(arxiv::ArxivSource),
}

/// Construct a `SearchProvider` from config — called once at startup.
pub fn build(config: &SearchConfig) -> Result<SearchProvider, SearchError> {
    match config.provider.as_str() {
        "semantic_scholar" => Ok(SearchProvider::SemanticScholar(
            semantic_scholar::SemanticScholarSource::new(
                config.semantic_scholar_url.clone(),
                config.limit,
            ),
        )),
        "arxiv" => Ok(SearchProvider::Arxiv(arxiv::ArxivSource::new(
            config.arxiv_url.clone(),
            config.limit,
        ))),
        _ => Err(SearchError::UnknownSource(config.provider.clone())),
    }
}

impl SearchProvider {
    /// Fetch the first page of results for a free-text query.
    pub async fn search(&self, query: &str) -> Result<Vec<Paper>, SearchError> {
        match self {
            SearchProvider::SemanticScholar(s) => s.search(query).await,
            SearchProvider::Arxiv(s) => s.search(query).await,
        }
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render papers into the fixed markdown block: a header, then one numbered
/// title-link line and an authors line per paper, plus the truncated abstract
/// when the source supplies one.
pub fn render_results(papers: &[Paper]) -> String {
    let mut out = String::from("### Research Articles Found:\n\n");
    for (idx, paper) in papers.iter().enumerate() {
        let title = if paper.title.is_empty() { "No Title" } else { &paper.title };
        let year = paper
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "Unknown Year".to_string());
        let authors = paper.authors.join(", ");

        out.push_str(&format!("**{}. [{}]({})** ({})\n", idx + 1, title, paper.url, year));
        out.push_str(&format!("   Authors: {authors}\n"));
        if let Some(summary) = &paper.summary {
            out.push_str(&format!("   {}\n", truncate_abstract(summary)));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// First 300 characters of an abstract plus an ellipsis when cut.
/// Character-based, so multi-byte text never splits mid-codepoint.
fn truncate_abstract(text: &str) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.chars().count() > ABSTRACT_CHAR_BUDGET {
        let head: String = normalized.chars().take(ABSTRACT_CHAR_BUDGET).collect();
        format!("{head}...")
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn paper(title: &str, year: Option<u16>, summary: Option<&str>) -> Paper {
        Paper {
            title: title.to_string(),
            authors: vec!["A. One".to_string(), "B. Two".to_string()],
            year,
            url: "https://example.org/p1".to_string(),
            summary: summary.map(str::to_string),
        }
    }

    #[test]
    fn build_selects_configured_source() {
        let mut cfg = Config::test_default();
        assert!(matches!(
            build(&cfg.search).unwrap(),
            SearchProvider::SemanticScholar(_)
        ));

        cfg.search.provider = "arxiv".into();
        assert!(matches!(build(&cfg.search).unwrap(), SearchProvider::Arxiv(_)));
    }

    #[test]
    fn build_rejects_unknown_source() {
        let mut cfg = Config::test_default();
        cfg.search.provider = "scopus".into();
        assert!(matches!(
            build(&cfg.search).unwrap_err(),
            SearchError::UnknownSource(_)
        ));
    }

    #[test]
    fn render_numbered_lines_with_authors() {
        let out = render_results(&[
            paper("First Paper", Some(2021), None),
            paper("Second Paper", None, None),
        ]);

        assert!(out.starts_with("### Research Articles Found:"));
        assert!(out.contains("**1. [First Paper](https://example.org/p1)** (2021)"));
        assert!(out.contains("**2. [Second Paper](https://example.org/p1)** (Unknown Year)"));
        assert!(out.contains("Authors: A. One, B. Two"));
    }

    #[test]
    fn render_includes_truncated_abstract() {
        let long = "word ".repeat(120);
        let out = render_results(&[paper("P", Some(2020), Some(&long))]);
        let line = out.lines().find(|l| l.trim_start().starts_with("word")).unwrap();
        // 300 chars + "..."
        assert!(line.trim().ends_with("..."));
        assert_eq!(line.trim().chars().count(), ABSTRACT_CHAR_BUDGET + 3);
    }

    #[test]
    fn short_abstract_kept_whole() {
        let out = render_results(&[paper("P", Some(2020), Some("Brief abstract."))]);
        assert!(out.ends_with("Brief abstract."));
    }

    #[test]
    fn empty_title_rendered_as_placeholder() {
        let out = render_results(&[paper("", Some(2020), None)]);
        assert!(out.contains("[No Title]"));
    }
}
