//! arXiv query-API adapter.
//!
//! One GET against the export endpoint; the Atom XML feed is deserialized
//! with quick-xml's serde support. Entries carry an abstract (`summary`)
//! which the renderer truncates to the fixed character budget.

use serde::Deserialize;
use tracing::debug;

use super::{Paper, SearchError};

#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: reqwest::Client,
    api_base_url: String,
    limit: usize,
}

/// Atom feed shape — only the fields we map are declared.
#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default, rename = "entry")]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default, rename = "author")]
    authors: Vec<Author>,
    /// RFC 3339 timestamp, e.g. `2023-05-11T17:59:59Z`.
    #[serde(default)]
    published: String,
    /// Entry id is the canonical abstract-page URL.
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct Author {
    #[serde(default)]
    name: String,
}

impl ArxivSource {
    pub fn new(api_base_url: String, limit: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base_url,
            limit,
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Paper>, SearchError> {
        debug!(%query, limit = self.limit, "arxiv search");

        let search_query = format!("all:{query}");
        let max_results = self.limit.to_string();
        let resp = self
            .client
            .get(&self.api_base_url)
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        parse_feed(&body).map(|papers| papers.into_iter().take(self.limit).collect())
    }
}

fn parse_feed(xml: &str) -> Result<Vec<Paper>, SearchError> {
    let feed: Feed =
        quick_xml::de::from_str(xml).map_err(|e| SearchError::Parse(e.to_string()))?;
    Ok(feed.entries.into_iter().map(into_paper).collect())
}

fn into_paper(entry: Entry) -> Paper {
    // Feed titles wrap across lines; collapse the whitespace.
    let title = entry.title.split_whitespace().collect::<Vec<_>>().join(" ");
    let year = entry.published.get(..4).and_then(|y| y.parse().ok());
    Paper {
        title,
        authors: entry.authors.into_iter().map(|a| a.name).collect(),
        year,
        url: entry.id,
        summary: Some(entry.summary.trim().to_string()),
    }
}
