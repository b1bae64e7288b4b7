//! Semantic Scholar paper-search adapter.
//!
//! One GET against the graph API's `/paper/search` endpoint with a fixed
//! field list and page size; the JSON `data` array maps straight into
//! [`Paper`] records. No API key required for the public tier.

use serde::Deserialize;
use tracing::debug;

use super::{Paper, SearchError};

const FIELDS: &str = "title,authors,year,url";

#[derive(Debug, Clone)]
pub struct SemanticScholarSource {
    client: reqwest::Client,
    api_base_url: String,
    limit: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<ApiPaper>,
}

#[derive(Deserialize)]
struct ApiPaper {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    authors: Vec<ApiAuthor>,
    #[serde(default)]
    year: Option<u16>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct ApiAuthor {
    #[serde(default)]
    name: String,
}

impl SemanticScholarSource {
    pub fn new(api_base_url: String, limit: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base_url,
            limit,
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Paper>, SearchError> {
        debug!(%query, limit = self.limit, "semantic scholar search");

        let limit = self.limit.to_string();
        let resp = self
            .client
            .get(&self.api_base_url)
            .query(&[("query", query), ("fields", FIELDS), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let parsed: SearchResponse = resp
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        Ok(parsed.data.into_iter().take(self.limit).map(into_paper).collect())
    }
}

fn into_paper(p: ApiPaper) -> Paper {
    Paper {
        title: p.title.unwrap_or_default(),
        authors: p.authors.into_iter().map(|a| a.name).collect(),
        year: p.year,
        url: p.url.unwrap_or_else(|| "#".to_string()),
        summary: None,
    }
}
