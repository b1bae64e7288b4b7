//! Response composer — aggregates independent optional sections into one
//! response string.
//!
//! Sections are evaluated in fixed order {search-or-chat, citation, file};
//! non-empty outputs are joined with a blank line. An absent input skips its
//! section silently, and each section fails independently into an inline
//! message — a partial response always beats a total failure.

use tracing::warn;

use crate::chat;
use crate::cite;
use crate::llm::LlmProvider;
use crate::search::{self, SearchProvider};
use crate::session::ChatSession;
use crate::summarize;

/// How the query field is interpreted: a bibliographic search or a
/// conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    #[default]
    Search,
    Chat,
}

impl QueryMode {
    /// Parse the form's mode string; anything unrecognized means search.
    pub fn parse(s: &str) -> Self {
        match s {
            "chat" => Self::Chat,
            _ => Self::Search,
        }
    }
}

/// An uploaded file, carried as name + raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Raw user inputs collected by the UI layer. Presence checks only —
/// validation happens in the section that consumes each field.
#[derive(Debug, Default)]
pub struct InputBundle {
    pub query: Option<String>,
    pub mode: QueryMode,
    pub citation_details: Option<String>,
    pub citation_style: String,
    pub country: Option<String>,
    pub file: Option<UploadedFile>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Owns the external collaborators the sections call out to.
pub struct Composer {
    search: SearchProvider,
    llm: LlmProvider,
}

impl Composer {
    pub fn new(search: SearchProvider, llm: LlmProvider) -> Self {
        Self { search, llm }
    }

    pub fn llm(&self) -> &LlmProvider {
        &self.llm
    }

    /// Build the aggregate response. Pure with respect to the bundle except
    /// for appending to `session` when the query runs in chat mode.
    pub async fn compose(&self, bundle: &InputBundle, session: &mut ChatSession) -> String {
        let mut sections: Vec<String> = Vec::new();
        // Only non-empty outputs join the response; a section that evaluates
        // to nothing (empty upload, empty reply) leaves no stray separator.
        let mut push = |s: String| {
            if !s.is_empty() {
                sections.push(s);
            }
        };

        if let Some(query) = present(&bundle.query) {
            push(self.query_section(query, bundle, session).await);
        }

        if let Some(details) = present(&bundle.citation_details) {
            push(cite::cite_from_details(details, &bundle.citation_style));
        }

        if let Some(file) = &bundle.file {
            push(
                summarize::summarize(&file.name, &file.bytes)
                    .unwrap_or_else(|e| e.to_string()),
            );
        }

        sections.join("\n\n")
    }

    async fn query_section(
        &self,
        query: &str,
        bundle: &InputBundle,
        session: &mut ChatSession,
    ) -> String {
        match bundle.mode {
            QueryMode::Search => match self.search.search(query).await {
                Ok(papers) if papers.is_empty() => search::NO_RESULTS_TEXT.to_string(),
                Ok(papers) => search::render_results(&papers),
                Err(e) => {
                    warn!("search failed: {e}");
                    search::SEARCH_ERROR_TEXT.to_string()
                }
            },
            QueryMode::Chat => {
                match chat::respond(session, &self.llm, query, bundle.country.as_deref()).await {
                    Ok(reply) => reply,
                    Err(e) => format!("Error contacting the assistant: {e}"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm::providers::dummy::DummyProvider;

    fn composer() -> Composer {
        let cfg = Config::test_default();
        // Search points at an unroutable endpoint; search-mode tests expect
        // the fixed error text.
        Composer::new(
            search::build(&cfg.search).unwrap(),
            LlmProvider::Dummy(DummyProvider),
        )
    }

    #[tokio::test]
    async fn empty_bundle_composes_empty_response() {
        let c = composer();
        let mut session = ChatSession::new();
        let out = c.compose(&InputBundle::default(), &mut session).await;
        assert_eq!(out, "");
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn citation_only_bundle() {
        let c = composer();
        let mut session = ChatSession::new();
        let bundle = InputBundle {
            citation_details: Some("AI Ethics, John Doe, 2023".into()),
            citation_style: "MLA".into(),
            ..Default::default()
        };
        let out = c.compose(&bundle, &mut session).await;
        assert_eq!(out, "John Doe. \"AI Ethics.\" 2023.");
    }

    #[tokio::test]
    async fn malformed_citation_yields_inline_warning() {
        let c = composer();
        let mut session = ChatSession::new();
        let bundle = InputBundle {
            citation_details: Some("only a title".into()),
            citation_style: "APA".into(),
            ..Default::default()
        };
        let out = c.compose(&bundle, &mut session).await;
        assert_eq!(out, cite::MALFORMED_DETAILS_TEXT);
    }

    #[tokio::test]
    async fn chat_mode_appends_to_session_and_sections_join() {
        let c = composer();
        let mut session = ChatSession::new();
        let bundle = InputBundle {
            query: Some("quantum computing".into()),
            mode: QueryMode::Chat,
            citation_details: Some("AI Ethics, John Doe, 2023".into()),
            citation_style: "APA".into(),
            ..Default::default()
        };
        let out = c.compose(&bundle, &mut session).await;

        let sections: Vec<&str> = out.split("\n\n").collect();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0], "[echo] quantum computing");
        assert_eq!(sections[1], "John Doe (2023). AI Ethics.");
        // system + user + assistant
        assert_eq!(session.len(), 3);
    }

    #[tokio::test]
    async fn search_failure_folds_into_fixed_error_text() {
        let c = composer();
        let mut session = ChatSession::new();
        let bundle = InputBundle {
            query: Some("anything".into()),
            ..Default::default()
        };
        let out = c.compose(&bundle, &mut session).await;
        assert_eq!(out, search::SEARCH_ERROR_TEXT);
        // Search mode never touches the session.
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn file_section_reports_unsupported_format_inline() {
        let c = composer();
        let mut session = ChatSession::new();
        let bundle = InputBundle {
            file: Some(UploadedFile { name: "deck.pptx".into(), bytes: vec![1, 2, 3] }),
            ..Default::default()
        };
        let out = c.compose(&bundle, &mut session).await;
        assert_eq!(out, "Unsupported file format. Please upload a PDF or TXT file.");
    }

    #[tokio::test]
    async fn txt_file_summarized_inline() {
        let c = composer();
        let mut session = ChatSession::new();
        let body = "z".repeat(600);
        let bundle = InputBundle {
            file: Some(UploadedFile { name: "notes.txt".into(), bytes: body.into_bytes() }),
            ..Default::default()
        };
        let out = c.compose(&bundle, &mut session).await;
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 503);
    }

    #[tokio::test]
    async fn empty_section_output_leaves_no_stray_separator() {
        let c = composer();
        let mut session = ChatSession::new();
        let bundle = InputBundle {
            citation_details: Some("AI Ethics, John Doe, 2023".into()),
            citation_style: "APA".into(),
            // Present but empty: summarizes to "" and must not join.
            file: Some(UploadedFile { name: "empty.txt".into(), bytes: Vec::new() }),
            ..Default::default()
        };
        let out = c.compose(&bundle, &mut session).await;
        assert_eq!(out, "John Doe (2023). AI Ethics.");
    }

    #[tokio::test]
    async fn whitespace_only_inputs_are_skipped() {
        let c = composer();
        let mut session = ChatSession::new();
        let bundle = InputBundle {
            query: Some("   ".into()),
            citation_details: Some("\t".into()),
            ..Default::default()
        };
        let out = c.compose(&bundle, &mut session).await;
        assert_eq!(out, "");
    }
}
