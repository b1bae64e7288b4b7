//! LLM provider abstraction.
//!
//! `LlmProvider` is an enum over concrete provider implementations.
//! Add a new variant + module in `providers/` for each additional backend.
//!
//! Provider instances are shared immutable capabilities — clone them freely.
//! Enum dispatch avoids `dyn` trait objects and the `async-trait` dependency;
//! `complete` is an `async fn` on the enum so callers need no trait-object
//! machinery.

pub mod providers;

use thiserror::Error;

use crate::session::Turn;

// ── Error ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),
    #[error("provider {0} requires LLM_API_KEY to be set")]
    MissingApiKey(String),
    #[error("provider request failed: {0}")]
    Request(String),
    #[error("malformed provider reply: {0}")]
    MalformedReply(String),
}

// ── Provider enum ─────────────────────────────────────────────────────────────

/// All available provider backends.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Dummy(providers::dummy::DummyProvider),
    Groq(providers::groq::GroqProvider),
}

impl LlmProvider {
    /// Send the full message log to the provider and return its text reply.
    /// The whole log goes on every call — no windowing or summarization.
    pub async fn complete(&self, messages: &[Turn]) -> Result<String, ProviderError> {
        match self {
            LlmProvider::Dummy(p) => p.complete(messages).await,
            LlmProvider::Groq(p) => p.complete(messages).await,
        }
    }
}
