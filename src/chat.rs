//! Chat responder — turn-taking over a [`ChatSession`] and an [`LlmProvider`].
//!
//! Each call primes the system turn lazily, appends the (possibly
//! country-scoped) user turn, sends the entire log to the provider and
//! appends the reply. On provider failure the user turn is rolled back so
//! the log returns to its pre-call shape and a retry appends cleanly.

use tracing::{debug, warn};

use crate::llm::{LlmProvider, ProviderError};
use crate::session::ChatSession;

/// Base system instruction, before any country scoping.
pub const SYSTEM_PROMPT: &str = "You are ResearcherAI, an expert in research \
methodologies, data analysis, and academic writing. Provide structured and \
insightful responses.";

/// Country-filter value meaning "no scoping".
pub const COUNTRY_ALL: &str = "All";

/// Returns `true` when the filter value asks for region scoping.
fn is_scoped(country: Option<&str>) -> bool {
    matches!(country, Some(c) if !c.trim().is_empty() && c != COUNTRY_ALL)
}

/// Rewrite the system instruction and the user message for a country filter.
/// The rewrite happens once per call and is not a separate log turn — the
/// rewritten user text is what gets appended.
fn scoped_texts(message: &str, country: Option<&str>) -> (String, String) {
    match country {
        Some(c) if is_scoped(country) => (
            format!(
                "{SYSTEM_PROMPT} When answering questions, only include \
                 information related to {c}."
            ),
            format!(
                "Provide information specifically about {message} in {c}. \
                 Include facts, studies, and relevant data from {c} only."
            ),
        ),
        _ => (SYSTEM_PROMPT.to_string(), message.to_string()),
    }
}

/// Run one conversational turn: append the user message, call the provider
/// with the whole log, append the assistant reply.
///
/// On failure the just-appended user turn is removed and the error is
/// returned; the session is unchanged apart from a possibly newly primed
/// system turn.
pub async fn respond(
    session: &mut ChatSession,
    provider: &LlmProvider,
    message: &str,
    country: Option<&str>,
) -> Result<String, ProviderError> {
    let (system_text, user_text) = scoped_texts(message, country);

    session.prime_system(&system_text);
    session.push_user(&user_text);
    debug!(turns = session.len(), "sending conversation log to provider");

    match provider.complete(session.turns()).await {
        Ok(reply) => {
            session.push_assistant(&reply);
            Ok(reply)
        }
        Err(e) => {
            warn!("completion call failed, rolling back user turn: {e}");
            session.rollback_user();
            Err(e)
        }
    }
}
