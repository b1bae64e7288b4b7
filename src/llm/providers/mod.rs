//! LLM provider implementations.
//!
//! `build(config, api_key)` is the factory — called once at startup.
//! Adding a new backend = new module + new match arm.

pub mod dummy;
pub mod groq;

use crate::config::LlmConfig;
use crate::llm::{LlmProvider, ProviderError};

/// Construct a `LlmProvider` from config and an optional API key.
///
/// `api_key` is sourced from `LLM_API_KEY` env (never TOML). A key-requiring
/// provider with no key is a startup error, not a per-request one.
pub fn build(config: &LlmConfig, api_key: Option<String>) -> Result<LlmProvider, ProviderError> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider)),
        "groq" => {
            let key = api_key.ok_or_else(|| ProviderError::MissingApiKey("groq".to_string()))?;
            let g = &config.groq;
            let p = groq::GroqProvider::new(
                g.api_base_url.clone(),
                g.model.clone(),
                g.temperature,
                g.max_tokens,
                g.timeout_seconds,
                key,
            )?;
            Ok(LlmProvider::Groq(p))
        }
        _ => Err(ProviderError::UnknownProvider(config.provider.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn builds_dummy_without_key() {
        let cfg = Config::test_default();
        assert!(build(&cfg.llm, None).is_ok());
    }

    #[test]
    fn groq_without_key_is_fatal() {
        let mut cfg = Config::test_default();
        cfg.llm.provider = "groq".into();
        let err = build(&cfg.llm, None).unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey(_)));
    }

    #[test]
    fn groq_with_key_builds() {
        let mut cfg = Config::test_default();
        cfg.llm.provider = "groq".into();
        assert!(build(&cfg.llm, Some("k".into())).is_ok());
    }

    #[test]
    fn unknown_provider_rejected() {
        let mut cfg = Config::test_default();
        cfg.llm.provider = "nonsense".into();
        let err = build(&cfg.llm, None).unwrap_err();
        assert!(matches!(err, ProviderError::UnknownProvider(_)));
    }
}
