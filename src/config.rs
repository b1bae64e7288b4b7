//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `RESEARCHER_HTTP_BIND` and `RESEARCHER_LOG_LEVEL` env
//! overrides. The LLM API key comes from the `LLM_API_KEY` env var only,
//! never from TOML.

use std::{env, fs, path::Path};

use serde::Deserialize;

use crate::error::AppError;

/// HTTP surface configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Socket address the form UI and API bind to.
    pub bind: String,
}

/// Groq (OpenAI-compatible wire shape) provider configuration.
/// Populated from `[llm.groq]` in the TOML.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token cap per request.
    pub max_tokens: u32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Which provider is active (`"dummy"`, `"groq"`).
    /// Maps to `default` in `[llm]` TOML.
    pub provider: String,
    /// Config for the Groq provider (`[llm.groq]`).
    pub groq: GroqConfig,
}

/// Bibliographic search configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Which source is active (`"semantic_scholar"`, `"arxiv"`).
    pub provider: String,
    /// First-page result count requested from the endpoint.
    pub limit: usize,
    /// Semantic Scholar paper-search endpoint URL.
    pub semantic_scholar_url: String,
    /// arXiv Atom query endpoint URL.
    pub arxiv_url: String,
}

/// Speech synthesis configuration.
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Which engine backend is active (`"espeak"`, `"null"`).
    pub engine: String,
}

/// Fully-resolved service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub service_name: String,
    pub log_level: String,
    pub http: HttpConfig,
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub speech: SpeechConfig,
    /// API key from `LLM_API_KEY` env var. `None` is fatal for providers
    /// that require a key; the provider factory enforces this at startup.
    pub llm_api_key: Option<String>,
}

/// Raw TOML shape, `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    service: RawService,
    #[serde(default)]
    http: RawHttp,
    #[serde(default)]
    llm: RawLlm,
    #[serde(default)]
    search: RawSearch,
    #[serde(default)]
    speech: RawSpeech,
}

#[derive(Deserialize)]
struct RawService {
    #[serde(default = "default_service_name")]
    name: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

#[derive(Deserialize)]
struct RawHttp {
    #[serde(default = "default_http_bind")]
    bind: String,
}

#[derive(Deserialize)]
struct RawLlm {
    /// Maps to `default = "..."` in `[llm]`.
    #[serde(rename = "default", default = "default_llm_provider")]
    provider: String,
    #[serde(default)]
    groq: RawGroqConfig,
}

#[derive(Deserialize)]
struct RawGroqConfig {
    #[serde(default = "default_groq_api_base_url")]
    api_base_url: String,
    #[serde(default = "default_groq_model")]
    model: String,
    #[serde(default = "default_groq_temperature")]
    temperature: f32,
    #[serde(default = "default_groq_max_tokens")]
    max_tokens: u32,
    #[serde(default = "default_groq_timeout_seconds")]
    timeout_seconds: u64,
}

#[derive(Deserialize)]
struct RawSearch {
    /// Maps to `default = "..."` in `[search]`.
    #[serde(rename = "default", default = "default_search_provider")]
    provider: String,
    #[serde(default = "default_search_limit")]
    limit: usize,
    #[serde(default)]
    semantic_scholar: RawEndpoint,
    #[serde(default)]
    arxiv: RawArxivEndpoint,
}

#[derive(Deserialize)]
struct RawEndpoint {
    #[serde(default = "default_semantic_scholar_url")]
    api_base_url: String,
}

#[derive(Deserialize)]
struct RawArxivEndpoint {
    #[serde(default = "default_arxiv_url")]
    api_base_url: String,
}

#[derive(Deserialize)]
struct RawSpeech {
    #[serde(default = "default_speech_engine")]
    engine: String,
}

fn default_service_name() -> String { "researcher-bot".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_http_bind() -> String { "127.0.0.1:8080".to_string() }
fn default_llm_provider() -> String { "groq".to_string() }
fn default_groq_api_base_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}
fn default_groq_model() -> String { "llama3-70b-8192".to_string() }
fn default_groq_temperature() -> f32 { 0.7 }
fn default_groq_max_tokens() -> u32 { 1024 }
fn default_groq_timeout_seconds() -> u64 { 60 }
fn default_search_provider() -> String { "semantic_scholar".to_string() }
fn default_search_limit() -> usize { 10 }
fn default_semantic_scholar_url() -> String {
    "https://api.semanticscholar.org/graph/v1/paper/search".to_string()
}
fn default_arxiv_url() -> String { "http://export.arxiv.org/api/query".to_string() }
fn default_speech_engine() -> String { "espeak".to_string() }

impl Default for RawService {
    fn default() -> Self {
        Self { name: default_service_name(), log_level: default_log_level() }
    }
}

impl Default for RawHttp {
    fn default() -> Self {
        Self { bind: default_http_bind() }
    }
}

impl Default for RawLlm {
    fn default() -> Self {
        Self { provider: default_llm_provider(), groq: RawGroqConfig::default() }
    }
}

impl Default for RawGroqConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_groq_api_base_url(),
            model: default_groq_model(),
            temperature: default_groq_temperature(),
            max_tokens: default_groq_max_tokens(),
            timeout_seconds: default_groq_timeout_seconds(),
        }
    }
}

impl Default for RawSearch {
    fn default() -> Self {
        Self {
            provider: default_search_provider(),
            limit: default_search_limit(),
            semantic_scholar: RawEndpoint::default(),
            arxiv: RawArxivEndpoint::default(),
        }
    }
}

impl Default for RawEndpoint {
    fn default() -> Self {
        Self { api_base_url: default_semantic_scholar_url() }
    }
}

impl Default for RawArxivEndpoint {
    fn default() -> Self {
        Self { api_base_url: default_arxiv_url() }
    }
}

impl Default for RawSpeech {
    fn default() -> Self {
        Self { engine: default_speech_engine() }
    }
}

/// Load config from `config/default.toml`, then apply env-var overrides.
pub fn load() -> Result<Config, AppError> {
    let bind_override = env::var("RESEARCHER_HTTP_BIND").ok();
    let log_level_override = env::var("RESEARCHER_LOG_LEVEL").ok();
    load_from(
        Path::new("config/default.toml"),
        bind_override.as_deref(),
        log_level_override.as_deref(),
    )
}

/// Internal loader accepting an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    bind_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    Ok(resolve(parsed, bind_override, log_level_override))
}

fn resolve(
    parsed: RawConfig,
    bind_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Config {
    let bind = bind_override.unwrap_or(&parsed.http.bind).to_string();
    let log_level = log_level_override.unwrap_or(&parsed.service.log_level).to_string();

    Config {
        service_name: parsed.service.name,
        log_level,
        http: HttpConfig { bind },
        llm: LlmConfig {
            provider: parsed.llm.provider,
            groq: GroqConfig {
                api_base_url: parsed.llm.groq.api_base_url,
                model: parsed.llm.groq.model,
                temperature: parsed.llm.groq.temperature,
                max_tokens: parsed.llm.groq.max_tokens,
                timeout_seconds: parsed.llm.groq.timeout_seconds,
            },
        },
        search: SearchConfig {
            provider: parsed.search.provider,
            limit: parsed.search.limit,
            semantic_scholar_url: parsed.search.semantic_scholar.api_base_url,
            arxiv_url: parsed.search.arxiv.api_base_url,
        },
        speech: SpeechConfig {
            engine: parsed.speech.engine,
        },
        llm_api_key: env::var("LLM_API_KEY").ok(),
    }
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// Safe `Config` for unit tests: dummy LLM, null speech engine, no API keys,
/// no external calls.
impl Config {
    pub fn test_default() -> Self {
        Self {
            service_name: "test".into(),
            log_level: "info".into(),
            http: HttpConfig { bind: "127.0.0.1:0".into() },
            llm: LlmConfig {
                provider: "dummy".into(),
                groq: GroqConfig {
                    api_base_url: "http://localhost:0/v1/chat/completions".into(),
                    model: "test-model".into(),
                    temperature: 0.0,
                    max_tokens: 64,
                    timeout_seconds: 1,
                },
            },
            search: SearchConfig {
                provider: "semantic_scholar".into(),
                limit: 10,
                semantic_scholar_url: "http://localhost:0/graph/v1/paper/search".into(),
                arxiv_url: "http://localhost:0/api/query".into(),
            },
            speech: SpeechConfig { engine: "null".into() },
            llm_api_key: None,
        }
    }
}
