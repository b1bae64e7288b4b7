//! Groq chat-completions provider (OpenAI-compatible wire shape).
//!
//! Single POST per call: model id, the full message log, temperature and a
//! token cap. No streaming, no retries — a failed call surfaces as a
//! `ProviderError` for the chat responder to fold into a user-visible string.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::llm::ProviderError;
use crate::session::Turn;

#[derive(Debug, Clone)]
pub struct GroqProvider {
    client: reqwest::Client,
    api_base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    api_key: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl GroqProvider {
    pub fn new(
        api_base_url: String,
        model: String,
        temperature: f32,
        max_tokens: u32,
        timeout_seconds: u64,
        api_key: String,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| ProviderError::Request(e.to_string()))?;
        Ok(Self { client, api_base_url, model, temperature, max_tokens, api_key })
    }

    pub async fn complete(&self, messages: &[Turn]) -> Result<String, ProviderError> {
        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: 1.0,
            stream: false,
        };

        let resp = self
            .client
            .post(&self.api_base_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Request(format!(
                "completion endpoint returned {status}: {detail}"
            )));
        }

        let parsed: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::MalformedReply(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::MalformedReply("no choices in reply".to_string()))
    }
}
