//! OpenAI-compatible chat completions provider.
//!
//! Both supported backends expose the same `/chat/completions` contract, so
//! one adapter serves them; the backend is fixed by the injected
//! [`ProviderSettings`].

use crate::config::{ConfigurationError, ProviderSettings};
use crate::generation::{
    domain::PromptBuilder,
    ports::{ProviderError, ProviderResult, TestGenerationProvider},
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Chat completions provider adapter.
#[derive(Debug)]
pub struct ChatCompletionsProvider {
    client: reqwest::Client,
    endpoint: String,
    settings: ProviderSettings,
    prompts: PromptBuilder,
}

impl ChatCompletionsProvider {
    /// Creates a provider for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::HttpClient`] when the HTTP client or the
    /// prompt template cannot be built.
    pub fn new(settings: ProviderSettings) -> Result<Self, ConfigurationError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| ConfigurationError::HttpClient(err.to_string()))?;
        let prompts =
            PromptBuilder::new().map_err(|err| ConfigurationError::HttpClient(err.to_string()))?;
        let endpoint = format!("{}/chat/completions", settings.base_url());
        Ok(Self {
            client,
            endpoint,
            settings,
            prompts,
        })
    }

    /// Returns the chat completions endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body<'a>(&'a self, system_prompt: &'a str, code: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: self.settings.model(),
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: code,
                },
            ],
            max_tokens: self.settings.max_tokens(),
            temperature: self.settings.temperature(),
            stream: false,
        }
    }
}

#[async_trait]
impl TestGenerationProvider for ChatCompletionsProvider {
    fn name(&self) -> &'static str {
        self.settings.kind().as_str()
    }

    async fn generate_unit_tests(&self, code: &str, language: &str) -> ProviderResult<String> {
        let system_prompt = self.prompts.build(language)?;
        let body = self.request_body(&system_prompt, code);

        debug!(
            provider = self.name(),
            model = self.settings.model(),
            max_tokens = self.settings.max_tokens(),
            temperature = self.settings.temperature(),
            "requesting unit tests"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.settings.api_key().expose())
            .json(&body)
            .send()
            .await
            .map_err(|err| ProviderError::upstream(err.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| ProviderError::upstream(err.to_string()))?;
        debug!(provider = self.name(), status = status.as_u16(), "provider responded");

        extract_completion(status, &text)
    }
}

/// Interprets a chat completions response.
///
/// # Errors
///
/// Returns [`ProviderError::Upstream`] for non-success statuses and
/// malformed bodies, and [`ProviderError::EmptyResponse`] when the first
/// choice carries no text.
pub fn extract_completion(status: StatusCode, body: &str) -> ProviderResult<String> {
    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| envelope.error)
            .and_then(|error| error.message)
            .unwrap_or_else(|| body.trim().to_owned());
        return Err(ProviderError::upstream(format!("{status}: {detail}")));
    }

    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|err| ProviderError::upstream(format!("malformed response body: {err}")))?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|content| content.trim().to_owned())
        .filter(|content| !content.is_empty())
        .ok_or(ProviderError::EmptyResponse)
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}
