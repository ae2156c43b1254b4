//! OpenAI-compatible chat completions adapter.
//!
//! Serves the open-weight and high-reasoning providers, which share the
//! `/chat/completions` wire format. Neither is driven in a JSON response
//! mode; structured requests get an explicit format instruction instead.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{resolve_api_key, unavailable_from_response};
use crate::domain::errors::{ProviderError, ProviderResult};
use crate::domain::models::{GenerationConfig, ProviderEndpointConfig, ProviderId};
use crate::domain::ports::GenerationProvider;

/// Appended to structured prompts for providers without a JSON mode.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with a single valid JSON document only. \
Do not wrap it in markdown code fences and do not add any commentary.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions adapter bound to one provider.
pub struct ChatCompletionsProvider {
    provider: ProviderId,
    endpoint: ProviderEndpointConfig,
    client: Client,
}

impl ChatCompletionsProvider {
    pub fn new(provider: ProviderId, endpoint: ProviderEndpointConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .build()
            .map_err(|e| {
                ProviderError::unavailable(provider, format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            provider,
            endpoint,
            client,
        })
    }

    fn build_request(&self, prompt: &str, structured: bool) -> ChatRequest<'_> {
        let content = if structured && !self.provider.supports_json_mode() {
            format!("{prompt}\n\n{JSON_ONLY_INSTRUCTION}")
        } else {
            prompt.to_string()
        };

        ChatRequest {
            model: &self.endpoint.model,
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
            temperature: self.endpoint.temperature,
        }
    }

    fn extract_text(&self, response: ChatResponse) -> ProviderResult<String> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::invalid(self.provider, "empty choices array"))?;

        match choice.message.content {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ProviderError::invalid(self.provider, "empty message content")),
        }
    }
}

#[async_trait]
impl GenerationProvider for ChatCompletionsProvider {
    fn id(&self) -> ProviderId {
        self.provider
    }

    async fn invoke(
        &self,
        prompt: &str,
        config: &GenerationConfig,
        structured: bool,
    ) -> ProviderResult<String> {
        let api_key = resolve_api_key(self.provider, config, &self.endpoint.api_key_env)?;

        debug!(
            provider = %self.provider,
            model = %self.endpoint.model,
            structured,
            prompt_chars = prompt.len(),
            "invoking chat completions"
        );

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.endpoint.base_url.trim_end_matches('/')
            ))
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(&api_key)
            .json(&self.build_request(prompt, structured))
            .send()
            .await
            .map_err(|e| ProviderError::unavailable(self.provider, e.to_string()))?;

        if !response.status().is_success() {
            return Err(unavailable_from_response(self.provider, response).await);
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::invalid(self.provider, e.to_string()))?;

        self.extract_text(body)
    }
}
