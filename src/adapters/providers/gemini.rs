//! Gemini provider adapter.
//!
//! Calls the `generateContent` endpoint of the Generative Language API.
//! Structured requests switch on the native JSON response mode.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{resolve_api_key, unavailable_from_response};
use crate::domain::errors::{ProviderError, ProviderResult};
use crate::domain::models::{GenerationConfig, ProviderEndpointConfig, ProviderId};
use crate::domain::ports::GenerationProvider;

const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationSettings,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSettings {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Gemini adapter.
pub struct GeminiProvider {
    endpoint: ProviderEndpointConfig,
    client: Client,
}

impl GeminiProvider {
    pub fn new(endpoint: ProviderEndpointConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .build()
            .map_err(|e| {
                ProviderError::unavailable(
                    ProviderId::Gemini,
                    format!("failed to create HTTP client: {e}"),
                )
            })?;

        Ok(Self { endpoint, client })
    }

    fn build_request<'a>(&self, prompt: &'a str, structured: bool) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationSettings {
                temperature: self.endpoint.temperature,
                response_mime_type: structured.then_some(JSON_MIME_TYPE),
            },
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.base_url.trim_end_matches('/'),
            self.endpoint.model
        )
    }

    fn extract_text(response: GenerateContentResponse) -> ProviderResult<String> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::invalid(ProviderId::Gemini, "no candidates"))?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::invalid(ProviderId::Gemini, "empty candidate text"));
        }
        Ok(text)
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    async fn invoke(
        &self,
        prompt: &str,
        config: &GenerationConfig,
        structured: bool,
    ) -> ProviderResult<String> {
        let api_key = resolve_api_key(ProviderId::Gemini, config, &self.endpoint.api_key_env)?;

        debug!(
            model = %self.endpoint.model,
            structured,
            prompt_chars = prompt.len(),
            "invoking gemini"
        );

        let response = self
            .client
            .post(self.url())
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-goog-api-key", &api_key)
            .json(&self.build_request(prompt, structured))
            .send()
            .await
            .map_err(|e| ProviderError::unavailable(ProviderId::Gemini, e.to_string()))?;

        if !response.status().is_success() {
            return Err(unavailable_from_response(ProviderId::Gemini, response).await);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::invalid(ProviderId::Gemini, e.to_string()))?;

        Self::extract_text(body)
    }
}
