//! Provider adapter implementations.

pub mod chat_completions;
pub mod gemini;
pub mod mock;
pub mod registry;

pub use chat_completions::ChatCompletionsProvider;
pub use gemini::GeminiProvider;
pub use mock::{MockProvider, MockReply};
pub use registry::ProviderRegistry;

use crate::domain::errors::{ProviderError, ProviderResult};
use crate::domain::models::{GenerationConfig, ProviderId};

/// Longest slice of an error body kept in a failure reason.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Resolve the credential for `provider`: the per-site key first, then the
/// environment variable named by `env_var`.
pub fn resolve_api_key(
    provider: ProviderId,
    config: &GenerationConfig,
    env_var: &str,
) -> ProviderResult<String> {
    if let Some(key) = config.api_key(provider) {
        return Ok(key.to_string());
    }

    std::env::var(env_var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or(ProviderError::CredentialMissing(provider))
}

/// Map a non-success HTTP response to `ProviderUnavailable`.
pub(crate) async fn unavailable_from_response(
    provider: ProviderId,
    response: reqwest::Response,
) -> ProviderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    ProviderError::unavailable(provider, format!("HTTP {status}: {body}"))
}
