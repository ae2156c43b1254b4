//! Provider port - interface for LLM backends.

use async_trait::async_trait;

use crate::domain::errors::ProviderResult;
use crate::domain::models::{GenerationConfig, ProviderId};

/// A single external generation provider.
///
/// Adapters translate the provider's request/response shapes into one
/// contract: prompt in, raw response text out. Adapters must not retry;
/// the router owns failure accounting.
///
/// # Errors
/// - `CredentialMissing` - no credential in the site config or environment
/// - `ProviderUnavailable` - transport failure or non-success status
/// - `ProviderResponseInvalid` - response did not match the expected envelope
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Which provider this adapter talks to.
    fn id(&self) -> ProviderId;

    /// Send `prompt` and return the model's raw text.
    ///
    /// When `structured` is set the adapter constrains the response to a
    /// single JSON document, natively where the provider supports it and
    /// through prompt instructions otherwise.
    async fn invoke(
        &self,
        prompt: &str,
        config: &GenerationConfig,
        structured: bool,
    ) -> ProviderResult<String>;
}
