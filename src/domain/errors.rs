//! Domain errors for the Sitepilot generation layer.

use thiserror::Error;

use crate::domain::models::ProviderId;

/// Failures reported by a provider adapter.
///
/// These never escape the generation router; every variant triggers the
/// fallback attempt.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("No credential configured for provider {0}")]
    CredentialMissing(ProviderId),

    #[error("Provider {provider} unavailable: {reason}")]
    ProviderUnavailable { provider: ProviderId, reason: String },

    #[error("Provider {provider} returned an invalid response: {reason}")]
    ProviderResponseInvalid { provider: ProviderId, reason: String },
}

impl ProviderError {
    pub fn unavailable(provider: ProviderId, reason: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider,
            reason: reason.into(),
        }
    }

    pub fn invalid(provider: ProviderId, reason: impl Into<String>) -> Self {
        Self::ProviderResponseInvalid {
            provider,
            reason: reason.into(),
        }
    }

    /// Provider the failure came from.
    pub fn provider(&self) -> ProviderId {
        match self {
            Self::CredentialMissing(provider)
            | Self::ProviderUnavailable { provider, .. }
            | Self::ProviderResponseInvalid { provider, .. } => *provider,
        }
    }
}

/// Failures raised by agents.
///
/// Only the article writer lets these reach its caller; every other agent
/// substitutes an empty default.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{agent}: could not parse generated output: {reason}")]
    ParseFailure { agent: &'static str, reason: String },

    #[error("Generated article is incomplete: {0}")]
    IncompleteArticle(String),
}

/// Failures reported by the external content store.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Content store rejected {entity}: {reason}")]
    Rejected { entity: &'static str, reason: String },

    #[error("Content store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
pub type AgentResult<T> = Result<T, AgentError>;
pub type SinkResult<T> = Result<T, SinkError>;
