//! Generation request/response models.
//!
//! These types describe a single call into the generation router: which
//! provider families exist, what kind of output the caller wants, and what
//! the router reports back after trying them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::errors::ProviderError;

/// Known LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Fast provider with a native JSON response mode. This is the default provider.
    Gemini,
    /// Open-weight inference service, used for creative requests.
    Groq,
    /// High-reasoning provider.
    DeepSeek,
}

impl ProviderId {
    /// Provider that serves requests when no preference applies, and the
    /// target of every fallback attempt.
    pub const DEFAULT: Self = Self::Gemini;

    /// Provider preferred for open-ended creative text.
    pub const CREATIVE: Self = Self::Groq;

    /// All known providers.
    pub const ALL: [Self; 3] = [Self::Gemini, Self::Groq, Self::DeepSeek];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Groq => "groq",
            Self::DeepSeek => "deepseek",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "groq" | "llama" => Some(Self::Groq),
            "deepseek" | "deep_seek" => Some(Self::DeepSeek),
            _ => None,
        }
    }

    /// Whether the provider can constrain its output to a single JSON document.
    pub fn supports_json_mode(&self) -> bool {
        matches!(self, Self::Gemini)
    }
}

impl Default for ProviderId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Site-level generation settings.
///
/// Loaded once from the persisted site configuration and only changed by an
/// explicit settings save. The generation layer treats it as read-only.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationConfig {
    /// Per-provider credentials. Missing entries fall back to the provider's
    /// environment variable.
    #[serde(default)]
    pub api_keys: BTreeMap<ProviderId, String>,

    /// Preferred provider identifier. Unset or unrecognised values select
    /// the default provider.
    #[serde(default)]
    pub preferred_provider: Option<String>,

    /// Business field, e.g. "digital marketing".
    #[serde(default)]
    pub field: String,

    /// Mission statement interpolated into prompts.
    #[serde(default)]
    pub mission: String,

    /// Writing tone interpolated into prompts.
    #[serde(default)]
    pub tone: String,
}

impl GenerationConfig {
    /// Per-site credential for a provider, ignoring blank values.
    pub fn api_key(&self, provider: ProviderId) -> Option<&str> {
        self.api_keys
            .get(&provider)
            .map(String::as_str)
            .filter(|key| !key.trim().is_empty())
    }

    /// Parsed preferred provider, if set and recognised.
    pub fn preferred(&self) -> Option<ProviderId> {
        self.preferred_provider.as_deref().and_then(ProviderId::from_str)
    }

    pub fn with_api_key(mut self, provider: ProviderId, key: impl Into<String>) -> Self {
        self.api_keys.insert(provider, key.into());
        self
    }

    pub fn with_preferred_provider(mut self, provider: impl Into<String>) -> Self {
        self.preferred_provider = Some(provider.into());
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// The business field, or a generic stand-in when unset.
    pub fn field_or_default(&self) -> &str {
        if self.field.trim().is_empty() {
            "general business"
        } else {
            &self.field
        }
    }

    /// The configured tone, or a neutral stand-in when unset.
    pub fn tone_or_default(&self) -> &str {
        if self.tone.trim().is_empty() {
            "professional"
        } else {
            &self.tone
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted: Vec<&str> = self.api_keys.keys().map(ProviderId::as_str).collect();
        f.debug_struct("GenerationConfig")
            .field("api_keys", &format_args!("{redacted:?} [REDACTED]"))
            .field("preferred_provider", &self.preferred_provider)
            .field("field", &self.field)
            .field("mission", &self.mission)
            .field("tone", &self.tone)
            .finish()
    }
}

/// Kind of output a caller asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    #[default]
    Plain,
    Creative,
    Analytical,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Creative => "creative",
            Self::Analytical => "analytical",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "plain" | "text" => Some(Self::Plain),
            "creative" => Some(Self::Creative),
            "analytical" | "analysis" => Some(Self::Analytical),
            _ => None,
        }
    }
}

/// A single generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub context: Option<String>,
    pub request_type: RequestType,
    /// Caller expects a machine-parseable document back.
    pub structured: bool,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            context: None,
            request_type: RequestType::Plain,
            structured: false,
        }
    }

    /// Analytical request expecting structured output.
    pub fn structured(prompt: impl Into<String>) -> Self {
        Self {
            request_type: RequestType::Analytical,
            structured: true,
            ..Self::new(prompt)
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_type(mut self, request_type: RequestType) -> Self {
        self.request_type = request_type;
        self
    }

    pub fn with_structured(mut self, structured: bool) -> Self {
        self.structured = structured;
        self
    }
}

/// One provider invocation made by the router.
#[derive(Debug)]
pub struct GenerationAttempt {
    pub provider: ProviderId,
    pub error: Option<ProviderError>,
}

/// What the router did for a request.
#[derive(Debug)]
pub struct GenerationOutcome {
    /// Provider text, or the failure sentinel.
    pub text: String,
    /// Provider that produced `text`; `None` when every attempt failed.
    pub served_by: Option<ProviderId>,
    pub attempts: Vec<GenerationAttempt>,
}

impl GenerationOutcome {
    pub fn succeeded(&self) -> bool {
        self.served_by.is_some()
    }

    pub fn fell_back(&self) -> bool {
        self.attempts.len() > 1
    }
}
