//! Generation router.
//!
//! Picks a provider for each request, invokes it, and on any failure makes
//! exactly one more attempt against the default provider. Nothing thrown by
//! a provider escapes this boundary: callers always get a string back,
//! either the provider's text or [`GENERATION_FAILURE_SENTINEL`].

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::adapters::providers::ProviderRegistry;
use crate::domain::errors::{ProviderError, ProviderResult};
use crate::domain::models::{
    Config, GenerationAttempt, GenerationConfig, GenerationOutcome, GenerationRequest,
    ProviderId, RequestType,
};
use crate::services::rate_limiter::RequestThrottle;

/// Returned in place of generated text when both attempts fail.
pub const GENERATION_FAILURE_SENTINEL: &str =
    "I'm sorry, I couldn't generate a response right now. Please try again in a moment.";

const CONNECTION_TEST_PROMPT: &str = "Reply with the single word OK.";

const DEFAULT_INVOKE_TIMEOUT: Duration = Duration::from_secs(90);

/// Stateless provider router with a single-step fallback.
#[derive(Clone)]
pub struct GenerationRouter {
    registry: ProviderRegistry,
    invoke_timeout: Duration,
    throttle: Option<Arc<RequestThrottle>>,
}

impl GenerationRouter {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            invoke_timeout: DEFAULT_INVOKE_TIMEOUT,
            throttle: None,
        }
    }

    /// Router over the HTTP adapters described by `config`.
    pub fn from_config(config: &Config) -> ProviderResult<Self> {
        let registry = ProviderRegistry::from_config(&config.providers)?;
        let mut router = Self::new(registry)
            .with_invoke_timeout(Duration::from_secs(config.router.invoke_timeout_secs));

        if config.router.throttle_providers {
            let throttle = Arc::new(RequestThrottle::new(&config.rate_limit));
            throttle.start();
            router = router.with_throttle(throttle);
        }
        Ok(router)
    }

    pub fn with_invoke_timeout(mut self, timeout: Duration) -> Self {
        self.invoke_timeout = timeout;
        self
    }

    /// Throttle outbound calls, keyed by provider id.
    pub fn with_throttle(mut self, throttle: Arc<RequestThrottle>) -> Self {
        self.throttle = Some(throttle);
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Provider that should serve a request of `request_type`.
    ///
    /// Creative requests always go to the creative provider. Everything else
    /// uses the configured preference, or the default provider when the
    /// preference is unset or unrecognised.
    pub fn select_provider(request_type: RequestType, config: &GenerationConfig) -> ProviderId {
        if request_type == RequestType::Creative {
            return ProviderId::CREATIVE;
        }
        config.preferred().unwrap_or(ProviderId::DEFAULT)
    }

    /// Full prompt text sent to the provider: business context, caller
    /// context, then the prompt itself.
    pub fn compose_prompt(request: &GenerationRequest, config: &GenerationConfig) -> String {
        let mut sections = Vec::new();

        let mut profile = Vec::new();
        if !config.field.trim().is_empty() {
            profile.push(format!("Business field: {}", config.field.trim()));
        }
        if !config.mission.trim().is_empty() {
            profile.push(format!("Mission: {}", config.mission.trim()));
        }
        if !config.tone.trim().is_empty() {
            profile.push(format!("Preferred tone: {}", config.tone.trim()));
        }
        if !profile.is_empty() {
            sections.push(profile.join("\n"));
        }

        if let Some(context) = request.context.as_deref().map(str::trim) {
            if !context.is_empty() {
                sections.push(format!("Context:\n{context}"));
            }
        }

        sections.push(request.prompt.trim().to_string());
        sections.join("\n\n")
    }

    /// Generate text for `request`. Never fails; see [`GenerationRouter::route`].
    pub async fn generate(&self, request: &GenerationRequest, config: &GenerationConfig) -> String {
        self.route(request, config).await.text
    }

    /// Plain free-text generation with no extra context.
    pub async fn generate_text(&self, prompt: &str, config: &GenerationConfig) -> String {
        self.generate(&GenerationRequest::new(prompt), config).await
    }

    /// Route `request` and report every attempt made.
    ///
    /// At most two providers are invoked: the selected one, then the default
    /// provider. The second attempt targets the default provider even when it
    /// was the one selected.
    #[instrument(
        skip_all,
        fields(request_type = request.request_type.as_str(), structured = request.structured)
    )]
    pub async fn route(
        &self,
        request: &GenerationRequest,
        config: &GenerationConfig,
    ) -> GenerationOutcome {
        if request.prompt.trim().is_empty() {
            warn!("empty prompt; skipping generation");
            return GenerationOutcome {
                text: GENERATION_FAILURE_SENTINEL.to_string(),
                served_by: None,
                attempts: Vec::new(),
            };
        }

        let prompt = Self::compose_prompt(request, config);
        let selected = Self::select_provider(request.request_type, config);
        let mut attempts = Vec::with_capacity(2);

        for (attempt, provider) in [selected, ProviderId::DEFAULT].into_iter().enumerate() {
            match self.attempt(provider, &prompt, config, request.structured).await {
                Ok(text) => {
                    if attempt > 0 {
                        info!(%provider, "fallback provider succeeded");
                    }
                    attempts.push(GenerationAttempt {
                        provider,
                        error: None,
                    });
                    return GenerationOutcome {
                        text,
                        served_by: Some(provider),
                        attempts,
                    };
                }
                Err(err) => {
                    warn!(
                        provider = %err.provider(),
                        attempt = attempt + 1,
                        error = %err,
                        "provider attempt failed"
                    );
                    attempts.push(GenerationAttempt {
                        provider,
                        error: Some(err),
                    });
                }
            }
        }

        error!(%selected, "all provider attempts failed; returning sentinel");
        GenerationOutcome {
            text: GENERATION_FAILURE_SENTINEL.to_string(),
            served_by: None,
            attempts,
        }
    }

    /// Invoke `provider` with a trivial prompt. `true` on any non-empty reply.
    pub async fn test_connection(&self, provider: ProviderId, config: &GenerationConfig) -> bool {
        match self.attempt(provider, CONNECTION_TEST_PROMPT, config, false).await {
            Ok(text) => {
                let healthy = !text.trim().is_empty();
                info!(%provider, healthy, "connection test finished");
                healthy
            }
            Err(err) => {
                warn!(%provider, error = %err, "connection test failed");
                false
            }
        }
    }

    async fn attempt(
        &self,
        provider: ProviderId,
        prompt: &str,
        config: &GenerationConfig,
        structured: bool,
    ) -> ProviderResult<String> {
        let adapter = self
            .registry
            .get(provider)
            .ok_or_else(|| ProviderError::unavailable(provider, "no adapter registered"))?;

        if let Some(throttle) = &self.throttle {
            if !throttle.check(provider.as_str()) {
                return Err(ProviderError::unavailable(provider, "throttled"));
            }
        }

        debug!(
            %provider,
            structured,
            json_mode = structured && provider.supports_json_mode(),
            "invoking provider"
        );
        tokio::time::timeout(self.invoke_timeout, adapter.invoke(prompt, config, structured))
            .await
            .unwrap_or_else(|_| {
                Err(ProviderError::unavailable(
                    provider,
                    format!("timed out after {}s", self.invoke_timeout.as_secs()),
                ))
            })
    }
}
