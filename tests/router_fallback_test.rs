//! Routing and fallback behaviour of the generation router.

mod common;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use common::{router_with, site};
use sitepilot::adapters::providers::{MockProvider, MockReply, ProviderRegistry};
use sitepilot::domain::errors::{ProviderError, ProviderResult};
use sitepilot::domain::models::{
    GenerationConfig, GenerationRequest, ProviderId, RateLimitConfig, RequestType,
};
use sitepilot::domain::ports::GenerationProvider;
use sitepilot::services::{GenerationRouter, RequestThrottle, GENERATION_FAILURE_SENTINEL};

#[tokio::test]
async fn test_preferred_failure_falls_back_to_default() {
    common::setup_test_logging();
    let groq = MockProvider::failing(ProviderId::Groq);
    let gemini = MockProvider::replying(ProviderId::Gemini, "OK");
    let router = router_with(&[&groq, &gemini]);
    let config = GenerationConfig::default().with_preferred_provider("groq");

    let text = router.generate(&GenerationRequest::new("hello"), &config).await;

    assert_eq!(text, "OK");
    assert_eq!(groq.invocations(), 1);
    assert_eq!(gemini.invocations(), 1);
}

#[tokio::test]
async fn test_outcome_reports_attempts() {
    let groq = MockProvider::failing(ProviderId::Groq);
    let gemini = MockProvider::replying(ProviderId::Gemini, "OK");
    let router = router_with(&[&groq, &gemini]);
    let config = GenerationConfig::default().with_preferred_provider("groq");

    let outcome = router.route(&GenerationRequest::new("hello"), &config).await;

    assert!(outcome.succeeded());
    assert!(outcome.fell_back());
    assert_eq!(outcome.served_by, Some(ProviderId::Gemini));
    assert_eq!(outcome.attempts.len(), 2);
    assert!(matches!(
        outcome.attempts[0].error,
        Some(ProviderError::ProviderUnavailable { provider: ProviderId::Groq, .. })
    ));
    assert!(outcome.attempts[1].error.is_none());
}

#[tokio::test]
async fn test_total_failure_returns_sentinel() {
    let groq = MockProvider::failing(ProviderId::Groq);
    let gemini = MockProvider::new(ProviderId::Gemini, MockReply::Invalid);
    let router = router_with(&[&groq, &gemini]);
    let config = GenerationConfig::default().with_preferred_provider("groq");

    let outcome = router.route(&GenerationRequest::new("hello"), &config).await;

    assert_eq!(outcome.text, GENERATION_FAILURE_SENTINEL);
    assert!(!outcome.succeeded());
    assert_eq!(groq.invocations() + gemini.invocations(), 2);
    for attempt in &outcome.attempts {
        let err = attempt.error.as_ref().expect("every attempt failed");
        assert_eq!(err.provider(), attempt.provider);
    }
}

#[tokio::test]
async fn test_default_provider_is_retried_once() {
    let gemini = MockProvider::failing(ProviderId::Gemini);
    gemini.push_reply(MockReply::Unavailable).await;
    let router = router_with(&[&gemini]);

    let text = router.generate(&GenerationRequest::new("hello"), &site("bakery")).await;

    assert_eq!(text, GENERATION_FAILURE_SENTINEL);
    assert_eq!(gemini.invocations(), 2);
}

#[tokio::test]
async fn test_default_provider_recovers_on_second_attempt() {
    let gemini = MockProvider::replying(ProviderId::Gemini, "second time lucky");
    gemini.push_reply(MockReply::Unavailable).await;
    let router = router_with(&[&gemini]);

    let text = router.generate(&GenerationRequest::new("hello"), &site("bakery")).await;

    assert_eq!(text, "second time lucky");
    assert_eq!(gemini.invocations(), 2);
}

#[tokio::test]
async fn test_creative_requests_go_to_creative_provider() {
    let groq = MockProvider::replying(ProviderId::Groq, "a poem");
    let gemini = MockProvider::replying(ProviderId::Gemini, "a report");
    let deepseek = MockProvider::replying(ProviderId::DeepSeek, "an analysis");
    let router = router_with(&[&groq, &gemini, &deepseek]);
    let config = GenerationConfig::default().with_preferred_provider("deepseek");

    let request = GenerationRequest::new("write a poem").with_type(RequestType::Creative);
    let text = router.generate(&request, &config).await;

    assert_eq!(text, "a poem");
    assert_eq!(deepseek.invocations(), 0);
    assert_eq!(gemini.invocations(), 0);
}

#[tokio::test]
async fn test_unknown_preference_uses_default() {
    let gemini = MockProvider::replying(ProviderId::Gemini, "OK");
    let router = router_with(&[&gemini]);
    let config = GenerationConfig::default().with_preferred_provider("mystery-llm");

    let text = router.generate(&GenerationRequest::new("hello"), &config).await;

    assert_eq!(text, "OK");
    assert_eq!(gemini.invocations(), 1);
}

#[tokio::test]
async fn test_missing_adapter_counts_as_failed_attempt() {
    let gemini = MockProvider::replying(ProviderId::Gemini, "OK");
    let router = router_with(&[&gemini]);
    let config = GenerationConfig::default().with_preferred_provider("deepseek");

    let outcome = router.route(&GenerationRequest::new("hello"), &config).await;

    assert_eq!(outcome.text, "OK");
    assert_eq!(outcome.attempts.len(), 2);
    assert_eq!(outcome.attempts[0].provider, ProviderId::DeepSeek);
}

#[tokio::test]
async fn test_blank_prompt_skips_providers() {
    let gemini = MockProvider::replying(ProviderId::Gemini, "OK");
    let router = router_with(&[&gemini]);

    let outcome = router.route(&GenerationRequest::new("   \n"), &site("bakery")).await;

    assert_eq!(outcome.text, GENERATION_FAILURE_SENTINEL);
    assert!(outcome.attempts.is_empty());
    assert_eq!(gemini.invocations(), 0);
}

#[tokio::test]
async fn test_prompt_carries_business_context_and_structured_flag() {
    let gemini = MockProvider::replying(ProviderId::Gemini, "[]");
    let router = router_with(&[&gemini]);
    let mut config = site("digital marketing");
    config.mission = "Grow local shops".to_string();

    let request = GenerationRequest::structured("List competitors").with_context("Region: Lyon");
    router.generate(&request, &config).await;

    let prompts = gemini.prompts().await;
    assert_eq!(prompts.len(), 1);
    let (prompt, structured) = &prompts[0];
    assert!(structured);
    assert!(prompt.contains("digital marketing"));
    assert!(prompt.contains("Grow local shops"));
    assert!(prompt.contains("Region: Lyon"));
    assert!(prompt.ends_with("List competitors"));
}

/// Provider that never answers within the router's timeout.
struct SlowProvider;

#[async_trait]
impl GenerationProvider for SlowProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Groq
    }

    async fn invoke(&self, _: &str, _: &GenerationConfig, _: bool) -> ProviderResult<String> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok("too late".to_string())
    }
}

#[tokio::test]
async fn test_slow_provider_times_out_and_falls_back() {
    let gemini = MockProvider::replying(ProviderId::Gemini, "OK");
    let registry = ProviderRegistry::new()
        .with(Arc::new(SlowProvider))
        .with(Arc::new(gemini.clone()));
    let router = GenerationRouter::new(registry).with_invoke_timeout(Duration::from_millis(50));
    let config = GenerationConfig::default().with_preferred_provider("groq");

    let outcome = router.route(&GenerationRequest::new("hello"), &config).await;

    assert_eq!(outcome.text, "OK");
    match &outcome.attempts[0].error {
        Some(ProviderError::ProviderUnavailable { reason, .. }) => {
            assert!(reason.contains("timed out"));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_throttled_attempt_counts_toward_bound() {
    let gemini = MockProvider::replying(ProviderId::Gemini, "OK");
    let throttle = Arc::new(RequestThrottle::new(&RateLimitConfig {
        requests_per_minute: 1,
        burst_size: 1,
        ..RateLimitConfig::default()
    }));
    let router = router_with(&[&gemini]).with_throttle(throttle);

    let first = router.generate(&GenerationRequest::new("one"), &site("bakery")).await;
    let second = router.route(&GenerationRequest::new("two"), &site("bakery")).await;

    assert_eq!(first, "OK");
    assert_eq!(second.text, GENERATION_FAILURE_SENTINEL);
    assert_eq!(second.attempts.len(), 2);
    assert_eq!(gemini.invocations(), 1);
}

#[tokio::test]
async fn test_connection_check() {
    let gemini = MockProvider::replying(ProviderId::Gemini, "pong");
    let groq = MockProvider::new(ProviderId::Groq, MockReply::NoCredential);
    let router = router_with(&[&gemini, &groq]);
    let config = GenerationConfig::default();

    assert!(router.test_connection(ProviderId::Gemini, &config).await);
    assert!(!router.test_connection(ProviderId::Groq, &config).await);
    assert!(!router.test_connection(ProviderId::DeepSeek, &config).await);
    assert_eq!(groq.invocations(), 1);
    assert_eq!(gemini.invocations(), 1);
}
