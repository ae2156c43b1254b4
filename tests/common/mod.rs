//! Common test utilities for integration tests
//!
//! Shared fixtures for building routers and agents over scripted providers.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use sitepilot::adapters::providers::{MockProvider, ProviderRegistry};
use sitepilot::domain::models::{GenerationConfig, ProviderId};
use sitepilot::domain::ports::FixedClock;
use sitepilot::services::{AgentLibrary, GenerationRouter};

/// Router over the given mock providers.
pub fn router_with(providers: &[&MockProvider]) -> GenerationRouter {
    let mut registry = ProviderRegistry::new();
    for provider in providers {
        registry.register(Arc::new((*provider).clone()));
    }
    GenerationRouter::new(registry)
}

/// Agent library over a single default-provider mock, with a fixed clock.
pub fn agents_with(default: &MockProvider) -> AgentLibrary {
    AgentLibrary::new(router_with(&[default])).with_clock(Arc::new(FixedClock(fixed_now())))
}

/// 2026-03-10 12:00 UTC
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
}

pub fn site(field: &str) -> GenerationConfig {
    GenerationConfig::default().with_field(field)
}

pub fn gemini(reply: &str) -> MockProvider {
    MockProvider::replying(ProviderId::Gemini, reply)
}

/// Well-formed article payload as a provider would return it.
pub fn article_json(title: &str) -> String {
    serde_json::json!({
        "title": title,
        "content": "## Why it matters\n\nLocal search drives foot traffic. ".repeat(20),
        "excerpt": "A practical guide to getting found by nearby customers.",
        "keywords": ["local seo", "google business profile"],
        "seoScore": 78
    })
    .to_string()
}

/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
