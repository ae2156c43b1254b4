//! SitePilot - multi-provider AI content generation
//!
//! Routes generation requests across several LLM providers with a bounded
//! fallback, and builds content agents (competitor analysis, content plans,
//! articles, social posts, lead scoring) and an autopilot loop on top.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and ports
//! - **Adapter Layer** (`adapters`): provider HTTP clients and content sinks
//! - **Service Layer** (`services`): router, agents, autopilot, throttle
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use sitepilot::{ConfigLoader, GenerationRequest, GenerationRouter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let router = GenerationRouter::from_config(&config)?;
//!     let text = router
//!         .generate(&GenerationRequest::new("Three blog ideas for a bakery"), &config.site)
//!         .await;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::providers::{MockProvider, MockReply, ProviderRegistry};
pub use adapters::sinks::{JsonDirSink, MemorySink};
pub use domain::errors::{AgentError, ProviderError, SinkError};
pub use domain::models::{
    Article, CompetitorProfile, Config, ContentPlanItem, GenerationConfig, GenerationOutcome,
    GenerationRequest, Lead, LeadStatus, ProviderId, RequestType, SocialPost,
};
pub use domain::ports::{Clock, ContentSink, GenerationProvider};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    score_lead, AgentLibrary, AutopilotEngine, AutopilotReport, AutopilotState, GenerationRouter,
    RequestThrottle, GENERATION_FAILURE_SENTINEL,
};
