//! Domain models.

pub mod config;
pub mod content;
pub mod generation;

pub use config::{
    AutopilotConfig, Config, LoggingConfig, ProviderEndpointConfig, ProvidersConfig,
    RateLimitConfig, RouterConfig,
};
pub use content::{
    Article, ArticleStatus, CompetitorProfile, ContentPlanItem, Lead, LeadStatus,
    PlanItemStatus, PostStatus, SocialPost, DEFAULT_ARTICLE_IMAGE,
};
pub use generation::{
    GenerationAttempt, GenerationConfig, GenerationOutcome, GenerationRequest, ProviderId,
    RequestType,
};
