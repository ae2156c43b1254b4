//! Content sink port - the external CRUD layer that stores generated content.

use async_trait::async_trait;

use crate::domain::errors::SinkResult;
use crate::domain::models::{Article, SocialPost};

/// Opaque destination for generated articles and posts.
#[async_trait]
pub trait ContentSink: Send + Sync {
    async fn add_article(&self, article: &Article) -> SinkResult<()>;

    async fn add_social_post(&self, post: &SocialPost) -> SinkResult<()>;
}
