//! In-process content sink.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::errors::{SinkError, SinkResult};
use crate::domain::models::{Article, SocialPost};
use crate::domain::ports::ContentSink;

/// Keeps everything it receives in memory.
///
/// Slugs listed through `reject_slug` are refused, which lets callers
/// exercise store failures.
#[derive(Clone, Default)]
pub struct MemorySink {
    articles: Arc<RwLock<Vec<Article>>>,
    posts: Arc<RwLock<Vec<SocialPost>>>,
    rejected_slugs: Arc<RwLock<HashSet<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reject_slug(&self, slug: impl Into<String>) {
        self.rejected_slugs.write().await.insert(slug.into());
    }

    pub async fn articles(&self) -> Vec<Article> {
        self.articles.read().await.clone()
    }

    pub async fn posts(&self) -> Vec<SocialPost> {
        self.posts.read().await.clone()
    }
}

#[async_trait]
impl ContentSink for MemorySink {
    async fn add_article(&self, article: &Article) -> SinkResult<()> {
        if self.rejected_slugs.read().await.contains(&article.slug) {
            return Err(SinkError::Rejected {
                entity: "article",
                reason: format!("slug '{}' already exists", article.slug),
            });
        }
        self.articles.write().await.push(article.clone());
        Ok(())
    }

    async fn add_social_post(&self, post: &SocialPost) -> SinkResult<()> {
        self.posts.write().await.push(post.clone());
        Ok(())
    }
}
