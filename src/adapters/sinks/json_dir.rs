//! Content sink writing one JSON file per item.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::domain::errors::SinkResult;
use crate::domain::models::{Article, SocialPost};
use crate::domain::ports::ContentSink;

/// Writes articles to `<root>/articles/<slug>.json` and posts to
/// `<root>/posts/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirSink {
    root: PathBuf,
}

impl JsonDirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn write(&self, dir: &str, name: &str, body: Vec<u8>) -> SinkResult<()> {
        let dir = self.root.join(dir);
        fs::create_dir_all(&dir).await?;
        let path = dir.join(format!("{name}.json"));
        fs::write(&path, body).await?;
        debug!(path = %path.display(), "content written");
        Ok(())
    }
}

#[async_trait]
impl ContentSink for JsonDirSink {
    async fn add_article(&self, article: &Article) -> SinkResult<()> {
        let body = serde_json::to_vec_pretty(article)?;
        self.write("articles", &article.slug, body).await
    }

    async fn add_social_post(&self, post: &SocialPost) -> SinkResult<()> {
        let body = serde_json::to_vec_pretty(post)?;
        self.write("posts", &post.id.to_string(), body).await
    }
}
