//! Mock provider for testing and offline runs.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::errors::{ProviderError, ProviderResult};
use crate::domain::models::{GenerationConfig, ProviderId};
use crate::domain::ports::GenerationProvider;

/// Scripted outcome of one mock invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Text(String),
    Unavailable,
    Invalid,
    NoCredential,
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    fn into_result(self, provider: ProviderId) -> ProviderResult<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Unavailable => Err(ProviderError::unavailable(provider, "mock outage")),
            Self::Invalid => Err(ProviderError::invalid(provider, "mock malformed envelope")),
            Self::NoCredential => Err(ProviderError::CredentialMissing(provider)),
        }
    }
}

/// Provider that replays scripted replies and records every call.
///
/// Queued replies are consumed first; afterwards the default reply repeats.
#[derive(Clone)]
pub struct MockProvider {
    id: ProviderId,
    default_reply: MockReply,
    queued: Arc<Mutex<VecDeque<MockReply>>>,
    prompts: Arc<Mutex<Vec<(String, bool)>>>,
    invocations: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn new(id: ProviderId, default_reply: MockReply) -> Self {
        Self {
            id,
            default_reply,
            queued: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            invocations: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn replying(id: ProviderId, text: impl Into<String>) -> Self {
        Self::new(id, MockReply::text(text))
    }

    pub fn failing(id: ProviderId) -> Self {
        Self::new(id, MockReply::Unavailable)
    }

    /// Queue a reply ahead of the default one.
    pub async fn push_reply(&self, reply: MockReply) {
        self.queued.lock().await.push_back(reply);
    }

    /// Number of times `invoke` was called.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// Prompts received so far, with their structured flag.
    pub async fn prompts(&self) -> Vec<(String, bool)> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn invoke(
        &self,
        prompt: &str,
        _config: &GenerationConfig,
        structured: bool,
    ) -> ProviderResult<String> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push((prompt.to_string(), structured));

        let reply = self
            .queued
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());

        reply.into_result(self.id)
    }
}
