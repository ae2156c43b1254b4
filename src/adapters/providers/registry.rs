//! Provider registry.

use std::collections::HashMap;
use std::sync::Arc;

use super::chat_completions::ChatCompletionsProvider;
use super::gemini::GeminiProvider;
use crate::domain::errors::ProviderResult;
use crate::domain::models::{ProviderId, ProvidersConfig};
use crate::domain::ports::GenerationProvider;

/// Lookup table from provider identifier to adapter.
///
/// Adding a provider means registering an adapter here; the router never
/// branches on provider identity.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Arc<dyn GenerationProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the HTTP adapters for every known provider.
    pub fn from_config(config: &ProvidersConfig) -> ProviderResult<Self> {
        let mut registry = Self::new();
        registry.register(Arc::new(GeminiProvider::new(config.gemini.clone())?));
        registry.register(Arc::new(ChatCompletionsProvider::new(
            ProviderId::Groq,
            config.groq.clone(),
        )?));
        registry.register(Arc::new(ChatCompletionsProvider::new(
            ProviderId::DeepSeek,
            config.deepseek.clone(),
        )?));
        Ok(registry)
    }

    /// Register an adapter under its own id, replacing any previous one.
    pub fn register(&mut self, provider: Arc<dyn GenerationProvider>) {
        self.providers.insert(provider.id(), provider);
    }

    pub fn with(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.register(provider);
        self
    }

    pub fn get(&self, id: ProviderId) -> Option<Arc<dyn GenerationProvider>> {
        self.providers.get(&id).cloned()
    }

    /// Registered provider ids in a stable order.
    pub fn available(&self) -> Vec<ProviderId> {
        let mut ids: Vec<ProviderId> = self.providers.keys().copied().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::providers::MockProvider;

    #[test]
    fn test_from_config_registers_all() {
        let registry = ProviderRegistry::from_config(&ProvidersConfig::default()).unwrap();
        assert_eq!(registry.available(), ProviderId::ALL.to_vec());
        assert_eq!(registry.get(ProviderId::Groq).unwrap().id(), ProviderId::Groq);
    }

    #[test]
    fn test_register_replaces() {
        let registry = ProviderRegistry::new()
            .with(Arc::new(MockProvider::replying(ProviderId::Gemini, "one")))
            .with(Arc::new(MockProvider::replying(ProviderId::Gemini, "two")));
        assert_eq!(registry.available(), vec![ProviderId::Gemini]);
        assert!(registry.get(ProviderId::DeepSeek).is_none());
    }
}
