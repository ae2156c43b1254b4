//! Shared setup for commands that talk to providers.

use anyhow::{Context, Result};
use std::path::Path;

use crate::domain::models::{Config, GenerationConfig};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::services::{AgentLibrary, GenerationRouter};

/// Loaded configuration, active logger and a router built from both.
pub struct AppContext {
    pub config: Config,
    pub router: GenerationRouter,
    _logger: LoggerImpl,
}

impl AppContext {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = load_config(config_path)?;
        let logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;
        let router = GenerationRouter::from_config(&config)
            .context("Failed to initialise provider adapters")?;

        tracing::debug!(
            providers = ?router.registry().available(),
            preferred = ?config.site.preferred(),
            "context ready"
        );

        Ok(Self {
            config,
            router,
            _logger: logger,
        })
    }

    pub fn site(&self) -> &GenerationConfig {
        &self.config.site
    }

    pub fn agents(&self) -> AgentLibrary {
        AgentLibrary::new(self.router.clone())
    }
}

pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}
