use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::{Config, GenerationConfig, ProviderId};

/// Project-local configuration directory
pub const CONFIG_DIR: &str = ".sitepilot";

/// Persisted site settings, written by the settings-save action
pub const SITE_SETTINGS_FILE: &str = ".sitepilot/site.yaml";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Provider {0}: base_url cannot be empty")]
    EmptyBaseUrl(ProviderId),

    #[error("Provider {0}: model cannot be empty")]
    EmptyModel(ProviderId),

    #[error("Provider {0}: timeout_secs must be at least 1")]
    InvalidProviderTimeout(ProviderId),

    #[error("Invalid invoke_timeout_secs: {0}. Must be at least 1")]
    InvalidInvokeTimeout(u64),

    #[error("Invalid requests_per_minute: {0}. Must be at least 1")]
    InvalidRateLimit(u32),

    #[error("Invalid burst_size: {0}. Must be at least 1")]
    InvalidBurstSize(u32),

    #[error("Invalid autopilot batch_size: {0}. Must be at least 1")]
    InvalidBatchSize(usize),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .sitepilot/config.yaml (project config)
    /// 3. .sitepilot/site.yaml (saved site settings, nested under `site`;
    ///    keys it omits keep their config.yaml value)
    /// 4. .sitepilot/local.yaml (local overrides, optional)
    /// 5. Environment variables (SITEPILOT_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment(Path::new(".sitepilot/config.yaml"))?
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, keeping the other layers
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Self::figment(path.as_ref())?
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment(config_file: &Path) -> Result<Figment> {
        Self::figment_with_site(config_file, Path::new(SITE_SETTINGS_FILE))
    }

    fn figment_with_site(config_file: &Path, site_file: &Path) -> Result<Figment> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(config_file));

        if site_file.exists() {
            // Merge only the keys present in the file so a hand-edited
            // site.yaml does not blank the rest of the `site` section.
            let raw = std::fs::read_to_string(site_file)
                .with_context(|| format!("Failed to read {}", site_file.display()))?;
            serde_yaml::from_str::<GenerationConfig>(&raw)
                .with_context(|| format!("Invalid site settings in {}", site_file.display()))?;
            let site: serde_yaml::Value = serde_yaml::from_str(&raw)
                .with_context(|| format!("Invalid site settings in {}", site_file.display()))?;
            if !site.is_null() {
                figment = figment.merge(Serialized::default("site", site));
            }
        }

        Ok(figment
            .merge(Yaml::file(".sitepilot/local.yaml"))
            .merge(Env::prefixed("SITEPILOT_").split("__")))
    }

    /// Persist site settings. This is the only way `GenerationConfig` changes.
    pub fn save_site_settings(path: impl AsRef<Path>, settings: &GenerationConfig) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(settings).context("Failed to serialize site settings")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write site settings to {}", path.display()))?;
        Ok(())
    }

    /// Read saved site settings, or defaults when the file does not exist
    pub fn load_site_settings(path: impl AsRef<Path>) -> Result<GenerationConfig> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(GenerationConfig::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid site settings in {}", path.display()))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(config.logging.rotation.clone()));
        }

        for provider in ProviderId::ALL {
            let endpoint = config.providers.endpoint(provider);
            if endpoint.base_url.trim().is_empty() {
                return Err(ConfigError::EmptyBaseUrl(provider));
            }
            if endpoint.model.trim().is_empty() {
                return Err(ConfigError::EmptyModel(provider));
            }
            if endpoint.timeout_secs == 0 {
                return Err(ConfigError::InvalidProviderTimeout(provider));
            }
        }

        if config.router.invoke_timeout_secs == 0 {
            return Err(ConfigError::InvalidInvokeTimeout(config.router.invoke_timeout_secs));
        }

        if config.rate_limit.requests_per_minute == 0 {
            return Err(ConfigError::InvalidRateLimit(config.rate_limit.requests_per_minute));
        }

        if config.rate_limit.burst_size == 0 {
            return Err(ConfigError::InvalidBurstSize(config.rate_limit.burst_size));
        }

        if config.autopilot.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(config.autopilot.batch_size));
        }

        Ok(())
    }
}
