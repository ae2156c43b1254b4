use serde::{Deserialize, Serialize};

use super::generation::{GenerationConfig, ProviderId};

/// Main configuration structure for Sitepilot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Provider endpoint configuration
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Generation router configuration
    #[serde(default)]
    pub router: RouterConfig,

    /// Outbound request throttling
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Autopilot loop configuration
    #[serde(default)]
    pub autopilot: AutopilotConfig,

    /// Site-level generation settings (credentials, preferences, business context)
    #[serde(default)]
    pub site: GenerationConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation policy for file output: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Endpoint settings for one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderEndpointConfig {
    /// API base URL
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Environment variable holding the fallback credential
    pub api_key_env: String,

    /// HTTP timeout in seconds
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

const fn default_provider_timeout_secs() -> u64 {
    60
}

const fn default_temperature() -> f32 {
    0.7
}

/// Endpoint settings for every known provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProvidersConfig {
    #[serde(default = "default_gemini")]
    pub gemini: ProviderEndpointConfig,

    #[serde(default = "default_groq")]
    pub groq: ProviderEndpointConfig,

    #[serde(default = "default_deepseek")]
    pub deepseek: ProviderEndpointConfig,
}

fn default_gemini() -> ProviderEndpointConfig {
    ProviderEndpointConfig {
        base_url: "https://generativelanguage.googleapis.com".to_string(),
        model: "gemini-1.5-flash".to_string(),
        api_key_env: "GEMINI_API_KEY".to_string(),
        timeout_secs: default_provider_timeout_secs(),
        temperature: default_temperature(),
    }
}

fn default_groq() -> ProviderEndpointConfig {
    ProviderEndpointConfig {
        base_url: "https://api.groq.com/openai/v1".to_string(),
        model: "llama-3.1-70b-versatile".to_string(),
        api_key_env: "GROQ_API_KEY".to_string(),
        timeout_secs: default_provider_timeout_secs(),
        temperature: 0.9,
    }
}

fn default_deepseek() -> ProviderEndpointConfig {
    ProviderEndpointConfig {
        base_url: "https://api.deepseek.com/v1".to_string(),
        model: "deepseek-reasoner".to_string(),
        api_key_env: "DEEPSEEK_API_KEY".to_string(),
        timeout_secs: 120,
        temperature: 0.3,
    }
}

impl ProvidersConfig {
    pub fn endpoint(&self, provider: ProviderId) -> &ProviderEndpointConfig {
        match provider {
            ProviderId::Gemini => &self.gemini,
            ProviderId::Groq => &self.groq,
            ProviderId::DeepSeek => &self.deepseek,
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            gemini: default_gemini(),
            groq: default_groq(),
            deepseek: default_deepseek(),
        }
    }
}

/// Generation router configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RouterConfig {
    /// Upper bound on a single provider invocation, in seconds
    #[serde(default = "default_invoke_timeout_secs")]
    pub invoke_timeout_secs: u64,

    /// Throttle outbound calls per provider using `rate_limit`
    #[serde(default)]
    pub throttle_providers: bool,
}

const fn default_invoke_timeout_secs() -> u64 {
    90
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            invoke_timeout_secs: default_invoke_timeout_secs(),
            throttle_providers: false,
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitConfig {
    /// Requests allowed per key per minute
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,

    /// Burst size for the bucket
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,

    /// How often idle keys are dropped, in seconds
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

const fn default_requests_per_minute() -> u32 {
    30
}

const fn default_burst_size() -> u32 {
    5
}

const fn default_cleanup_interval_secs() -> u64 {
    300
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
            burst_size: default_burst_size(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

/// Autopilot loop configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AutopilotConfig {
    /// Minimum hours between two runs
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: u32,

    /// Maximum plan items processed per run
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Platforms promoted when a plan item names none
    #[serde(default = "default_platforms")]
    pub default_platforms: Vec<String>,
}

const fn default_cooldown_hours() -> u32 {
    24
}

const fn default_batch_size() -> usize {
    2
}

fn default_platforms() -> Vec<String> {
    vec!["linkedin".to_string(), "twitter".to_string()]
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            cooldown_hours: default_cooldown_hours(),
            batch_size: default_batch_size(),
            default_platforms: default_platforms(),
        }
    }
}
