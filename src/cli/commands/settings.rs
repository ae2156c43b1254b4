//! Site settings commands.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{GenerationConfig, ProviderId};
use crate::infrastructure::config::{ConfigLoader, SITE_SETTINGS_FILE};

#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommands,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show the saved site settings
    Show,
    /// Update and save site settings
    Set {
        /// Preferred provider (gemini, groq, deepseek); empty string clears it
        #[arg(long)]
        preferred_provider: Option<String>,
        #[arg(long)]
        field: Option<String>,
        #[arg(long)]
        mission: Option<String>,
        #[arg(long)]
        tone: Option<String>,
        /// Provider credential as provider=key (repeatable)
        #[arg(long = "api-key")]
        api_keys: Vec<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct SettingsOutput {
    pub preferred_provider: Option<String>,
    pub field: String,
    pub mission: String,
    pub tone: String,
    /// Providers with a saved credential. Keys themselves are never printed.
    pub credentials: Vec<String>,
}

impl From<&GenerationConfig> for SettingsOutput {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            preferred_provider: config.preferred_provider.clone(),
            field: config.field.clone(),
            mission: config.mission.clone(),
            tone: config.tone.clone(),
            credentials: ProviderId::ALL
                .into_iter()
                .filter(|p| config.api_key(*p).is_some())
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl CommandOutput for SettingsOutput {
    fn to_human(&self) -> String {
        let or_unset = |s: &str| {
            if s.is_empty() {
                "(unset)".to_string()
            } else {
                s.to_string()
            }
        };
        let preferred = self
            .preferred_provider
            .as_deref()
            .map_or_else(|| "(default)".to_string(), or_unset);
        let credentials = if self.credentials.is_empty() {
            "(none, using environment)".to_string()
        } else {
            self.credentials.join(", ")
        };
        [
            format!("Preferred provider: {preferred}"),
            format!("Field: {}", or_unset(&self.field)),
            format!("Mission: {}", or_unset(&self.mission)),
            format!("Tone: {}", or_unset(&self.tone)),
            format!("Credentials: {credentials}"),
        ]
        .join("\n")
    }
}

fn parse_api_key(raw: &str) -> Result<(ProviderId, String)> {
    let (provider, key) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected provider=key, got \"{raw}\""))?;
    let provider = ProviderId::from_str(provider)
        .ok_or_else(|| anyhow!("Unknown provider: {provider}"))?;
    Ok((provider, key.trim().to_string()))
}

pub fn execute(args: SettingsArgs, json_mode: bool) -> Result<()> {
    let mut settings = ConfigLoader::load_site_settings(SITE_SETTINGS_FILE)?;

    match args.command {
        SettingsCommands::Show => {}
        SettingsCommands::Set { preferred_provider, field, mission, tone, api_keys } => {
            if let Some(preferred) = preferred_provider {
                let preferred = preferred.trim().to_string();
                if !preferred.is_empty() && ProviderId::from_str(&preferred).is_none() {
                    tracing::warn!(
                        %preferred,
                        "unrecognised provider; the default provider will be used"
                    );
                }
                settings.preferred_provider = (!preferred.is_empty()).then_some(preferred);
            }
            if let Some(field) = field {
                settings.field = field;
            }
            if let Some(mission) = mission {
                settings.mission = mission;
            }
            if let Some(tone) = tone {
                settings.tone = tone;
            }
            for raw in &api_keys {
                let (provider, key) = parse_api_key(raw)?;
                if key.is_empty() {
                    settings.api_keys.remove(&provider);
                } else {
                    settings.api_keys.insert(provider, key);
                }
            }
            ConfigLoader::save_site_settings(SITE_SETTINGS_FILE, &settings)?;
        }
    }

    output(&SettingsOutput::from(&settings), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_key() {
        let (provider, key) = parse_api_key("groq=abc123").unwrap();
        assert_eq!(provider, ProviderId::Groq);
        assert_eq!(key, "abc123");
    }

    #[test]
    fn test_parse_api_key_rejects_unknown_provider() {
        assert!(parse_api_key("openai=abc").is_err());
        assert!(parse_api_key("no-separator").is_err());
    }

    #[test]
    fn test_settings_output_hides_keys() {
        let config = GenerationConfig::default().with_api_key(ProviderId::Gemini, "secret");
        let out = SettingsOutput::from(&config);
        assert_eq!(out.credentials, vec!["gemini".to_string()]);
        assert!(!out.to_json().to_string().contains("secret"));
    }
}
