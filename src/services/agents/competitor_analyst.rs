//! Competitor analysis agent.

use tracing::info;
use uuid::Uuid;

use super::AgentLibrary;
use crate::domain::models::{CompetitorProfile, GenerationConfig, GenerationRequest};
use crate::services::structured::{parse_list, require_text};

const AGENT: &str = "competitor_analyst";

impl AgentLibrary {
    /// Profile the three strongest competitors in the configured field.
    ///
    /// All-or-nothing: any malformed profile discards the whole answer and
    /// an empty list is returned.
    pub async fn analyze_competitors(&self, config: &GenerationConfig) -> Vec<CompetitorProfile> {
        let prompt = format!(
            "Identify the 3 strongest online competitors for a business in the field of \"{field}\". \
             Return a JSON array of exactly 3 objects with these fields: \
             id (string), name (string), website (domain), domainAuthority (integer 0-100), \
             weakness (string), strength (string), topKeywords (array of strings).",
            field = config.field_or_default()
        );

        let raw = self
            .router
            .generate(&GenerationRequest::structured(prompt), config)
            .await;

        let mut profiles: Vec<CompetitorProfile> =
            parse_list(AGENT, &raw, |profile: &CompetitorProfile| {
                require_text("name", &profile.name)?;
                require_text("website", &profile.website)?;
                if profile.domain_authority > 100 {
                    return Err(format!(
                        "domainAuthority {} out of range",
                        profile.domain_authority
                    ));
                }
                Ok(())
            });

        for profile in &mut profiles {
            if profile.id.trim().is_empty() {
                profile.id = Uuid::new_v4().to_string();
            }
        }

        info!(agent = AGENT, count = profiles.len(), "competitor analysis finished");
        profiles
    }
}
