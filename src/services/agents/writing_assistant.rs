//! Editor-side writing helpers.

use tracing::debug;

use super::AgentLibrary;
use crate::domain::models::{GenerationConfig, GenerationRequest, RequestType};
use crate::services::structured::{parse_list, require_text};

const OUTLINE: &str = "outline_suggester";
const SEO_TIPS: &str = "seo_advisor";

/// Longest slice of an article body sent along for SEO review.
const MAX_REVIEW_CHARS: usize = 6_000;

#[allow(clippy::ptr_arg)]
fn non_blank(item: &String) -> Result<(), String> {
    require_text("item", item)
}

impl AgentLibrary {
    /// Rewrite `text` in `tone`. Returns the router's text, which is the
    /// apology sentinel when generation fails.
    pub async fn refine_tone(&self, text: &str, tone: &str, config: &GenerationConfig) -> String {
        let tone = if tone.trim().is_empty() {
            config.tone_or_default()
        } else {
            tone
        };
        let request = GenerationRequest::new(format!(
            "Rewrite the following text in a {tone} tone. Keep the meaning and the language. \
             Return only the rewritten text."
        ))
        .with_context(text);

        self.router.generate(&request, config).await
    }

    /// Draft the body of one section of an article.
    pub async fn draft_section(
        &self,
        heading: &str,
        article_title: &str,
        config: &GenerationConfig,
    ) -> String {
        let request = GenerationRequest::new(format!(
            "Write the section \"{heading}\" of the article \"{article_title}\" in {tone} tone. \
             Use markdown paragraphs and lists where useful; do not repeat the heading.",
            tone = config.tone_or_default(),
        ))
        .with_type(RequestType::Creative);

        self.router.generate(&request, config).await
    }

    /// Suggested section headings for an article about `topic`.
    pub async fn suggest_outline(&self, topic: &str, config: &GenerationConfig) -> Vec<String> {
        let request = GenerationRequest::structured(format!(
            "Suggest an outline of 5 to 8 section headings for a blog article about \"{topic}\". \
             Return a JSON array of strings."
        ));

        let raw = self.router.generate(&request, config).await;
        let outline = parse_list(OUTLINE, &raw, non_blank);
        debug!(agent = OUTLINE, count = outline.len(), "outline suggested");
        outline
    }

    /// Concrete on-page SEO improvements for a draft.
    pub async fn suggest_seo_tips(
        &self,
        title: &str,
        content: &str,
        config: &GenerationConfig,
    ) -> Vec<String> {
        let excerpt: String = content.chars().take(MAX_REVIEW_CHARS).collect();
        let request = GenerationRequest::structured(format!(
            "Review the article titled \"{title}\" given as context and suggest up to 5 concrete \
             on-page SEO improvements. Return a JSON array of short strings."
        ))
        .with_context(excerpt);

        let raw = self.router.generate(&request, config).await;
        let tips = parse_list(SEO_TIPS, &raw, non_blank);
        debug!(agent = SEO_TIPS, count = tips.len(), "seo tips suggested");
        tips
    }
}
