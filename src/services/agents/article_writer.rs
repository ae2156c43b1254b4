//! Article writing agent.

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::AgentLibrary;
use crate::domain::errors::{AgentError, AgentResult};
use crate::domain::models::{
    Article, ArticleStatus, GenerationConfig, GenerationRequest, DEFAULT_ARTICLE_IMAGE,
};
use crate::services::structured::parse_structured;

const AGENT: &str = "article_writer";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleDraft {
    title: String,
    content: String,
    excerpt: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    seo_score: Option<i64>,
}

/// URL slug for `text`: lowercase alphanumerics joined by single dashes.
///
/// Common Latin accents fold to their ASCII base letter; letters and digits
/// from other scripts are kept as-is, so Arabic or CJK topics still slug.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if let Some(folded) = fold_accent(c) {
            slug.push_str(folded);
        } else if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn fold_accent(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' | 'ş' => "s",
        'ß' => "ss",
        'ť' | 'ţ' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}

/// Heuristic on-page SEO score in `0..=100`.
///
/// Used when the model does not report a score of its own.
pub fn compute_seo_score(title: &str, content: &str, excerpt: &str, keywords: &[String]) -> u8 {
    let mut score: u32 = 0;

    let title_len = title.trim().chars().count();
    if (30..=65).contains(&title_len) {
        score += 20;
    } else if title_len > 0 {
        score += 10;
    }

    if (50..=160).contains(&excerpt.trim().chars().count()) {
        score += 15;
    }

    score += match content.split_whitespace().count() {
        n if n >= 1500 => 25,
        n if n >= 800 => 18,
        n if n >= 300 => 10,
        _ => 0,
    };

    let primary = keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .find(|k| !k.is_empty());
    if let Some(primary) = primary {
        score += 10;
        if title.to_lowercase().contains(&primary) {
            score += 15;
        }
        if content.to_lowercase().contains(&primary) {
            score += 15;
        }
    }

    u8::try_from(score.min(100)).unwrap_or(100)
}

impl AgentLibrary {
    /// Write a complete draft article about `topic`.
    ///
    /// Fails instead of returning a partial article: a missing article must
    /// halt that plan item rather than enter the content pipeline.
    pub async fn write_article(
        &self,
        topic: &str,
        config: &GenerationConfig,
    ) -> AgentResult<Article> {
        let slug = slugify(topic);
        if slug.is_empty() {
            return Err(AgentError::IncompleteArticle(format!(
                "topic '{topic}' yields an empty slug"
            )));
        }

        let prompt = format!(
            "Write a comprehensive, SEO-optimized blog article about \"{topic}\" for a business in \
             \"{field}\", in a {tone} tone. Return a JSON object with fields: \
             title (string, under 65 characters), content (markdown, at least 800 words), \
             excerpt (string, under 160 characters), keywords (array of 5-8 strings), \
             seoScore (integer 0-100).",
            field = config.field_or_default(),
            tone = config.tone_or_default(),
        );

        let raw = self
            .router
            .generate(&GenerationRequest::structured(prompt), config)
            .await;

        let draft: ArticleDraft = parse_structured(AGENT, &raw).inspect_err(|err| {
            warn!(agent = AGENT, topic, error = %err, "article generation failed");
        })?;

        for (field, value) in [
            ("title", &draft.title),
            ("content", &draft.content),
            ("excerpt", &draft.excerpt),
        ] {
            if value.trim().is_empty() {
                return Err(AgentError::IncompleteArticle(format!("{field} is empty")));
            }
        }

        let tags: Vec<String> = draft
            .keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        let seo_score = draft.seo_score.map_or_else(
            || compute_seo_score(&draft.title, &draft.content, &draft.excerpt, &tags),
            |score| u8::try_from(score.clamp(0, 100)).unwrap_or(0),
        );

        let now = self.clock.now();
        let article = Article {
            id: Uuid::new_v4(),
            title: draft.title.trim().to_string(),
            slug,
            content: draft.content,
            excerpt: draft.excerpt.trim().to_string(),
            tags,
            seo_score,
            image: DEFAULT_ARTICLE_IMAGE.to_string(),
            status: ArticleStatus::Draft,
            created_at: now,
            updated_at: now,
        };

        info!(agent = AGENT, slug = %article.slug, seo_score, "article written");
        Ok(article)
    }
}
