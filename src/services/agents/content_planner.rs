//! Content planning agents: monthly plan, social schedule, per-platform posts.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::AgentLibrary;
use crate::domain::models::{
    ContentPlanItem, GenerationConfig, GenerationRequest, PlanItemStatus, PostStatus, SocialPost,
};
use crate::services::structured::{parse_list, require_text};

const PLANNER: &str = "monthly_planner";
const SCHEDULER: &str = "social_scheduler";
const PLATFORM_WRITER: &str = "platform_post_writer";

/// Posting hour used when the model gives only a date.
const DEFAULT_POST_HOUR: u32 = 9;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanItemDraft {
    title: String,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
    publish_date: NaiveDate,
    #[serde(default)]
    platforms: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostDraft {
    platform: String,
    content: String,
    #[serde(default)]
    scheduled_at: Option<String>,
}

fn validate_post(draft: &PostDraft) -> Result<(), String> {
    require_text("platform", &draft.platform)?;
    require_text("content", &draft.content)
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
fn parse_schedule(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let time = NaiveTime::from_hms_opt(DEFAULT_POST_HOUR, 0, 0)?;
    Some(date.and_time(time).and_utc())
}

impl AgentLibrary {
    /// Draft a month of articles starting at `month_start`.
    pub async fn generate_monthly_plan(
        &self,
        config: &GenerationConfig,
        month_start: NaiveDate,
        items: usize,
    ) -> Vec<ContentPlanItem> {
        let prompt = format!(
            "Create a content plan of {items} blog articles for a business in \"{field}\" \
             (mission: \"{mission}\"), to be published during the month starting {month_start}. \
             Return a JSON array of objects with fields: title (string), topic (string), \
             keywords (array of strings), publishDate (YYYY-MM-DD within that month), \
             platforms (array of social platform names to promote it on).",
            field = config.field_or_default(),
            mission = config.mission.trim(),
        );

        let raw = self
            .router
            .generate(&GenerationRequest::structured(prompt), config)
            .await;

        let drafts: Vec<PlanItemDraft> = parse_list(PLANNER, &raw, |draft: &PlanItemDraft| {
            require_text("title", &draft.title)
        });

        let plan: Vec<ContentPlanItem> = drafts
            .into_iter()
            .map(|draft| ContentPlanItem {
                id: Uuid::new_v4(),
                topic: draft
                    .topic
                    .filter(|topic| !topic.trim().is_empty())
                    .unwrap_or_else(|| draft.title.clone()),
                title: draft.title,
                keywords: draft.keywords,
                publish_date: draft.publish_date,
                platforms: draft.platforms,
                status: PlanItemStatus::Pending,
            })
            .collect();

        info!(agent = PLANNER, count = plan.len(), "monthly plan generated");
        plan
    }

    /// Draft `count` scheduled social posts starting from `start`.
    ///
    /// Posts whose schedule cannot be read are placed one per day from `start`.
    pub async fn generate_social_schedule(
        &self,
        config: &GenerationConfig,
        count: usize,
        start: DateTime<Utc>,
    ) -> Vec<SocialPost> {
        let prompt = format!(
            "Write {count} social media posts for a business in \"{field}\" in a {tone} tone, \
             spread over the days following {date}. Return a JSON array of objects with fields: \
             platform (string), content (string), scheduledAt (ISO 8601 timestamp).",
            field = config.field_or_default(),
            tone = config.tone_or_default(),
            date = start.date_naive(),
        );

        let raw = self
            .router
            .generate(&GenerationRequest::structured(prompt), config)
            .await;

        let drafts: Vec<PostDraft> = parse_list(SCHEDULER, &raw, validate_post);

        let posts: Vec<SocialPost> = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                let fallback = start
                    .checked_add_days(Days::new(index as u64))
                    .unwrap_or(start);
                SocialPost {
                    id: Uuid::new_v4(),
                    platform: draft.platform.trim().to_lowercase(),
                    content: draft.content,
                    scheduled_at: draft
                        .scheduled_at
                        .as_deref()
                        .and_then(parse_schedule)
                        .unwrap_or(fallback),
                    status: PostStatus::Scheduled,
                    article_id: None,
                }
            })
            .collect();

        info!(agent = SCHEDULER, count = posts.len(), "social schedule generated");
        posts
    }

    /// One draft post per requested platform about `topic`.
    ///
    /// Posts for platforms that were not requested are dropped, as are
    /// duplicates; output follows the order of `platforms`.
    pub async fn generate_platform_posts(
        &self,
        topic: &str,
        platforms: &[String],
        config: &GenerationConfig,
    ) -> Vec<SocialPost> {
        let mut requested: Vec<String> = Vec::new();
        for platform in platforms.iter().map(|p| p.trim().to_lowercase()) {
            if !platform.is_empty() && !requested.contains(&platform) {
                requested.push(platform);
            }
        }
        if requested.is_empty() {
            return Vec::new();
        }

        let prompt = format!(
            "Write one social media post per platform promoting the topic \"{topic}\" \
             for a business in \"{field}\", in a {tone} tone, adapted to each platform's \
             conventions and length limits. Platforms: {list}. \
             Return a JSON array of objects with fields: platform (string), content (string).",
            field = config.field_or_default(),
            tone = config.tone_or_default(),
            list = requested.join(", "),
        );

        let raw = self
            .router
            .generate(&GenerationRequest::structured(prompt), config)
            .await;

        let drafts: Vec<PostDraft> = parse_list(PLATFORM_WRITER, &raw, validate_post);
        let now = self.clock.now();

        let posts: Vec<SocialPost> = requested
            .iter()
            .filter_map(|platform| {
                drafts
                    .iter()
                    .find(|draft| draft.platform.trim().eq_ignore_ascii_case(platform))
                    .map(|draft| SocialPost {
                        id: Uuid::new_v4(),
                        platform: platform.clone(),
                        content: draft.content.clone(),
                        scheduled_at: now,
                        status: PostStatus::Draft,
                        article_id: None,
                    })
            })
            .collect();

        info!(agent = PLATFORM_WRITER, count = posts.len(), "platform posts generated");
        posts
    }
}
