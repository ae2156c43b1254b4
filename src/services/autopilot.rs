//! Autopilot content loop.
//!
//! Once per cooldown period, takes a bounded batch of due plan items and
//! turns each into an article plus its promotional posts, strictly one item
//! at a time. A failed item is marked and skipped; it never stops the run.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::domain::models::{AutopilotConfig, ContentPlanItem, GenerationConfig, PlanItemStatus};
use crate::domain::ports::{Clock, ContentSink, SystemClock};
use crate::services::agents::AgentLibrary;

/// Persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutopilotState {
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
}

/// Overall result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunStatus {
    /// The batch was processed.
    Completed,
    /// The previous run is too recent.
    CooldownActive { next_run: DateTime<Utc> },
    /// No pending item is due yet.
    NothingDue,
}

/// What happened to one plan item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    Published { article_id: Uuid, slug: String, posts: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub item_id: Uuid,
    pub title: String,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AutopilotReport {
    #[serde(flatten)]
    pub status: RunStatus,
    pub items: Vec<ItemReport>,
}

impl AutopilotReport {
    fn without_items(status: RunStatus) -> Self {
        Self {
            status,
            items: Vec::new(),
        }
    }

    pub fn published(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Published { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.items.len() - self.published()
    }
}

/// Sequential content loop over a content plan.
pub struct AutopilotEngine {
    agents: AgentLibrary,
    sink: Arc<dyn ContentSink>,
    clock: Arc<dyn Clock>,
    config: AutopilotConfig,
}

impl AutopilotEngine {
    pub fn new(agents: AgentLibrary, sink: Arc<dyn ContentSink>, config: AutopilotConfig) -> Self {
        Self {
            agents,
            sink,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// When the next run is allowed, given `state`.
    pub fn next_run(&self, state: &AutopilotState) -> Option<DateTime<Utc>> {
        state
            .last_run
            .map(|last| last + Duration::hours(i64::from(self.config.cooldown_hours)))
    }

    /// Run one batch.
    ///
    /// Updates item statuses in `plan` and records the run time in `state`
    /// whenever at least one item was attempted.
    #[instrument(skip_all)]
    pub async fn run(
        &self,
        plan: &mut [ContentPlanItem],
        state: &mut AutopilotState,
        site: &GenerationConfig,
    ) -> AutopilotReport {
        let now = self.clock.now();

        if let Some(next_run) = self.next_run(state).filter(|next| *next > now) {
            info!(%next_run, "autopilot cooling down");
            return AutopilotReport::without_items(RunStatus::CooldownActive { next_run });
        }

        let today = now.date_naive();
        let due: Vec<usize> = plan
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                item.status == PlanItemStatus::Pending && item.publish_date <= today
            })
            .map(|(index, _)| index)
            .take(self.config.batch_size)
            .collect();

        if due.is_empty() {
            info!("no plan items due");
            return AutopilotReport::without_items(RunStatus::NothingDue);
        }

        let mut items = Vec::with_capacity(due.len());
        for index in due {
            let item = &mut plan[index];
            let outcome = self.process_item(item, site).await;
            item.status = match outcome {
                ItemOutcome::Published { .. } => PlanItemStatus::Published,
                ItemOutcome::Failed { .. } => PlanItemStatus::Failed,
            };
            items.push(ItemReport {
                item_id: item.id,
                title: item.title.clone(),
                outcome,
            });
        }

        state.last_run = Some(now);
        let report = AutopilotReport {
            status: RunStatus::Completed,
            items,
        };
        info!(
            published = report.published(),
            failed = report.failed(),
            "autopilot run finished"
        );
        report
    }

    async fn process_item(&self, item: &ContentPlanItem, site: &GenerationConfig) -> ItemOutcome {
        let article = match self.agents.write_article(&item.topic, site).await {
            Ok(article) => article,
            Err(err) => {
                warn!(item = %item.id, error = %err, "skipping plan item");
                return ItemOutcome::Failed {
                    reason: err.to_string(),
                };
            }
        };

        if let Err(err) = self.sink.add_article(&article).await {
            warn!(item = %item.id, error = %err, "content store rejected article");
            return ItemOutcome::Failed {
                reason: err.to_string(),
            };
        }

        let platforms = if item.platforms.is_empty() {
            &self.config.default_platforms
        } else {
            &item.platforms
        };

        let mut stored = 0;
        for mut post in self
            .agents
            .generate_platform_posts(&article.title, platforms, site)
            .await
        {
            post.article_id = Some(article.id);
            match self.sink.add_social_post(&post).await {
                Ok(()) => stored += 1,
                Err(err) => warn!(
                    item = %item.id,
                    platform = %post.platform,
                    error = %err,
                    "content store rejected post"
                ),
            }
        }

        ItemOutcome::Published {
            article_id: article.id,
            slug: article.slug,
            posts: stored,
        }
    }
}
