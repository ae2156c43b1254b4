//! Autopilot content loop over scripted providers and in-memory sinks.

mod common;

use chrono::{Duration, NaiveDate};
use std::sync::Arc;

use common::{agents_with, article_json, fixed_now, site};
use sitepilot::adapters::providers::{MockProvider, MockReply};
use sitepilot::adapters::sinks::{JsonDirSink, MemorySink};
use sitepilot::domain::models::{AutopilotConfig, ContentPlanItem, PlanItemStatus, ProviderId};
use sitepilot::domain::ports::FixedClock;
use sitepilot::services::{AutopilotEngine, AutopilotState, ItemOutcome, RunStatus};
use uuid::Uuid;

const POSTS: &str = r#"[{"platform":"linkedin","content":"Read our new guide"},{"platform":"twitter","content":"New guide out"}]"#;

fn plan_item(title: &str, publish_date: NaiveDate) -> ContentPlanItem {
    ContentPlanItem {
        id: Uuid::new_v4(),
        title: title.to_string(),
        topic: title.to_string(),
        keywords: Vec::new(),
        publish_date,
        platforms: Vec::new(),
        status: PlanItemStatus::Pending,
    }
}

fn today() -> NaiveDate {
    fixed_now().date_naive()
}

fn engine(provider: &MockProvider, sink: Arc<MemorySink>, batch_size: usize) -> AutopilotEngine {
    let config = AutopilotConfig {
        batch_size,
        ..AutopilotConfig::default()
    };
    AutopilotEngine::new(agents_with(provider), sink, config)
        .with_clock(Arc::new(FixedClock(fixed_now())))
}

async fn script(provider: &MockProvider, replies: &[MockReply]) {
    for reply in replies {
        provider.push_reply(reply.clone()).await;
    }
}

#[tokio::test]
async fn test_run_publishes_due_items_in_batch() {
    let provider = MockProvider::new(ProviderId::Gemini, MockReply::Invalid);
    script(
        &provider,
        &[
            MockReply::text(article_json("Bread basics")),
            MockReply::text(POSTS),
            MockReply::text(article_json("Cake basics")),
            MockReply::text(POSTS),
        ],
    )
    .await;
    let sink = Arc::new(MemorySink::new());
    let engine = engine(&provider, sink.clone(), 2);

    let mut plan = vec![
        plan_item("Bread basics", today()),
        plan_item("Cake basics", today() - Duration::days(3)),
        plan_item("Pie basics", today() - Duration::days(1)),
        plan_item("Future post", today() + Duration::days(5)),
    ];
    let mut state = AutopilotState::default();

    let report = engine.run(&mut plan, &mut state, &site("bakery")).await;

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.published(), 2);
    assert_eq!(report.failed(), 0);
    assert_eq!(plan[0].status, PlanItemStatus::Published);
    assert_eq!(plan[1].status, PlanItemStatus::Published);
    assert_eq!(plan[2].status, PlanItemStatus::Pending, "beyond the batch size");
    assert_eq!(plan[3].status, PlanItemStatus::Pending, "not due yet");
    assert_eq!(state.last_run, Some(fixed_now()));

    let articles = sink.articles().await;
    let posts = sink.posts().await;
    assert_eq!(articles.len(), 2);
    assert_eq!(posts.len(), 4);
    assert!(posts
        .iter()
        .all(|post| articles.iter().any(|a| Some(a.id) == post.article_id)));
}

#[tokio::test]
async fn test_cooldown_blocks_run() {
    let provider = MockProvider::replying(ProviderId::Gemini, article_json("unused"));
    let sink = Arc::new(MemorySink::new());
    let engine = engine(&provider, sink.clone(), 2);

    let mut plan = vec![plan_item("Bread basics", today())];
    let last_run = fixed_now() - Duration::hours(3);
    let mut state = AutopilotState {
        last_run: Some(last_run),
    };

    let report = engine.run(&mut plan, &mut state, &site("bakery")).await;

    assert_eq!(
        report.status,
        RunStatus::CooldownActive {
            next_run: last_run + Duration::hours(24)
        }
    );
    assert!(report.items.is_empty());
    assert_eq!(provider.invocations(), 0);
    assert_eq!(state.last_run, Some(last_run));
    assert_eq!(plan[0].status, PlanItemStatus::Pending);
}

#[tokio::test]
async fn test_elapsed_cooldown_allows_run() {
    let provider = MockProvider::new(ProviderId::Gemini, MockReply::text(POSTS));
    provider.push_reply(MockReply::text(article_json("Bread basics"))).await;
    let sink = Arc::new(MemorySink::new());
    let engine = engine(&provider, sink, 1);

    let mut plan = vec![plan_item("Bread basics", today())];
    let mut state = AutopilotState {
        last_run: Some(fixed_now() - Duration::hours(25)),
    };

    let report = engine.run(&mut plan, &mut state, &site("bakery")).await;

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(state.last_run, Some(fixed_now()));
}

#[tokio::test]
async fn test_nothing_due_leaves_state_untouched() {
    let provider = MockProvider::replying(ProviderId::Gemini, "unused");
    let engine = engine(&provider, Arc::new(MemorySink::new()), 2);

    let mut plan = vec![plan_item("Future", today() + Duration::days(1))];
    let mut state = AutopilotState::default();

    let report = engine.run(&mut plan, &mut state, &site("bakery")).await;

    assert_eq!(report.status, RunStatus::NothingDue);
    assert_eq!(state.last_run, None);
    assert_eq!(provider.invocations(), 0);
}

#[tokio::test]
async fn test_failed_article_skips_item_and_continues() {
    let provider = MockProvider::new(ProviderId::Gemini, MockReply::Invalid);
    script(
        &provider,
        &[
            MockReply::text("no json here"),
            MockReply::text(article_json("Cake basics")),
            MockReply::text(POSTS),
        ],
    )
    .await;
    let sink = Arc::new(MemorySink::new());
    let engine = engine(&provider, sink.clone(), 2);

    let mut plan = vec![
        plan_item("Bread basics", today()),
        plan_item("Cake basics", today()),
    ];
    let mut state = AutopilotState::default();

    let report = engine.run(&mut plan, &mut state, &site("bakery")).await;

    assert_eq!(report.published(), 1);
    assert_eq!(report.failed(), 1);
    assert!(matches!(report.items[0].outcome, ItemOutcome::Failed { .. }));
    assert_eq!(plan[0].status, PlanItemStatus::Failed);
    assert_eq!(plan[1].status, PlanItemStatus::Published);
    assert_eq!(sink.articles().await.len(), 1);
}

#[tokio::test]
async fn test_sink_rejection_marks_item_failed() {
    let provider = MockProvider::new(ProviderId::Gemini, MockReply::text(POSTS));
    provider.push_reply(MockReply::text(article_json("Bread basics"))).await;
    let sink = Arc::new(MemorySink::new());
    sink.reject_slug("bread-basics").await;
    let engine = engine(&provider, sink.clone(), 1);

    let mut plan = vec![plan_item("Bread basics", today())];
    let mut state = AutopilotState::default();

    let report = engine.run(&mut plan, &mut state, &site("bakery")).await;

    assert_eq!(report.failed(), 1);
    assert_eq!(plan[0].status, PlanItemStatus::Failed);
    assert!(sink.posts().await.is_empty());
    assert_eq!(provider.invocations(), 1, "no posts are generated for a rejected article");
}

#[tokio::test]
async fn test_item_platforms_override_defaults() {
    let provider = MockProvider::new(
        ProviderId::Gemini,
        MockReply::text(r#"[{"platform":"facebook","content":"Come visit"}]"#),
    );
    provider.push_reply(MockReply::text(article_json("Bread basics"))).await;
    let sink = Arc::new(MemorySink::new());
    let engine = engine(&provider, sink.clone(), 1);

    let mut item = plan_item("Bread basics", today());
    item.platforms = vec!["facebook".to_string()];
    let mut plan = vec![item];
    let mut state = AutopilotState::default();

    engine.run(&mut plan, &mut state, &site("bakery")).await;

    let posts = sink.posts().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].platform, "facebook");
}

#[tokio::test]
async fn test_json_dir_sink_receives_content() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockProvider::new(ProviderId::Gemini, MockReply::text(POSTS));
    provider.push_reply(MockReply::text(article_json("Bread basics"))).await;
    let engine = AutopilotEngine::new(
        agents_with(&provider),
        Arc::new(JsonDirSink::new(dir.path())),
        AutopilotConfig::default(),
    )
    .with_clock(Arc::new(FixedClock(fixed_now())));

    let mut plan = vec![plan_item("Bread basics", today())];
    let mut state = AutopilotState::default();
    let report = engine.run(&mut plan, &mut state, &site("bakery")).await;

    assert_eq!(report.published(), 1);
    assert!(dir.path().join("articles").join("bread-basics.json").exists());
    assert_eq!(std::fs::read_dir(dir.path().join("posts")).unwrap().count(), 2);
}
