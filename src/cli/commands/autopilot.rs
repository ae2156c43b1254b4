//! Autopilot CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::sinks::{JsonDirSink, MemorySink};
use crate::cli::output::{output, CommandOutput};
use crate::cli::AppContext;
use crate::domain::models::ContentPlanItem;
use crate::domain::ports::ContentSink;
use crate::services::{AutopilotEngine, AutopilotReport, AutopilotState, ItemOutcome, RunStatus};

#[derive(Args, Debug)]
pub struct AutopilotArgs {
    #[command(subcommand)]
    pub command: AutopilotCommands,
}

#[derive(Subcommand, Debug)]
pub enum AutopilotCommands {
    /// Process the due items of a content plan
    Run {
        /// Content plan YAML file; item statuses are written back
        #[arg(short, long)]
        plan: PathBuf,
        /// Run state JSON file
        #[arg(short, long, default_value = ".sitepilot/autopilot-state.json")]
        state: PathBuf,
        /// Directory receiving articles and posts as JSON. Kept in memory when omitted.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
pub struct RunOutput {
    #[serde(flatten)]
    pub report: AutopilotReport,
    pub published: usize,
    pub failed: usize,
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        let mut lines = match &self.report.status {
            RunStatus::CooldownActive { next_run } => {
                vec![format!("Cooldown active; next run at {next_run}")]
            }
            RunStatus::NothingDue => vec!["No plan items are due.".to_string()],
            RunStatus::Completed => vec![format!(
                "Autopilot run complete: {} published, {} failed",
                self.published, self.failed
            )],
        };

        for item in &self.report.items {
            match &item.outcome {
                ItemOutcome::Published { slug, posts, .. } => {
                    lines.push(format!("  ok     {} -> {} ({} posts)", item.title, slug, posts));
                }
                ItemOutcome::Failed { reason } => {
                    lines.push(format!("  failed {}: {}", item.title, reason));
                }
            }
        }

        lines.join("\n")
    }
}

fn read_plan(path: &Path) -> Result<Vec<ContentPlanItem>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read content plan {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .with_context(|| format!("Invalid content plan in {}", path.display()))
}

fn read_state(path: &Path) -> Result<AutopilotState> {
    if !path.exists() {
        return Ok(AutopilotState::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read autopilot state {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid autopilot state in {}", path.display()))
}

fn write_file(path: &Path, contents: String) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

pub async fn execute(args: AutopilotArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    match args.command {
        AutopilotCommands::Run { plan, state, out } => {
            let mut items = read_plan(&plan)?;
            let mut run_state = read_state(&state)?;

            let sink: Arc<dyn ContentSink> = match out {
                Some(dir) => Arc::new(JsonDirSink::new(dir)),
                None => Arc::new(MemorySink::new()),
            };

            let engine = AutopilotEngine::new(ctx.agents(), sink, ctx.config.autopilot.clone());
            let report = engine.run(&mut items, &mut run_state, ctx.site()).await;

            if matches!(report.status, RunStatus::Completed) {
                write_file(&plan, serde_yaml::to_string(&items)?)?;
                write_file(&state, serde_json::to_string_pretty(&run_state)?)?;
            }

            let out = RunOutput {
                published: report.published(),
                failed: report.failed(),
                report,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
