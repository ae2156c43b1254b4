//! Agent CLI commands.

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Args, Subcommand};
use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;

use crate::cli::output::{output, truncate, CommandOutput};
use crate::cli::AppContext;
use crate::domain::models::{
    Article, CompetitorProfile, ContentPlanItem, Lead, LeadStatus, SocialPost,
};
use crate::services::score_lead;

#[derive(Args, Debug)]
pub struct AgentArgs {
    #[command(subcommand)]
    pub command: AgentCommands,
}

#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// Analyse the three main competitors of the configured business
    Competitors,
    /// Draft a monthly content plan
    Plan {
        /// First day of the month (YYYY-MM-DD). Defaults to the current month.
        #[arg(short, long)]
        month: Option<NaiveDate>,
        /// Number of articles
        #[arg(short, long, default_value = "8")]
        items: usize,
    },
    /// Write a complete article about a topic
    Article {
        topic: String,
    },
    /// Draft a schedule of social posts
    Social {
        /// Number of posts
        #[arg(short, long, default_value = "7")]
        count: usize,
    },
    /// Write one post per platform about a topic
    Posts {
        topic: String,
        /// Target platform (repeatable)
        #[arg(short, long = "platform", required = true)]
        platforms: Vec<String>,
    },
    /// Rewrite text in another tone
    Tone {
        text: String,
        #[arg(short, long, default_value = "friendly")]
        tone: String,
    },
    /// Draft one section of an article
    Section {
        heading: String,
        /// Article title
        #[arg(short, long)]
        title: String,
    },
    /// Suggest section headings for an article
    Outline {
        topic: String,
    },
    /// Suggest SEO improvements for a draft
    SeoTips {
        /// Article title
        #[arg(short, long)]
        title: String,
        /// File containing the article body
        #[arg(short, long)]
        file: std::path::PathBuf,
    },
    /// Score a lead from 0 to 100 (no provider call)
    ScoreLead {
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
        /// Pipeline stage (new, contacted, qualified, converted, lost)
        #[arg(long, default_value = "new")]
        status: String,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct CompetitorsOutput {
    pub competitors: Vec<CompetitorProfile>,
}

impl CommandOutput for CompetitorsOutput {
    fn to_human(&self) -> String {
        if self.competitors.is_empty() {
            return "No competitor analysis available.".to_string();
        }

        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("Name").add_attribute(Attribute::Bold),
                Cell::new("Website").add_attribute(Attribute::Bold),
                Cell::new("DA").add_attribute(Attribute::Bold),
                Cell::new("Strength").add_attribute(Attribute::Bold),
                Cell::new("Weakness").add_attribute(Attribute::Bold),
                Cell::new("Keywords").add_attribute(Attribute::Bold),
            ]);

        for competitor in &self.competitors {
            table.add_row(vec![
                Cell::new(&competitor.name),
                Cell::new(&competitor.website),
                Cell::new(competitor.domain_authority),
                Cell::new(truncate(&competitor.strength, 40)),
                Cell::new(truncate(&competitor.weakness, 40)),
                Cell::new(competitor.top_keywords.join(", ")),
            ]);
        }

        table.to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct PlanOutput {
    pub items: Vec<ContentPlanItem>,
}

impl CommandOutput for PlanOutput {
    fn to_human(&self) -> String {
        if self.items.is_empty() {
            return "No content plan generated.".to_string();
        }

        let mut lines = vec![format!("{:<12} {:<50} {}", "DATE", "TITLE", "PLATFORMS")];
        lines.push("-".repeat(80));
        for item in &self.items {
            lines.push(format!(
                "{:<12} {:<50} {}",
                item.publish_date,
                truncate(&item.title, 48),
                item.platforms.join(", ")
            ));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleOutput {
    pub article: Article,
}

impl CommandOutput for ArticleOutput {
    fn to_human(&self) -> String {
        let a = &self.article;
        [
            format!("Title: {}", a.title),
            format!("Slug: {}", a.slug),
            format!("SEO score: {}", a.seo_score),
            format!("Tags: {}", a.tags.join(", ")),
            format!("Excerpt: {}", a.excerpt),
            String::new(),
            a.content.clone(),
        ]
        .join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct PostsOutput {
    pub posts: Vec<SocialPost>,
}

impl CommandOutput for PostsOutput {
    fn to_human(&self) -> String {
        if self.posts.is_empty() {
            return "No posts generated.".to_string();
        }

        self.posts
            .iter()
            .map(|post| {
                format!(
                    "[{}] {}\n{}",
                    post.platform,
                    post.scheduled_at.format("%Y-%m-%d %H:%M"),
                    post.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[derive(Debug, Serialize)]
pub struct TextOutput {
    pub text: String,
}

impl CommandOutput for TextOutput {
    fn to_human(&self) -> String {
        self.text.clone()
    }
}

#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub items: Vec<String>,
}

impl CommandOutput for ListOutput {
    fn to_human(&self) -> String {
        if self.items.is_empty() {
            return "No suggestions available.".to_string();
        }
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{:>2}. {}", i + 1, item))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct LeadScoreOutput {
    pub name: String,
    pub score: u8,
}

impl CommandOutput for LeadScoreOutput {
    fn to_human(&self) -> String {
        format!("{}: {}/100", self.name, self.score)
    }
}

pub async fn execute(args: AgentArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let agents = ctx.agents();
    let site = ctx.site();

    match args.command {
        AgentCommands::Competitors => {
            let competitors = agents.analyze_competitors(site).await;
            output(&CompetitorsOutput { competitors }, json_mode);
        }
        AgentCommands::Plan { month, items } => {
            let month_start = match month {
                Some(date) => date,
                None => {
                    let today = Utc::now().date_naive();
                    today.with_day(1).unwrap_or(today)
                }
            };
            let items = agents.generate_monthly_plan(site, month_start, items).await;
            output(&PlanOutput { items }, json_mode);
        }
        AgentCommands::Article { topic } => {
            let article = agents
                .write_article(&topic, site)
                .await
                .with_context(|| format!("Failed to write article about \"{topic}\""))?;
            output(&ArticleOutput { article }, json_mode);
        }
        AgentCommands::Social { count } => {
            let posts = agents.generate_social_schedule(site, count, Utc::now()).await;
            output(&PostsOutput { posts }, json_mode);
        }
        AgentCommands::Posts { topic, platforms } => {
            let posts = agents.generate_platform_posts(&topic, &platforms, site).await;
            output(&PostsOutput { posts }, json_mode);
        }
        AgentCommands::Tone { text, tone } => {
            let text = agents.refine_tone(&text, &tone, site).await;
            output(&TextOutput { text }, json_mode);
        }
        AgentCommands::Section { heading, title } => {
            let text = agents.draft_section(&heading, &title, site).await;
            output(&TextOutput { text }, json_mode);
        }
        AgentCommands::Outline { topic } => {
            let items = agents.suggest_outline(&topic, site).await;
            output(&ListOutput { items }, json_mode);
        }
        AgentCommands::SeoTips { title, file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let items = agents.suggest_seo_tips(&title, &content, site).await;
            output(&ListOutput { items }, json_mode);
        }
        AgentCommands::ScoreLead { name, email, phone, company, status, notes } => {
            let status = LeadStatus::from_str(&status)
                .ok_or_else(|| anyhow!("Invalid lead status: {status}"))?;
            let lead = Lead { name, email, phone, company, status, notes };
            let out = LeadScoreOutput {
                score: score_lead(&lead),
                name: lead.name,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}
