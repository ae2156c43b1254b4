//! Command-line interface.

pub mod commands;
pub mod context;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use context::AppContext;

#[derive(Parser, Debug)]
#[command(name = "sitepilot")]
#[command(
    about = "SitePilot - multi-provider content generation for marketing sites",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file to load instead of .sitepilot/config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate text through the provider router
    Generate(commands::generate::GenerateArgs),
    /// Check that a provider answers with the current credentials
    Ping(commands::ping::PingArgs),
    /// Run a content agent
    Agent(commands::agent::AgentArgs),
    /// Autopilot content loop
    Autopilot(commands::autopilot::AutopilotArgs),
    /// Show or change site generation settings
    Settings(commands::settings::SettingsArgs),
}

/// Report a command failure and exit with a non-zero status.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
