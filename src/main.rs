//! SitePilot CLI entry point.

use clap::Parser;

use sitepilot::cli::commands::{agent, autopilot, generate, ping, settings};
use sitepilot::cli::{handle_error, AppContext, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    let ctx = match AppContext::load(cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(err) => handle_error(err, json),
    };

    let result = match cli.command {
        Commands::Generate(args) => generate::execute(args, &ctx, json).await,
        Commands::Ping(args) => ping::execute(args, &ctx, json).await,
        Commands::Agent(args) => agent::execute(args, &ctx, json).await,
        Commands::Autopilot(args) => autopilot::execute(args, &ctx, json).await,
        Commands::Settings(args) => settings::execute(args, json),
    };

    if let Err(err) = result {
        handle_error(err, json);
    }
}
