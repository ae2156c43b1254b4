//! Provider connectivity check.

use anyhow::{anyhow, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::AppContext;
use crate::domain::models::ProviderId;

#[derive(Args, Debug)]
pub struct PingArgs {
    /// Provider to check (gemini, groq, deepseek). Checks all when omitted.
    pub provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PingResult {
    pub provider: String,
    pub reachable: bool,
}

#[derive(Debug, Serialize)]
pub struct PingOutput {
    pub results: Vec<PingResult>,
}

impl CommandOutput for PingOutput {
    fn to_human(&self) -> String {
        self.results
            .iter()
            .map(|r| {
                let status = if r.reachable { "reachable" } else { "unreachable" };
                format!("{:<10} {}", r.provider, status)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub async fn execute(args: PingArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let providers = match args.provider {
        Some(name) => {
            vec![ProviderId::from_str(&name).ok_or_else(|| anyhow!("Unknown provider: {name}"))?]
        }
        None => ProviderId::ALL.to_vec(),
    };

    let mut results = Vec::with_capacity(providers.len());
    for provider in providers {
        let reachable = ctx.router.test_connection(provider, ctx.site()).await;
        results.push(PingResult {
            provider: provider.to_string(),
            reachable,
        });
    }

    output(&PingOutput { results }, json_mode);
    Ok(())
}
