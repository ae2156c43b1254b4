//! Free-form generation through the router.

use anyhow::{anyhow, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::AppContext;
use crate::domain::models::{GenerationOutcome, GenerationRequest, RequestType};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Prompt text
    pub prompt: String,
    /// Extra context placed before the prompt
    #[arg(long)]
    pub context: Option<String>,
    /// Request type (plain, creative, analytical)
    #[arg(short = 't', long = "type", default_value = "plain")]
    pub request_type: String,
    /// Ask the provider for a single JSON document
    #[arg(long)]
    pub structured: bool,
}

#[derive(Debug, Serialize)]
pub struct AttemptOutput {
    pub provider: String,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateOutput {
    pub text: String,
    pub served_by: Option<String>,
    pub fell_back: bool,
    pub attempts: Vec<AttemptOutput>,
}

impl From<GenerationOutcome> for GenerateOutput {
    fn from(outcome: GenerationOutcome) -> Self {
        let fell_back = outcome.fell_back();
        Self {
            served_by: outcome.served_by.map(|p| p.to_string()),
            fell_back,
            attempts: outcome
                .attempts
                .into_iter()
                .map(|attempt| AttemptOutput {
                    provider: attempt.provider.to_string(),
                    error: attempt.error.map(|e| e.to_string()),
                })
                .collect(),
            text: outcome.text,
        }
    }
}

impl CommandOutput for GenerateOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.text.clone()];
        if self.fell_back || self.served_by.is_none() {
            lines.push(String::new());
            for attempt in &self.attempts {
                match &attempt.error {
                    Some(error) => lines.push(format!("  {} failed: {}", attempt.provider, error)),
                    None => lines.push(format!("  {} ok", attempt.provider)),
                }
            }
        }
        lines.join("\n")
    }
}

pub async fn execute(args: GenerateArgs, ctx: &AppContext, json_mode: bool) -> Result<()> {
    let request_type = RequestType::from_str(&args.request_type)
        .ok_or_else(|| anyhow!("Invalid request type: {}", args.request_type))?;

    let mut request = GenerationRequest::new(args.prompt)
        .with_type(request_type)
        .with_structured(args.structured);
    if let Some(context) = args.context {
        request = request.with_context(context);
    }

    let outcome = ctx.router.route(&request, ctx.site()).await;
    output(&GenerateOutput::from(outcome), json_mode);
    Ok(())
}
