//! Lambda entrypoint for kendra-enrich.
//!
//! A thin shim over the library crate: resolves `EnrichmentConfig` from the
//! environment with command-line flags taking precedence, builds the AWS
//! clients once per cold start, then either serves Lambda invocations or runs
//! a single local invocation from a JSON event file.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use kendra_enrich::{
    ConfigOverrides, EnrichmentConfig, EnrichmentHook, InvocationRequest, InvocationResponse,
};
use lambda_runtime::{run, service_fn, LambdaEvent};
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "kendra-enrich",
    version,
    about = "Kendra document enrichment hook: category, summary and keywords via Bedrock",
    long_about = "Serves Kendra Custom Document Enrichment post-extraction invocations on AWS \
Lambda. Each invocation reads the extracted document from S3, asks a Bedrock model for a \
category, a summary and a keyword list, and returns them as metadata updates.\n\n\
Configuration is read from BEDROCK_MODEL_ID, AWS_REGION and ENRICH_CONCURRENT; the flags \
below override those variables.\n\n\
Pass --event to run one invocation locally instead of starting the Lambda runtime.",
    color = clap::ColorChoice::Auto
)]
struct Cli {
    /// Bedrock model identifier (e.g. anthropic.claude-v2). Overrides BEDROCK_MODEL_ID.
    #[arg(long)]
    model_id: Option<String>,

    /// AWS region. Overrides AWS_REGION; defaults to the SDK provider chain.
    #[arg(long)]
    region: Option<String>,

    /// Issue the three model calls concurrently. Forces ENRICH_CONCURRENT on.
    #[arg(long)]
    concurrent: bool,

    /// Run a single invocation from this JSON event file and print the response.
    #[arg(long)]
    event: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs (RUST_LOG takes precedence).
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            model_id: self.model_id.clone(),
            region: self.region.clone(),
            concurrent: self.concurrent,
        }
    }
}

async fn function_handler(
    hook: &EnrichmentHook,
    event: LambdaEvent<InvocationRequest>,
) -> Result<InvocationResponse, lambda_runtime::Error> {
    info!("Invocation {}", event.context.request_id);
    Ok(hook.handle(&event.payload).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // CloudWatch stamps every line and does not render ANSI colour.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .without_time()
        .init();

    let config = EnrichmentConfig::from_env(&cli.overrides()).context("Invalid configuration")?;
    let hook = EnrichmentHook::from_aws(config).await;

    // ── Local one-shot mode ──────────────────────────────────────────────
    if let Some(ref path) = cli.event {
        let request = InvocationRequest::from_file(path).await?;
        let response = hook
            .handle(&request)
            .await
            .with_context(|| format!("Enrichment failed for '{}'", request.object_key))?;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    // ── Lambda runtime ───────────────────────────────────────────────────
    run(service_fn(|event| function_handler(&hook, event)))
        .await
        .map_err(|e| anyhow!("Lambda runtime error: {e}"))
}
