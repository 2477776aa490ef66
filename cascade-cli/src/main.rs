//! Cascade CLI
//!
//! Triggers child pipelines on a GitLab-compatible CI host, one per
//! requested release, and waits until every one of them finishes. Exits
//! zero only if all of them succeeded.
//!
//! Defaults come from the CI job environment, so inside a pipeline the
//! tool usually only needs `--release` and any extra `-e` variables.

mod config;
mod runner;
mod variables;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cascade_client::GitlabClient;
use cascade_core::dto::pipeline::TriggerPipeline;

use crate::config::Config;
use crate::runner::{PipelineRunner, RunError};
use crate::variables::{build_variables, parse_key_val};

#[derive(Parser)]
#[command(name = "cascade")]
#[command(about = "Trigger child CI pipelines and wait until they finish", long_about = None)]
struct Cli {
    /// URL of the target instance (defaults to https://$CI_SERVER_HOST)
    #[arg(long)]
    gitlab_url: Option<String>,

    /// ID or namespace path of the targeted project
    #[arg(long, env = "CI_PROJECT_ID")]
    project_id: String,

    /// Pipeline trigger token
    #[arg(long, env = "CI_JOB_TOKEN", hide_env_values = true)]
    token: String,

    /// Branch or tag to trigger
    #[arg(long, env = "CI_COMMIT_REF_NAME")]
    reference: String,

    /// Extra pipeline variables as KEY=VALUE pairs
    #[arg(short, long, value_parser = parse_key_val)]
    env: Vec<(String, String)>,

    /// Release labels; one pipeline is triggered per label
    #[arg(long = "release", env = "RELEASE", num_args = 1..)]
    releases: Vec<String>,

    /// Include the staging image URL variables
    #[arg(long)]
    include_image_urls: bool,

    /// Registry root for the staging images (with --include-image-urls)
    #[arg(long, env = "CI_REGISTRY_IMAGE")]
    registry_url: Option<String>,

    /// Default branch, to tell staging branches from the mainline
    /// (with --include-image-urls)
    #[arg(long, env = "CI_DEFAULT_BRANCH")]
    default_branch: Option<String>,

    /// Tag suffix for the staging images (with --include-image-urls)
    #[arg(long, env = "CI_COMMIT_REF_NAME")]
    staging_tag: Option<String>,

    /// Seconds between status polls
    #[arg(long, default_value = "10")]
    poll_interval: u64,

    /// Give up waiting on a run after this many seconds
    #[arg(long)]
    wait_timeout: Option<u64>,

    /// Output verbose
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = build_config(&cli)?;
    config.validate()?;

    let requests: Vec<TriggerPipeline> = config
        .releases
        .iter()
        .map(|release| TriggerPipeline {
            reference: config.reference.clone(),
            token: config.token.clone(),
            variables: build_variables(&config, release),
        })
        .collect();

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")?;
    let client = GitlabClient::with_client(&config.gitlab_url, http_client);

    let runner = PipelineRunner::new(client, &config.project)
        .with_poll_interval(config.poll_interval)
        .with_wait_timeout(config.wait_timeout);

    match runner.run_all(&requests).await {
        Ok(()) => {
            println!(
                "{}",
                format!("✓ All {} pipeline(s) succeeded!", requests.len())
                    .green()
                    .bold()
            );
            Ok(())
        }
        Err(err) => {
            if let RunError::Client(client_err) = &err {
                if client_err.is_client_error() {
                    eprintln!(
                        "{}",
                        "Rejected by the host. Check the trigger token and project id.".yellow()
                    );
                } else if client_err.is_server_error() {
                    eprintln!("{}", "Host-side error. Not retrying.".yellow());
                }
            }
            Err(err.into())
        }
    }
}

/// Initialize logging
///
/// `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "cascade_cli=debug,cascade_client=debug"
    } else {
        "cascade_cli=info,cascade_client=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolve the parsed arguments into a validated run configuration
fn build_config(cli: &Cli) -> Result<Config> {
    let gitlab_url = config::resolve_gitlab_url(
        cli.gitlab_url.clone(),
        std::env::var("CI_SERVER_HOST").ok(),
    )?;

    Ok(Config {
        gitlab_url,
        project: cli.project_id.clone(),
        token: cli.token.clone(),
        reference: cli.reference.clone(),
        releases: cli.releases.clone(),
        env: cli.env.clone(),
        include_image_urls: cli.include_image_urls,
        registry_url: cli.registry_url.clone(),
        default_branch: cli.default_branch.clone(),
        staging_tag: cli.staging_tag.clone(),
        poll_interval: Duration::from_secs(cli.poll_interval),
        wait_timeout: cli.wait_timeout.map(Duration::from_secs),
    })
}
