//! Batch entry point for one roster sync run.
//!
//! Exit status: 0 committed, 2 aborted because no source returned data,
//! 1 on any other failure (including a failed write).

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use roster_sync::{DetailFailure, LedgerPolicy, RosterSync, SyncConfig, SyncOutcome};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roster-sync")]
#[command(about = "Sync county detention rosters and publish newly listed inmates")]
struct Cli {
    /// Directory for snapshot, ledger, delta, and metadata files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Whole-adapter deadline in seconds
    #[arg(long)]
    deadline_secs: Option<u64>,

    /// Run sources concurrently
    #[arg(long)]
    concurrent: bool,

    /// Overwrite stored name/image of known inmates with the latest listing
    #[arg(long)]
    refresh_ledger: bool,

    /// Keep inmates whose detail page failed, with no image
    #[arg(long)]
    placeholder_images: bool,

    /// Only run these sources (repeatable)
    #[arg(long = "source")]
    sources: Vec<String>,

    /// Reconcile and report, but write nothing
    #[arg(long)]
    dry_run: bool,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn apply(&self, mut config: SyncConfig) -> SyncConfig {
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.deadline_secs {
            config = config.with_adapter_deadline(Duration::from_secs(secs));
        }
        if self.concurrent {
            config = config.with_concurrency(true);
        }
        if self.refresh_ledger {
            config = config.with_ledger_policy(LedgerPolicy::RefreshOnSight);
        }
        if self.placeholder_images {
            config = config.with_detail_failure(DetailFailure::Placeholder);
        }
        if !self.sources.is_empty() {
            config = config.with_sources(self.sources.iter().map(String::as_str));
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,roster_sync=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = cli.apply(SyncConfig::from_env().context("Failed to load configuration")?);
    tracing::info!(
        ledger = %config.outputs.ledger.display(),
        snapshot = %config.outputs.snapshot.display(),
        "Configuration loaded"
    );

    let sync = RosterSync::from_config(&config)
        .context("Failed to set up sources")?
        .with_dry_run(cli.dry_run);

    let outcome = sync.run().await.context("Roster sync failed")?;

    if cli.json {
        let json = match &outcome {
            SyncOutcome::Committed(report) | SyncOutcome::Previewed(report) => {
                serde_json::to_string_pretty(report)?
            }
            SyncOutcome::Aborted { sources } => serde_json::to_string_pretty(&serde_json::json!({
                "aborted": true,
                "sources": sources,
            }))?,
        };
        println!("{}", json);
    }

    match &outcome {
        SyncOutcome::Committed(report) => tracing::info!(
            new = report.new_records,
            total = report.total_records,
            "Roster published"
        ),
        SyncOutcome::Previewed(report) => tracing::info!(
            new = report.new_records,
            total = report.total_records,
            "Dry run complete"
        ),
        SyncOutcome::Aborted { .. } => {
            tracing::error!("No data collected, prior state preserved")
        }
    }

    Ok(ExitCode::from(outcome.exit_code()))
}
