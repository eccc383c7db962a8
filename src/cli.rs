// src/cli.rs
use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::config::{FeedConfig, OutputShape};
use crate::pipeline::Pipeline;
use crate::reader::{read_feed, DEFAULT_FEED_KEY};
use crate::sources::{sources_for, HttpFetcher};
use crate::writer::FeedWriter;

#[derive(Parser)]
#[command(name = "jobfeed")]
#[command(about = "Aggregate public job-board postings into a static jobs.json feed")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Write logs to this file (truncated on start) instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch every configured board and write the feed
    Fetch {
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the output path
        #[arg(long)]
        output: Option<PathBuf>,
        /// Wrap the list as { "updated_at": ..., "<key>": [...] }
        #[arg(long)]
        wrapped: bool,
        /// Print the feed to stdout instead of writing it
        #[arg(long)]
        dry_run: bool,
        /// Exit non-zero when every board failed, even after writing the placeholder
        #[arg(long)]
        strict: bool,
    },
    /// Validate an existing feed file against the consumer's read contract
    Check {
        path: PathBuf,
        /// Array field to read from a wrapped feed
        #[arg(long, default_value = DEFAULT_FEED_KEY)]
        key: String,
    },
    /// List the configured board allow-list
    Boards {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub async fn handle_command(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Fetch {
            config,
            output,
            wrapped,
            dry_run,
            strict,
        } => {
            let mut config = FeedConfig::load(config.as_deref())?;
            if let Some(path) = output {
                config.output.path = path;
            }
            if wrapped {
                config.output.shape = OutputShape::Wrapped;
            }
            let status = run_fetch(config, dry_run).await?;
            Ok(if status.succeeded(strict) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Check { path, key } => match read_feed(&path, &key).await {
            Ok(snapshot) => {
                info!(
                    "{}: {} jobs, updated_at {}",
                    path.display(),
                    snapshot.jobs.len(),
                    snapshot.updated_at.as_deref().unwrap_or("—")
                );
                println!("{} jobs", snapshot.jobs.len());
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                error!("Feed check failed: {:#}", e);
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Boards { config } => {
            let config = FeedConfig::load(config.as_deref())?;
            for board in &config.boards {
                println!("{:<12} {:<28} {}", board.kind, board.slug, board.display_name());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// How a fetch run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Published,
    /// Nothing trustworthy to publish; the placeholder set was written.
    Placeholder,
    DryRun,
}

impl RunStatus {
    /// Placeholder runs only count as failures under `--strict`.
    pub fn succeeded(self, strict: bool) -> bool {
        !(strict && self == RunStatus::Placeholder)
    }
}

/// One scheduled run: fetch, process, write.
pub async fn run_fetch(config: FeedConfig, dry_run: bool) -> Result<RunStatus> {
    let now = Utc::now();
    let fetcher = HttpFetcher::new(&config.http)?;
    let sources = sources_for(&config, &fetcher);
    let pipeline = Pipeline::new(&config)?;
    let writer = FeedWriter::new(config.output.clone(), config.placeholder.clone());

    info!("Fetching {} boards", sources.len());
    let summary = pipeline.run(&sources, now).await;

    for (board, reason) in &summary.failed {
        warn!(board = %board, "Skipped: {}", reason);
    }

    if dry_run {
        print!("{}", writer.render(&summary.records, now)?);
        return Ok(RunStatus::DryRun);
    }

    if summary.all_failed() {
        error!(
            "All {} boards failed; publishing placeholder feed",
            summary.failed.len()
        );
        writer.write_placeholder(now).await?;
        return Ok(RunStatus::Placeholder);
    }

    if !writer.write_or_fallback(&summary.records, now).await? {
        return Ok(RunStatus::Placeholder);
    }

    info!(
        "Done: {} jobs ({} fetched, {} eligible) from {} boards, {} failed",
        summary.records.len(),
        summary.fetched,
        summary.eligible,
        summary.per_board.len(),
        summary.failed.len()
    );
    Ok(RunStatus::Published)
}
