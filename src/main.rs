use anyhow::Result;
use clap::Parser;
use jobfeed::cli::{handle_command, Cli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    jobfeed::logging::init(cli.log_json, cli.log_file.as_deref())?;

    handle_command(cli).await
}
