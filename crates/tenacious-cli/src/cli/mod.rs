//! CLI for the tenacious retrying HTTP executor.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tenacious_core::config;

use commands::{run_config, run_fetch};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tenacious")]
#[command(about = "Execute an HTTP request, retrying transient network failures", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a URL and write the response body to stdout.
    Fetch(FetchArgs),

    /// Show the config file path and effective configuration.
    Config,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// HTTP/HTTPS URL to request.
    pub url: String,

    /// HTTP method.
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Extra request header, "Name: value". Repeatable.
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Request body.
    #[arg(short, long)]
    pub data: Option<String>,

    /// Total physical attempts (overrides config).
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Wait between retryable attempts in milliseconds (overrides config).
    #[arg(long, value_name = "MS")]
    pub retry_interval_ms: Option<u64>,

    /// Treat an empty 2xx body as success.
    #[arg(long)]
    pub allow_empty: bool,

    /// Send "Authorization: Bearer TOKEN" on every attempt.
    #[arg(long, value_name = "TOKEN")]
    pub bearer: Option<String>,

    /// Drive the callback surface instead of awaiting the result directly.
    #[arg(long)]
    pub callback: bool,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch(args) => run_fetch(&cfg, &args).await?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
