//! myra - Myracloud API command line client
//!
//! Creates DNS records, imports zone files and queries domain statistics.

mod api;
mod batch;
mod cli;
mod config;
mod error;
mod options;
mod output;
mod records;
mod stats;
mod zone;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over -v
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.global.log_level())),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Commands::DnsRecord(args) => cli::dns_record::execute(&cli.global, args).await,
        Commands::Statistic(args) => cli::statistic::execute(&cli.global, args).await,
        Commands::ZoneImport(args) => cli::zone_import::execute(&cli.global, args).await,
    }
}
