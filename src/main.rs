mod chat;
mod cli;
mod config;
mod context;
mod error;
mod graph;
mod ingest;
mod profile;
mod query;
mod render;
mod server;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Only warnings by default; RUST_LOG=info shows fetch and refresh progress
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            cli::commands::init::run(force).await?;
        }
        Commands::Update {
            api_url,
            output,
            limit,
            max_pages,
        } => {
            cli::commands::update::run(api_url, output, limit, max_pages).await?;
        }
        Commands::Serve { port, data } => {
            cli::commands::serve::run(port, data).await?;
        }
        Commands::Query { query, data, json } => {
            cli::commands::query::run(query, data, json).await?;
        }
        Commands::Chat { data } => {
            cli::commands::chat::run(data).await?;
        }
        Commands::Profile { id } => {
            cli::commands::profile::run(id).await?;
        }
        Commands::Stats { data } => {
            cli::commands::stats::run(data).await?;
        }
    }

    Ok(())
}
