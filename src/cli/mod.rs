pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gilligan-universe")]
#[command(author = "Gilligan Universe Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactive knowledge graph of Vince Gilligan's creative universe", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long, default_value = "false")]
        force: bool,
    },

    /// Refetch entities from the remote API and rewrite the graph snapshot
    #[command(long_about = "Refetch entities from the remote API and rewrite the graph snapshot.\n\n\
        Pages are requested from {base_url}/entities?page=N&limit=L until a short page,\n\
        a page without an entity list, a failed request, or the page cap is reached.\n\
        Records that mention none of the configured keywords are dropped.\n\n\
        The snapshot file is fully overwritten.")]
    Update {
        /// Entity API base URL (overrides config)
        #[arg(long, env = "GILLIGAN_API_URL")]
        api_url: Option<String>,

        /// Snapshot file to write (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Records requested per page
        #[arg(short, long)]
        limit: Option<usize>,

        /// Maximum number of pages to request
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Serve the interactive graph explorer
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Snapshot file to load (overrides config)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Ask the graph one question
    Query {
        /// Free-text question, e.g. "What has Vince Gilligan made?"
        query: String,

        /// Snapshot file to load (overrides config)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Print the raw JSON response
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Chat with the graph in the terminal
    Chat {
        /// Snapshot file to load (overrides config)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Show a dossier, or list the available ones
    Profile {
        /// Entity id, e.g. rhea-seehorn
        id: Option<String>,
    },

    /// Show snapshot statistics
    Stats {
        /// Snapshot file to load (overrides config)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}
