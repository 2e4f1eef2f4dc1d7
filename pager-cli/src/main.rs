//! # pager-cli
//!
//! CLI tool for driving a remote-pager cache.
//!
//! Pages come from a JSON fixture file standing in for a search API and are
//! cached in a local SQLite database.
//!
//! ## Commands
//!
//! - `start`: Refresh only if the cache is stale
//! - `refresh`: Replace the cache with the first page
//! - `append`: Load the page after the last cached item
//! - `prepend`: Load the page before the first cached item
//! - `list`: Show cached items in read order
//! - `keys`: Show an item's continuation key
//! - `status`: Show cache status
//!
//! ## Example
//!
//! ```bash
//! pager-cli --config pager.toml refresh
//! pager-cli append
//! pager-cli list --limit 10
//! pager-cli keys 42
//! RUST_LOG=debug pager-cli --query "kotlin" refresh
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{append, keys, list, prepend, refresh, status};
use config::Config;

/// CLI tool for driving a remote-pager cache.
#[derive(Parser, Debug)]
#[command(name = "pager-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "pager.toml")]
    config: PathBuf,

    /// Override the configured search term
    #[arg(long, global = true)]
    query: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Refresh only if the cache is stale
    Start,

    /// Replace the cache with the first page
    Refresh,

    /// Load the page after the last cached item
    Append,

    /// Load the page before the first cached item
    Prepend,

    /// Show cached items in read order
    List {
        /// Skip this many items
        #[arg(long, default_value = "0")]
        offset: u64,

        /// Maximum number of items to show
        #[arg(long, default_value = "30")]
        limit: u32,
    },

    /// Show the continuation key stored for an item
    Keys {
        /// Item identifier
        item_id: i64,
    },

    /// Show cache status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config).context("Failed to load configuration")?;
    if let Some(query) = cli.query {
        config.paging.query = query;
    }

    match cli.command {
        Commands::Start => refresh::start(&config).await?,
        Commands::Refresh => refresh::run(&config).await?,
        Commands::Append => append::run(&config).await?,
        Commands::Prepend => prepend::run(&config).await?,
        Commands::List { offset, limit } => list::run(&config, offset, limit).await?,
        Commands::Keys { item_id } => keys::run(&config, item_id).await?,
        Commands::Status => status::run(&config).await?,
    }

    Ok(())
}
