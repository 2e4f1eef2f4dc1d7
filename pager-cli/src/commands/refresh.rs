//! Refresh the cache from the first page.

use anyhow::{Context, Result};
use pager_mediator::InitializeAction;

use super::list::format_row;
use super::{open_pager, report};
use crate::config::Config;

/// Run the refresh command.
pub async fn run(config: &Config) -> Result<()> {
    let pager = open_pager(config).await?;
    println!("Refreshing {:?}...", config.paging.query);

    let outcome = pager.refresh().await.context("Refresh failed")?;
    for (position, item) in pager.initial_items().await?.iter().enumerate() {
        println!("{}", format_row(position as u64, item));
    }
    report(&pager, "refresh", outcome).await
}

/// Run the start command: refresh only if the cache is stale.
pub async fn start(config: &Config) -> Result<()> {
    let pager = open_pager(config).await?;

    match pager.start().await.context("Start failed")? {
        InitializeAction::LaunchInitialRefresh => {
            println!("Cache refreshed ({} items cached)", pager.item_count().await?);
        }
        InitializeAction::SkipInitialRefresh => {
            println!("Cache is fresh ({} items cached)", pager.item_count().await?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::open_store;
    use crate::commands::test_support::workspace;
    use pager_store::{ItemFilter, ItemStore, KeyStore};

    #[tokio::test]
    async fn refresh_caches_first_page() {
        let ws = workspace();

        run(&ws.config).await.unwrap();

        let store = open_store(&ws.config).await.unwrap();
        let items = store
            .query_paginated(&ItemFilter::all(), 0, 100)
            .await
            .unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["android-architecture", "android-jetpack"]);
        assert_eq!(store.key_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn refresh_without_fixture_fails() {
        let mut ws = workspace();
        ws.config.remote.fixture = ws.dir.path().join("missing.json");

        assert!(run(&ws.config).await.is_err());
    }

    #[tokio::test]
    async fn start_respects_cache_timeout() {
        let mut ws = workspace();
        ws.config.cache.timeout_secs = Some(3600);

        start(&ws.config).await.unwrap();
        let store = open_store(&ws.config).await.unwrap();
        let first_fetch = store.latest_fetch().await.unwrap();
        assert!(first_fetch.is_some());

        // Second start finds a fresh cache and leaves it alone.
        start(&ws.config).await.unwrap();
        assert_eq!(store.key_count().await.unwrap(), 2);
    }
}
