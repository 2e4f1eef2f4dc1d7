//! Show cache status.

use anyhow::Result;
use pager_store::{ItemFilter, ItemStore, KeyStore};
use std::time::{SystemTime, UNIX_EPOCH};

use super::open_store;
use crate::config::Config;

/// Run the status command.
pub async fn run(config: &Config) -> Result<()> {
    println!("=== pager-cli status ===");
    println!();

    println!("Paging:");
    println!("  Query:     {:?}", config.paging.query);
    println!("  Page size: {}", config.paging_config().page_size);
    println!("  Fixture:   {}", config.remote.fixture.display());
    println!();

    let store = open_store(config).await?;
    let items = store
        .count_matching(&ItemFilter::new(&config.paging.query))
        .await?;
    let keys = store.key_count().await?;

    println!("Store:");
    println!("  Database: {}", config.store.database.display());
    println!("  Items:    {}", items);
    println!("  Keys:     {}", keys);
    println!();

    match store.latest_fetch().await? {
        Some(fetched_at) => {
            let age = age_secs(fetched_at, unix_now());
            let last_fetch = match age {
                Some(age) => format_age(age),
                None => format!("unknown (timestamp {})", fetched_at),
            };
            println!("Cache:");
            println!("  Last fetch: {}", last_fetch);
            println!("  State:      {}", freshness(age, config.cache.timeout_secs));
        }
        None => {
            println!("Cache: EMPTY");
            println!();
            println!("Run 'pager-cli refresh' to load the first page.");
        }
    }

    Ok(())
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Seconds since `fetched_at`, or None for a pre-epoch or future timestamp.
fn age_secs(fetched_at: i64, now: i64) -> Option<u64> {
    if fetched_at < 0 {
        return None;
    }
    u64::try_from(now.checked_sub(fetched_at)?).ok()
}

// An unknown age counts as stale, matching what start does.
fn freshness(age: Option<u64>, timeout_secs: Option<u64>) -> &'static str {
    match (timeout_secs, age) {
        (None, _) => "no timeout (start always refreshes)",
        (Some(timeout), Some(age)) if age < timeout => "fresh (start will skip refresh)",
        (Some(_), _) => "stale (start will refresh)",
    }
}

/// Format an age in seconds as a human-readable string.
fn format_age(diff: u64) -> String {
    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        format!("{} minutes ago", diff / 60)
    } else if diff < 86400 {
        format!("{} hours ago", diff / 3600)
    } else {
        format!("{} days ago", diff / 86400)
    }
}
