//! Show the continuation key stored for an item.

use anyhow::Result;
use pager_store::KeyStore;
use pager_types::{ContinuationKey, ItemId, PageToken};

use super::open_store;
use crate::config::Config;

/// Run the keys command.
pub async fn run(config: &Config, item_id: i64) -> Result<()> {
    let store = open_store(config).await?;
    let item_id = ItemId::new(item_id);

    match store.key_for(item_id).await? {
        Some(key) => print!("{}", describe(&key)),
        None => println!("No continuation key for item {}", item_id),
    }
    Ok(())
}

fn describe(key: &ContinuationKey) -> String {
    format!(
        "Item {}:\n  Previous page: {}\n  Next page:     {}\n  Fetched at:    {}\n",
        key.item_id,
        page_or_none(key.previous_page),
        page_or_none(key.next_page),
        key.fetched_at
    )
}

fn page_or_none(page: Option<PageToken>) -> String {
    page.map(|p| p.to_string())
        .unwrap_or_else(|| "none".to_string())
}
