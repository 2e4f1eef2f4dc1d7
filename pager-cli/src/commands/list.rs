//! List cached items in read order.

use anyhow::Result;
use pager_store::{ItemFilter, ItemStore};
use pager_types::Item;

use super::open_store;
use crate::config::Config;

/// Run the list command.
pub async fn run(config: &Config, offset: u64, limit: u32) -> Result<()> {
    let store = open_store(config).await?;
    let filter = ItemFilter::new(&config.paging.query);

    let items = store.query_paginated(&filter, offset, limit).await?;
    if items.is_empty() {
        println!("No cached items for {:?}", config.paging.query);
        return Ok(());
    }

    let total = store.count_matching(&filter).await?;
    for (index, item) in items.iter().enumerate() {
        println!("{}", format_row(offset + index as u64, item));
    }
    println!();
    println!("Showing {} of {} cached items", items.len(), total);
    Ok(())
}

pub(crate) fn format_row(position: u64, item: &Item) -> String {
    let name = if item.full_name.is_empty() {
        &item.name
    } else {
        &item.full_name
    };
    let language = item.language.as_deref().unwrap_or("-");
    format!(
        "{:>4}  {:<40} {:>8} stars  {}",
        position, name, item.stars, language
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::refresh;
    use crate::commands::test_support::workspace;

    #[test]
    fn row_shows_position_name_and_stars() {
        let item = Item::new(7, "paging", 1234)
            .with_full_name("android/paging")
            .with_language("Kotlin");

        let row = format_row(3, &item);
        assert!(row.starts_with("   3  android/paging"));
        assert!(row.contains("1234 stars"));
        assert!(row.ends_with("Kotlin"));
    }

    #[test]
    fn row_falls_back_to_short_name() {
        let mut item = Item::new(1, "room", 5);
        item.full_name.clear();

        assert!(format_row(0, &item).starts_with("   0  room"));
    }

    #[tokio::test]
    async fn list_empty_store() {
        let ws = workspace();
        assert!(run(&ws.config, 0, 10).await.is_ok());
    }

    #[tokio::test]
    async fn list_after_refresh() {
        let ws = workspace();
        refresh::run(&ws.config).await.unwrap();

        assert!(run(&ws.config, 0, 10).await.is_ok());
        assert!(run(&ws.config, 1, 1).await.is_ok());
    }
}
