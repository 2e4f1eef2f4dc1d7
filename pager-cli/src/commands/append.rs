//! Load the page after the last cached item.

use anyhow::{Context, Result};

use super::{open_pager, report};
use crate::config::Config;

/// Run the append command.
pub async fn run(config: &Config) -> Result<()> {
    let pager = open_pager(config).await?;

    let outcome = match pager.append().await {
        Ok(outcome) => outcome,
        Err(e) if e.is_invalid_state() => {
            anyhow::bail!("Cannot append: {}. Run 'pager-cli refresh' first.", e)
        }
        Err(e) => return Err(e).context("Append failed"),
    };
    report(&pager, "append", outcome).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::workspace;
    use crate::commands::{open_store, refresh};
    use pager_store::{ItemFilter, ItemStore};

    #[tokio::test]
    async fn append_extends_cache() {
        let ws = workspace();
        refresh::run(&ws.config).await.unwrap();

        run(&ws.config).await.unwrap();
        run(&ws.config).await.unwrap();

        let store = open_store(&ws.config).await.unwrap();
        let count = store.count_matching(&ItemFilter::all()).await.unwrap();
        assert_eq!(count, 5);

        // Past the end: nothing more, still succeeds.
        run(&ws.config).await.unwrap();
        assert_eq!(store.count_matching(&ItemFilter::all()).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn append_before_refresh_fails() {
        let ws = workspace();

        let err = run(&ws.config).await.unwrap_err();
        assert!(err.to_string().contains("refresh"));
    }
}
