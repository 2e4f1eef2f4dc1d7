//! Load the page before the first cached item.

use anyhow::{Context, Result};

use super::{open_pager, report};
use crate::config::Config;

/// Run the prepend command.
pub async fn run(config: &Config) -> Result<()> {
    let pager = open_pager(config).await?;

    let outcome = match pager.prepend().await {
        Ok(outcome) => outcome,
        Err(e) if e.is_invalid_state() => {
            anyhow::bail!("Cannot prepend: {}. Run 'pager-cli refresh' first.", e)
        }
        Err(e) => return Err(e).context("Prepend failed"),
    };
    report(&pager, "prepend", outcome).await
}
