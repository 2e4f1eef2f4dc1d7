//! CLI command implementations.

pub mod append;
pub mod keys;
pub mod list;
pub mod prepend;
pub mod refresh;
pub mod status;

use anyhow::{Context, Result};
use pager_core::LoadOutcome;
use pager_mediator::{FixtureRemote, Pager, RemoteMediator};
use pager_store::SqliteStorage;

use crate::config::Config;

/// The pager every command drives.
pub type CliPager = Pager<FixtureRemote, SqliteStorage>;

/// Open the configured store.
pub async fn open_store(config: &Config) -> Result<SqliteStorage> {
    SqliteStorage::new(&config.store.database)
        .await
        .with_context(|| format!("Failed to open store {}", config.store.database.display()))
}

/// Build a pager over the configured store and fixture source.
pub async fn open_pager(config: &Config) -> Result<CliPager> {
    let store = open_store(config).await?;
    let remote = FixtureRemote::from_file(&config.remote.fixture)
        .await
        .context("Failed to load remote fixture")?;

    let mediator = RemoteMediator::new(config.mediator_config(), remote, store);
    Ok(Pager::new(mediator, config.paging_config()))
}

/// Print the result of a load command.
pub(crate) async fn report(
    pager: &CliPager,
    action: &str,
    outcome: Option<LoadOutcome>,
) -> Result<()> {
    let cached = pager.item_count().await?;
    match outcome {
        Some(outcome) if outcome.end_of_pagination_reached => {
            println!("{}: end of pagination reached ({} items cached)", action, cached);
        }
        Some(_) => println!("{}: done ({} items cached)", action, cached),
        None => println!("{}: nothing to load ({} items cached)", action, cached),
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    use pager_types::Item;
    use tempfile::TempDir;

    use crate::config::Config;

    /// A config pointing at a temporary database and fixture file.
    pub struct Workspace {
        pub dir: TempDir,
        pub config: Config,
    }

    /// Five "android" items and one unrelated item, page size 2.
    pub fn workspace() -> Workspace {
        let items = vec![
            Item::new(1, "android-architecture", 500),
            Item::new(2, "android-jetpack", 400),
            Item::new(3, "android-paging", 300),
            Item::new(4, "android-room", 200),
            Item::new(5, "android-sunflower", 100),
            Item::new(6, "kotlinx", 1000),
        ];

        let dir = tempfile::tempdir().unwrap();
        let fixture: PathBuf = dir.path().join("repos.json");
        std::fs::write(&fixture, serde_json::to_string(&items).unwrap()).unwrap();

        let mut config = Config::default();
        config.paging.page_size = 2;
        config.store.database = dir.path().join("pager.db");
        config.remote.fixture = fixture;

        Workspace { dir, config }
    }
}
