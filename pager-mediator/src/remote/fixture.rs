//! Remote source backed by a JSON fixture file.
//!
//! Stands in for a search API: the file holds a JSON array of items, and
//! every fetch filters them by the query, ranks them in read order and
//! returns the requested slice.

use super::{RemoteError, RemoteSource};
use async_trait::async_trait;
use pager_store::ItemFilter;
use pager_types::{Item, PageToken};
use std::path::Path;

/// Remote source serving pages from an in-memory item list.
#[derive(Debug, Clone)]
pub struct FixtureRemote {
    items: Vec<Item>,
}

impl FixtureRemote {
    /// Create a source from items. They are ranked in read order.
    pub fn new(mut items: Vec<Item>) -> Self {
        items.sort_by(Item::read_order);
        Self { items }
    }

    /// Load a source from a JSON file containing an array of items.
    pub async fn from_file(path: &Path) -> Result<Self, RemoteError> {
        let contents = tokio::fs::read(path).await.map_err(|e| {
            RemoteError::Transport(format!("failed to read {}: {}", path.display(), e))
        })?;
        let items: Vec<Item> = serde_json::from_slice(&contents)
            .map_err(|e| RemoteError::Decode(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Loaded {} fixture items from {}", items.len(), path.display());
        Ok(Self::new(items))
    }

    /// Number of items in the fixture.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the fixture has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl RemoteSource for FixtureRemote {
    async fn fetch_page(
        &self,
        query: &str,
        page: PageToken,
        page_size: u32,
    ) -> Result<Vec<Item>, RemoteError> {
        let filter = ItemFilter::new(query);
        let size = page_size as usize;
        let skip = (page.value() as usize - 1).saturating_mul(size);

        Ok(self
            .items
            .iter()
            .filter(|item| filter.matches(item))
            .skip(skip)
            .take(size)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn token(value: u32) -> PageToken {
        PageToken::new(value).unwrap()
    }

    fn fixture() -> FixtureRemote {
        FixtureRemote::new(vec![
            Item::new(1, "android-a", 10),
            Item::new(2, "kotlin", 50),
            Item::new(3, "android-b", 30),
            Item::new(4, "android-c", 20),
        ])
    }

    #[tokio::test]
    async fn pages_are_ranked_and_filtered() {
        let remote = fixture();

        let first = remote.fetch_page("android", token(1), 2).await.unwrap();
        let second = remote.fetch_page("android", token(2), 2).await.unwrap();

        let names: Vec<&str> = first.iter().chain(&second).map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["android-b", "android-c", "android-a"]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let remote = fixture();
        assert!(remote
            .fetch_page("android", token(3), 2)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn loads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "name": "paging", "stars": 3}}, {{"id": 2, "name": "room", "stars": 9}}]"#
        )
        .unwrap();

        let remote = FixtureRemote::from_file(file.path()).await.unwrap();
        assert_eq!(remote.len(), 2);

        let page = remote.fetch_page("", token(1), 10).await.unwrap();
        assert_eq!(page[0].name, "room");
    }

    #[tokio::test]
    async fn malformed_file_is_decode_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = FixtureRemote::from_file(file.path()).await;
        assert!(matches!(result, Err(RemoteError::Decode(_))));
    }

    #[tokio::test]
    async fn missing_file_is_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = FixtureRemote::from_file(&dir.path().join("missing.json")).await;
        assert!(matches!(result, Err(RemoteError::Transport(_))));
    }
}
