use async_trait::async_trait;
use burrow_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use burrow_core::{ShortCode, StorageError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::time::Duration;
use tracing::info;

/// In-memory implementation of the repository contract using DashMap.
///
/// Inserts go through the entry API, which holds the shard lock for the
/// duration of the check and the write, so two racing inserts of the same
/// alias cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, String>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Number of stored aliases.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| UrlRecord::new(entry.value().as_str())))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        match self.storage.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                info!(alias = %code, url = %record.original_url, "saved url");
                slot.insert(record.original_url);
                Ok(())
            }
        }
    }

    async fn delete(&self, code: &ShortCode) -> Result<bool> {
        let removed = self.storage.remove(code.as_str()).is_some();
        if removed {
            info!(alias = %code, "deleted alias");
        }
        Ok(removed)
    }

    async fn close(&self, _deadline: Duration) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn save_and_get() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("abc123"), UrlRecord::new("https://example.com"))
            .await
            .unwrap();

        let result = repo.get(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(result.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let repo = InMemoryRepository::new();

        let result = repo.get(&code("nope")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn insert_conflict_keeps_original() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("abc123"), UrlRecord::new("https://example.com"))
            .await
            .unwrap();

        let err = repo
            .insert(&code("abc123"), UrlRecord::new("https://other.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Conflict(_)));

        let result = repo.get(&code("abc123")).await.unwrap().unwrap();
        assert_eq!(result.original_url, "https://example.com");
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn delete_existing() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("abc123"), UrlRecord::new("https://example.com"))
            .await
            .unwrap();

        assert!(repo.delete(&code("abc123")).await.unwrap());
        assert!(repo.get(&code("abc123")).await.unwrap().is_none());
        assert!(!repo.delete(&code("abc123")).await.unwrap());
    }

    #[tokio::test]
    async fn alias_can_be_reused_after_delete() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("reuse"), UrlRecord::new("https://one.example"))
            .await
            .unwrap();
        repo.delete(&code("reuse")).await.unwrap();
        repo.insert(&code("reuse"), UrlRecord::new("https://two.example"))
            .await
            .unwrap();

        let result = repo.get(&code("reuse")).await.unwrap().unwrap();
        assert_eq!(result.original_url, "https://two.example");
    }

    #[tokio::test]
    async fn concurrent_inserts_of_same_alias_have_one_winner() {
        let repo = Arc::new(InMemoryRepository::new());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.insert(
                        &code("contended"),
                        UrlRecord::new(format!("https://example{i}.com")),
                    )
                    .await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => successes += 1,
                Err(err) => assert!(matches!(err, StorageError::Conflict(_))),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_access_to_distinct_aliases() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..10u64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                let c = ShortCode::new_unchecked(format!("code-{:03}", i));
                repo.insert(&c, UrlRecord::new(format!("https://example{}.com", i)))
                    .await
                    .unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        for i in 0..10u64 {
            let c = ShortCode::new_unchecked(format!("code-{:03}", i));
            let result = repo.get(&c).await.unwrap().unwrap();
            assert_eq!(result.original_url, format!("https://example{}.com", i));
        }
    }
}
