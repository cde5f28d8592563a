use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The destination URL the alias points to.
    pub original_url: String,
}

impl UrlRecord {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
        }
    }
}

/// A read-only view of a repository.
///
/// This trait provides only the read operations from [`Repository`],
/// allowing redirect paths to depend on read access alone.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the URL record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;
}

/// A repository that can create and remove URL records.
///
/// Implementations must enforce alias uniqueness themselves: `insert` is a
/// single atomic operation, and callers never check for existence first.
#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new URL record. Returns `Err(Conflict)` if the code already exists,
    /// in which case the repository is left unchanged.
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()>;

    /// Deletes the URL record for a given short code.
    /// Returns `true` if the record existed and was removed.
    async fn delete(&self, code: &ShortCode) -> Result<bool>;

    /// Releases the underlying handle, giving up after `deadline`.
    ///
    /// A timed out close returns `Err(Timeout)`; the data already written is
    /// not affected and the caller may proceed with exit.
    async fn close(&self, deadline: Duration) -> Result<()>;
}
