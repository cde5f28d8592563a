//! Repository backends for the Burrow URL alias service.
//!
//! Both backends enforce alias uniqueness inside the storage layer, so
//! concurrent inserts of the same alias resolve to exactly one winner.

pub mod memory;
pub mod sqlite;

pub use burrow_core::repository::{ReadRepository, Repository, Result, UrlRecord};
pub use burrow_core::StorageError;
pub use memory::InMemoryRepository;
pub use sqlite::SqliteRepository;
