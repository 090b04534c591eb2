//! Trait for persisted library record stores

use crate::library::error::StorageError;
use crate::library::types::{LibraryRecord, SortOrder};

/// Trait for storing library records, keyed by case-insensitive name
pub trait LibraryStore: Send + Sync + 'static {
    /// Number of cached records
    fn count(&self) -> Result<usize, StorageError>;

    /// Records whose name contains `search_query` (case-insensitive), ordered by `sort_order`
    ///
    /// An empty query matches every record.
    fn query(
        &self,
        search_query: &str,
        sort_order: SortOrder,
    ) -> Result<Vec<LibraryRecord>, StorageError>;

    /// Atomically replace every record with `records`
    fn replace_all(&self, records: &[LibraryRecord]) -> Result<(), StorageError>;

    /// Replace the record with the same name
    ///
    /// Returns `false` if no record matched.
    fn update(&self, record: &LibraryRecord) -> Result<bool, StorageError>;

    /// Set only the pinned flag of the record named `name`
    ///
    /// Returns `false` if no record matched.
    fn set_pinned(&self, name: &str, pinned: bool) -> Result<bool, StorageError>;
}
