//! Fetcher trait for downloading the complete library catalog

#[cfg(test)]
use mockall::automock;

use crate::library::error::FetchError;
use crate::library::types::LibraryRecord;

/// Trait for fetching a fresh snapshot of every known library
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait LibrariesFetcher: Send + Sync {
    /// Fetches all libraries from the remote catalog
    ///
    /// # Returns
    /// * `Ok(Vec<LibraryRecord>)` - Every library in the catalog, all unpinned
    /// * `Err(FetchError)` - If the request or parsing fails
    async fn fetch_libraries(&self) -> Result<Vec<LibraryRecord>, FetchError>;
}
