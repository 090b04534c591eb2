//! Cache-first library reads, catalog refresh with pin merge, and pinning
//!
//! `SyncEngine` is the only entry point presentation code talks to. It owns its
//! collaborators explicitly; there is no global instance.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::BoxStream;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::library::clock::Clock;
use crate::library::error::SyncError;
use crate::library::fetcher::LibrariesFetcher;
use crate::library::settings::SettingsStore;
use crate::library::store::LibraryStore;
use crate::library::types::{LibraryRecord, SortOrder};

pub struct SyncEngine<S: LibraryStore, P: SettingsStore> {
    store: Arc<S>,
    settings: Arc<P>,
    fetcher: Arc<dyn LibrariesFetcher>,
    clock: Arc<dyn Clock>,
    /// Serializes refreshes so concurrent cache misses fetch once
    refresh_gate: Mutex<()>,
    /// Serializes every mutation of the cache and the refresh date
    write_lock: Mutex<()>,
}

impl<S: LibraryStore, P: SettingsStore> SyncEngine<S, P> {
    pub fn new(
        store: Arc<S>,
        settings: Arc<P>,
        fetcher: Arc<dyn LibrariesFetcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            settings,
            fetcher,
            clock,
            refresh_gate: Mutex::new(()),
            write_lock: Mutex::new(()),
        }
    }

    /// Libraries matching `search_query`, ordered by `sort_order`
    ///
    /// Refreshes from the remote catalog first when the cache is empty.
    pub async fn get_libraries(
        &self,
        sort_order: SortOrder,
        search_query: &str,
    ) -> Result<Vec<LibraryRecord>, SyncError> {
        if self.store.count()? == 0 {
            let _gate = self.refresh_gate.lock().await;
            // Another caller may have filled the cache while we waited
            if self.store.count()? == 0 {
                info!("Cache is empty, fetching libraries");
                self.refresh().await?;
            }
        }

        let libraries = self.store.query(search_query, sort_order)?;
        debug!(
            "Returning {} libraries for query {:?} ({})",
            libraries.len(),
            search_query,
            sort_order
        );
        Ok(libraries)
    }

    /// Replace the cache with a fresh catalog snapshot, keeping pins
    pub async fn refresh_libraries(&self) -> Result<(), SyncError> {
        let _gate = self.refresh_gate.lock().await;
        self.refresh().await
    }

    async fn refresh(&self) -> Result<(), SyncError> {
        let fetched = self
            .fetcher
            .fetch_libraries()
            .await
            .inspect_err(|e| error!("Failed to fetch libraries: {}", e))?;
        let fetched = dedup_by_name(fetched);

        let _write = self.write_lock.lock().await;
        // No await past this point: the cache swap and its date are written together

        let cached = self.store.query("", SortOrder::AToZ)?;
        let merged = merge_pins(fetched, &cached);
        let count = merged.len();

        self.store
            .replace_all(&merged)
            .inspect_err(|e| error!("Failed to replace cached libraries: {}", e))?;

        let date = self.clock.current_date();
        self.settings
            .save_refresh_date(&date)
            .inspect_err(|e| error!("Failed to save refresh date: {}", e))?;

        info!("Refreshed {} libraries at {}", count, date);
        Ok(())
    }

    /// Set the pinned flag of `library` in the cache
    ///
    /// Only the flag is written; the cached catalog fields stay as the last refresh left them.
    /// Fails with [`SyncError::NotFound`] if the library is no longer cached.
    pub async fn pin_library(&self, library: &LibraryRecord, pinned: bool) -> Result<(), SyncError> {
        let _write = self.write_lock.lock().await;
        if !self.store.set_pinned(&library.name, pinned)? {
            warn!("Cannot pin {}: not in cache", library.name);
            return Err(SyncError::NotFound(library.name.clone()));
        }

        info!(
            "{} {}",
            if pinned { "Pinned" } else { "Unpinned" },
            library.name
        );
        Ok(())
    }

    pub fn sort_order(&self) -> Result<SortOrder, SyncError> {
        Ok(self.settings.sort_order()?)
    }

    pub fn save_sort_order(&self, sort_order: SortOrder) -> Result<(), SyncError> {
        Ok(self.settings.save_sort_order(sort_order)?)
    }

    pub fn refresh_date_stream(&self) -> BoxStream<'static, String> {
        self.settings.refresh_date_stream()
    }
}

/// Drop later entries whose name matches an earlier one case-insensitively
fn dedup_by_name(libraries: Vec<LibraryRecord>) -> Vec<LibraryRecord> {
    let mut seen = HashSet::new();
    libraries
        .into_iter()
        .filter(|library| {
            let unique = seen.insert(library.name.to_ascii_lowercase());
            if !unique {
                warn!("Dropping duplicate library from catalog: {}", library.name);
            }
            unique
        })
        .collect()
}

/// Carry pins from `cached` over to `fetched`; everything else comes from `fetched`
fn merge_pins(fetched: Vec<LibraryRecord>, cached: &[LibraryRecord]) -> Vec<LibraryRecord> {
    let pinned: HashSet<String> = cached
        .iter()
        .filter(|library| library.pinned)
        .map(|library| library.name.to_ascii_lowercase())
        .collect();

    fetched
        .into_iter()
        .map(|library| {
            let is_pinned = pinned.contains(&library.name.to_ascii_lowercase());
            library.with_pinned(is_pinned)
        })
        .collect()
}
