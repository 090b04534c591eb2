//! Fetcher and clock fakes for engine tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Semaphore;

use release_tracker::library::cache::Cache;
use release_tracker::library::clock::Clock;
use release_tracker::library::engine::SyncEngine;
use release_tracker::library::error::FetchError;
use release_tracker::library::fetcher::LibrariesFetcher;
use release_tracker::library::settings::Settings;
use release_tracker::library::types::{LibraryRecord, Version};

/// Fetcher returning a configurable catalog and counting calls
pub struct FakeFetcher {
    libraries: Mutex<Result<Vec<LibraryRecord>, String>>,
    calls: AtomicUsize,
    /// When set, each fetch waits for one permit
    gate: Option<Arc<Semaphore>>,
}

impl FakeFetcher {
    pub fn new(libraries: Vec<LibraryRecord>) -> Self {
        Self {
            libraries: Mutex::new(Ok(libraries)),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            libraries: Mutex::new(Err(message.to_string())),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn set_libraries(&self, libraries: Vec<LibraryRecord>) {
        *self.libraries.lock().unwrap() = Ok(libraries);
    }

    pub fn set_failing(&self, message: &str) {
        *self.libraries.lock().unwrap() = Err(message.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LibrariesFetcher for FakeFetcher {
    async fn fetch_libraries(&self) -> Result<Vec<LibraryRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        let libraries = self.libraries.lock().unwrap().clone();
        libraries.map_err(FetchError::InvalidResponse)
    }
}

/// Clock returning whatever date was last set
pub struct FakeClock {
    date: Mutex<String>,
}

impl FakeClock {
    pub fn new(date: &str) -> Self {
        Self {
            date: Mutex::new(date.to_string()),
        }
    }

    pub fn set_date(&self, date: &str) {
        *self.date.lock().unwrap() = date.to_string();
    }
}

impl Clock for FakeClock {
    fn current_date(&self) -> String {
        self.date.lock().unwrap().clone()
    }
}

pub struct TestEngine {
    pub _temp_dir: TempDir,
    pub cache: Arc<Cache>,
    pub settings: Arc<Settings>,
    pub engine: Arc<SyncEngine<Cache, Settings>>,
}

/// Create an engine over a real SQLite database in a temp dir
pub fn create_test_engine(fetcher: Arc<FakeFetcher>, clock: Arc<FakeClock>) -> TestEngine {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("libraries.db");
    let cache = Arc::new(Cache::new(&db_path).unwrap());
    let settings = Arc::new(Settings::new(&db_path).unwrap());
    let engine = Arc::new(SyncEngine::new(
        cache.clone(),
        settings.clone(),
        fetcher,
        clock,
    ));
    TestEngine {
        _temp_dir: temp_dir,
        cache,
        settings,
        engine,
    }
}

pub fn library(name: &str, version: &str) -> LibraryRecord {
    LibraryRecord::new(name).with_stable_version(Version::new(
        version,
        format!("https://developer.android.com/jetpack/androidx/releases/{name}#{version}"),
    ))
}
