//! Library release cache and synchronization layer
//!
//! This module keeps a local, queryable copy of the AndroidX release catalog and
//! keeps it in sync with the remote page while preserving the user's pins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Fetcher   │────▶│ SyncEngine  │────▶│    Cache    │
//! │  (remote)   │     │   (merge)   │     │  (records)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                       │         │
//!                       ▼         ▼
//!               ┌─────────────┐ ┌─────────────┐
//!               │    Clock    │ │  Settings   │
//!               │   (dates)   │ │(sort, date) │
//!               └─────────────┘ └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: SQLite-backed library record store
//! - [`clock`]: Current-date provider used to stamp refreshes
//! - [`engine`]: Cache-first reads, refresh merge, and pinning
//! - [`error`]: Error types for fetch, storage, and engine operations
//! - [`fetcher`]: Trait for fetching the complete remote catalog
//! - [`fetchers`]: Concrete fetcher implementations
//! - [`settings`]: Persisted sort order and reactive refresh date
//! - [`store`]: Trait implemented by record stores
//! - [`types`]: Records, versions, sort orders

pub mod cache;
pub mod clock;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod fetchers;
pub mod settings;
pub mod store;
pub mod types;
