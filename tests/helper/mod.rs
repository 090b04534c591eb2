//! Shared test utilities

pub mod fetcher;

pub use fetcher::{FakeClock, FakeFetcher, create_test_engine, library};
