//! Fetcher implementations for remote library catalogs

pub mod androidx;

pub use androidx::AndroidxFetcher;
