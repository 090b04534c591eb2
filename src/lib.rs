pub mod config;
pub mod library;
pub mod logging;
