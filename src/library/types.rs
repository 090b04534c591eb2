//! Common types for library release records

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::library::error::SyncError;

/// Placeholder shown when a version or date is missing
pub const NOT_AVAILABLE: &str = "N/A";

/// A released version of a library and where its notes live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub name: String,
    pub release_notes_url: String,
}

impl Version {
    pub fn new(name: impl Into<String>, release_notes_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            release_notes_url: release_notes_url.into(),
        }
    }

    /// Sentinel used when the catalog lists no such version
    pub fn not_available() -> Self {
        Self::new(NOT_AVAILABLE, NOT_AVAILABLE)
    }

    pub fn is_available(&self) -> bool {
        self.name != NOT_AVAILABLE
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::not_available()
    }
}

/// One entry of the release catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryRecord {
    /// Unique, compared case-insensitively
    pub name: String,
    pub url: String,
    pub release_date: String,
    pub stable_version: Version,
    pub preview_version: Version,
    /// User annotation; never supplied by the remote catalog
    pub pinned: bool,
}

impl LibraryRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: NOT_AVAILABLE.to_string(),
            release_date: NOT_AVAILABLE.to_string(),
            stable_version: Version::not_available(),
            preview_version: Version::not_available(),
            pinned: false,
        }
    }

    pub fn with_stable_version(mut self, version: Version) -> Self {
        self.stable_version = version;
        self
    }

    pub fn with_preview_version(mut self, version: Version) -> Self {
        self.preview_version = version;
        self
    }

    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = pinned;
        self
    }

    pub fn same_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Ordering applied when reading libraries from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    #[default]
    AToZ,
    ZToA,
    PinnedFirst,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::AToZ => "A_TO_Z",
            SortOrder::ZToA => "Z_TO_A",
            SortOrder::PinnedFirst => "PINNED_FIRST",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortOrder(pub String);

impl fmt::Display for UnknownSortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort order: {}", self.0)
    }
}

impl std::error::Error for UnknownSortOrder {}

impl FromStr for SortOrder {
    type Err = UnknownSortOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A_TO_Z" => Ok(SortOrder::AToZ),
            "Z_TO_A" => Ok(SortOrder::ZToA),
            "PINNED_FIRST" => Ok(SortOrder::PinnedFirst),
            other => Err(UnknownSortOrder(other.to_string())),
        }
    }
}

/// Read-model handed to presentation code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Loading,
    Success(Vec<LibraryRecord>),
    Error(String),
}

impl SyncState {
    pub fn from_result(result: Result<Vec<LibraryRecord>, SyncError>) -> Self {
        match result {
            Ok(libraries) => SyncState::Success(libraries),
            Err(e) => SyncState::Error(e.to_string()),
        }
    }
}
