//! AndroidX versions page scraper

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::library::error::FetchError;
use crate::library::fetcher::LibrariesFetcher;
use crate::library::types::{LibraryRecord, NOT_AVAILABLE, Version};

/// Default location of the AndroidX release table
pub const DEFAULT_CATALOG_URL: &str = "https://developer.android.com/jetpack/androidx/versions";

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

selector!(ROW_SELECTOR, "table tr");
selector!(CELL_SELECTOR, "td");
selector!(ANCHOR_SELECTOR, "a[href]");

// Column layout: name | latest update | stable | rc | beta | alpha
const COLUMN_COUNT: usize = 6;
const NAME_COLUMN: usize = 0;
const RELEASE_DATE_COLUMN: usize = 1;
const STABLE_COLUMN: usize = 2;
/// Newest pre-release first
const PREVIEW_COLUMNS: [usize; 3] = [5, 4, 3];

/// Fetcher that scrapes the AndroidX versions page
pub struct AndroidxFetcher {
    client: reqwest::Client,
    catalog_url: Url,
}

impl AndroidxFetcher {
    pub fn new(catalog_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let catalog_url = Url::parse(catalog_url)
            .map_err(|e| FetchError::InvalidResponse(format!("Invalid catalog url: {}", e)))?;
        let client = reqwest::Client::builder()
            .user_agent("release-tracker")
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            catalog_url,
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, FetchError> {
        Self::new(&config.url, Duration::from_millis(config.timeout_ms))
    }

    fn parse_libraries(&self, html: &str) -> Vec<LibraryRecord> {
        let document = Html::parse_document(html);
        document
            .select(&ROW_SELECTOR)
            .filter_map(|row| self.parse_row(row))
            .collect()
    }

    fn parse_row(&self, row: ElementRef<'_>) -> Option<LibraryRecord> {
        let cells: Vec<_> = row.select(&CELL_SELECTOR).collect();
        if cells.len() < COLUMN_COUNT {
            return None;
        }

        let name = cell_text(cells[NAME_COLUMN]);
        if name.is_empty() {
            return None;
        }

        let url = self
            .cell_link(cells[NAME_COLUMN])
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let release_date = match cell_text(cells[RELEASE_DATE_COLUMN]) {
            date if date.is_empty() => NOT_AVAILABLE.to_string(),
            date => date,
        };

        let stable_version = self
            .cell_version(cells[STABLE_COLUMN])
            .unwrap_or_else(Version::not_available);

        let preview_version = PREVIEW_COLUMNS
            .iter()
            .find_map(|&column| self.cell_version(cells[column]))
            .unwrap_or_else(Version::not_available);

        Some(LibraryRecord {
            name,
            url,
            release_date,
            stable_version,
            preview_version,
            pinned: false,
        })
    }

    fn cell_link(&self, cell: ElementRef<'_>) -> Option<String> {
        let href = cell.select(&ANCHOR_SELECTOR).next()?.value().attr("href")?;
        self.catalog_url.join(href).ok().map(String::from)
    }

    fn cell_version(&self, cell: ElementRef<'_>) -> Option<Version> {
        let name = cell_text(cell);
        if name.is_empty() {
            return None;
        }
        let release_notes_url = self
            .cell_link(cell)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        Some(Version::new(name, release_notes_url))
    }
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

#[async_trait::async_trait]
impl LibrariesFetcher for AndroidxFetcher {
    async fn fetch_libraries(&self) -> Result<Vec<LibraryRecord>, FetchError> {
        let response = self.client.get(self.catalog_url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Catalog returned status {}: {}", status, self.catalog_url);
            return Err(FetchError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body = response.text().await?;
        let libraries = self.parse_libraries(&body);
        // The live catalog is never empty
        if libraries.is_empty() {
            warn!("No libraries found in catalog page {}", self.catalog_url);
            return Err(FetchError::InvalidResponse(
                "No libraries found in catalog page".to_string(),
            ));
        }
        debug!("Parsed {} libraries from catalog", libraries.len());

        Ok(libraries)
    }
}
