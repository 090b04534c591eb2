//! Persisted user settings: sort order and last refresh date
//!
//! The refresh date is also published through a `tokio::sync::watch` channel so
//! subscribers get the latest value immediately and every later write.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use futures::StreamExt;
use futures::stream::{self, BoxStream};
use rusqlite::{Connection, OptionalExtension};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::library::error::StorageError;
use crate::library::types::{NOT_AVAILABLE, SortOrder};

const SORT_ORDER_KEY: &str = "sort_order";
const REFRESH_DATE_KEY: &str = "refresh_date";

/// Trait for the small key-value settings the engine persists
pub trait SettingsStore: Send + Sync + 'static {
    /// Saved sort order, `SortOrder::AToZ` when unset
    fn sort_order(&self) -> Result<SortOrder, StorageError>;

    fn save_sort_order(&self, sort_order: SortOrder) -> Result<(), StorageError>;

    /// Last saved refresh date, `"N/A"` when unset
    fn refresh_date(&self) -> Result<String, StorageError>;

    fn save_refresh_date(&self, date: &str) -> Result<(), StorageError>;

    /// Stream yielding the current refresh date, then each newly saved one
    fn refresh_date_stream(&self) -> BoxStream<'static, String>;
}

pub struct Settings {
    conn: Mutex<Connection>,
    refresh_date: watch::Sender<String>,
}

impl Settings {
    pub fn new(db_path: &Path) -> Result<Self, StorageError> {
        info!("Initializing settings at {:?}", db_path);

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
            [],
        )?;

        let refresh_date = Self::read_value(&conn, REFRESH_DATE_KEY)?
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let (sender, _) = watch::channel(refresh_date);

        Ok(Self {
            conn: Mutex::new(conn),
            refresh_date: sender,
        })
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn read_value(conn: &Connection, key: &str) -> Result<Option<String>, StorageError> {
        let value = conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_value(conn: &Connection, key: &str, value: &str) -> Result<(), StorageError> {
        conn.execute(
            r#"
            INSERT INTO settings (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
            (key, value),
        )?;
        debug!("Saved setting {} = {}", key, value);
        Ok(())
    }
}

impl SettingsStore for Settings {
    fn sort_order(&self) -> Result<SortOrder, StorageError> {
        let conn = self.lock_conn()?;
        let sort_order = match Self::read_value(&conn, SORT_ORDER_KEY)? {
            Some(value) => value.parse::<SortOrder>().unwrap_or_else(|e| {
                warn!("Ignoring saved sort order: {}", e);
                SortOrder::default()
            }),
            None => SortOrder::default(),
        };
        Ok(sort_order)
    }

    fn save_sort_order(&self, sort_order: SortOrder) -> Result<(), StorageError> {
        let conn = self.lock_conn()?;
        Self::write_value(&conn, SORT_ORDER_KEY, sort_order.as_str())
    }

    fn refresh_date(&self) -> Result<String, StorageError> {
        Ok(self.refresh_date.borrow().clone())
    }

    fn save_refresh_date(&self, date: &str) -> Result<(), StorageError> {
        let conn = self.lock_conn()?;
        Self::write_value(&conn, REFRESH_DATE_KEY, date)?;
        // Publish while still holding the connection so subscribers see writes in order
        self.refresh_date.send_replace(date.to_string());
        Ok(())
    }

    fn refresh_date_stream(&self) -> BoxStream<'static, String> {
        let receiver = self.refresh_date.subscribe();
        stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if !first && receiver.changed().await.is_err() {
                return None;
            }
            let date = receiver.borrow_and_update().clone();
            Some((date, (receiver, false)))
        })
        .boxed()
    }
}
