use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Row};
use tracing::{debug, info};

use crate::library::error::StorageError;
use crate::library::store::LibraryStore;
use crate::library::types::{LibraryRecord, SortOrder, Version};

/// Schema migrations
/// Each version contains a list of SQL statements to execute
const MIGRATIONS: &[&[&str]] = &[
    // v1: library page and latest update columns
    &[
        "ALTER TABLE libraries ADD COLUMN url TEXT NOT NULL DEFAULT 'N/A'",
        "ALTER TABLE libraries ADD COLUMN release_date TEXT NOT NULL DEFAULT 'N/A'",
    ],
];

const SELECT_COLUMNS: &str = "name, url, release_date, stable_version, stable_release_notes_url, \
     preview_version, preview_release_notes_url, pinned";

pub struct Cache {
    conn: Mutex<Connection>,
}

impl Cache {
    pub fn new(db_path: &Path) -> Result<Self, StorageError> {
        info!("Initializing library cache at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        // Enable WAL mode for better concurrency
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        debug!("Database connection established");

        let cache = Self {
            conn: Mutex::new(conn),
        };

        cache.create_schema()?;
        info!("Library cache initialized successfully");

        Ok(cache)
    }

    /// Acquire database connection lock with proper error handling
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn create_schema(&self) -> Result<(), StorageError> {
        debug!("Creating database schema");

        let conn = self.lock_conn()?;

        // Base table (without migration columns)
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS libraries (
                name TEXT NOT NULL COLLATE NOCASE PRIMARY KEY,
                stable_version TEXT NOT NULL,
                stable_release_notes_url TEXT NOT NULL,
                preview_version TEXT NOT NULL,
                preview_release_notes_url TEXT NOT NULL,
                pinned INTEGER NOT NULL DEFAULT 0
            )
            "#,
            [],
        )?;

        Self::apply_migrations(&conn)?;

        debug!("Database schema created successfully");
        Ok(())
    }

    /// Apply pending migrations based on user_version pragma
    fn apply_migrations(conn: &Connection) -> Result<(), StorageError> {
        let current_version: i32 =
            conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        for (i, statements) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current_version {
                for sql in *statements {
                    match conn.execute(sql, []) {
                        Ok(_) => {}
                        Err(rusqlite::Error::SqliteFailure(_, Some(ref msg)))
                            if msg.contains("duplicate column name") =>
                        {
                            debug!("Column already exists, skipping: {}", sql);
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                debug!("Applied migration v{}", version);
            }
        }

        let target_version = MIGRATIONS.len() as i32;
        if target_version > current_version {
            conn.pragma_update(None, "user_version", target_version)?;
            debug!("Updated schema version to v{}", target_version);
        }

        Ok(())
    }

    fn order_by(sort_order: SortOrder) -> &'static str {
        match sort_order {
            SortOrder::AToZ => "name ASC",
            SortOrder::ZToA => "name DESC",
            SortOrder::PinnedFirst => "pinned DESC, name ASC",
        }
    }

    fn read_record(row: &Row<'_>) -> rusqlite::Result<LibraryRecord> {
        Ok(LibraryRecord {
            name: row.get(0)?,
            url: row.get(1)?,
            release_date: row.get(2)?,
            stable_version: Version::new(row.get::<_, String>(3)?, row.get::<_, String>(4)?),
            preview_version: Version::new(row.get::<_, String>(5)?, row.get::<_, String>(6)?),
            pinned: row.get(7)?,
        })
    }
}

impl LibraryStore for Cache {
    fn count(&self) -> Result<usize, StorageError> {
        let conn = self.lock_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM libraries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn query(
        &self,
        search_query: &str,
        sort_order: SortOrder,
    ) -> Result<Vec<LibraryRecord>, StorageError> {
        let conn = self.lock_conn()?;
        let sql = format!(
            "SELECT {} FROM libraries WHERE instr(lower(name), lower(?1)) > 0 ORDER BY {}",
            SELECT_COLUMNS,
            Self::order_by(sort_order)
        );
        let mut stmt = conn.prepare(&sql)?;

        let libraries = stmt
            .query_map([search_query], Self::read_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(libraries)
    }

    fn replace_all(&self, records: &[LibraryRecord]) -> Result<(), StorageError> {
        debug!("Replacing cache with {} libraries", records.len());

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM libraries", [])?;

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO libraries ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                SELECT_COLUMNS
            ))?;
            for record in records {
                stmt.execute((
                    &record.name,
                    &record.url,
                    &record.release_date,
                    &record.stable_version.name,
                    &record.stable_version.release_notes_url,
                    &record.preview_version.name,
                    &record.preview_version.release_notes_url,
                    record.pinned,
                ))?;
            }
        }

        // Dropping the transaction without commit rolls back on any error above
        tx.commit()?;

        debug!("Cache replaced");
        Ok(())
    }

    fn update(&self, record: &LibraryRecord) -> Result<bool, StorageError> {
        let conn = self.lock_conn()?;
        let updated = conn.execute(
            r#"
            UPDATE libraries SET
                name = ?1,
                url = ?2,
                release_date = ?3,
                stable_version = ?4,
                stable_release_notes_url = ?5,
                preview_version = ?6,
                preview_release_notes_url = ?7,
                pinned = ?8
            WHERE name = ?1
            "#,
            (
                &record.name,
                &record.url,
                &record.release_date,
                &record.stable_version.name,
                &record.stable_version.release_notes_url,
                &record.preview_version.name,
                &record.preview_version.release_notes_url,
                record.pinned,
            ),
        )?;

        debug!("Updated {} row(s) for {}", updated, record.name);
        Ok(updated > 0)
    }

    fn set_pinned(&self, name: &str, pinned: bool) -> Result<bool, StorageError> {
        let conn = self.lock_conn()?;
        let updated = conn.execute(
            "UPDATE libraries SET pinned = ?2 WHERE name = ?1",
            (name, pinned),
        )?;

        debug!("Set pinned = {} on {} row(s) for {}", pinned, updated, name);
        Ok(updated > 0)
    }
}
