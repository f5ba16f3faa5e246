//! Settings store - persistent key/value storage for captured values.
//!
//! SQLite-backed. The dialog writes the phone number here on a successful
//! save and never reads it back; the read accessor exists for hosts and
//! tests.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

/// Fixed storage key for the captured phone number.
pub const PHONE_NUMBER_KEY: &str = "phone_number";

/// Persistent store for widget settings.
pub struct SettingsStore {
    db: Connection,
}

impl SettingsStore {
    const SCHEMA: &'static str = r"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        );
    ";

    /// Open or create the settings database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings dir {}", parent.display()))?;
        }

        let db = Connection::open(path)
            .with_context(|| format!("Failed to open settings store at {}", path.display()))?;
        Self::initialize(db)
    }

    /// Open an in-memory settings store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let db =
            Connection::open_in_memory().context("Failed to open in-memory settings store")?;
        Self::initialize(db)
    }

    fn initialize(db: Connection) -> Result<Self> {
        db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;")
            .context("Failed to set settings store pragmas")?;
        db.execute_batch(Self::SCHEMA)
            .context("Failed to create settings store schema")?;
        Ok(Self { db })
    }

    /// Persist the captured phone number under [`PHONE_NUMBER_KEY`].
    pub fn set_phone_number(&mut self, value: &str) -> Result<()> {
        self.set(PHONE_NUMBER_KEY, value)
    }

    /// Read the stored phone number, if one was ever saved.
    pub fn phone_number(&self) -> Result<Option<String>> {
        self.get(PHONE_NUMBER_KEY)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.db
            .execute(
                "INSERT INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET
                     value = excluded.value,
                     updated_at = excluded.updated_at",
                params![key, value, unix_timestamp()],
            )
            .with_context(|| format!("Failed to write setting {key}"))?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.db
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read setting {key}"))
    }
}

fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs() as i64)
}
