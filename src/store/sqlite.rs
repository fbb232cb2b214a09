use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{DashboardError, Result};
use crate::domain::{FavoritesSet, PreferenceSet};
use crate::store::Store;

const PREFERENCES_KEY: &str = "preferences";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| DashboardError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            DashboardError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl Store for SqliteStore {
    /// Missing or unreadable blobs fall back to the defaults.
    fn load_preferences(&self) -> Result<PreferenceSet> {
        let Some(blob) = self.get_value(PREFERENCES_KEY)? else {
            return Ok(PreferenceSet::default());
        };
        match serde_json::from_str::<PreferenceSet>(&blob) {
            Ok(prefs) => Ok(prefs.normalized()),
            Err(e) => {
                tracing::warn!(error = %e, "Stored preferences unreadable, using defaults");
                Ok(PreferenceSet::default())
            }
        }
    }

    fn save_preferences(&self, prefs: &PreferenceSet) -> Result<()> {
        let blob = serde_json::to_string(prefs)?;
        self.set_value(PREFERENCES_KEY, &blob)?;
        tracing::debug!("Preferences saved");
        Ok(())
    }

    fn load_favorites(&self) -> Result<FavoritesSet> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT item_id FROM favorites ORDER BY item_id")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<FavoritesSet, _>>()?;
        Ok(ids)
    }

    fn add_favorite(&self, item_id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO favorites (item_id, added_at) VALUES (?1, ?2)",
            params![item_id, Utc::now().to_rfc3339()],
        )?;
        Ok(inserted > 0)
    }

    fn remove_favorite(&self, item_id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM favorites WHERE item_id = ?1", params![item_id])?;
        Ok(deleted > 0)
    }
}
