//! SQLite-backed key-value store for persisted user state.
//!
//! Each key holds one JSON document and is read and written on its own.
//! Reads never fail: a missing or corrupt value falls back to the
//! hard-coded default for that key. Every write goes straight to disk.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use super::data_dir;
use crate::blocklist::Blocklist;
use crate::error::StoreError;
use crate::ledger::Ledger;
use crate::settings::{PersonalityType, RigidityLevel};
use crate::stats::WellbeingStats;

/// Keys of the persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Blocklist,
    Goal,
    Rigidity,
    Personality,
    Stats,
    Ledger,
}

impl StoreKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blocklist => "focus_apps",
            Self::Goal => "focus_goal",
            Self::Rigidity => "focus_rigidity",
            Self::Personality => "focus_personality",
            Self::Stats => "focus_stats",
            Self::Ledger => "focus_sheet",
        }
    }
}

/// Persisted user state.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store at `~/.config/focushub/focushub.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()?.join("focushub.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Reject every write while `on` is set.
    #[cfg(test)]
    pub(crate) fn set_read_only(&self, on: bool) -> Result<(), rusqlite::Error> {
        let pragma = if on { "PRAGMA query_only = ON;" } else { "PRAGMA query_only = OFF;" };
        self.conn.execute_batch(pragma)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    fn raw(&self, key: StoreKey) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()
    }

    /// Read a value, falling back to `default` when it is missing or corrupt.
    pub fn get_or<T, F>(&self, key: StoreKey, default: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.raw(key) {
            Ok(Some(text)) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(
                        key = key.as_str(),
                        error = %e,
                        "corrupt stored value, using default"
                    );
                    default()
                }
            },
            Ok(None) => default(),
            Err(e) => {
                tracing::warn!(
                    key = key.as_str(),
                    error = %e,
                    "failed to read stored value, using default"
                );
                default()
            }
        }
    }

    /// Write a value through to disk.
    pub fn set<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value).map_err(|source| StoreError::Encode {
            key: key.as_str().to_string(),
            source,
        })?;
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key.as_str(), text],
        )?;
        tracing::trace!(key = key.as_str(), "stored value");
        Ok(())
    }

    pub fn remove(&self, key: StoreKey) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key.as_str()])?;
        Ok(())
    }

    // ── Typed accessors ─────────────────────────────────────────────

    pub fn blocklist(&self) -> Blocklist {
        self.get_or(StoreKey::Blocklist, Blocklist::seeded)
    }

    pub fn goal(&self) -> String {
        self.get_or(StoreKey::Goal, String::new)
    }

    pub fn rigidity(&self) -> RigidityLevel {
        self.get_or(StoreKey::Rigidity, RigidityLevel::default)
    }

    pub fn personality(&self) -> PersonalityType {
        self.get_or(StoreKey::Personality, PersonalityType::default)
    }

    pub fn stats(&self) -> WellbeingStats {
        self.get_or(StoreKey::Stats, WellbeingStats::default)
    }

    pub fn ledger(&self) -> Ledger {
        self.get_or(StoreKey::Ledger, Ledger::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_return_defaults() {
        let store = Store::open_memory().unwrap();
        assert_eq!(store.blocklist(), Blocklist::seeded());
        assert_eq!(store.goal(), "");
        assert_eq!(store.rigidity(), RigidityLevel::Standard);
        assert_eq!(store.personality(), PersonalityType::Supportive);
        assert_eq!(store.stats(), WellbeingStats::default());
        assert!(store.ledger().is_empty());
    }

    #[test]
    fn set_then_get() {
        let store = Store::open_memory().unwrap();
        store.set(StoreKey::Goal, "Finish report").unwrap();
        store.set(StoreKey::Rigidity, &RigidityLevel::Locked).unwrap();
        assert_eq!(store.goal(), "Finish report");
        assert_eq!(store.rigidity(), RigidityLevel::Locked);

        store.set(StoreKey::Goal, "Ship v2").unwrap();
        assert_eq!(store.goal(), "Ship v2");
    }

    #[test]
    fn corrupt_value_falls_back_to_default() {
        let store = Store::open_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)",
                params![StoreKey::Rigidity.as_str(), "\"Ultra\""],
            )
            .unwrap();
        store
            .conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)",
                params![StoreKey::Stats.as_str(), "{not json"],
            )
            .unwrap();
        assert_eq!(store.rigidity(), RigidityLevel::Standard);
        assert_eq!(store.stats(), WellbeingStats::default());
    }

    #[test]
    fn remove_restores_default() {
        let store = Store::open_memory().unwrap();
        store.set(StoreKey::Personality, &PersonalityType::Savage).unwrap();
        store.remove(StoreKey::Personality).unwrap();
        assert_eq!(store.personality(), PersonalityType::Supportive);
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focushub.db");
        {
            let store = Store::open_at(&path).unwrap();
            let mut stats = store.stats();
            stats.record_interception();
            store.set(StoreKey::Stats, &stats).unwrap();
        }
        let reopened = Store::open_at(&path).unwrap();
        assert_eq!(reopened.stats().interceptions, 15);
    }
}
