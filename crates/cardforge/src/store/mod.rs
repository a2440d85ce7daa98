//! Local persistence for the profile record.
//!
//! This module provides a small `SQLite`-backed key-value store. The profile
//! occupies one named slot holding a versioned JSON document; loading never
//! fails on bad data and falls back to defaults instead.

pub mod document;
pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::profile::ProfileRecord;

/// Slot holding the profile document.
pub const PROFILE_SLOT: &str = "profile";

/// Where a loaded record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Nothing was stored yet.
    Fresh,
    /// A current-version document was read.
    Stored,
    /// An older document was read and upgraded in memory.
    Migrated {
        /// Version found in storage.
        from_version: u64,
    },
    /// The stored document was unusable and defaults were used.
    Recovered,
}

/// Outcome of [`Store::save_profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// The record was written.
    Written,
    /// The record matched what was last written and was not rewritten.
    Unchanged,
}

/// `SQLite` key-value store for the profile.
#[derive(Debug)]
pub struct Store {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// BLAKE3 fingerprint of the last record loaded or written.
    fingerprint: Option<String>,
}

impl Store {
    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening profile store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        info!("Profile store opened at {}", path.display());
        Ok(Self {
            path,
            conn,
            fingerprint: None,
        })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            fingerprint: None,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Read a raw slot value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_slot(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Write a raw slot value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn put_slot(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Load the profile, falling back to defaults.
    ///
    /// Absent, malformed, and too-new documents all yield the default record;
    /// only database failures are errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read.
    pub fn load_profile(&mut self) -> Result<(ProfileRecord, LoadOrigin)> {
        let Some(raw) = self.get_slot(PROFILE_SLOT)? else {
            debug!("No stored profile, starting from defaults");
            self.fingerprint = None;
            return Ok((ProfileRecord::default(), LoadOrigin::Fresh));
        };

        match document::decode(&raw) {
            Ok(decoded) => {
                let origin = if decoded.from_version == document::DOCUMENT_VERSION {
                    LoadOrigin::Stored
                } else {
                    info!(
                        from_version = decoded.from_version,
                        "Migrated stored profile document"
                    );
                    LoadOrigin::Migrated {
                        from_version: decoded.from_version,
                    }
                };
                // Migrated documents must be rewritten on the next save.
                self.fingerprint = match origin {
                    LoadOrigin::Stored if decoded.dropped_keys.is_empty() => {
                        Some(fingerprint(&decoded.record)?)
                    }
                    _ => None,
                };
                Ok((decoded.record, origin))
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unusable stored profile, using defaults");
                self.fingerprint = None;
                Ok((ProfileRecord::default(), LoadOrigin::Recovered))
            }
        }
    }

    /// Persist the profile unless it is identical to the last one seen.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database write fails.
    pub fn save_profile(&mut self, record: &ProfileRecord) -> Result<SaveStatus> {
        let print = fingerprint(record)?;
        if self.fingerprint.as_deref() == Some(print.as_str()) {
            debug!("Profile unchanged, skipping write");
            return Ok(SaveStatus::Unchanged);
        }

        let raw = document::encode(record, Utc::now())?;
        self.put_slot(PROFILE_SLOT, &raw)?;
        debug!(bytes = raw.len(), "Profile written");
        self.fingerprint = Some(print);
        Ok(SaveStatus::Written)
    }
}

/// BLAKE3 hash of the record's canonical JSON.
fn fingerprint(record: &ProfileRecord) -> Result<String> {
    let json = serde_json::to_vec(record)?;
    Ok(blake3::hash(&json).to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileField;

    fn create_test_store() -> Store {
        Store::open_in_memory().expect("failed to create test store")
    }

    fn sample() -> ProfileRecord {
        let mut record = ProfileRecord::default();
        record.set(ProfileField::BusinessName, "Acme");
        record.set(ProfileField::Slug, "acme");
        record
    }

    #[test]
    fn test_open_in_memory() {
        let store = create_test_store();
        assert_eq!(store.path(), Path::new(":memory:"));
    }

    #[test]
    fn test_slot_round_trip() {
        let store = create_test_store();
        assert!(store.get_slot("k").unwrap().is_none());

        store.put_slot("k", "one").unwrap();
        store.put_slot("k", "two").unwrap();
        assert_eq!(store.get_slot("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_load_fresh_store_yields_defaults() {
        let mut store = create_test_store();
        let (record, origin) = store.load_profile().unwrap();
        assert_eq!(record, ProfileRecord::default());
        assert_eq!(origin, LoadOrigin::Fresh);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = create_test_store();
        assert_eq!(store.save_profile(&sample()).unwrap(), SaveStatus::Written);

        let (record, origin) = store.load_profile().unwrap();
        assert_eq!(record, sample());
        assert_eq!(origin, LoadOrigin::Stored);
    }

    #[test]
    fn test_unchanged_save_is_skipped() {
        let mut store = create_test_store();
        assert_eq!(store.save_profile(&sample()).unwrap(), SaveStatus::Written);
        assert_eq!(
            store.save_profile(&sample()).unwrap(),
            SaveStatus::Unchanged
        );

        let mut changed = sample();
        changed.set(ProfileField::Bio, "new");
        assert_eq!(store.save_profile(&changed).unwrap(), SaveStatus::Written);
    }

    #[test]
    fn test_malformed_slot_falls_back_to_defaults() {
        let mut store = create_test_store();
        store.put_slot(PROFILE_SLOT, "{{{ not json").unwrap();

        let (record, origin) = store.load_profile().unwrap();
        assert_eq!(record, ProfileRecord::default());
        assert_eq!(origin, LoadOrigin::Recovered);
    }

    #[test]
    fn test_legacy_slot_is_migrated_and_rewritten() {
        let mut store = create_test_store();
        store
            .put_slot(PROFILE_SLOT, r#"{"businessName":"Acme","slug":"acme"}"#)
            .unwrap();

        let (record, origin) = store.load_profile().unwrap();
        assert_eq!(record, sample());
        assert_eq!(origin, LoadOrigin::Migrated { from_version: 0 });

        // Saving the same record upgrades the stored document.
        assert_eq!(store.save_profile(&record).unwrap(), SaveStatus::Written);
        let raw = store.get_slot(PROFILE_SLOT).unwrap().unwrap();
        assert!(raw.contains("\"version\":1"));
    }

    #[test]
    fn test_open_file_based() {
        let db_path =
            std::env::temp_dir().join(format!("cardforge_test_{}.db", std::process::id()));
        let _ = std::fs::remove_file(&db_path);

        {
            let mut store = Store::open(&db_path).unwrap();
            store.save_profile(&sample()).unwrap();
            assert_eq!(store.path(), db_path);
        }

        let mut reopened = Store::open(&db_path).unwrap();
        let (record, _) = reopened.load_profile().unwrap();
        assert_eq!(record, sample());

        drop(reopened);
        let _ = std::fs::remove_file(&db_path);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let root = std::env::temp_dir().join(format!("cardforge_test_dirs_{}", std::process::id()));
        let nested_path = root.join("nested/profile.db");
        let _ = std::fs::remove_dir_all(&root);

        let store = Store::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(store);
        let _ = std::fs::remove_dir_all(&root);
    }
}
