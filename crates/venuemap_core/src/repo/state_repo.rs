//! State repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Load and save the whole map state blob against the key-value table.
//! - Invoke record migrations on load and persist upgraded records
//!   immediately.
//!
//! # Invariants
//! - `load` never fails across the public boundary; unusable storage degrades
//!   to the default state.
//! - `save` overwrites the persisted record unconditionally
//!   (last-writer-wins; there is exactly one writer).
//! - Loaded current-shape records are trusted as-is; deep invariant
//!   validation is the caller's concern via `MapState::validate`.

use crate::db::{migrations::latest_version, DbError};
use crate::model::map::MapState;
use crate::repo::record::{decode_record, encode_record, DecodedRecord, CURRENT_RECORD_VERSION};
use log::{info, warn};
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Well-known key of the map state record in `kv_store`.
pub const MAP_STATE_KEY: &str = "map_state";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for state persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Encode(serde_json::Error),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode map state: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Persistence contract for the whole map state.
pub trait StateRepository {
    /// Loads the persisted state, degrading to the default state when the
    /// record is absent or unusable. Never fails.
    fn load(&self) -> MapState;
    /// Serializes and overwrites the persisted record unconditionally.
    fn save(&self, state: &MapState) -> RepoResult<()>;
}

/// SQLite-backed state repository over the `kv_store` table.
pub struct SqliteStateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStateRepository<'conn> {
    /// Wraps a connection after verifying it was bootstrapped.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match
    ///   this binary.
    /// - `MissingRequiredTable` when the key-value table is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 =
            conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_store';",
            [],
            |row| row.get(0),
        )?;
        if table_count == 0 {
            return Err(RepoError::MissingRequiredTable("kv_store"));
        }

        Ok(Self { conn })
    }

    fn read_raw(&self) -> RepoResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv_store WHERE key = ?1;")?;
        let mut rows = stmt.query([MAP_STATE_KEY])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn load(&self) -> MapState {
        let raw = match self.read_raw() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=state_load module=repo status=default reason=absent");
                return MapState::default_state();
            }
            Err(err) => {
                warn!("event=state_load module=repo status=default reason=read_failed error={err}");
                return MapState::default_state();
            }
        };

        match decode_record(&raw) {
            DecodedRecord::Current(state) => {
                info!(
                    "event=state_load module=repo status=ok layers={}",
                    state.layers.len()
                );
                state
            }
            DecodedRecord::Migrated {
                state,
                from_version,
            } => {
                info!(
                    "event=state_migrate module=repo status=ok from_version={from_version} to_version={CURRENT_RECORD_VERSION}"
                );
                // The upgraded record replaces the old one right away so the
                // migration runs at most once per record.
                if let Err(err) = self.save(&state) {
                    warn!(
                        "event=state_migrate module=repo status=persist_failed error={err}"
                    );
                }
                state
            }
            DecodedRecord::Unusable { reason } => {
                // Unknown shapes are dropped in favor of the default state;
                // the previous record stays on disk until the next save.
                warn!("event=state_load module=repo status=default reason={reason}");
                MapState::default_state()
            }
        }
    }

    fn save(&self, state: &MapState) -> RepoResult<()> {
        let encoded = encode_record(state)?;
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![MAP_STATE_KEY, encoded],
        )?;
        Ok(())
    }
}
