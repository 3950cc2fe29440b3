//! Database handle and per-request sessions.

use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::transaction::{Transaction, TransactionMode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Latest schema version this build creates and understands.
pub const LATEST_SCHEMA_VERSION: i64 = 1;

const MIGRATIONS: [(i64, &str); 1] = [(1, include_str!("../migrations/0001_init.sql"))];

/// A notesync database file.
///
/// The handle itself holds no connection. Each request opens its own
/// [`Session`] with [`Database::session`], uses it for one pass, and drops it.
///
/// # Example
///
/// ```no_run
/// use notesync_core::{Database, store};
/// use std::path::Path;
///
/// let db = Database::open(Path::new("data/notesync.db")).unwrap();
/// let mut session = db.session().unwrap();
/// let workspace = session
///     .write(|tx| store::workspace::create(tx, "Team notes", 1))
///     .unwrap();
/// assert_eq!(workspace.version, 0);
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    config: StoreConfig,
}

impl Database {
    /// Opens or creates a database with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or migrated.
    pub fn open(path: &Path) -> CoreResult<Self> {
        Self::open_with_config(path, StoreConfig::default())
    }

    /// Opens or creates a database and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, the schema is newer than
    /// this build, or a migration fails.
    pub fn open_with_config(path: &Path, config: StoreConfig) -> CoreResult<Self> {
        if config.create_dirs {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        let db = Self {
            path: path.to_path_buf(),
            config,
        };
        let session = db.session()?;
        apply_migrations(&session.conn)?;
        info!(path = %db.path.display(), "database opened");
        Ok(db)
    }

    /// Opens a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be opened or configured.
    pub fn session(&self) -> CoreResult<Session> {
        let conn = rusqlite::Connection::open(&self.path)?;
        conn.busy_timeout(self.config.busy_timeout)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let mode: String = conn.pragma_update_and_check(
            None,
            "journal_mode",
            self.config.journal_mode.as_pragma(),
            |row| row.get(0),
        )?;
        debug!(path = %self.path.display(), journal_mode = %mode, "session opened");
        Ok(Session { conn })
    }

    /// Returns the database file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

/// One connection to the database, owned by a single request.
#[derive(Debug)]
pub struct Session {
    conn: rusqlite::Connection,
}

impl Session {
    /// Returns the underlying connection for reads outside a transaction.
    #[must_use]
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.conn
    }

    /// Begins a write transaction, taking the database write lock.
    pub fn begin_write(&mut self) -> CoreResult<Transaction<'_>> {
        Transaction::begin(&mut self.conn, TransactionMode::Write)
    }

    /// Begins a read-only transaction.
    pub fn begin_read(&mut self) -> CoreResult<Transaction<'_>> {
        Transaction::begin(&mut self.conn, TransactionMode::Read)
    }

    /// Runs `f` in a write transaction, committing only if it succeeds.
    pub fn write<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<CoreError>,
    {
        let tx = self.begin_write()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Runs `f` in a read transaction.
    pub fn read<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<CoreError>,
    {
        let tx = self.begin_read()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

/// Returns the schema version recorded in the database.
pub fn schema_version(conn: &rusqlite::Connection) -> CoreResult<i64> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

fn apply_migrations(conn: &rusqlite::Connection) -> CoreResult<()> {
    let current = schema_version(conn)?;
    if current > LATEST_SCHEMA_VERSION {
        return Err(CoreError::SchemaTooNew {
            current,
            latest: LATEST_SCHEMA_VERSION,
        });
    }

    for (version, sql) in MIGRATIONS {
        if version <= current {
            continue;
        }
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)
            .map_err(|e| CoreError::migration_failed(format!("migration {version}: {e}")))?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
        info!(version, "applied schema migration");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_schema() {
        let dir = tempdir().unwrap();
        let db = Database::open(&dir.path().join("nested/notesync.db")).unwrap();
        let session = db.session().unwrap();
        assert_eq!(schema_version(session.connection()).unwrap(), LATEST_SCHEMA_VERSION);

        let fk: i64 = session
            .connection()
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notesync.db");
        Database::open(&path).unwrap();
        let db = Database::open(&path).unwrap();
        assert_eq!(db.path(), path.as_path());
    }

    #[test]
    fn newer_schema_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notesync.db");
        {
            let conn = rusqlite::Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", 99i64).unwrap();
        }
        let err = Database::open(&path).unwrap_err();
        assert!(matches!(err, CoreError::SchemaTooNew { current: 99, .. }));
    }

    #[test]
    fn write_closure_rolls_back_on_error() {
        let dir = tempdir().unwrap();
        let db = Database::open(&dir.path().join("notesync.db")).unwrap();
        let mut session = db.session().unwrap();

        let result: CoreResult<()> = session.write(|tx| {
            crate::store::workspace::create(tx, "scratch", 1)?;
            Err(CoreError::invalid_operation("abort"))
        });
        assert!(result.is_err());

        let count: i64 = session
            .connection()
            .query_row("SELECT COUNT(*) FROM workspaces", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
