//! Error types for notesync core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core storage operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// SQLite error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Migration failed.
    #[error("migration failed: {message}")]
    MigrationFailed {
        /// Description of the failure.
        message: String,
    },

    /// The database was written by a newer schema.
    #[error("database schema version {current} is newer than supported version {latest}")]
    SchemaTooNew {
        /// Version found in the database.
        current: i64,
        /// Latest version this build understands.
        latest: i64,
    },

    /// Workspace not found.
    #[error("workspace not found: {workspace_id}")]
    WorkspaceNotFound {
        /// The workspace that was looked up.
        workspace_id: i64,
    },

    /// A stored value could not be interpreted.
    #[error("invalid stored data: {message}")]
    InvalidData {
        /// Description of the problem.
        message: String,
    },

    /// Operation not permitted in current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why operation is invalid.
        message: String,
    },
}

impl CoreError {
    /// Creates a migration failure.
    pub fn migration_failed(message: impl Into<String>) -> Self {
        Self::MigrationFailed {
            message: message.into(),
        }
    }

    /// Creates an invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Returns true if the error reports a missing workspace.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::WorkspaceNotFound { .. })
    }

    /// Returns true if SQLite reported lock contention.
    pub fn is_busy(&self) -> bool {
        match self {
            CoreError::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }

    /// Returns true if SQLite rejected a write because of a constraint,
    /// such as a dangling foreign key.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            CoreError::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => {
                err.code == rusqlite::ErrorCode::ConstraintViolation
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CoreError::WorkspaceNotFound { workspace_id: 42 };
        assert_eq!(err.to_string(), "workspace not found: 42");
        assert!(err.is_not_found());

        let err = CoreError::SchemaTooNew {
            current: 9,
            latest: 1,
        };
        assert!(err.to_string().contains('9'));
    }

    #[test]
    fn busy_detection() {
        let busy = CoreError::Sqlite(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        ));
        assert!(busy.is_busy());
        assert!(!CoreError::invalid_data("x").is_busy());
    }
}
