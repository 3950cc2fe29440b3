//! Error types for the sync engine.

use notesync_blob::BlobError;
use notesync_core::{CoreError, EntityKind};
use notesync_sync_protocol::ProtocolError;
use std::fmt;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Discrete classes of failure that callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The workspace or another addressed resource does not exist.
    NotFound,
    /// The caller may not perform the operation.
    Forbidden,
    /// The workspace is busy with another pass.
    Conflict,
    /// The submitted data was rejected.
    Validation,
    /// Storage or transaction failure.
    Storage,
}

impl ErrorKind {
    /// Returns the stable name used in error bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Validation => "validation",
            ErrorKind::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during a sync pass or a read of workspace state.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Workspace does not exist.
    #[error("workspace {workspace_id} not found")]
    WorkspaceNotFound {
        /// Workspace ID.
        workspace_id: i64,
    },

    /// The user may not perform the operation on the workspace.
    #[error("user {user_id} may not {action} workspace {workspace_id}")]
    Forbidden {
        /// Workspace ID.
        workspace_id: i64,
        /// User ID.
        user_id: i64,
        /// What was attempted, e.g. `sync`.
        action: &'static str,
    },

    /// Another pass holds the workspace.
    #[error("workspace {workspace_id} is busy")]
    Busy {
        /// Workspace ID.
        workspace_id: i64,
    },

    /// The snapshot was rejected before or during reconciliation.
    #[error("invalid snapshot: {message}")]
    Validation {
        /// Error message.
        message: String,
    },

    /// An image payload or file name was rejected.
    #[error("invalid image {file_name:?}: {source}")]
    InvalidImage {
        /// Submitted file name.
        file_name: String,
        /// Underlying blob error.
        #[source]
        source: BlobError,
    },

    /// A row names a parent that does not exist in the workspace.
    #[error("{kind} {id} references missing {target} {target_id}")]
    DanglingReference {
        /// Kind of the referencing row.
        kind: EntityKind,
        /// Submitted identifier of the referencing row.
        id: i64,
        /// Kind of the referenced row.
        target: EntityKind,
        /// Referenced identifier.
        target_id: i64,
    },

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] CoreError),

    /// Blob store error.
    #[error("blob error: {0}")]
    Blob(#[from] BlobError),

    /// Request body could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl SyncError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Wraps a blob error raised while handling one image.
    pub fn invalid_image(file_name: impl Into<String>, source: BlobError) -> Self {
        Self::InvalidImage {
            file_name: file_name.into(),
            source,
        }
    }

    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::WorkspaceNotFound { .. } => ErrorKind::NotFound,
            SyncError::Forbidden { .. } => ErrorKind::Forbidden,
            SyncError::Busy { .. } => ErrorKind::Conflict,
            SyncError::Validation { .. } | SyncError::Protocol(_) => ErrorKind::Validation,
            SyncError::InvalidImage { source, .. } => {
                if source.is_client_error() {
                    ErrorKind::Validation
                } else {
                    ErrorKind::Storage
                }
            }
            SyncError::DanglingReference { .. } => ErrorKind::Storage,
            SyncError::Database(err) => {
                if err.is_not_found() {
                    ErrorKind::NotFound
                } else if err.is_busy() {
                    ErrorKind::Conflict
                } else {
                    ErrorKind::Storage
                }
            }
            SyncError::Blob(err) => {
                if err.is_client_error() {
                    ErrorKind::Validation
                } else {
                    ErrorKind::Storage
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            SyncError::WorkspaceNotFound { workspace_id: 1 }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(SyncError::validation("x").kind(), ErrorKind::Validation);
        assert_eq!(
            SyncError::from(CoreError::WorkspaceNotFound { workspace_id: 2 }).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            SyncError::from(CoreError::invalid_data("bad row")).kind(),
            ErrorKind::Storage
        );
        assert_eq!(
            SyncError::invalid_image("a.png", BlobError::InvalidPayload("bad".into())).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            SyncError::from(BlobError::EmptyFileName {
                original: "..".into()
            })
            .kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            SyncError::from(ProtocolError::EmptyBody).kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn dangling_reference_is_storage() {
        let err = SyncError::DanglingReference {
            kind: EntityKind::NoteImage,
            id: 4,
            target: EntityKind::Note,
            target_id: 9,
        };
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(err.to_string(), "note_image 4 references missing note 9");
    }

    #[test]
    fn kind_names() {
        assert_eq!(ErrorKind::Conflict.to_string(), "conflict");
        assert_eq!(ErrorKind::NotFound.as_str(), "not_found");
    }
}
