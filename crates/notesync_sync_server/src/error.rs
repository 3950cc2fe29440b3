//! Error types for the sync server.

use notesync_blob::BlobError;
use notesync_core::CoreError;
use notesync_sync_engine::{ErrorKind, SyncError};
use notesync_sync_protocol::ProtocolError;
use std::time::Duration;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the sync server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Invalid request format.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The user is not allowed to perform the operation.
    #[error("user {user_id} may not {action} workspace {workspace_id}")]
    Forbidden {
        /// Workspace ID.
        workspace_id: i64,
        /// User ID.
        user_id: i64,
        /// What was attempted.
        action: &'static str,
    },

    /// Unknown workspace.
    #[error("workspace {0} not found")]
    WorkspaceNotFound(i64),

    /// Another pass held the workspace for longer than the lock timeout.
    #[error("workspace {workspace_id} is busy, gave up after {waited:?}")]
    WorkspaceBusy {
        /// Workspace ID.
        workspace_id: i64,
        /// How long the request waited.
        waited: Duration,
    },

    /// Sync pass failed.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] CoreError),

    /// Blob store error.
    #[error("blob error: {0}")]
    Blob(#[from] BlobError),

    /// Request body could not be decoded.
    #[error("invalid request: {0}")]
    Protocol(#[from] ProtocolError),
}

impl ServerError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServerError::InvalidRequest(_) | ServerError::Protocol(_) => ErrorKind::Validation,
            ServerError::Forbidden { .. } => ErrorKind::Forbidden,
            ServerError::WorkspaceNotFound(_) => ErrorKind::NotFound,
            ServerError::WorkspaceBusy { .. } => ErrorKind::Conflict,
            ServerError::Sync(err) => err.kind(),
            ServerError::Database(err) if err.is_not_found() => ErrorKind::NotFound,
            ServerError::Database(err) if err.is_busy() => ErrorKind::Conflict,
            ServerError::Database(_) => ErrorKind::Storage,
            ServerError::Blob(err) => {
                if err.is_client_error() {
                    ErrorKind::Validation
                } else {
                    ErrorKind::Storage
                }
            }
        }
    }

    /// Returns the HTTP status code for the error.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::Storage => 500,
        }
    }

    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}
