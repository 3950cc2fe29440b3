//! Error types for blob operations.

use std::io;
use thiserror::Error;

/// Result type for blob operations.
pub type BlobResult<T> = Result<T, BlobError>;

/// Errors that can occur during blob operations.
#[derive(Debug, Error)]
pub enum BlobError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No blob is stored under the key.
    #[error("blob not found: {key}")]
    NotFound {
        /// The missing key.
        key: String,
    },

    /// The key is not a well-formed relative blob key.
    #[error("invalid blob key {key:?}: {reason}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The key resolves outside the workspace's upload subtree.
    #[error("blob key {key:?} is outside the upload directory of workspace {workspace_id}")]
    OutsideWorkspace {
        /// The rejected key.
        key: String,
        /// The workspace whose subtree was required.
        workspace_id: i64,
    },

    /// A file name was empty once sanitized.
    #[error("file name {original:?} is empty after sanitization")]
    EmptyFileName {
        /// The name the client submitted.
        original: String,
    },

    /// An inline payload could not be decoded.
    #[error("invalid image payload: {0}")]
    InvalidPayload(String),

    /// An inline payload exceeded the configured limit.
    #[error("image payload of {size} bytes exceeds the limit of {limit} bytes")]
    PayloadTooLarge {
        /// Decoded payload size.
        size: usize,
        /// Configured limit.
        limit: usize,
    },
}

impl BlobError {
    /// Creates an invalid key error.
    pub fn invalid_key(key: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason,
        }
    }

    /// Returns true if the error was caused by client-supplied data.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            BlobError::InvalidKey { .. }
                | BlobError::OutsideWorkspace { .. }
                | BlobError::EmptyFileName { .. }
                | BlobError::InvalidPayload(_)
                | BlobError::PayloadTooLarge { .. }
        )
    }

    /// Returns true if the blob did not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            BlobError::NotFound { .. } => true,
            BlobError::Io(err) => err.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_classification() {
        assert!(BlobError::InvalidPayload("bad".into()).is_client_error());
        assert!(BlobError::EmptyFileName {
            original: "..".into()
        }
        .is_client_error());
        assert!(!BlobError::Io(io::Error::new(io::ErrorKind::Other, "disk")).is_client_error());
    }

    #[test]
    fn not_found_detection() {
        assert!(BlobError::NotFound { key: "a".into() }.is_not_found());
        assert!(BlobError::Io(io::Error::from(io::ErrorKind::NotFound)).is_not_found());
        assert!(!BlobError::invalid_key("a", "bad").is_not_found());
    }

    #[test]
    fn error_display() {
        let err = BlobError::OutsideWorkspace {
            key: "workspace_2/images/a.png".into(),
            workspace_id: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("workspace_2/images/a.png"));
        assert!(msg.contains('1'));
    }
}
