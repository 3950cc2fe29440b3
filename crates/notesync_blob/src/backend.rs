//! Blob backend trait definition.

use crate::error::BlobResult;
use crate::path::BlobKey;

/// A keyed byte store holding attachment files.
///
/// Backends are **opaque byte stores**. They know nothing about workspaces,
/// rows or encodings; the [`crate::BlobStore`] decides which keys exist.
///
/// # Invariants
///
/// - `write` replaces any previous content stored under the key
/// - `read` returns exactly the bytes of the last successful `write`
/// - `delete` of a missing key returns [`crate::BlobError::NotFound`]
/// - Backends must be `Send + Sync` so one instance can serve every request
///
/// # Implementors
///
/// - [`super::InMemoryBlobBackend`] - For testing
/// - [`super::FileBlobBackend`] - For persistent storage
pub trait BlobBackend: Send + Sync {
    /// Stores `data` under `key`, creating intermediate directories.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn write(&self, key: &BlobKey, data: &[u8]) -> BlobResult<()>;

    /// Reads the bytes stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BlobError::NotFound`] if nothing is stored under the
    /// key, or an I/O error.
    fn read(&self, key: &BlobKey) -> BlobResult<Vec<u8>>;

    /// Removes the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BlobError::NotFound`] if nothing is stored under the
    /// key, or an I/O error.
    fn delete(&self, key: &BlobKey) -> BlobResult<()>;

    /// Returns true if a blob is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self, key: &BlobKey) -> BlobResult<bool>;
}
