//! In-memory blob backend for testing.

use crate::backend::BlobBackend;
use crate::error::{BlobError, BlobResult};
use crate::path::BlobKey;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory blob backend.
///
/// Suitable for unit and integration tests that do not need files on disk.
///
/// # Example
///
/// ```rust
/// use notesync_blob::{BlobBackend, BlobKey, InMemoryBlobBackend};
///
/// let backend = InMemoryBlobBackend::new();
/// let key = BlobKey::image(1, "a.png").unwrap();
/// backend.write(&key, b"data").unwrap();
/// assert_eq!(backend.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBlobBackend {
    blobs: RwLock<BTreeMap<BlobKey, Vec<u8>>>,
}

impl InMemoryBlobBackend {
    /// Creates a new empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored key in order.
    #[must_use]
    pub fn keys(&self) -> Vec<BlobKey> {
        self.blobs.read().keys().cloned().collect()
    }

    /// Returns the number of stored blobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

impl BlobBackend for InMemoryBlobBackend {
    fn write(&self, key: &BlobKey, data: &[u8]) -> BlobResult<()> {
        self.blobs.write().insert(key.clone(), data.to_vec());
        Ok(())
    }

    fn read(&self, key: &BlobKey) -> BlobResult<Vec<u8>> {
        self.blobs
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| BlobError::NotFound {
                key: key.to_string(),
            })
    }

    fn delete(&self, key: &BlobKey) -> BlobResult<()> {
        self.blobs
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| BlobError::NotFound {
                key: key.to_string(),
            })
    }

    fn exists(&self, key: &BlobKey) -> BlobResult<bool> {
        Ok(self.blobs.read().contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_write_read_delete() {
        let backend = InMemoryBlobBackend::new();
        let key = BlobKey::image(2, "b.gif").unwrap();

        assert!(backend.is_empty());
        backend.write(&key, b"gif").unwrap();
        assert_eq!(backend.read(&key).unwrap(), b"gif");
        assert_eq!(backend.keys(), vec![key.clone()]);

        backend.delete(&key).unwrap();
        assert!(!backend.exists(&key).unwrap());
        assert!(backend.read(&key).unwrap_err().is_not_found());
    }
}
