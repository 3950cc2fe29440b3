//! File-based blob backend rooted at an upload directory.

use crate::backend::BlobBackend;
use crate::error::{BlobError, BlobResult};
use crate::path::BlobKey;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A blob backend storing each key as one file below an upload root.
///
/// Keys map component by component onto directories, so
/// `workspace_1/images/a.png` lives at `<root>/workspace_1/images/a.png`.
///
/// # Durability
///
/// `write` goes through a temporary sibling file that is synced and then
/// renamed over the destination, so readers never observe a torn file.
///
/// # Example
///
/// ```no_run
/// use notesync_blob::{BlobBackend, BlobKey, FileBlobBackend};
/// use std::path::Path;
///
/// let backend = FileBlobBackend::open(Path::new("uploads")).unwrap();
/// let key = BlobKey::image(1, "a.png").unwrap();
/// backend.write(&key, b"bytes").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileBlobBackend {
    root: PathBuf,
}

impl FileBlobBackend {
    /// Opens a backend rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: &Path) -> BlobResult<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Returns the upload root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file system path of a key.
    #[must_use]
    pub fn path_of(&self, key: &BlobKey) -> PathBuf {
        key.components()
            .fold(self.root.clone(), |path, component| path.join(component))
    }

    fn map_not_found(err: io::Error, key: &BlobKey) -> BlobError {
        if err.kind() == io::ErrorKind::NotFound {
            BlobError::NotFound {
                key: key.to_string(),
            }
        } else {
            BlobError::Io(err)
        }
    }
}

impl BlobBackend for FileBlobBackend {
    fn write(&self, key: &BlobKey, data: &[u8]) -> BlobResult<()> {
        let path = self.path_of(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_file_name(format!(".{}.partial", key.file_name()));
        {
            let mut file = File::create(&tmp)?;
            file.write_all(data)?;
            file.sync_all()?;
        }
        if let Err(err) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        Ok(())
    }

    fn read(&self, key: &BlobKey) -> BlobResult<Vec<u8>> {
        fs::read(self.path_of(key)).map_err(|e| Self::map_not_found(e, key))
    }

    fn delete(&self, key: &BlobKey) -> BlobResult<()> {
        fs::remove_file(self.path_of(key)).map_err(|e| Self::map_not_found(e, key))
    }

    fn exists(&self, key: &BlobKey) -> BlobResult<bool> {
        Ok(self.path_of(key).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn key(name: &str) -> BlobKey {
        BlobKey::image(1, name).unwrap()
    }

    #[test]
    fn file_write_and_read() {
        let dir = tempdir().unwrap();
        let backend = FileBlobBackend::open(dir.path()).unwrap();

        backend.write(&key("a.png"), b"hello").unwrap();
        assert_eq!(backend.read(&key("a.png")).unwrap(), b"hello");
        assert!(dir.path().join("workspace_1/images/a.png").is_file());
    }

    #[test]
    fn file_overwrite() {
        let dir = tempdir().unwrap();
        let backend = FileBlobBackend::open(dir.path()).unwrap();

        backend.write(&key("a.png"), b"first").unwrap();
        backend.write(&key("a.png"), b"second").unwrap();
        assert_eq!(backend.read(&key("a.png")).unwrap(), b"second");
        assert!(!dir.path().join("workspace_1/images/.a.png.partial").exists());
    }

    #[test]
    fn file_read_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let backend = FileBlobBackend::open(dir.path()).unwrap();

        let err = backend.read(&key("missing.png")).unwrap_err();
        assert!(matches!(err, BlobError::NotFound { .. }));
    }

    #[test]
    fn file_delete() {
        let dir = tempdir().unwrap();
        let backend = FileBlobBackend::open(dir.path()).unwrap();

        backend.write(&key("a.png"), b"x").unwrap();
        assert!(backend.exists(&key("a.png")).unwrap());
        backend.delete(&key("a.png")).unwrap();
        assert!(!backend.exists(&key("a.png")).unwrap());
        assert!(backend.delete(&key("a.png")).unwrap_err().is_not_found());
    }

    #[test]
    fn file_persistence() {
        let dir = tempdir().unwrap();
        {
            let backend = FileBlobBackend::open(dir.path()).unwrap();
            backend.write(&key("keep.bin"), &[1, 2, 3]).unwrap();
        }
        let backend = FileBlobBackend::open(dir.path()).unwrap();
        assert_eq!(backend.read(&key("keep.bin")).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn file_creates_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("uploads");
        let backend = FileBlobBackend::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(backend.root(), root.as_path());
    }
}
