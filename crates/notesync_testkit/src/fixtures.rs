//! Test fixtures and database helpers.
//!
//! A [`TestEnv`] owns a temporary directory holding the SQLite database and
//! the upload root, and seeds one workspace with a member of every role.

use notesync_blob::{BlobStore, FileBlobBackend};
use notesync_core::{store, Database, Role, Session};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Owner of the seeded workspace.
pub const OWNER: i64 = 1;
/// Collaborator of the seeded workspace.
pub const COLLABORATOR: i64 = 2;
/// Viewer of the seeded workspace.
pub const VIEWER: i64 = 3;
/// A user with no membership.
pub const OUTSIDER: i64 = 4;

/// A database, blob store and seeded workspace with automatic cleanup.
pub struct TestEnv {
    /// The database.
    pub database: Database,
    /// Blob store writing under the upload root.
    pub blobs: Arc<BlobStore>,
    /// The seeded workspace.
    pub workspace_id: i64,
    dir: TempDir,
}

impl TestEnv {
    /// Creates an environment with one seeded workspace.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let database =
            Database::open(&dir.path().join("notesync.db")).expect("Failed to open database");
        let backend = FileBlobBackend::open(&dir.path().join("uploads"))
            .expect("Failed to open upload directory");
        let blobs = Arc::new(BlobStore::new(Arc::new(backend)));

        let mut env = Self {
            database,
            blobs,
            workspace_id: 0,
            dir,
        };
        env.workspace_id = env.create_workspace("Team notes", OWNER);
        let mut session = env.session();
        session
            .write(|tx| {
                store::member::upsert(tx, env.workspace_id, COLLABORATOR, Role::Collaborator)?;
                store::member::upsert(tx, env.workspace_id, VIEWER, Role::Viewer)
            })
            .expect("Failed to seed members");
        env
    }

    /// Opens a new session.
    pub fn session(&self) -> Session {
        self.database.session().expect("Failed to open session")
    }

    /// Creates another workspace and returns its id.
    pub fn create_workspace(&self, name: &str, owner: i64) -> i64 {
        let mut session = self.session();
        session
            .write(|tx| store::workspace::create(tx, name, owner))
            .expect("Failed to create workspace")
            .id
    }

    /// Returns the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the upload root.
    pub fn upload_root(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// Lists the image files stored for a workspace, sorted by name.
    pub fn image_files(&self, workspace_id: i64) -> Vec<String> {
        let dir = self
            .upload_root()
            .join(notesync_blob::workspace_image_dir(workspace_id));
        let mut names: Vec<String> = match std::fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|name| !name.starts_with('.'))
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_every_role() {
        let env = TestEnv::new();
        let session = env.session();
        let conn = session.connection();
        let ws = env.workspace_id;
        assert_eq!(store::member::role_of(conn, ws, OWNER).unwrap(), Some(Role::Owner));
        assert_eq!(
            store::member::role_of(conn, ws, COLLABORATOR).unwrap(),
            Some(Role::Collaborator)
        );
        assert_eq!(store::member::role_of(conn, ws, VIEWER).unwrap(), Some(Role::Viewer));
        assert_eq!(store::member::role_of(conn, ws, OUTSIDER).unwrap(), None);
        assert!(env.image_files(ws).is_empty());
    }
}
