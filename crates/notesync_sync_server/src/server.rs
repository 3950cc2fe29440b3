//! Sync server facade.

use crate::access::{AccessGuard, RoleLookup};
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::{HandlerContext, RequestHandler};
use crate::response::HttpResponse;
use notesync_blob::{BlobStore, FileBlobBackend};
use notesync_core::Database;
use notesync_sync_engine::SyncEngine;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// The sync server.
///
/// Routes map one to one onto the `handle_*` methods; every method returns a
/// status code and a JSON body, so any HTTP layer can sit in front of it.
pub struct SyncServer {
    handler: RequestHandler,
    context: Arc<HandlerContext>,
}

impl SyncServer {
    /// Creates a server over an open database and blob store.
    pub fn new(database: Database, blobs: Arc<BlobStore>, config: ServerConfig) -> Self {
        Self::with_access(database, blobs, config, AccessGuard::default())
    }

    /// Creates a server with a custom role source.
    pub fn with_roles(
        database: Database,
        blobs: Arc<BlobStore>,
        config: ServerConfig,
        roles: Arc<dyn RoleLookup>,
    ) -> Self {
        Self::with_access(database, blobs, config, AccessGuard::new(roles))
    }

    fn with_access(
        database: Database,
        blobs: Arc<BlobStore>,
        config: ServerConfig,
        access: AccessGuard,
    ) -> Self {
        let engine = SyncEngine::with_config(blobs, config.engine.clone());
        let context = Arc::new(HandlerContext::new(config, database, engine, access));
        let handler = RequestHandler::new(Arc::clone(&context));
        Self { handler, context }
    }

    /// Opens the database at `db_path` and stores images under `upload_root`.
    ///
    /// # Errors
    ///
    /// Returns an error if either location cannot be opened.
    pub fn open(db_path: &Path, upload_root: &Path, config: ServerConfig) -> ServerResult<Self> {
        let database = Database::open(db_path)?;
        let backend = FileBlobBackend::open(upload_root)?;
        let blobs = Arc::new(BlobStore::new(Arc::new(backend)));
        info!(db = %db_path.display(), uploads = %upload_root.display(), "Sync server ready");
        Ok(Self::new(database, blobs, config))
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.context.config
    }

    /// Returns the database.
    pub fn database(&self) -> &Database {
        &self.context.database
    }

    /// Returns the request handler.
    pub fn handler(&self) -> &RequestHandler {
        &self.handler
    }

    /// `POST /sync/{workspace}`: submits a snapshot.
    pub fn handle_sync(&self, workspace_id: i64, user_id: i64, body: &[u8]) -> HttpResponse {
        respond(self.handler.handle_sync(workspace_id, user_id, body).map(|o| o.response))
    }

    /// `GET /sync/{workspace}`: returns the current snapshot.
    pub fn handle_export(&self, workspace_id: i64, user_id: i64) -> HttpResponse {
        respond(self.handler.handle_export(workspace_id, user_id))
    }

    /// `GET /sync/{workspace}/version`.
    pub fn handle_version(&self, workspace_id: i64, user_id: i64) -> HttpResponse {
        respond(self.handler.handle_version(workspace_id, user_id))
    }

    /// `GET /sync/{workspace}/changes?since=..&limit=..`.
    pub fn handle_changes(
        &self,
        workspace_id: i64,
        user_id: i64,
        since_version: i64,
        limit: Option<u32>,
    ) -> HttpResponse {
        respond(
            self.handler
                .handle_changes(workspace_id, user_id, since_version, limit),
        )
    }
}

fn respond<T: serde::Serialize>(result: ServerResult<T>) -> HttpResponse {
    match result {
        Ok(message) => HttpResponse::ok(&message),
        Err(err) => {
            log_failure(&err);
            HttpResponse::error(&err)
        }
    }
}

fn log_failure(err: &ServerError) {
    if err.is_server_error() {
        error!(error = %err, "Request failed");
    } else {
        tracing::debug!(error = %err, status = err.status_code(), "Request rejected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notesync_core::Role;
    use notesync_testkit::{SnapshotBuilder, TestEnv, OWNER};

    fn server(env: &TestEnv) -> SyncServer {
        SyncServer::new(env.database.clone(), Arc::clone(&env.blobs), ServerConfig::default())
    }

    #[test]
    fn sync_returns_snapshot_json() {
        let env = TestEnv::new();
        let server = server(&env);
        let body = notesync_sync_protocol::encode(
            &SnapshotBuilder::new().folder(0, "Inbox", None).build(),
        )
        .unwrap();

        let response = server.handle_sync(env.workspace_id, OWNER, &body);
        assert_eq!(response.status, 200);
        let json: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(json["folders"][0]["name"], "Inbox");
        assert_eq!(json["databaseId"], env.workspace_id.to_string());
    }

    #[test]
    fn malformed_body_is_400() {
        let env = TestEnv::new();
        let response = server(&env).handle_sync(env.workspace_id, OWNER, b"{oops");
        assert_eq!(response.status, 400);
        assert!(response.body_str().contains("\"kind\":\"validation\""));
    }

    #[test]
    fn open_creates_locations() {
        let dir = tempfile::tempdir().unwrap();
        let server = SyncServer::open(
            &dir.path().join("db/notesync.db"),
            &dir.path().join("uploads"),
            ServerConfig::default(),
        )
        .unwrap();
        assert!(server.database().path().exists());
        assert!(dir.path().join("uploads").is_dir());
        assert_eq!(server.handle_version(1, OWNER).status, 404);
    }

    #[test]
    fn custom_roles() {
        let env = TestEnv::new();
        let roles = crate::access::StaticRoles::new().grant(env.workspace_id, 77, Role::Viewer);
        let server = SyncServer::with_roles(
            env.database.clone(),
            Arc::clone(&env.blobs),
            ServerConfig::default(),
            Arc::new(roles),
        );

        assert_eq!(server.handle_export(env.workspace_id, 77).status, 200);
        assert_eq!(server.handle_sync(env.workspace_id, 77, b"{}").status, 403);
        assert_eq!(server.handle_export(env.workspace_id, OWNER).status, 403);
    }
}
