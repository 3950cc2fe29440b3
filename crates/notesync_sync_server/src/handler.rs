//! Request handlers.
//!
//! Each handler opens its own [`Session`] so concurrent requests never share
//! a connection. Access is checked before any transaction begins.

use crate::access::AccessGuard;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::locks::WorkspaceLocks;
use notesync_core::{store, Database, Session};
use notesync_sync_engine::{SyncEngine, SyncOutcome};
use notesync_sync_protocol::{decode_request, ChangesResponse, SyncResponse, VersionResponse};
use std::sync::Arc;
use tracing::debug;

/// Shared state for request handlers.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// Workspace database.
    pub database: Database,
    /// Sync engine.
    pub engine: SyncEngine,
    /// Role checks.
    pub access: AccessGuard,
    /// Per-workspace pass locks.
    pub locks: WorkspaceLocks,
}

impl HandlerContext {
    /// Creates a new handler context.
    pub fn new(
        config: ServerConfig,
        database: Database,
        engine: SyncEngine,
        access: AccessGuard,
    ) -> Self {
        Self {
            config,
            database,
            engine,
            access,
            locks: WorkspaceLocks::new(),
        }
    }

    fn session(&self) -> ServerResult<Session> {
        Ok(self.database.session()?)
    }
}

/// Request handler for sync operations.
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// Handles a snapshot submission.
    pub fn handle_sync(
        &self,
        workspace_id: i64,
        user_id: i64,
        body: &[u8],
    ) -> ServerResult<SyncOutcome> {
        let ctx = &self.context;
        if body.len() > ctx.config.max_body_bytes {
            return Err(ServerError::InvalidRequest(format!(
                "body of {} bytes exceeds limit of {}",
                body.len(),
                ctx.config.max_body_bytes
            )));
        }

        let mut session = ctx.session()?;
        ctx.access.require_write(&session, workspace_id, user_id)?;
        let request = decode_request(body)?;
        debug!(workspace_id, user_id, records = request.record_count(), "Sync request accepted");

        ctx.locks.run(workspace_id, ctx.config.lock_timeout, || {
            Ok(ctx.engine.sync(&mut session, workspace_id, user_id, &request)?)
        })
    }

    /// Handles a snapshot export.
    pub fn handle_export(&self, workspace_id: i64, user_id: i64) -> ServerResult<SyncResponse> {
        let mut session = self.authorize_read(workspace_id, user_id)?;
        Ok(self.context.engine.export(&mut session, workspace_id)?)
    }

    /// Handles a version query.
    pub fn handle_version(&self, workspace_id: i64, user_id: i64) -> ServerResult<VersionResponse> {
        let mut session = self.authorize_read(workspace_id, user_id)?;
        Ok(self.context.engine.version(&mut session, workspace_id)?)
    }

    /// Handles a change log query.
    ///
    /// A `limit` of `None` uses the configured default page size.
    pub fn handle_changes(
        &self,
        workspace_id: i64,
        user_id: i64,
        since_version: i64,
        limit: Option<u32>,
    ) -> ServerResult<ChangesResponse> {
        let mut session = self.authorize_read(workspace_id, user_id)?;
        let limit = limit.unwrap_or(self.context.config.default_changes_page);
        Ok(self
            .context
            .engine
            .changes(&mut session, workspace_id, since_version, limit)?)
    }

    /// Opens a session for a member of an existing workspace.
    fn authorize_read(&self, workspace_id: i64, user_id: i64) -> ServerResult<Session> {
        let session = self.context.session()?;
        if store::workspace::get(session.connection(), workspace_id)?.is_none() {
            return Err(ServerError::WorkspaceNotFound(workspace_id));
        }
        self.context
            .access
            .require_read(&session, workspace_id, user_id)?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notesync_testkit::{SnapshotBuilder, TestEnv, COLLABORATOR, OUTSIDER, OWNER, VIEWER};

    fn handler(env: &TestEnv, config: ServerConfig) -> RequestHandler {
        let database = env.database.clone();
        let engine = SyncEngine::with_config(Arc::clone(&env.blobs), config.engine.clone());
        let context = HandlerContext::new(config, database, engine, AccessGuard::default());
        RequestHandler::new(Arc::new(context))
    }

    fn body(builder: SnapshotBuilder) -> Vec<u8> {
        notesync_sync_protocol::encode(&builder.build()).unwrap()
    }

    #[test]
    fn collaborator_can_sync() {
        let env = TestEnv::new();
        let handler = handler(&env, ServerConfig::default());
        let outcome = handler
            .handle_sync(env.workspace_id, COLLABORATOR, &body(SnapshotBuilder::new().pin(0, "p")))
            .unwrap();
        assert_eq!(outcome.response.pinboard_notes.len(), 1);
        assert_eq!(outcome.stats.version, 1);
    }

    #[test]
    fn viewer_is_rejected_before_decoding() {
        let env = TestEnv::new();
        let handler = handler(&env, ServerConfig::default());
        let err = handler
            .handle_sync(env.workspace_id, VIEWER, b"not json")
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn oversized_body_is_rejected() {
        let env = TestEnv::new();
        let handler = handler(&env, ServerConfig::default().with_max_body_bytes(4));
        let err = handler
            .handle_sync(env.workspace_id, OWNER, b"{\"notes\":[]}")
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidRequest(_)));
    }

    #[test]
    fn read_paths_check_workspace_then_membership() {
        let env = TestEnv::new();
        let handler = handler(&env, ServerConfig::default());

        assert!(matches!(
            handler.handle_version(999, OWNER),
            Err(ServerError::WorkspaceNotFound(999))
        ));
        assert_eq!(
            handler.handle_export(env.workspace_id, OUTSIDER).unwrap_err().status_code(),
            403
        );
        let version = handler.handle_version(env.workspace_id, VIEWER).unwrap();
        assert_eq!(version.version, 0);
    }

    #[test]
    fn changes_use_default_page() {
        let env = TestEnv::new();
        let handler = handler(&env, ServerConfig::default().with_default_changes_page(2));
        handler
            .handle_sync(
                env.workspace_id,
                OWNER,
                &body(SnapshotBuilder::new().pin(0, "a").pin(0, "b").pin(0, "c")),
            )
            .unwrap();

        let page = handler
            .handle_changes(env.workspace_id, VIEWER, 0, None)
            .unwrap();
        assert_eq!(page.changes.len(), 2);
        assert!(page.has_more);

        let page = handler
            .handle_changes(env.workspace_id, VIEWER, 0, Some(10))
            .unwrap();
        assert_eq!(page.changes.len(), 3);
        assert!(!page.has_more);
    }
}
