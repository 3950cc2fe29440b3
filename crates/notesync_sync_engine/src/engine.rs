//! The sync engine.

use crate::assembler::assemble;
use crate::config::EngineConfig;
use crate::context::PassContext;
use crate::error::{SyncError, SyncResult};
use crate::reconcile::{connection, folder, image, note, pinboard, schedule};
use crate::stats::PassStats;
use chrono::Utc;
use notesync_blob::{BlobLedger, BlobStore};
use notesync_core::store::{changelog, workspace};
use notesync_core::{CoreError, Session};
use notesync_sync_protocol::{
    ChangeRecord, ChangesResponse, SyncRequest, SyncResponse, VersionResponse,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a successful sync pass.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Authoritative snapshot after the pass.
    pub response: SyncResponse,
    /// What the pass changed.
    pub stats: PassStats,
}

/// Reconciles client snapshots against stored workspaces.
///
/// The engine holds no per-request state. Each call takes the caller's
/// [`Session`], and every pass builds its identifier maps and blob ledger
/// from scratch. Callers are expected to serialize passes on the same
/// workspace; passes on different workspaces are independent apart from the
/// database write lock.
#[derive(Debug, Clone)]
pub struct SyncEngine {
    blobs: Arc<BlobStore>,
    config: EngineConfig,
}

impl SyncEngine {
    /// Creates an engine with the default configuration.
    pub fn new(blobs: Arc<BlobStore>) -> Self {
        Self::with_config(blobs, EngineConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    pub fn with_config(blobs: Arc<BlobStore>, config: EngineConfig) -> Self {
        Self { blobs, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the blob store.
    pub fn blobs(&self) -> &Arc<BlobStore> {
        &self.blobs
    }

    /// Runs one sync pass for `user_id` against `workspace_id`.
    ///
    /// The whole pass is one write transaction. On failure nothing is
    /// committed and image files the pass created are removed again; on
    /// success files that no row references any more are deleted.
    ///
    /// Access control is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns a [`SyncError`] whose [`kind`](SyncError::kind) tells a
    /// rejected snapshot apart from a storage failure.
    pub fn sync(
        &self,
        session: &mut Session,
        workspace_id: i64,
        user_id: i64,
        request: &SyncRequest,
    ) -> SyncResult<SyncOutcome> {
        let count = request.record_count();
        if count > self.config.max_records {
            return Err(SyncError::validation(format!(
                "snapshot has {count} records, limit is {}",
                self.config.max_records
            )));
        }

        let mut ledger = BlobLedger::new();
        match self.run_pass(session, workspace_id, user_id, request, &mut ledger) {
            Ok(outcome) => {
                let report = ledger.commit(&self.blobs);
                if report.failed > 0 {
                    warn!(workspace_id, failed = report.failed, "some image files were not deleted");
                }
                info!(workspace_id, user_id, stats = %outcome.stats, "sync pass committed");
                Ok(outcome)
            }
            Err(err) => {
                let report = ledger.rollback(&self.blobs);
                warn!(
                    workspace_id,
                    user_id,
                    kind = %err.kind(),
                    error = %err,
                    removed_files = report.deleted,
                    "sync pass rolled back"
                );
                Err(err)
            }
        }
    }

    fn run_pass(
        &self,
        session: &mut Session,
        workspace_id: i64,
        user_id: i64,
        request: &SyncRequest,
        ledger: &mut BlobLedger,
    ) -> SyncResult<SyncOutcome> {
        let tx = session.begin_write()?;
        let ws = workspace::begin_pass(&tx, workspace_id).map_err(not_found(workspace_id))?;
        debug!(workspace_id, version = ws.version, records = request.record_count(), "sync pass started");

        let mut ctx = PassContext::new(
            &tx,
            workspace_id,
            user_id,
            ws.version,
            Utc::now(),
            &self.blobs,
            ledger,
            self.config.record_changes,
        );

        schedule::reconcile(&mut ctx, &request.schedule_entries)?;
        let folders = folder::reconcile(&mut ctx, &request.folders)?;
        let notes = note::reconcile(&mut ctx, &request.notes, &folders.reconciled.ids)?;
        let pins = pinboard::reconcile(&mut ctx, &request.pinboard_notes)?;
        connection::reconcile(&mut ctx, &request.connections, &pins.ids)?;
        image::reconcile(&mut ctx, &request.note_images, &notes.ids)?;
        folder::delete_deferred(&mut ctx, &folders.deferred)?;

        let response = assemble(&tx, &ws, &self.blobs, Some(&mut *ctx.ledger))?;
        let stats = ctx.finish();
        tx.commit()?;
        Ok(SyncOutcome { response, stats })
    }

    /// Returns the current snapshot without changing anything.
    pub fn export(&self, session: &mut Session, workspace_id: i64) -> SyncResult<SyncResponse> {
        session.read(|tx| {
            let ws = workspace::require(tx, workspace_id).map_err(not_found(workspace_id))?;
            assemble(tx, &ws, &self.blobs, None)
        })
    }

    /// Returns the workspace version and modification time.
    pub fn version(&self, session: &mut Session, workspace_id: i64) -> SyncResult<VersionResponse> {
        session.read(|tx| {
            let ws = workspace::require(tx, workspace_id).map_err(not_found(workspace_id))?;
            Ok(VersionResponse {
                workspace_id: ws.id,
                version: ws.version,
                last_modified: ws.updated_at,
            })
        })
    }

    /// Returns change log entries recorded after `since_version`.
    ///
    /// `limit` is capped by [`EngineConfig::max_changes_page`].
    pub fn changes(
        &self,
        session: &mut Session,
        workspace_id: i64,
        since_version: i64,
        limit: u32,
    ) -> SyncResult<ChangesResponse> {
        let limit = limit.clamp(1, self.config.max_changes_page.max(1));
        session.read(|tx| {
            let ws = workspace::require(tx, workspace_id).map_err(not_found(workspace_id))?;
            let page = changelog::since(tx, workspace_id, since_version, limit)?;
            Ok(ChangesResponse {
                workspace_id,
                version: ws.version,
                changes: page
                    .changes
                    .into_iter()
                    .map(|c| ChangeRecord {
                        id: c.id,
                        version: c.version,
                        entity_type: c.entity_kind.as_str().to_string(),
                        entity_id: c.entity_id,
                        operation: c.operation.as_str().to_string(),
                        user_id: c.user_id,
                        created_at: c.created_at,
                    })
                    .collect(),
                has_more: page.has_more,
            })
        })
    }
}

fn not_found(workspace_id: i64) -> impl Fn(CoreError) -> SyncError {
    move |err| {
        if err.is_not_found() {
            SyncError::WorkspaceNotFound { workspace_id }
        } else {
            SyncError::Database(err)
        }
    }
}
