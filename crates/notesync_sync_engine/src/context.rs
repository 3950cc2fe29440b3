//! State shared by the reconcilers of one pass.

use crate::error::SyncResult;
use crate::stats::PassStats;
use chrono::{DateTime, Utc};
use notesync_blob::{BlobKey, BlobLedger, BlobStore};
use notesync_core::store::changelog;
use notesync_core::{ChangeOperation, EntityKind};
use std::collections::BTreeSet;
use tracing::warn;

/// Everything a reconciler needs while the pass transaction is open.
pub(crate) struct PassContext<'a> {
    pub(crate) conn: &'a rusqlite::Connection,
    pub(crate) workspace_id: i64,
    pub(crate) user_id: i64,
    pub(crate) now: DateTime<Utc>,
    pub(crate) blobs: &'a BlobStore,
    pub(crate) ledger: &'a mut BlobLedger,
    pub(crate) stats: PassStats,
    record_changes: bool,
    written: BTreeSet<(EntityKind, i64)>,
}

impl<'a> PassContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        conn: &'a rusqlite::Connection,
        workspace_id: i64,
        user_id: i64,
        version: i64,
        now: DateTime<Utc>,
        blobs: &'a BlobStore,
        ledger: &'a mut BlobLedger,
        record_changes: bool,
    ) -> Self {
        Self {
            conn,
            workspace_id,
            user_id,
            now,
            blobs,
            ledger,
            stats: PassStats::new(version),
            record_changes,
            written: BTreeSet::new(),
        }
    }

    /// Counts a row change and appends it to the change log.
    pub(crate) fn changed(
        &mut self,
        kind: EntityKind,
        entity_id: i64,
        operation: ChangeOperation,
    ) -> SyncResult<()> {
        self.stats.count(kind, operation);
        if operation != ChangeOperation::Delete {
            self.written.insert((kind, entity_id));
        }
        if self.record_changes {
            changelog::record(
                self.conn,
                self.workspace_id,
                self.stats.version,
                kind,
                entity_id,
                operation,
                self.user_id,
            )?;
        }
        Ok(())
    }

    /// Returns true if this pass already created or updated the row.
    pub(crate) fn written(&self, kind: EntityKind, entity_id: i64) -> bool {
        self.written.contains(&(kind, entity_id))
    }

    /// Queues a stored path for deletion after commit, provided it lies in
    /// this workspace's image directory.
    pub(crate) fn release_path(&mut self, path: &str) {
        match BlobKey::parse(path) {
            Ok(key) if key.is_within_workspace(self.workspace_id) => {
                self.ledger.defer_delete(key);
            }
            _ => warn!(
                workspace_id = self.workspace_id,
                path, "not deleting image file outside the workspace upload directory"
            ),
        }
    }

    pub(crate) fn finish(self) -> PassStats {
        self.stats
    }
}
