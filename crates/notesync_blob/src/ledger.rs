//! Per-pass bookkeeping of blob side effects.

use crate::error::BlobError;
use crate::path::BlobKey;
use crate::store::BlobStore;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Records what a reconciliation pass did to the blob store.
///
/// Blob writes cannot take part in the database transaction, so the ledger
/// remembers them until the outcome is known:
///
/// - on commit, [`BlobLedger::commit`] deletes the blobs queued with
///   [`BlobLedger::defer_delete`] unless a surviving row still references them
/// - on rollback, [`BlobLedger::rollback`] deletes the blobs the pass created
#[derive(Debug, Default)]
pub struct BlobLedger {
    created: Vec<BlobKey>,
    pending_deletes: BTreeSet<BlobKey>,
    live: BTreeSet<BlobKey>,
    replaced: usize,
}

/// Outcome of a best-effort cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Blobs removed.
    pub deleted: usize,
    /// Blobs that were already gone.
    pub missing: usize,
    /// Blobs kept because a row still references them.
    pub retained: usize,
    /// Blobs whose deletion failed.
    pub failed: usize,
}

impl BlobLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful write. `created` tells whether the key is new.
    pub fn record_write(&mut self, key: &BlobKey, created: bool) {
        if created {
            self.created.push(key.clone());
        } else {
            self.replaced += 1;
        }
        self.live.insert(key.clone());
    }

    /// Queues a blob for deletion once the pass has committed.
    pub fn defer_delete(&mut self, key: BlobKey) {
        self.pending_deletes.insert(key);
    }

    /// Marks a blob as referenced by a row that survives the pass.
    pub fn mark_live(&mut self, key: &BlobKey) {
        self.live.insert(key.clone());
    }

    /// Returns the blobs queued for deletion.
    pub fn pending_deletes(&self) -> impl Iterator<Item = &BlobKey> {
        self.pending_deletes.iter()
    }

    /// Returns the blobs created by the pass.
    pub fn created(&self) -> &[BlobKey] {
        &self.created
    }

    /// Returns how many writes landed on a key that already existed.
    pub fn replaced(&self) -> usize {
        self.replaced
    }

    /// Deletes the queued blobs after a successful commit.
    pub fn commit(self, store: &BlobStore) -> CleanupReport {
        let mut report = CleanupReport::default();
        for key in &self.pending_deletes {
            if self.live.contains(key) {
                report.retained += 1;
                continue;
            }
            Self::remove(store, key, &mut report);
        }
        debug!(
            deleted = report.deleted,
            missing = report.missing,
            retained = report.retained,
            failed = report.failed,
            "post-commit blob cleanup finished"
        );
        report
    }

    /// Deletes the blobs a rolled back pass created.
    ///
    /// Writers must only target fresh keys; a blob that existed before the
    /// pass and was written over cannot be restored.
    pub fn rollback(self, store: &BlobStore) -> CleanupReport {
        let mut report = CleanupReport::default();
        for key in &self.created {
            Self::remove(store, key, &mut report);
        }
        if self.replaced > 0 {
            warn!(
                replaced = self.replaced,
                "rolled back pass had replaced existing blobs"
            );
        }
        report
    }

    fn remove(store: &BlobStore, key: &BlobKey, report: &mut CleanupReport) {
        match store.delete(key) {
            Ok(()) => report.deleted += 1,
            Err(err) if err.is_not_found() => report.missing += 1,
            Err(err) => {
                report.failed += 1;
                log_failure(key, &err);
            }
        }
    }
}

fn log_failure(key: &BlobKey, err: &BlobError) {
    warn!(key = %key, error = %err, "failed to delete blob");
}
