//! Snapshot reconciliation, one module per kind.
//!
//! Every kind follows the same contract: each submitted record is either
//! matched to an existing row of the workspace and overwritten, or inserted
//! as a new row. Rows the snapshot did not mention are deleted afterwards.
//! The kinds differ only in how they resolve references to other rows and
//! in when their stale rows may go.

pub(crate) mod connection;
pub(crate) mod folder;
pub(crate) mod image;
pub(crate) mod note;
pub(crate) mod pinboard;
pub(crate) mod schedule;

use crate::context::PassContext;
use crate::error::SyncResult;
use crate::idmap::CrossReferenceMap;
use notesync_core::{advance_timestamp, ChangeOperation, EntityTable};
use notesync_sync_protocol::WireRecord;
use std::collections::BTreeSet;
use tracing::debug;

/// What reconciling one kind produced.
#[derive(Debug)]
pub(crate) struct Reconciled {
    /// Identifiers of every row that the snapshot kept.
    pub(crate) processed: BTreeSet<i64>,
    /// Submitted to resolved identifiers.
    pub(crate) ids: CrossReferenceMap,
    /// Resolved identifier per submitted record, `None` when skipped.
    pub(crate) assigned: Vec<Option<i64>>,
}

impl Reconciled {
    pub(crate) fn new(kind: notesync_core::EntityKind) -> Self {
        Self {
            processed: BTreeSet::new(),
            ids: CrossReferenceMap::new(kind),
            assigned: Vec::new(),
        }
    }

    pub(crate) fn keep(&mut self, submitted: i64, resolved: i64) {
        self.processed.insert(resolved);
        self.ids.record(submitted, resolved);
        self.assigned.push(Some(resolved));
    }

    pub(crate) fn skip(&mut self) {
        self.assigned.push(None);
    }
}

/// Reconciles every record of one kind. `draft` turns a record into a row
/// with resolved references, or returns `None` to skip it.
pub(crate) fn reconcile_all<R, T, F>(
    ctx: &mut PassContext<'_>,
    records: &[R],
    mut draft: F,
) -> SyncResult<Reconciled>
where
    R: WireRecord,
    T: EntityTable,
    F: FnMut(&mut PassContext<'_>, &R) -> SyncResult<Option<T>>,
{
    let mut outcome = Reconciled::new(T::KIND);
    for record in records {
        let submitted = record.client_id();
        match draft(ctx, record)? {
            Some(row) => {
                let id = upsert(ctx, submitted, row)?;
                outcome.keep(submitted, id);
            }
            None => {
                ctx.stats.skip(T::KIND);
                outcome.skip();
            }
        }
    }
    Ok(outcome)
}

/// Matches a row by its submitted identifier and writes it.
pub(crate) fn upsert<T: EntityTable>(
    ctx: &mut PassContext<'_>,
    submitted: i64,
    row: T,
) -> SyncResult<i64> {
    let existing = if submitted != 0 {
        T::find(ctx.conn, submitted, ctx.workspace_id)?
    } else {
        None
    };
    write_row(ctx, row, existing)
}

/// Overwrites `existing` with `row`, or inserts `row` if nothing matched.
pub(crate) fn write_row<T: EntityTable>(
    ctx: &mut PassContext<'_>,
    mut row: T,
    existing: Option<T>,
) -> SyncResult<i64> {
    row.set_workspace_id(ctx.workspace_id);
    match existing {
        Some(current) => {
            row.set_id(current.id());
            row.set_timestamps(current.created_at(), advance_timestamp(current.updated_at()));
            T::update(ctx.conn, &row)?;
            ctx.changed(T::KIND, row.id(), ChangeOperation::Update)?;
            Ok(row.id())
        }
        None => {
            row.set_id(0);
            row.set_timestamps(ctx.now, ctx.now);
            let id = T::insert(ctx.conn, &row)?;
            ctx.changed(T::KIND, id, ChangeOperation::Create)?;
            Ok(id)
        }
    }
}

/// Returns the workspace's rows of kind `T` that the snapshot did not keep.
pub(crate) fn stale_ids<T: EntityTable>(
    ctx: &PassContext<'_>,
    processed: &BTreeSet<i64>,
) -> SyncResult<Vec<i64>> {
    Ok(T::ids(ctx.conn, ctx.workspace_id)?
        .into_iter()
        .filter(|id| !processed.contains(id))
        .collect())
}

/// Deletes rows of kind `T`.
pub(crate) fn delete_rows<T: EntityTable>(
    ctx: &mut PassContext<'_>,
    ids: &[i64],
) -> SyncResult<()> {
    for &id in ids {
        if T::delete(ctx.conn, id, ctx.workspace_id)? {
            ctx.changed(T::KIND, id, ChangeOperation::Delete)?;
        }
    }
    if !ids.is_empty() {
        debug!(kind = %T::KIND, count = ids.len(), "deleted stale rows");
    }
    Ok(())
}

/// Deletes every row of kind `T` the snapshot did not keep.
pub(crate) fn sweep<T: EntityTable>(
    ctx: &mut PassContext<'_>,
    processed: &BTreeSet<i64>,
) -> SyncResult<()> {
    let stale = stale_ids::<T>(ctx, processed)?;
    delete_rows::<T>(ctx, &stale)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::context::PassContext;
    use notesync_blob::{BlobLedger, BlobStore, InMemoryBlobBackend};
    use notesync_core::{store, Database, Session};
    use std::sync::Arc;
    use tempfile::TempDir;

    pub(crate) struct Harness {
        pub(crate) session: Session,
        pub(crate) blobs: BlobStore,
        pub(crate) backend: Arc<InMemoryBlobBackend>,
        pub(crate) workspace_id: i64,
        _dir: TempDir,
    }

    pub(crate) fn harness() -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("engine.db")).unwrap();
        let mut session = db.session().unwrap();
        let workspace = session
            .write(|tx| store::workspace::create(tx, "engine", 1))
            .unwrap();
        let backend = Arc::new(InMemoryBlobBackend::new());
        Harness {
            session,
            blobs: BlobStore::new(backend.clone()),
            backend,
            workspace_id: workspace.id,
            _dir: dir,
        }
    }

    pub(crate) fn context<'a>(
        conn: &'a rusqlite::Connection,
        workspace_id: i64,
        blobs: &'a BlobStore,
        ledger: &'a mut BlobLedger,
    ) -> PassContext<'a> {
        PassContext::new(conn, workspace_id, 1, 1, chrono::Utc::now(), blobs, ledger, true)
    }
}
