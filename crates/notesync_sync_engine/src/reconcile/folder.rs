//! Folders.
//!
//! Folder rows are written before parents are linked, so a parent may be
//! named by the client id of a folder created in the same snapshot. Stale
//! folders are only collected here; they are deleted after notes have been
//! reconciled so that a note moving out of a removed folder is not touched
//! by the cascade first.

use super::{delete_rows, reconcile_all, stale_ids, write_row, Reconciled};
use crate::context::PassContext;
use crate::error::SyncResult;
use chrono::{DateTime, Utc};
use notesync_core::store::set_folder_parent;
use notesync_core::{EntityTable, Folder, Note};
use notesync_sync_protocol::FolderRecord;
use std::collections::BTreeSet;
use tracing::debug;

pub(crate) struct FolderOutcome {
    pub(crate) reconciled: Reconciled,
    pub(crate) deferred: Vec<i64>,
}

pub(crate) fn reconcile(
    ctx: &mut PassContext<'_>,
    records: &[FolderRecord],
) -> SyncResult<FolderOutcome> {
    let reconciled = reconcile_all(ctx, records, |ctx, r| Ok(Some(draft(r, ctx.now))))?;
    link_parents(ctx, records, &reconciled)?;
    let deferred = stale_ids::<Folder>(ctx, &reconciled.processed)?;
    Ok(FolderOutcome {
        reconciled,
        deferred,
    })
}

/// Deletes the folders collected by [`reconcile`].
///
/// Notes and surviving folders that still point at one of them are cleared
/// first, so the `SET NULL` cascade finds nothing left to change. A row this
/// pass has not written yet is recorded as updated.
pub(crate) fn delete_deferred(ctx: &mut PassContext<'_>, deferred: &[i64]) -> SyncResult<()> {
    if deferred.is_empty() {
        return Ok(());
    }
    let doomed: BTreeSet<i64> = deferred.iter().copied().collect();
    let points_into = |id: Option<i64>| id.is_some_and(|id| doomed.contains(&id));

    for note in Note::list(ctx.conn, ctx.workspace_id)? {
        if points_into(note.folder_id) {
            let cleared = Note {
                folder_id: None,
                ..note.clone()
            };
            clear_reference(ctx, note, cleared)?;
        }
    }
    for folder in Folder::list(ctx.conn, ctx.workspace_id)? {
        if !doomed.contains(&folder.id) && points_into(folder.parent_id) {
            let cleared = Folder {
                parent_id: None,
                ..folder.clone()
            };
            clear_reference(ctx, folder, cleared)?;
        }
    }
    delete_rows::<Folder>(ctx, deferred)
}

fn clear_reference<T: EntityTable>(
    ctx: &mut PassContext<'_>,
    current: T,
    cleared: T,
) -> SyncResult<()> {
    if ctx.written(T::KIND, current.id()) {
        // Already logged as an update by this pass.
        T::update(ctx.conn, &cleared)?;
    } else {
        write_row(ctx, cleared, Some(current))?;
    }
    Ok(())
}

fn link_parents(
    ctx: &mut PassContext<'_>,
    records: &[FolderRecord],
    reconciled: &Reconciled,
) -> SyncResult<()> {
    for (record, assigned) in records.iter().zip(&reconciled.assigned) {
        let Some(id) = *assigned else { continue };
        let parent = match record.parent_id {
            Some(raw) if raw > 0 => resolve(ctx, reconciled, raw)?,
            _ => None,
        };
        let parent = match parent {
            Some(p) if p == id => {
                debug!(folder_id = id, "dropping self-referencing parent");
                None
            }
            other => other,
        };
        if parent.is_some() {
            set_folder_parent(ctx.conn, id, ctx.workspace_id, parent)?;
        }
    }
    Ok(())
}

fn resolve(ctx: &PassContext<'_>, reconciled: &Reconciled, raw: i64) -> SyncResult<Option<i64>> {
    if let Some(id) = reconciled.ids.resolve(raw) {
        return Ok(Some(id));
    }
    if Folder::exists(ctx.conn, raw, ctx.workspace_id)? {
        return Ok(Some(raw));
    }
    debug!(parent_id = raw, "dropping unknown parent folder");
    Ok(None)
}

fn draft(r: &FolderRecord, now: DateTime<Utc>) -> Folder {
    Folder {
        id: 0,
        workspace_id: 0,
        name: r.name.clone(),
        parent_id: None,
        color: r.color,
        is_expanded: r.is_expanded,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn to_record(row: &Folder) -> FolderRecord {
    FolderRecord {
        id: Some(row.id),
        workspace_id: Some(row.workspace_id),
        name: row.name.clone(),
        parent_id: row.parent_id,
        color: row.color,
        is_expanded: row.is_expanded,
        created_at: Some(row.created_at),
        updated_at: Some(row.updated_at),
    }
}
