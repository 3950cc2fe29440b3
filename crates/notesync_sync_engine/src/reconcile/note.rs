//! Notes.

use super::{delete_rows, reconcile_all, stale_ids, Reconciled};
use crate::context::PassContext;
use crate::error::SyncResult;
use crate::idmap::CrossReferenceMap;
use chrono::{DateTime, Utc};
use notesync_core::store::image;
use notesync_core::{EntityTable, Folder, Note, NoteImage};
use notesync_sync_protocol::NoteRecord;
use tracing::debug;

const EMPTY_IMAGES: &str = "[]";
const EMPTY_METADATA: &str = "{}";

pub(crate) fn reconcile(
    ctx: &mut PassContext<'_>,
    records: &[NoteRecord],
    folders: &CrossReferenceMap,
) -> SyncResult<Reconciled> {
    let outcome = reconcile_all(ctx, records, |ctx, r| {
        let folder_id = resolve_folder(ctx, folders, r.folder_id)?;
        Ok(Some(draft(r, folder_id, ctx.now)))
    })?;

    let stale = stale_ids::<Note>(ctx, &outcome.processed)?;
    release_images(ctx, &stale)?;
    delete_rows::<Note>(ctx, &stale)?;
    Ok(outcome)
}

fn resolve_folder(
    ctx: &PassContext<'_>,
    folders: &CrossReferenceMap,
    folder_id: Option<i64>,
) -> SyncResult<Option<i64>> {
    let Some(raw) = folder_id.filter(|id| *id > 0) else {
        return Ok(None);
    };
    if let Some(id) = folders.resolve(raw) {
        return Ok(Some(id));
    }
    if Folder::exists(ctx.conn, raw, ctx.workspace_id)? {
        return Ok(Some(raw));
    }
    debug!(folder_id = raw, "note references unknown folder, clearing it");
    Ok(None)
}

/// Removes the images of notes about to be deleted and queues their files.
fn release_images(ctx: &mut PassContext<'_>, note_ids: &[i64]) -> SyncResult<()> {
    let images = image::for_notes(ctx.conn, ctx.workspace_id, note_ids)?;
    for img in &images {
        if let Some(path) = img.image_path.as_deref() {
            ctx.release_path(path);
        }
    }
    let ids: Vec<i64> = images.iter().map(|img| img.id).collect();
    delete_rows::<NoteImage>(ctx, &ids)
}

fn draft(r: &NoteRecord, folder_id: Option<i64>, now: DateTime<Utc>) -> Note {
    Note {
        id: 0,
        workspace_id: 0,
        title: r.title.clone(),
        content: r.content.clone(),
        folder_id,
        images_json: r.images.clone().unwrap_or_else(|| EMPTY_IMAGES.to_string()),
        metadata_json: r
            .metadata
            .clone()
            .unwrap_or_else(|| EMPTY_METADATA.to_string()),
        content_json: r.content_json.clone(),
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn to_record(row: &Note) -> NoteRecord {
    NoteRecord {
        id: Some(row.id),
        workspace_id: Some(row.workspace_id),
        title: row.title.clone(),
        content: row.content.clone(),
        folder_id: row.folder_id,
        images: Some(row.images_json.clone()),
        metadata: Some(row.metadata_json.clone()),
        content_json: row.content_json.clone(),
        created_at: Some(row.created_at),
        updated_at: Some(row.updated_at),
    }
}
