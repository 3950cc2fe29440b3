//! Note images.
//!
//! Images are matched by `(file_name, note)` first, because clients often
//! resubmit an image under a stale identifier after its note was remapped.
//! The identifier is only consulted when the record has no usable natural
//! key.
//!
//! Bytes are written to the blob store while the transaction is still open.
//! Every write and every file that should disappear is recorded in the pass
//! ledger, which settles the blob store once the transaction outcome is
//! known.

use super::{delete_rows, stale_ids, write_row, Reconciled};
use crate::context::PassContext;
use crate::error::{SyncError, SyncResult};
use crate::idmap::CrossReferenceMap;
use notesync_blob::BlobKey;
use notesync_core::store::image as image_table;
use notesync_core::{EntityKind, EntityTable, Note, NoteImage};
use notesync_sync_protocol::{NoteImageRecord, WireRecord};
use tracing::warn;

pub(crate) fn reconcile(
    ctx: &mut PassContext<'_>,
    records: &[NoteImageRecord],
    notes: &CrossReferenceMap,
) -> SyncResult<Reconciled> {
    let mut outcome = Reconciled::new(EntityKind::NoteImage);
    for record in records {
        let submitted = record.client_id();
        let note_id = resolve_note(ctx, notes, record)?;
        let existing = find_existing(ctx, record, submitted, note_id)?;
        let image_path = match record.payload() {
            Some(encoded) => Some(store_payload(ctx, record, encoded, existing.as_ref())?),
            None => match &existing {
                Some(current) => current.image_path.clone(),
                None => {
                    return Err(SyncError::validation(format!(
                        "image {:?} of note {} has no data and no stored file",
                        record.file_name, record.note_id
                    )))
                }
            },
        };
        let row = NoteImage {
            id: 0,
            workspace_id: ctx.workspace_id,
            note_id,
            file_name: record.file_name.clone(),
            image_path,
            created_at: ctx.now,
            updated_at: ctx.now,
        };
        let id = write_row(ctx, row, existing)?;
        outcome.keep(submitted, id);
    }

    let stale = stale_ids::<NoteImage>(ctx, &outcome.processed)?;
    for id in &stale {
        if let Some(img) = NoteImage::find(ctx.conn, *id, ctx.workspace_id)? {
            if let Some(path) = img.image_path.as_deref() {
                ctx.release_path(path);
            }
        }
    }
    delete_rows::<NoteImage>(ctx, &stale)?;
    Ok(outcome)
}

fn resolve_note(
    ctx: &PassContext<'_>,
    notes: &CrossReferenceMap,
    record: &NoteImageRecord,
) -> SyncResult<i64> {
    let note_id = match notes.resolve(record.note_id) {
        Some(id) => id,
        None => {
            warn!(
                workspace_id = ctx.workspace_id,
                note_id = record.note_id,
                file_name = %record.file_name,
                "image references a note missing from the snapshot"
            );
            record.note_id
        }
    };
    if !Note::exists(ctx.conn, note_id, ctx.workspace_id)? {
        return Err(SyncError::DanglingReference {
            kind: EntityKind::NoteImage,
            id: record.client_id(),
            target: EntityKind::Note,
            target_id: note_id,
        });
    }
    Ok(note_id)
}

fn find_existing(
    ctx: &PassContext<'_>,
    record: &NoteImageRecord,
    submitted: i64,
    note_id: i64,
) -> SyncResult<Option<NoteImage>> {
    if !record.file_name.is_empty() && note_id > 0 {
        return Ok(image_table::find_by_natural_key(
            ctx.conn,
            ctx.workspace_id,
            note_id,
            &record.file_name,
        )?);
    }
    if submitted != 0 {
        return Ok(NoteImage::find(ctx.conn, submitted, ctx.workspace_id)?);
    }
    Ok(None)
}

/// Decodes and writes an inline payload, returning the stored path.
fn store_payload(
    ctx: &mut PassContext<'_>,
    record: &NoteImageRecord,
    encoded: &str,
    existing: Option<&NoteImage>,
) -> SyncResult<String> {
    let bytes = ctx
        .blobs
        .decode_payload(encoded)
        .map_err(|e| SyncError::invalid_image(&record.file_name, e))?;
    let key = allocate_key(ctx, record, existing)?;
    let created = ctx.blobs.write(&key, &bytes)?;
    ctx.ledger.record_write(&key, created);

    if let Some(old) = existing.and_then(|img| img.image_path.as_deref()) {
        if old != key.as_str() {
            ctx.release_path(old);
        }
    }
    Ok(key.to_string())
}

fn allocate_key(
    ctx: &PassContext<'_>,
    record: &NoteImageRecord,
    existing: Option<&NoteImage>,
) -> SyncResult<BlobKey> {
    let allocate = |unique| {
        ctx.blobs
            .allocate_image_key(ctx.workspace_id, &record.file_name, unique)
            .map_err(|e| SyncError::invalid_image(&record.file_name, e))
    };
    if record.client_id() == 0 {
        return allocate(true);
    }
    // Committed bytes are never written over: a rolled back pass must leave
    // every stored file as it was.
    let key = allocate(false)?;
    let owner = existing.map_or(0, |img| img.id);
    if ctx.blobs.exists(&key)?
        || image_table::path_in_use(ctx.conn, ctx.workspace_id, key.as_str(), owner)?
    {
        return allocate(true);
    }
    Ok(key)
}
