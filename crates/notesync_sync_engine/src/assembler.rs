//! Builds the snapshot returned to clients.

use crate::error::SyncResult;
use crate::reconcile::{connection, folder, note, pinboard, schedule};
use notesync_blob::{BlobKey, BlobLedger, BlobStore};
use notesync_core::{
    Connection, EntityTable, Folder, Note, NoteImage, PinboardNote, ScheduleEntry, Workspace,
};
use notesync_sync_protocol::{NoteImageRecord, SyncResponse};
use tracing::warn;

/// Reads every collection of the workspace into a response.
///
/// When a pass ledger is given, every image file the response references is
/// marked live so post-commit cleanup keeps it.
pub(crate) fn assemble(
    conn: &rusqlite::Connection,
    workspace: &Workspace,
    blobs: &BlobStore,
    mut ledger: Option<&mut BlobLedger>,
) -> SyncResult<SyncResponse> {
    let ws = workspace.id;
    let images = NoteImage::list(conn, ws)?
        .iter()
        .map(|img| image_record(img, blobs, ledger.as_deref_mut()))
        .collect();

    Ok(SyncResponse {
        folders: Folder::list(conn, ws)?.iter().map(folder::to_record).collect(),
        notes: Note::list(conn, ws)?.iter().map(note::to_record).collect(),
        schedule_entries: ScheduleEntry::list(conn, ws)?
            .iter()
            .map(schedule::to_record)
            .collect(),
        pinboard_notes: PinboardNote::list(conn, ws)?
            .iter()
            .map(pinboard::to_record)
            .collect(),
        connections: Connection::list(conn, ws)?
            .iter()
            .map(connection::to_record)
            .collect(),
        images,
        last_modified: workspace.updated_at,
        created_at: workspace.created_at,
        workspace_id: ws,
        owner_user_id: workspace.owner_user_id,
    })
}

fn image_record(
    img: &NoteImage,
    blobs: &BlobStore,
    ledger: Option<&mut BlobLedger>,
) -> NoteImageRecord {
    let image_data = img
        .image_path
        .as_deref()
        .map(|path| read_payload(img, path, blobs, ledger));
    NoteImageRecord {
        id: Some(img.id),
        workspace_id: Some(img.workspace_id),
        note_id: img.note_id,
        file_name: img.file_name.clone(),
        image_data,
        created_at: Some(img.created_at),
        updated_at: Some(img.updated_at),
    }
}

/// Reads one image file as base64, or an empty string if it is unreadable.
fn read_payload(
    img: &NoteImage,
    path: &str,
    blobs: &BlobStore,
    ledger: Option<&mut BlobLedger>,
) -> String {
    let key = match BlobKey::parse(path) {
        Ok(key) => key,
        Err(err) => {
            warn!(image_id = img.id, path, error = %err, "stored image path is invalid");
            return String::new();
        }
    };
    if let Some(ledger) = ledger {
        ledger.mark_live(&key);
    }
    match blobs.read_encoded(&key) {
        Ok(data) => data,
        Err(err) => {
            warn!(image_id = img.id, key = %key, error = %err, "image file unreadable");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::test_support::harness;
    use chrono::Utc;
    use notesync_core::store;

    #[test]
    fn missing_files_yield_empty_payloads() {
        let mut h = harness();
        let ws = h.workspace_id;
        let tx = h.session.begin_write().unwrap();
        let now = Utc::now();
        let note_id = Note::insert(
            &tx,
            &Note {
                id: 0,
                workspace_id: ws,
                title: "n".into(),
                content: None,
                folder_id: None,
                images_json: "[]".into(),
                metadata_json: "{}".into(),
                content_json: None,
                created_at: now,
                updated_at: now,
            },
        )
        .unwrap();
        let present = BlobKey::image(ws, "here.png").unwrap();
        h.blobs.write(&present, &[9, 9]).unwrap();
        for (name, path) in [
            ("here.png", Some(present.to_string())),
            ("gone.png", Some(format!("workspace_{ws}/images/gone.png"))),
            ("none.png", None),
        ] {
            NoteImage::insert(
                &tx,
                &NoteImage {
                    id: 0,
                    workspace_id: ws,
                    note_id,
                    file_name: name.into(),
                    image_path: path,
                    created_at: now,
                    updated_at: now,
                },
            )
            .unwrap();
        }

        let workspace = store::workspace::require(&tx, ws).unwrap();
        let mut ledger = BlobLedger::new();
        let response = assemble(&tx, &workspace, &h.blobs, Some(&mut ledger)).unwrap();

        let data: Vec<Option<&str>> = response
            .images
            .iter()
            .map(|img| img.image_data.as_deref())
            .collect();
        assert_eq!(data, vec![Some("CQk="), Some(""), None]);
        assert_eq!(response.notes.len(), 1);
        assert_eq!(response.workspace_id, ws);
        assert_eq!(response.owner_user_id, 1);
    }
}
