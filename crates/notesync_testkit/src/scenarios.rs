//! Snapshot builders.
//!
//! Clients work from the last response they received. [`resubmit`] turns a
//! response back into the request such a client would send next.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use notesync_sync_protocol::{
    ConnectionRecord, FolderRecord, NoteImageRecord, NoteRecord, PinboardNoteRecord,
    ScheduleEntryRecord, SyncRequest, SyncResponse,
};

/// Builds a [`SyncRequest`] record by record.
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    request: SyncRequest,
}

impl SnapshotBuilder {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a folder.
    pub fn folder(mut self, id: i64, name: &str, parent_id: Option<i64>) -> Self {
        self.request.folders.push(FolderRecord {
            id: Some(id),
            name: name.into(),
            parent_id,
            color: 0xFF00_88CC,
            ..Default::default()
        });
        self
    }

    /// Adds a note.
    pub fn note(mut self, id: i64, title: &str, folder_id: Option<i64>) -> Self {
        self.request.notes.push(NoteRecord {
            id: Some(id),
            title: title.into(),
            content: Some(format!("{title} body")),
            folder_id,
            ..Default::default()
        });
        self
    }

    /// Adds a schedule entry.
    pub fn schedule(mut self, id: i64, date: &str, time: &str) -> Self {
        self.request.schedule_entries.push(ScheduleEntryRecord {
            id: Some(id),
            date: date.into(),
            time: time.into(),
            tags_json: Some("[\"work\"]".into()),
            ..Default::default()
        });
        self
    }

    /// Adds a pinboard note.
    pub fn pin(mut self, id: i64, title: &str) -> Self {
        self.request.pinboard_notes.push(PinboardNoteRecord {
            id: Some(id),
            title: title.into(),
            content: String::new(),
            position_x: 10.0,
            position_y: 20.0,
            width: 200.0,
            height: 150.0,
            ..Default::default()
        });
        self
    }

    /// Adds a connection between two pinboard notes.
    pub fn connection(mut self, id: i64, from: i64, to: i64) -> Self {
        self.request.connections.push(ConnectionRecord {
            id: Some(id),
            from_note_id: from,
            to_note_id: to,
            name: format!("{from}->{to}"),
            ..Default::default()
        });
        self
    }

    /// Adds an image with inline bytes.
    pub fn image(mut self, id: i64, note_id: i64, file_name: &str, bytes: &[u8]) -> Self {
        self.request.note_images.push(NoteImageRecord {
            id: Some(id),
            note_id,
            file_name: file_name.into(),
            image_data: Some(STANDARD.encode(bytes)),
            ..Default::default()
        });
        self
    }

    /// Adds an image record without bytes.
    pub fn image_ref(mut self, id: i64, note_id: i64, file_name: &str) -> Self {
        self.request.note_images.push(NoteImageRecord {
            id: Some(id),
            note_id,
            file_name: file_name.into(),
            ..Default::default()
        });
        self
    }

    /// Adds an image with a raw, possibly invalid, payload.
    pub fn image_raw(mut self, id: i64, note_id: i64, file_name: &str, payload: &str) -> Self {
        self.request.note_images.push(NoteImageRecord {
            id: Some(id),
            note_id,
            file_name: file_name.into(),
            image_data: Some(payload.into()),
            ..Default::default()
        });
        self
    }

    /// Finishes the snapshot.
    pub fn build(self) -> SyncRequest {
        self.request
    }
}

/// Returns the request a client sends after adopting `response` unchanged.
pub fn resubmit(response: &SyncResponse) -> SyncRequest {
    SyncRequest {
        notes: response.notes.clone(),
        folders: response.folders.clone(),
        schedule_entries: response.schedule_entries.clone(),
        pinboard_notes: response.pinboard_notes.clone(),
        connections: response.connections.clone(),
        note_images: response.images.clone(),
    }
}

/// Decodes an image payload from a response.
pub fn decode_image(record: &NoteImageRecord) -> Vec<u8> {
    STANDARD
        .decode(record.image_data.as_deref().unwrap_or_default())
        .expect("Response carried invalid base64")
}
