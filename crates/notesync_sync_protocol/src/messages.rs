//! Protocol messages.

use crate::records::{
    ConnectionRecord, FolderRecord, NoteImageRecord, NoteRecord, PinboardNoteRecord,
    ScheduleEntryRecord,
};
use crate::serde_util::{null_as_empty, rfc3339_nanos, string_id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A client's full snapshot of one workspace.
///
/// Any collection may be missing or `null`; it is then treated as empty,
/// which deletes every server row of that kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncRequest {
    /// Notes.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: Vec<NoteRecord>,
    /// Folders.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub folders: Vec<FolderRecord>,
    /// Schedule entries.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub schedule_entries: Vec<ScheduleEntryRecord>,
    /// Pinboard notes.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pinboard_notes: Vec<PinboardNoteRecord>,
    /// Connections.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub connections: Vec<ConnectionRecord>,
    /// Note images.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub note_images: Vec<NoteImageRecord>,
}

impl SyncRequest {
    /// Returns the total number of submitted records.
    pub fn record_count(&self) -> usize {
        self.notes.len()
            + self.folders.len()
            + self.schedule_entries.len()
            + self.pinboard_notes.len()
            + self.connections.len()
            + self.note_images.len()
    }
}

/// The authoritative post-sync snapshot of a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Folders.
    pub folders: Vec<FolderRecord>,
    /// Notes.
    pub notes: Vec<NoteRecord>,
    /// Schedule entries.
    pub schedule_entries: Vec<ScheduleEntryRecord>,
    /// Pinboard notes.
    pub pinboard_notes: Vec<PinboardNoteRecord>,
    /// Connections.
    pub connections: Vec<ConnectionRecord>,
    /// Note images with inline bytes.
    pub images: Vec<NoteImageRecord>,
    /// Workspace last-modified time.
    #[serde(rename = "lastModified", with = "rfc3339_nanos")]
    pub last_modified: DateTime<Utc>,
    /// Workspace creation time.
    #[serde(rename = "createdAt", with = "rfc3339_nanos")]
    pub created_at: DateTime<Utc>,
    /// Workspace identifier.
    #[serde(rename = "databaseId", with = "string_id")]
    pub workspace_id: i64,
    /// Workspace owner.
    #[serde(rename = "userId", with = "string_id")]
    pub owner_user_id: i64,
}

/// The current version of a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionResponse {
    /// Workspace identifier.
    #[serde(rename = "databaseId", with = "string_id")]
    pub workspace_id: i64,
    /// Number of completed sync passes.
    pub version: i64,
    /// Workspace last-modified time.
    #[serde(rename = "lastModified", with = "rfc3339_nanos")]
    pub last_modified: DateTime<Utc>,
}

/// One change log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Entry identifier.
    pub id: i64,
    /// Workspace version of the pass that made the change.
    pub version: i64,
    /// Kind of the changed row, e.g. `note`.
    pub entity_type: String,
    /// Identifier of the changed row.
    pub entity_id: i64,
    /// `create`, `update` or `delete`.
    pub operation: String,
    /// User whose pass made the change.
    pub user_id: i64,
    /// When the change was recorded.
    #[serde(with = "rfc3339_nanos")]
    pub created_at: DateTime<Utc>,
}

/// A page of the change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangesResponse {
    /// Workspace identifier.
    #[serde(rename = "databaseId", with = "string_id")]
    pub workspace_id: i64,
    /// Current workspace version.
    pub version: i64,
    /// Changes after the requested version.
    pub changes: Vec<ChangeRecord>,
    /// True if more changes follow this page.
    pub has_more: bool,
}

/// Body returned with every non-200 status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Error kind, e.g. `validation`.
    pub kind: String,
}

impl ErrorBody {
    /// Creates an error body.
    pub fn new(kind: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: kind.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn request_accepts_missing_and_null_collections() {
        let req: SyncRequest =
            serde_json::from_str(r#"{"notes":null,"folders":[{"id":3,"name":"a"}]}"#).unwrap();
        assert!(req.notes.is_empty());
        assert_eq!(req.folders.len(), 1);
        assert!(req.note_images.is_empty());
        assert_eq!(req.record_count(), 1);
    }

    #[test]
    fn response_uses_client_keys() {
        let at = Utc.timestamp_opt(1_700_000_000, 5).unwrap();
        let resp = SyncResponse {
            folders: vec![],
            notes: vec![],
            schedule_entries: vec![],
            pinboard_notes: vec![],
            connections: vec![],
            images: vec![],
            last_modified: at,
            created_at: at,
            workspace_id: 12,
            owner_user_id: 3,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["databaseId"], "12");
        assert_eq!(json["userId"], "3");
        assert_eq!(json["lastModified"], "2023-11-14T22:13:20.000000005Z");
        assert!(json["images"].is_array());
        assert!(json.get("note_images").is_none());

        let back: SyncResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, resp);
    }

    #[test]
    fn error_body_shape() {
        let json = serde_json::to_string(&ErrorBody::new("forbidden", "viewer")).unwrap();
        assert_eq!(json, r#"{"error":"viewer","kind":"forbidden"}"#);
    }
}
