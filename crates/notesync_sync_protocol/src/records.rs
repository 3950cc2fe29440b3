//! Per-kind wire records.
//!
//! Field names follow the JSON the notes clients already speak. Missing
//! fields take their defaults, so older clients that omit a column still
//! decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Behavior shared by every wire record.
pub trait WireRecord {
    /// The submitted identifier, `0` when the record is new.
    fn client_id(&self) -> i64;
}

macro_rules! impl_wire_record {
    ($($ty:ty),+) => {
        $(impl WireRecord for $ty {
            fn client_id(&self) -> i64 {
                self.id.unwrap_or(0)
            }
        })+
    };
}

/// A folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderRecord {
    /// Identifier; zero or absent for new folders.
    pub id: Option<i64>,
    /// Owning workspace.
    #[serde(rename = "database_id")]
    pub workspace_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Parent folder.
    pub parent_id: Option<i64>,
    /// ARGB color.
    pub color: i64,
    /// Whether the folder is expanded.
    pub is_expanded: bool,
    /// Creation time, filled by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time, filled by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteRecord {
    /// Identifier; zero or absent for new notes.
    pub id: Option<i64>,
    /// Owning workspace.
    #[serde(rename = "database_id")]
    pub workspace_id: Option<i64>,
    /// Title.
    pub title: String,
    /// Plain content.
    pub content: Option<String>,
    /// Containing folder.
    pub folder_id: Option<i64>,
    /// JSON text listing attached images.
    pub images: Option<String>,
    /// JSON metadata text.
    pub metadata: Option<String>,
    /// Structured rich-text content.
    pub content_json: Option<String>,
    /// Creation time, filled by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time, filled by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A schedule entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleEntryRecord {
    /// Identifier; zero or absent for new entries.
    pub id: Option<i64>,
    /// Owning workspace.
    #[serde(rename = "database_id")]
    pub workspace_id: Option<i64>,
    /// Time of day, `HH:mm`.
    pub time: String,
    /// Calendar date, `yyyy-MM-dd`.
    pub date: String,
    /// Free text.
    pub note: Option<String>,
    /// JSON of user-defined fields.
    pub dynamic_fields_json: Option<String>,
    /// JSON recurrence rule.
    pub recurrence_json: Option<String>,
    /// JSON tag list.
    pub tags_json: Option<String>,
    /// Creation time, filled by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time, filled by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A pinboard note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinboardNoteRecord {
    /// Identifier; zero or absent for new pinboard notes.
    pub id: Option<i64>,
    /// Owning workspace.
    #[serde(rename = "database_id")]
    pub workspace_id: Option<i64>,
    /// Title.
    pub title: String,
    /// Content.
    pub content: String,
    /// Horizontal position.
    pub position_x: f64,
    /// Vertical position.
    pub position_y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// ARGB background color.
    pub background_color: i64,
    /// Icon code point.
    pub icon: i64,
    /// Creation time, filled by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time, filled by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A connection between two pinboard notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionRecord {
    /// Identifier; zero or absent for new connections.
    pub id: Option<i64>,
    /// Owning workspace.
    #[serde(rename = "database_id")]
    pub workspace_id: Option<i64>,
    /// Source pinboard note, as the client knows it.
    pub from_note_id: i64,
    /// Target pinboard note, as the client knows it.
    pub to_note_id: i64,
    /// Label.
    pub name: String,
    /// ARGB color.
    pub connection_color: i64,
    /// Creation time, filled by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time, filled by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An image attached to a note.
///
/// The stored file path never crosses the wire; bytes travel inline as
/// base64 in `image_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteImageRecord {
    /// Identifier; zero or absent for new images.
    pub id: Option<i64>,
    /// Owning workspace.
    #[serde(rename = "database_id")]
    pub workspace_id: Option<i64>,
    /// Note the image belongs to, as the client knows it.
    pub note_id: i64,
    /// Client file name.
    pub file_name: String,
    /// Base64 image bytes.
    pub image_data: Option<String>,
    /// Creation time, filled by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time, filled by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl NoteImageRecord {
    /// Returns the inline payload if one was submitted.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        self.image_data.as_deref().filter(|data| !data.is_empty())
    }
}

impl_wire_record!(
    FolderRecord,
    NoteRecord,
    ScheduleEntryRecord,
    PinboardNoteRecord,
    ConnectionRecord,
    NoteImageRecord
);
