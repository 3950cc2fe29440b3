//! Row types stored per workspace.
//!
//! Every content row carries its owning workspace and two timestamps. The
//! [`Entity`] trait exposes those common columns so reconciliation can treat
//! the six kinds uniformly.

use crate::types::{ChangeOperation, EntityKind, Role};
use chrono::{DateTime, Utc};

/// Columns shared by every content row.
pub trait Entity: Clone + Send + std::fmt::Debug {
    /// The kind this row type stores.
    const KIND: EntityKind;

    /// Server-assigned identifier, `0` before insertion.
    fn id(&self) -> i64;
    /// Sets the identifier.
    fn set_id(&mut self, id: i64);
    /// Owning workspace.
    fn workspace_id(&self) -> i64;
    /// Sets the owning workspace.
    fn set_workspace_id(&mut self, workspace_id: i64);
    /// Creation time.
    fn created_at(&self) -> DateTime<Utc>;
    /// Last modification time.
    fn updated_at(&self) -> DateTime<Utc>;
    /// Sets both timestamps.
    fn set_timestamps(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);
}

macro_rules! impl_entity {
    ($ty:ty, $kind:expr) => {
        impl Entity for $ty {
            const KIND: EntityKind = $kind;

            fn id(&self) -> i64 {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = id;
            }

            fn workspace_id(&self) -> i64 {
                self.workspace_id
            }

            fn set_workspace_id(&mut self, workspace_id: i64) {
                self.workspace_id = workspace_id;
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }

            fn updated_at(&self) -> DateTime<Utc> {
                self.updated_at
            }

            fn set_timestamps(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
                self.created_at = created_at;
                self.updated_at = updated_at;
            }
        }
    };
}

/// A shared workspace and its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    /// Identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Owning user.
    pub owner_user_id: i64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Number of completed sync passes.
    pub version: i64,
    /// Time of the last sync pass.
    pub last_sync: Option<DateTime<Utc>>,
}

/// A user's membership in a workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Workspace.
    pub workspace_id: i64,
    /// User.
    pub user_id: i64,
    /// Granted role.
    pub role: Role,
    /// When the membership was granted.
    pub joined_at: DateTime<Utc>,
}

/// A folder in the note hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    /// Identifier.
    pub id: i64,
    /// Owning workspace.
    pub workspace_id: i64,
    /// Display name.
    pub name: String,
    /// Parent folder in the same workspace.
    pub parent_id: Option<i64>,
    /// ARGB color.
    pub color: i64,
    /// Whether the folder is expanded in the tree view.
    pub is_expanded: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A note.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    /// Identifier.
    pub id: i64,
    /// Owning workspace.
    pub workspace_id: i64,
    /// Title.
    pub title: String,
    /// Plain content.
    pub content: Option<String>,
    /// Containing folder in the same workspace.
    pub folder_id: Option<i64>,
    /// JSON list of attached images.
    pub images_json: String,
    /// JSON metadata object.
    pub metadata_json: String,
    /// Structured rich-text content.
    pub content_json: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A schedule item.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    /// Identifier.
    pub id: i64,
    /// Owning workspace.
    pub workspace_id: i64,
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
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A sticky note on the pinboard canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PinboardNote {
    /// Identifier.
    pub id: i64,
    /// Owning workspace.
    pub workspace_id: i64,
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
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A directed edge between two pinboard notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    /// Identifier.
    pub id: i64,
    /// Owning workspace.
    pub workspace_id: i64,
    /// Source pinboard note.
    pub from_note_id: i64,
    /// Target pinboard note.
    pub to_note_id: i64,
    /// Label.
    pub name: String,
    /// ARGB color.
    pub connection_color: i64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// An image attached to a note. The bytes live in the blob store.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteImage {
    /// Identifier.
    pub id: i64,
    /// Owning workspace.
    pub workspace_id: i64,
    /// Note the image belongs to.
    pub note_id: i64,
    /// File name as submitted by the client.
    pub file_name: String,
    /// Blob key of the stored bytes.
    pub image_path: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// One entry of the workspace change log.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEntry {
    /// Identifier.
    pub id: i64,
    /// Workspace.
    pub workspace_id: i64,
    /// Workspace version of the pass that made the change.
    pub version: i64,
    /// Kind of the changed row.
    pub entity_kind: EntityKind,
    /// Identifier of the changed row.
    pub entity_id: i64,
    /// What happened.
    pub operation: ChangeOperation,
    /// User whose pass made the change.
    pub user_id: i64,
    /// When the change was recorded.
    pub created_at: DateTime<Utc>,
}

impl_entity!(Folder, EntityKind::Folder);
impl_entity!(Note, EntityKind::Note);
impl_entity!(ScheduleEntry, EntityKind::ScheduleEntry);
impl_entity!(PinboardNote, EntityKind::PinboardNote);
impl_entity!(Connection, EntityKind::Connection);
impl_entity!(NoteImage, EntityKind::NoteImage);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_accessors() {
        let now = Utc::now();
        let mut folder = Folder {
            id: 0,
            workspace_id: 0,
            name: "Inbox".into(),
            parent_id: None,
            color: 0,
            is_expanded: false,
            created_at: now,
            updated_at: now,
        };
        folder.set_id(12);
        folder.set_workspace_id(3);
        assert_eq!(folder.id(), 12);
        assert_eq!(folder.workspace_id(), 3);
        assert_eq!(Folder::KIND, EntityKind::Folder);
        assert_eq!(NoteImage::KIND, EntityKind::NoteImage);
    }
}
