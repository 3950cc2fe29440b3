//! Core type definitions for notesync.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The six kinds of workspace content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Folder hierarchy node.
    Folder,
    /// Rich-text note.
    Note,
    /// Calendar/schedule item.
    ScheduleEntry,
    /// Sticky note on the pinboard canvas.
    PinboardNote,
    /// Edge between two pinboard notes.
    Connection,
    /// Image attached to a note.
    NoteImage,
}

impl EntityKind {
    /// Every kind, in reconciliation order.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::ScheduleEntry,
        EntityKind::Folder,
        EntityKind::Note,
        EntityKind::PinboardNote,
        EntityKind::Connection,
        EntityKind::NoteImage,
    ];

    /// Returns the stable name used in logs and the change log.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Folder => "folder",
            EntityKind::Note => "note",
            EntityKind::ScheduleEntry => "schedule_entry",
            EntityKind::PinboardNote => "pinboard_note",
            EntityKind::Connection => "connection",
            EntityKind::NoteImage => "note_image",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown entity kind: {s}"))
    }
}

/// A member's role in a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Created the workspace.
    Owner,
    /// Legacy write role.
    Editor,
    /// Full write access.
    Collaborator,
    /// Read-only access.
    Viewer,
}

impl Role {
    /// Returns the stored name.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Editor => "editor",
            Role::Collaborator => "collaborator",
            Role::Viewer => "viewer",
        }
    }

    /// Parses a stored role. Unknown names are treated as collaborators.
    pub fn from_stored(s: &str) -> Self {
        match s {
            "owner" => Role::Owner,
            "editor" => Role::Editor,
            "viewer" => Role::Viewer,
            _ => Role::Collaborator,
        }
    }

    /// Returns true if the role may submit snapshots.
    pub fn can_write(self) -> bool {
        !matches!(self, Role::Viewer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change recorded against a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOperation {
    /// Row created.
    Create,
    /// Row updated.
    Update,
    /// Row deleted.
    Delete,
}

impl ChangeOperation {
    /// Returns the stored name.
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeOperation::Create => "create",
            ChangeOperation::Update => "update",
            ChangeOperation::Delete => "delete",
        }
    }
}

impl FromStr for ChangeOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(ChangeOperation::Create),
            "update" => Ok(ChangeOperation::Update),
            "delete" => Ok(ChangeOperation::Delete),
            other => Err(format!("unknown change operation: {other}")),
        }
    }
}

impl fmt::Display for ChangeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns a modification time strictly after `previous`.
///
/// Uses the current time unless the clock has not moved past `previous`.
#[must_use]
pub fn advance_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_names_roundtrip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
        assert!("widget".parse::<EntityKind>().is_err());
    }

    #[test]
    fn role_parsing() {
        assert_eq!(Role::from_stored("owner"), Role::Owner);
        assert_eq!(Role::from_stored("viewer"), Role::Viewer);
        assert_eq!(Role::from_stored("something-old"), Role::Collaborator);
        assert!(Role::Editor.can_write());
        assert!(!Role::Viewer.can_write());
    }

    #[test]
    fn change_operation_parsing() {
        assert_eq!("delete".parse::<ChangeOperation>().unwrap(), ChangeOperation::Delete);
        assert!("upsert".parse::<ChangeOperation>().is_err());
    }

    #[test]
    fn timestamps_always_advance() {
        let future = Utc::now() + Duration::hours(1);
        assert!(advance_timestamp(future) > future);
        let past = Utc::now() - Duration::hours(1);
        assert!(advance_timestamp(past) > past);
    }
}
