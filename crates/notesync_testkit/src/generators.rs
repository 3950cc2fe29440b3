//! Property-based test generators using proptest.
//!
//! Generated snapshots only use fresh identifiers (zero) or small client
//! identifiers unknown to a fresh database, and reference each other through
//! those client identifiers the way a client that never synced would.

use crate::scenarios::SnapshotBuilder;
use notesync_sync_protocol::SyncRequest;
use proptest::prelude::*;

/// Strategy for display names.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z0-9 ]{0,15}").expect("Invalid regex")
}

/// Strategy for image file names that survive sanitization unchanged.
pub fn file_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_-]{0,11}\\.(png|jpg)").expect("Invalid regex")
}

/// Strategy for client file names, including hostile ones.
pub fn hostile_file_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        file_name_strategy(),
        Just("../../etc/passwd".to_string()),
        Just("..\\..\\boot.ini".to_string()),
        Just("a/b/c.png".to_string()),
        Just("C:\\x.png".to_string()),
        Just("\u{0}.png".to_string()),
        prop::string::string_regex("[./\\\\a-z]{1,12}").expect("Invalid regex"),
    ]
}

/// Strategy for a client snapshot of a workspace that has never synced.
///
/// Folders use client ids `1..=folders`, notes `101..`, pinboard notes
/// `201..`. Notes point at random folders, connections at random pinboard
/// notes, and every note gets at most one image.
pub fn snapshot_strategy() -> impl Strategy<Value = SyncRequest> {
    (0usize..4, 0usize..5, 0usize..4, 0usize..3)
        .prop_flat_map(|(folders, notes, pins, schedules)| {
            (
                prop::collection::vec(name_strategy(), folders),
                prop::collection::vec((name_strategy(), 0..=folders, any::<bool>()), notes),
                prop::collection::vec(name_strategy(), pins),
                prop::collection::vec((0..=pins, 0..=pins), 0..=pins * 2),
                Just(schedules),
                prop::collection::vec(any::<u8>(), 1..32),
            )
        })
        .prop_map(|(folders, notes, pins, links, schedules, bytes)| {
            let mut builder = SnapshotBuilder::new();
            for (i, name) in folders.iter().enumerate() {
                let id = i as i64 + 1;
                let parent = if i > 0 { Some(id - 1) } else { None };
                builder = builder.folder(id, name, parent);
            }
            for (i, (title, folder, with_image)) in notes.iter().enumerate() {
                let id = 101 + i as i64;
                let folder = if *folder == 0 { None } else { Some(*folder as i64) };
                builder = builder.note(id, title, folder);
                if *with_image {
                    builder = builder.image(0, id, &format!("img{i}.png"), &bytes);
                }
            }
            for (i, title) in pins.iter().enumerate() {
                builder = builder.pin(201 + i as i64, title);
            }
            for (from, to) in links {
                if from > 0 && to > 0 {
                    builder = builder.connection(0, 200 + from as i64, 200 + to as i64);
                }
            }
            for day in 0..schedules {
                builder = builder.schedule(0, &format!("2024-03-{:02}", day + 1), "08:30");
            }
            builder.build()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn snapshots_reference_their_own_ids(request in snapshot_strategy()) {
            let pins: Vec<i64> = request.pinboard_notes.iter().map(|p| p.id.unwrap_or(0)).collect();
            for link in &request.connections {
                prop_assert!(pins.contains(&link.from_note_id));
                prop_assert!(pins.contains(&link.to_note_id));
            }
            let notes: Vec<i64> = request.notes.iter().map(|n| n.id.unwrap_or(0)).collect();
            for img in &request.note_images {
                prop_assert!(notes.contains(&img.note_id));
            }
        }
    }
}
