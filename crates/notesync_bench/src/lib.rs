//! Benchmark utilities.

use notesync_sync_protocol::SyncRequest;
use notesync_testkit::SnapshotBuilder;

/// Deterministic image bytes of the given size.
pub fn image_bytes(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i * 31 % 251) as u8).collect()
}

/// A snapshot from a client that has never synced.
///
/// `notes` notes spread over ten folders, half of them with an image of
/// `image_size` bytes, plus a pinboard chain of `notes / 2` pins.
pub fn fresh_snapshot(notes: usize, image_size: usize) -> SyncRequest {
    let image = image_bytes(image_size);
    let mut builder = SnapshotBuilder::new();
    for folder in 1..=10 {
        let parent = if folder > 1 { Some(1) } else { None };
        builder = builder.folder(folder, &format!("folder {folder}"), parent);
    }
    for i in 0..notes {
        let id = 1_000 + i as i64;
        builder = builder.note(id, &format!("note {i}"), Some(1 + (i % 10) as i64));
        if i % 2 == 0 {
            builder = builder.image(0, id, &format!("img{i}.png"), &image);
        }
    }
    let pins = (notes / 2).max(2) as i64;
    for pin in 0..pins {
        builder = builder.pin(10_000 + pin, &format!("pin {pin}"));
        if pin > 0 {
            builder = builder.connection(0, 10_000 + pin - 1, 10_000 + pin);
        }
    }
    for day in 0..(notes / 4) {
        builder = builder.schedule(0, &format!("2024-01-{:02}", day % 28 + 1), "10:00");
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_shape() {
        let request = fresh_snapshot(20, 16);
        assert_eq!(request.folders.len(), 10);
        assert_eq!(request.notes.len(), 20);
        assert_eq!(request.note_images.len(), 10);
        assert_eq!(request.pinboard_notes.len(), 10);
        assert_eq!(request.connections.len(), 9);
        assert_eq!(image_bytes(4), vec![0, 31, 62, 93]);
    }
}
