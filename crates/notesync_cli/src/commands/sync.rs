//! Sync command implementation.

use super::{open_server, write_output, CommandResult};
use notesync_core::EntityKind;
use notesync_sync_protocol::encode_pretty;
use std::fs;
use std::path::Path;

/// Applies the snapshot in `file` to `workspace_id` as `user`.
pub fn run(
    db_path: &Path,
    uploads: &Path,
    workspace_id: i64,
    user: i64,
    file: &Path,
    output: Option<&Path>,
) -> CommandResult {
    let server = open_server(db_path, uploads)?;
    let body = fs::read(file)?;
    let outcome = server.handler().handle_sync(workspace_id, user, &body)?;

    println!("✓ Sync pass committed");
    println!("  Workspace: {}", workspace_id);
    println!("  Version: {}", outcome.stats.version);
    for kind in EntityKind::ALL {
        let stats = outcome.stats.kind(kind);
        println!(
            "  {:<15} +{} ~{} -{} ({} skipped)",
            kind.as_str(),
            stats.created,
            stats.updated,
            stats.deleted,
            stats.skipped
        );
    }

    if let Some(path) = output {
        write_output(Some(path), &encode_pretty(&outcome.response)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::admin;

    #[test]
    fn sync_file_and_write_result() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("notesync.db");
        let uploads = dir.path().join("uploads");
        let ws = admin::init(&db_path, "Team", 1).unwrap();

        let snapshot = dir.path().join("snapshot.json");
        fs::write(
            &snapshot,
            r#"{"folders":[{"id":5,"name":"Inbox"}],"notes":[{"id":0,"title":"Hi","folder_id":5}]}"#,
        )
        .unwrap();
        let result = dir.path().join("result.json");

        run(&db_path, &uploads, ws.id, 1, &snapshot, Some(&result)).unwrap();

        let response: serde_json::Value =
            serde_json::from_slice(&fs::read(&result).unwrap()).unwrap();
        assert_eq!(response["notes"][0]["folder_id"], response["folders"][0]["id"]);
    }

    #[test]
    fn sync_rejects_non_members() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("notesync.db");
        let ws = admin::init(&db_path, "Team", 1).unwrap();
        let snapshot = dir.path().join("snapshot.json");
        fs::write(&snapshot, "{}").unwrap();

        let err = run(&db_path, &dir.path().join("uploads"), ws.id, 9, &snapshot, None).unwrap_err();
        assert!(err.to_string().contains("may not sync"));
    }
}
