//! Inspect command implementation.

use super::{require_database, CommandResult};
use notesync_core::{
    schema_version, store, Connection, Database, EntityKind, EntityTable, Folder, Note, NoteImage,
    PinboardNote, ScheduleEntry, Session, Workspace,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Database inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Database path.
    pub path: String,
    /// Database file size in bytes.
    pub file_size: u64,
    /// Applied schema version.
    pub schema_version: i64,
    /// Per-workspace statistics.
    pub workspaces: Vec<WorkspaceStats>,
}

/// Statistics for a single workspace.
#[derive(Debug, Serialize)]
pub struct WorkspaceStats {
    /// Workspace ID.
    pub id: i64,
    /// Workspace name.
    pub name: String,
    /// Owning user.
    pub owner_user_id: i64,
    /// Completed sync passes.
    pub version: i64,
    /// Time of the last sync pass.
    pub last_sync: Option<String>,
    /// Number of members.
    pub members: usize,
    /// Row counts per kind.
    pub rows: BTreeMap<&'static str, i64>,
}

/// Runs the inspect command.
pub fn run(db_path: &Path, workspace: Option<i64>, format: &str) -> CommandResult {
    let result = inspect(db_path, workspace)?;
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_text_output(&result),
    }
    Ok(())
}

/// Collects statistics for every workspace, or just `workspace`.
pub fn inspect(db_path: &Path, workspace: Option<i64>) -> CommandResult<InspectResult> {
    require_database(db_path)?;
    let db = Database::open(db_path)?;
    let session = db.session()?;
    let conn = session.connection();

    let workspaces = match workspace {
        Some(id) => vec![store::workspace::require(conn, id)?],
        None => store::workspace::list(conn)?,
    };

    Ok(InspectResult {
        path: db_path.display().to_string(),
        file_size: std::fs::metadata(db_path)?.len(),
        schema_version: schema_version(conn)?,
        workspaces: workspaces
            .iter()
            .map(|ws| workspace_stats(&session, ws))
            .collect::<CommandResult<Vec<_>>>()?,
    })
}

fn workspace_stats(session: &Session, ws: &Workspace) -> CommandResult<WorkspaceStats> {
    let conn = session.connection();
    let mut rows = BTreeMap::new();
    for kind in EntityKind::ALL {
        let count = match kind {
            EntityKind::Folder => Folder::count(conn, ws.id)?,
            EntityKind::Note => Note::count(conn, ws.id)?,
            EntityKind::ScheduleEntry => ScheduleEntry::count(conn, ws.id)?,
            EntityKind::PinboardNote => PinboardNote::count(conn, ws.id)?,
            EntityKind::Connection => Connection::count(conn, ws.id)?,
            EntityKind::NoteImage => NoteImage::count(conn, ws.id)?,
        };
        rows.insert(kind.as_str(), count);
    }

    Ok(WorkspaceStats {
        id: ws.id,
        name: ws.name.clone(),
        owner_user_id: ws.owner_user_id,
        version: ws.version,
        last_sync: ws.last_sync.map(notesync_sync_protocol::format_timestamp),
        members: store::member::list(conn, ws.id)?.len(),
        rows,
    })
}

fn print_text_output(result: &InspectResult) {
    println!("notesync Database Inspection");
    println!("============================");
    println!();
    println!("Path: {}", result.path);
    println!("Size: {}", format_size(result.file_size));
    println!("Schema version: {}", result.schema_version);
    println!("Workspaces: {}", result.workspaces.len());

    for ws in &result.workspaces {
        println!();
        println!("Workspace {} ({})", ws.id, ws.name);
        println!("  Owner: {}", ws.owner_user_id);
        println!("  Members: {}", ws.members);
        println!("  Version: {}", ws.version);
        println!("  Last sync: {}", ws.last_sync.as_deref().unwrap_or("never"));
        for (kind, count) in &ws.rows {
            println!("  {:<15} {:>8}", kind, count);
        }
    }
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
