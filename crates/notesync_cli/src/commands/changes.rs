//! Change log command implementation.

use super::{open_server, CommandResult};
use std::path::Path;

/// Prints change log entries recorded after `since_version`.
pub fn run(
    db_path: &Path,
    uploads: &Path,
    workspace_id: i64,
    user: i64,
    since_version: i64,
    limit: Option<u32>,
) -> CommandResult {
    let server = open_server(db_path, uploads)?;
    let page = server
        .handler()
        .handle_changes(workspace_id, user, since_version, limit)?;

    println!("Workspace {} at version {}", page.workspace_id, page.version);
    println!("{:>8} {:>7}  {:<15} {:>8}  {:<6} {:>6}  TIME", "ID", "VERSION", "KIND", "ROW", "OP", "USER");
    for change in &page.changes {
        println!(
            "{:>8} {:>7}  {:<15} {:>8}  {:<6} {:>6}  {}",
            change.id,
            change.version,
            change.entity_type,
            change.entity_id,
            change.operation,
            change.user_id,
            notesync_sync_protocol::format_timestamp(change.created_at)
        );
    }
    if page.has_more {
        println!("... more changes follow, raise --limit or --since");
    }
    Ok(())
}
