//! Export command implementation.

use super::{open_server, write_output, CommandResult};
use notesync_sync_protocol::encode_pretty;
use std::path::Path;

/// Writes the current snapshot of `workspace_id` as seen by `user`.
pub fn run(
    db_path: &Path,
    uploads: &Path,
    workspace_id: i64,
    user: i64,
    output: Option<&Path>,
) -> CommandResult {
    let server = open_server(db_path, uploads)?;
    let snapshot = server.handler().handle_export(workspace_id, user)?;
    write_output(output, &encode_pretty(&snapshot)?)
}
