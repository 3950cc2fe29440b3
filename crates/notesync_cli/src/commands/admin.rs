//! Workspace administration commands.

use super::{require_database, CommandResult};
use notesync_core::{store, Database, Role, Workspace};
use std::path::Path;
use tracing::info;

/// Creates the database if needed and a workspace owned by `owner`.
pub fn init(db_path: &Path, name: &str, owner: i64) -> CommandResult<Workspace> {
    let db = Database::open(db_path)?;
    let mut session = db.session()?;
    let workspace = session.write(|tx| store::workspace::create(tx, name, owner))?;
    info!(workspace_id = workspace.id, owner, "workspace created");

    println!("✓ Workspace created");
    println!("  ID: {}", workspace.id);
    println!("  Name: {}", workspace.name);
    println!("  Owner: {}", workspace.owner_user_id);
    Ok(workspace)
}

/// Grants `user` the given role in `workspace_id`.
pub fn add_member(db_path: &Path, workspace_id: i64, user: i64, role: Role) -> CommandResult {
    require_database(db_path)?;
    let db = Database::open(db_path)?;
    let mut session = db.session()?;
    session.write(|tx| {
        store::workspace::require(tx, workspace_id)?;
        store::member::upsert(tx, workspace_id, user, role)
    })?;

    println!("✓ User {} is now {} of workspace {}", user, role, workspace_id);
    Ok(())
}
