//! Workspace metadata.

use crate::error::{CoreError, CoreResult};
use crate::model::Workspace;
use crate::store::member;
use crate::types::{advance_timestamp, Role};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLUMNS: &str = "id, name, owner_user_id, created_at, updated_at, version, last_sync";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Workspace> {
    Ok(Workspace {
        id: row.get(0)?,
        name: row.get(1)?,
        owner_user_id: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
        version: row.get(5)?,
        last_sync: row.get(6)?,
    })
}

/// Creates a workspace and registers its owner as a member.
pub fn create(conn: &Connection, name: &str, owner_user_id: i64) -> CoreResult<Workspace> {
    let now = Utc::now();
    conn.execute(
        "INSERT INTO workspaces (name, owner_user_id, created_at, updated_at, version)
         VALUES (?1, ?2, ?3, ?3, 0)",
        params![name, owner_user_id, now],
    )?;
    let id = conn.last_insert_rowid();
    member::upsert(conn, id, owner_user_id, Role::Owner)?;
    require(conn, id)
}

/// Looks up a workspace.
pub fn get(conn: &Connection, workspace_id: i64) -> CoreResult<Option<Workspace>> {
    let mut stmt = conn.prepare_cached(&format!("SELECT {COLUMNS} FROM workspaces WHERE id = ?1"))?;
    Ok(stmt.query_row(params![workspace_id], from_row).optional()?)
}

/// Looks up a workspace that must exist.
pub fn require(conn: &Connection, workspace_id: i64) -> CoreResult<Workspace> {
    get(conn, workspace_id)?.ok_or(CoreError::WorkspaceNotFound { workspace_id })
}

/// Lists every workspace ordered by identifier.
pub fn list(conn: &Connection) -> CoreResult<Vec<Workspace>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM workspaces ORDER BY id"))?;
    let rows = stmt
        .query_map([], from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Opens a new sync pass: bumps the version, advances the modification time
/// and records the sync time. Returns the updated workspace.
pub fn begin_pass(conn: &Connection, workspace_id: i64) -> CoreResult<Workspace> {
    let current = require(conn, workspace_id)?;
    let updated_at = advance_timestamp(current.updated_at);
    conn.execute(
        "UPDATE workspaces SET version = version + 1, updated_at = ?1, last_sync = ?1 WHERE id = ?2",
        params![updated_at, workspace_id],
    )?;
    require(conn, workspace_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::fixture;

    #[test]
    fn create_registers_owner() {
        let mut fx = fixture();
        let tx = fx.session.begin_write().unwrap();
        let ws = require(&tx, fx.workspace_id).unwrap();
        assert_eq!(ws.name, "test");
        assert_eq!(ws.version, 0);
        assert!(ws.last_sync.is_none());
        assert_eq!(member::role_of(&tx, ws.id, 1).unwrap(), Some(Role::Owner));
    }

    #[test]
    fn begin_pass_bumps_version() {
        let mut fx = fixture();
        let tx = fx.session.begin_write().unwrap();
        let before = require(&tx, fx.workspace_id).unwrap();

        let after = begin_pass(&tx, fx.workspace_id).unwrap();
        assert_eq!(after.version, before.version + 1);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.last_sync, Some(after.updated_at));
    }

    #[test]
    fn missing_workspace() {
        let mut fx = fixture();
        let tx = fx.session.begin_write().unwrap();
        assert!(get(&tx, 999).unwrap().is_none());
        assert!(require(&tx, 999).unwrap_err().is_not_found());
        assert!(begin_pass(&tx, 999).unwrap_err().is_not_found());
        assert_eq!(list(&tx).unwrap().len(), 1);
    }
}
