//! Workspace membership and roles.

use crate::error::CoreResult;
use crate::model::Member;
use crate::types::Role;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

/// Grants or changes a user's role in a workspace.
pub fn upsert(conn: &Connection, workspace_id: i64, user_id: i64, role: Role) -> CoreResult<()> {
    conn.execute(
        "INSERT INTO workspace_members (workspace_id, user_id, role, joined_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (workspace_id, user_id) DO UPDATE SET role = excluded.role",
        params![workspace_id, user_id, role.as_str(), Utc::now()],
    )?;
    Ok(())
}

/// Returns the user's role, or `None` if they are not a member.
pub fn role_of(conn: &Connection, workspace_id: i64, user_id: i64) -> CoreResult<Option<Role>> {
    let mut stmt = conn.prepare_cached(
        "SELECT role FROM workspace_members WHERE workspace_id = ?1 AND user_id = ?2",
    )?;
    let role: Option<String> = stmt
        .query_row(params![workspace_id, user_id], |row| row.get(0))
        .optional()?;
    Ok(role.as_deref().map(Role::from_stored))
}

/// Removes a membership, returning true if it existed.
pub fn remove(conn: &Connection, workspace_id: i64, user_id: i64) -> CoreResult<bool> {
    let removed = conn.execute(
        "DELETE FROM workspace_members WHERE workspace_id = ?1 AND user_id = ?2",
        params![workspace_id, user_id],
    )?;
    Ok(removed > 0)
}

/// Lists a workspace's members ordered by user.
pub fn list(conn: &Connection, workspace_id: i64) -> CoreResult<Vec<Member>> {
    let mut stmt = conn.prepare_cached(
        "SELECT workspace_id, user_id, role, joined_at FROM workspace_members
         WHERE workspace_id = ?1 ORDER BY user_id",
    )?;
    let members = stmt
        .query_map(params![workspace_id], |row| {
            let role: String = row.get(2)?;
            Ok(Member {
                workspace_id: row.get(0)?,
                user_id: row.get(1)?,
                role: Role::from_stored(&role),
                joined_at: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::fixture;

    #[test]
    fn upsert_and_lookup() {
        let mut fx = fixture();
        let ws = fx.workspace_id;
        let tx = fx.session.begin_write().unwrap();

        assert_eq!(role_of(&tx, ws, 2).unwrap(), None);
        upsert(&tx, ws, 2, Role::Viewer).unwrap();
        assert_eq!(role_of(&tx, ws, 2).unwrap(), Some(Role::Viewer));
        upsert(&tx, ws, 2, Role::Collaborator).unwrap();
        assert_eq!(role_of(&tx, ws, 2).unwrap(), Some(Role::Collaborator));
        assert_eq!(list(&tx, ws).unwrap().len(), 2);

        assert!(remove(&tx, ws, 2).unwrap());
        assert_eq!(role_of(&tx, ws, 2).unwrap(), None);
    }

    #[test]
    fn legacy_roles_read_as_collaborator() {
        let mut fx = fixture();
        let ws = fx.workspace_id;
        let tx = fx.session.begin_write().unwrap();
        tx.execute(
            "INSERT INTO workspace_members VALUES (?1, 5, 'admin', ?2)",
            params![ws, Utc::now()],
        )
        .unwrap();
        assert_eq!(role_of(&tx, ws, 5).unwrap(), Some(Role::Collaborator));
    }
}
