//! Folder table.

use super::EntityTable;
use crate::error::CoreResult;
use crate::model::Folder;
use rusqlite::{params, Connection, Row};

impl EntityTable for Folder {
    const TABLE: &'static str = "folders";
    const COLUMNS: &'static str =
        "id, workspace_id, name, parent_id, color, is_expanded, created_at, updated_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Folder {
            id: row.get(0)?,
            workspace_id: row.get(1)?,
            name: row.get(2)?,
            parent_id: row.get(3)?,
            color: row.get(4)?,
            is_expanded: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn insert(conn: &Connection, row: &Self) -> CoreResult<i64> {
        let mut stmt = conn.prepare_cached(
            "INSERT INTO folders (workspace_id, name, parent_id, color, is_expanded, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        stmt.execute(params![
            row.workspace_id,
            row.name,
            row.parent_id,
            row.color,
            row.is_expanded,
            row.created_at,
            row.updated_at,
        ])?;
        Ok(conn.last_insert_rowid())
    }

    fn update(conn: &Connection, row: &Self) -> CoreResult<()> {
        let mut stmt = conn.prepare_cached(
            "UPDATE folders SET name = ?1, parent_id = ?2, color = ?3, is_expanded = ?4,
                    created_at = ?5, updated_at = ?6
             WHERE id = ?7 AND workspace_id = ?8",
        )?;
        stmt.execute(params![
            row.name,
            row.parent_id,
            row.color,
            row.is_expanded,
            row.created_at,
            row.updated_at,
            row.id,
            row.workspace_id,
        ])?;
        Ok(())
    }
}

/// Sets or clears a folder's parent link.
pub fn set_parent(
    conn: &Connection,
    id: i64,
    workspace_id: i64,
    parent_id: Option<i64>,
) -> CoreResult<()> {
    let mut stmt = conn.prepare_cached(
        "UPDATE folders SET parent_id = ?1 WHERE id = ?2 AND workspace_id = ?3",
    )?;
    stmt.execute(params![parent_id, id, workspace_id])?;
    Ok(())
}
