//! Pinboard note table.

use super::EntityTable;
use crate::error::CoreResult;
use crate::model::PinboardNote;
use rusqlite::{params, Connection, Row};

impl EntityTable for PinboardNote {
    const TABLE: &'static str = "pinboard_notes";
    const COLUMNS: &'static str = "id, workspace_id, title, content, position_x, position_y, \
         width, height, background_color, icon, created_at, updated_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(PinboardNote {
            id: row.get(0)?,
            workspace_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            position_x: row.get(4)?,
            position_y: row.get(5)?,
            width: row.get(6)?,
            height: row.get(7)?,
            background_color: row.get(8)?,
            icon: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    fn insert(conn: &Connection, row: &Self) -> CoreResult<i64> {
        let mut stmt = conn.prepare_cached(
            "INSERT INTO pinboard_notes (workspace_id, title, content, position_x, position_y,
                                         width, height, background_color, icon, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )?;
        stmt.execute(params![
            row.workspace_id,
            row.title,
            row.content,
            row.position_x,
            row.position_y,
            row.width,
            row.height,
            row.background_color,
            row.icon,
            row.created_at,
            row.updated_at,
        ])?;
        Ok(conn.last_insert_rowid())
    }

    fn update(conn: &Connection, row: &Self) -> CoreResult<()> {
        let mut stmt = conn.prepare_cached(
            "UPDATE pinboard_notes SET title = ?1, content = ?2, position_x = ?3, position_y = ?4,
                    width = ?5, height = ?6, background_color = ?7, icon = ?8,
                    created_at = ?9, updated_at = ?10
             WHERE id = ?11 AND workspace_id = ?12",
        )?;
        stmt.execute(params![
            row.title,
            row.content,
            row.position_x,
            row.position_y,
            row.width,
            row.height,
            row.background_color,
            row.icon,
            row.created_at,
            row.updated_at,
            row.id,
            row.workspace_id,
        ])?;
        Ok(())
    }
}
