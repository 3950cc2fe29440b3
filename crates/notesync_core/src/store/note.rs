//! Note table.

use super::EntityTable;
use crate::error::CoreResult;
use crate::model::Note;
use rusqlite::{params, Connection, Row};

impl EntityTable for Note {
    const TABLE: &'static str = "notes";
    const COLUMNS: &'static str = "id, workspace_id, title, content, folder_id, images_json, \
         metadata_json, content_json, created_at, updated_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Note {
            id: row.get(0)?,
            workspace_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            folder_id: row.get(4)?,
            images_json: row.get(5)?,
            metadata_json: row.get(6)?,
            content_json: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn insert(conn: &Connection, row: &Self) -> CoreResult<i64> {
        let mut stmt = conn.prepare_cached(
            "INSERT INTO notes (workspace_id, title, content, folder_id, images_json, metadata_json,
                                content_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        stmt.execute(params![
            row.workspace_id,
            row.title,
            row.content,
            row.folder_id,
            row.images_json,
            row.metadata_json,
            row.content_json,
            row.created_at,
            row.updated_at,
        ])?;
        Ok(conn.last_insert_rowid())
    }

    fn update(conn: &Connection, row: &Self) -> CoreResult<()> {
        let mut stmt = conn.prepare_cached(
            "UPDATE notes SET title = ?1, content = ?2, folder_id = ?3, images_json = ?4,
                    metadata_json = ?5, content_json = ?6, created_at = ?7, updated_at = ?8
             WHERE id = ?9 AND workspace_id = ?10",
        )?;
        stmt.execute(params![
            row.title,
            row.content,
            row.folder_id,
            row.images_json,
            row.metadata_json,
            row.content_json,
            row.created_at,
            row.updated_at,
            row.id,
            row.workspace_id,
        ])?;
        Ok(())
    }
}
