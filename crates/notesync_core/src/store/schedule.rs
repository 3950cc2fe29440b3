//! Schedule entry table.

use super::EntityTable;
use crate::error::CoreResult;
use crate::model::ScheduleEntry;
use rusqlite::{params, Connection, Row};

impl EntityTable for ScheduleEntry {
    const TABLE: &'static str = "schedule_entries";
    const COLUMNS: &'static str = "id, workspace_id, time, date, note, dynamic_fields_json, \
         recurrence_json, tags_json, created_at, updated_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ScheduleEntry {
            id: row.get(0)?,
            workspace_id: row.get(1)?,
            time: row.get(2)?,
            date: row.get(3)?,
            note: row.get(4)?,
            dynamic_fields_json: row.get(5)?,
            recurrence_json: row.get(6)?,
            tags_json: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn insert(conn: &Connection, row: &Self) -> CoreResult<i64> {
        let mut stmt = conn.prepare_cached(
            "INSERT INTO schedule_entries (workspace_id, time, date, note, dynamic_fields_json,
                                           recurrence_json, tags_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        stmt.execute(params![
            row.workspace_id,
            row.time,
            row.date,
            row.note,
            row.dynamic_fields_json,
            row.recurrence_json,
            row.tags_json,
            row.created_at,
            row.updated_at,
        ])?;
        Ok(conn.last_insert_rowid())
    }

    fn update(conn: &Connection, row: &Self) -> CoreResult<()> {
        let mut stmt = conn.prepare_cached(
            "UPDATE schedule_entries SET time = ?1, date = ?2, note = ?3, dynamic_fields_json = ?4,
                    recurrence_json = ?5, tags_json = ?6, created_at = ?7, updated_at = ?8
             WHERE id = ?9 AND workspace_id = ?10",
        )?;
        stmt.execute(params![
            row.time,
            row.date,
            row.note,
            row.dynamic_fields_json,
            row.recurrence_json,
            row.tags_json,
            row.created_at,
            row.updated_at,
            row.id,
            row.workspace_id,
        ])?;
        Ok(())
    }
}
