//! Connection table.

use super::EntityTable;
use crate::error::CoreResult;
use crate::model::Connection;
use rusqlite::{params, Row};

impl EntityTable for Connection {
    const TABLE: &'static str = "connections";
    const COLUMNS: &'static str = "id, workspace_id, from_note_id, to_note_id, name, \
         connection_color, created_at, updated_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Connection {
            id: row.get(0)?,
            workspace_id: row.get(1)?,
            from_note_id: row.get(2)?,
            to_note_id: row.get(3)?,
            name: row.get(4)?,
            connection_color: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn insert(conn: &rusqlite::Connection, row: &Self) -> CoreResult<i64> {
        let mut stmt = conn.prepare_cached(
            "INSERT INTO connections (workspace_id, from_note_id, to_note_id, name, connection_color,
                                      created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        stmt.execute(params![
            row.workspace_id,
            row.from_note_id,
            row.to_note_id,
            row.name,
            row.connection_color,
            row.created_at,
            row.updated_at,
        ])?;
        Ok(conn.last_insert_rowid())
    }

    fn update(conn: &rusqlite::Connection, row: &Self) -> CoreResult<()> {
        let mut stmt = conn.prepare_cached(
            "UPDATE connections SET from_note_id = ?1, to_note_id = ?2, name = ?3,
                    connection_color = ?4, created_at = ?5, updated_at = ?6
             WHERE id = ?7 AND workspace_id = ?8",
        )?;
        stmt.execute(params![
            row.from_note_id,
            row.to_note_id,
            row.name,
            row.connection_color,
            row.created_at,
            row.updated_at,
            row.id,
            row.workspace_id,
        ])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PinboardNote;
    use crate::store::test_support::fixture;
    use chrono::Utc;

    fn pin(workspace_id: i64) -> PinboardNote {
        let now = Utc::now();
        PinboardNote {
            id: 0,
            workspace_id,
            title: "pin".into(),
            content: String::new(),
            position_x: 10.0,
            position_y: 20.5,
            width: 200.0,
            height: 150.0,
            background_color: 0xFFFF_EB3B,
            icon: 0xE3C9,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn deleting_endpoint_cascades() {
        let mut fx = fixture();
        let ws = fx.workspace_id;
        let tx = fx.session.begin_write().unwrap();

        let a = PinboardNote::insert(&tx, &pin(ws)).unwrap();
        let b = PinboardNote::insert(&tx, &pin(ws)).unwrap();
        let now = Utc::now();
        let edge = Connection::insert(
            &tx,
            &Connection {
                id: 0,
                workspace_id: ws,
                from_note_id: a,
                to_note_id: b,
                name: "depends on".into(),
                connection_color: 0xFF00_0000,
                created_at: now,
                updated_at: now,
            },
        )
        .unwrap();

        let stored = PinboardNote::find(&tx, a, ws).unwrap().unwrap();
        assert_eq!(stored.position_y, 20.5);

        PinboardNote::delete(&tx, b, ws).unwrap();
        assert!(!Connection::exists(&tx, edge, ws).unwrap());
    }
}
