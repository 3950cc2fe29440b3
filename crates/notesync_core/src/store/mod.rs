//! Table access for every stored kind.
//!
//! Content tables implement [`EntityTable`], which supplies the lookups the
//! reconciler needs on top of a per-table insert, update and row mapping.
//! All lookups are scoped to a workspace.

pub mod changelog;
mod connection;
mod folder;
pub mod image;
pub mod member;
mod note;
mod pinboard;
mod schedule;
pub mod workspace;

pub use folder::set_parent as set_folder_parent;

use crate::error::CoreResult;
use crate::model::Entity;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Storage operations of one content table.
pub trait EntityTable: Entity + Sized {
    /// Table name.
    const TABLE: &'static str;
    /// Column list in the order [`EntityTable::from_row`] reads them.
    const COLUMNS: &'static str;

    /// Maps a row selected with [`EntityTable::COLUMNS`].
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Inserts a row and returns the generated identifier. The row's own
    /// identifier is ignored.
    fn insert(conn: &Connection, row: &Self) -> CoreResult<i64>;

    /// Replaces the mutable columns and timestamps of an existing row.
    fn update(conn: &Connection, row: &Self) -> CoreResult<()>;

    /// Looks up a row by identifier within a workspace.
    fn find(conn: &Connection, id: i64, workspace_id: i64) -> CoreResult<Option<Self>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1 AND workspace_id = ?2",
            Self::COLUMNS,
            Self::TABLE
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt
            .query_row(params![id, workspace_id], Self::from_row)
            .optional()?)
    }

    /// Returns true if the workspace has a row with this identifier.
    fn exists(conn: &Connection, id: i64, workspace_id: i64) -> CoreResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1 AND workspace_id = ?2)",
            Self::TABLE
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.query_row(params![id, workspace_id], |row| row.get(0))?)
    }

    /// Lists the workspace's rows ordered by identifier.
    fn list(conn: &Connection, workspace_id: i64) -> CoreResult<Vec<Self>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE workspace_id = ?1 ORDER BY id",
            Self::COLUMNS,
            Self::TABLE
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map(params![workspace_id], Self::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Lists the workspace's row identifiers in order.
    fn ids(conn: &Connection, workspace_id: i64) -> CoreResult<Vec<i64>> {
        let sql = format!(
            "SELECT id FROM {} WHERE workspace_id = ?1 ORDER BY id",
            Self::TABLE
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        let ids = stmt
            .query_map(params![workspace_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }

    /// Deletes a row, returning true if it existed.
    fn delete(conn: &Connection, id: i64, workspace_id: i64) -> CoreResult<bool> {
        let sql = format!(
            "DELETE FROM {} WHERE id = ?1 AND workspace_id = ?2",
            Self::TABLE
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.execute(params![id, workspace_id])? > 0)
    }

    /// Counts the workspace's rows.
    fn count(conn: &Connection, workspace_id: i64) -> CoreResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE workspace_id = ?1", Self::TABLE);
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.query_row(params![workspace_id], |row| row.get(0))?)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::database::{Database, Session};
    use tempfile::TempDir;

    pub(crate) struct Fixture {
        pub(crate) session: Session,
        pub(crate) workspace_id: i64,
        _dir: TempDir,
    }

    pub(crate) fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db")).unwrap();
        let mut session = db.session().unwrap();
        let workspace = session
            .write(|tx| super::workspace::create(tx, "test", 1))
            .unwrap();
        Fixture {
            session,
            workspace_id: workspace.id,
            _dir: dir,
        }
    }
}
