//! Workspace change log.
//!
//! Each sync pass appends one entry per created, updated or deleted row,
//! stamped with the workspace version the pass produced. The log is a read
//! facility for clients that want to know what changed; reconciliation never
//! consults it.

use crate::error::{CoreError, CoreResult};
use crate::model::ChangeEntry;
use crate::types::{ChangeOperation, EntityKind};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

/// A page of change log entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangePage {
    /// Entries ordered by version, then insertion.
    pub changes: Vec<ChangeEntry>,
    /// True if more entries follow the page.
    pub has_more: bool,
}

/// Appends one entry.
pub fn record(
    conn: &Connection,
    workspace_id: i64,
    version: i64,
    kind: EntityKind,
    entity_id: i64,
    operation: ChangeOperation,
    user_id: i64,
) -> CoreResult<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO sync_changes (workspace_id, version, entity_kind, entity_id, operation, user_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    stmt.execute(params![
        workspace_id,
        version,
        kind.as_str(),
        entity_id,
        operation.as_str(),
        user_id,
        Utc::now(),
    ])?;
    Ok(())
}

/// Returns up to `limit` entries recorded after `after_version`.
pub fn since(
    conn: &Connection,
    workspace_id: i64,
    after_version: i64,
    limit: u32,
) -> CoreResult<ChangePage> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, workspace_id, version, entity_kind, entity_id, operation, user_id, created_at
         FROM sync_changes
         WHERE workspace_id = ?1 AND version > ?2
         ORDER BY version, id
         LIMIT ?3",
    )?;
    let rows = stmt
        .query_map(params![workspace_id, after_version, i64::from(limit) + 1], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, DateTime<Utc>>(7)?,
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut changes = Vec::with_capacity(rows.len());
    for (id, workspace_id, version, kind, entity_id, operation, user_id, created_at) in rows {
        changes.push(ChangeEntry {
            id,
            workspace_id,
            version,
            entity_kind: kind.parse().map_err(CoreError::invalid_data)?,
            entity_id,
            operation: operation.parse().map_err(CoreError::invalid_data)?,
            user_id,
            created_at,
        });
    }

    let has_more = changes.len() > limit as usize;
    changes.truncate(limit as usize);
    Ok(ChangePage { changes, has_more })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::fixture;

    #[test]
    fn record_and_page() {
        let mut fx = fixture();
        let ws = fx.workspace_id;
        let tx = fx.session.begin_write().unwrap();

        record(&tx, ws, 1, EntityKind::Note, 10, ChangeOperation::Create, 1).unwrap();
        record(&tx, ws, 1, EntityKind::Folder, 3, ChangeOperation::Update, 1).unwrap();
        record(&tx, ws, 2, EntityKind::Note, 10, ChangeOperation::Delete, 2).unwrap();

        let page = since(&tx, ws, 0, 2).unwrap();
        assert_eq!(page.changes.len(), 2);
        assert!(page.has_more);
        assert_eq!(page.changes[0].entity_kind, EntityKind::Note);
        assert_eq!(page.changes[1].operation, ChangeOperation::Update);

        let page = since(&tx, ws, 1, 10).unwrap();
        assert_eq!(page.changes.len(), 1);
        assert!(!page.has_more);
        assert_eq!(page.changes[0].user_id, 2);
    }

    #[test]
    fn unknown_kind_is_invalid_data() {
        let mut fx = fixture();
        let ws = fx.workspace_id;
        let tx = fx.session.begin_write().unwrap();
        tx.execute(
            "INSERT INTO sync_changes (workspace_id, version, entity_kind, entity_id, operation, user_id, created_at)
             VALUES (?1, 1, 'widget', 1, 'create', 1, ?2)",
            params![ws, Utc::now()],
        )
        .unwrap();
        assert!(matches!(
            since(&tx, ws, 0, 10).unwrap_err(),
            CoreError::InvalidData { .. }
        ));
    }
}
