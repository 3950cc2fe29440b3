//! Pinboard notes.

use super::{delete_rows, reconcile_all, stale_ids, Reconciled};
use crate::context::PassContext;
use crate::error::SyncResult;
use chrono::{DateTime, Utc};
use notesync_core::{Connection, EntityTable, PinboardNote};
use notesync_sync_protocol::PinboardNoteRecord;
use std::collections::BTreeSet;

pub(crate) fn reconcile(
    ctx: &mut PassContext<'_>,
    records: &[PinboardNoteRecord],
) -> SyncResult<Reconciled> {
    let outcome = reconcile_all(ctx, records, |ctx, r| Ok(Some(draft(r, ctx.now))))?;
    let stale = stale_ids::<PinboardNote>(ctx, &outcome.processed)?;
    drop_connections(ctx, &stale)?;
    delete_rows::<PinboardNote>(ctx, &stale)?;
    Ok(outcome)
}

/// Deletes the connections touching any of `pins` so each one is recorded
/// instead of vanishing through the cascade.
fn drop_connections(ctx: &mut PassContext<'_>, pins: &[i64]) -> SyncResult<()> {
    if pins.is_empty() {
        return Ok(());
    }
    let pins: BTreeSet<i64> = pins.iter().copied().collect();
    let attached: Vec<i64> = Connection::list(ctx.conn, ctx.workspace_id)?
        .into_iter()
        .filter(|c| pins.contains(&c.from_note_id) || pins.contains(&c.to_note_id))
        .map(|c| c.id)
        .collect();
    delete_rows::<Connection>(ctx, &attached)
}

fn draft(r: &PinboardNoteRecord, now: DateTime<Utc>) -> PinboardNote {
    PinboardNote {
        id: 0,
        workspace_id: 0,
        title: r.title.clone(),
        content: r.content.clone(),
        position_x: r.position_x,
        position_y: r.position_y,
        width: r.width,
        height: r.height,
        background_color: r.background_color,
        icon: r.icon,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn to_record(row: &PinboardNote) -> PinboardNoteRecord {
    PinboardNoteRecord {
        id: Some(row.id),
        workspace_id: Some(row.workspace_id),
        title: row.title.clone(),
        content: row.content.clone(),
        position_x: row.position_x,
        position_y: row.position_y,
        width: row.width,
        height: row.height,
        background_color: row.background_color,
        icon: row.icon,
        created_at: Some(row.created_at),
        updated_at: Some(row.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::connection;
    use crate::reconcile::test_support::{context, harness};
    use notesync_blob::BlobLedger;
    use notesync_core::{store, ChangeOperation, EntityKind};
    use notesync_sync_protocol::ConnectionRecord;

    fn pin(id: i64, title: &str) -> PinboardNoteRecord {
        PinboardNoteRecord {
            id: Some(id),
            title: title.into(),
            ..Default::default()
        }
    }

    #[test]
    fn removed_pin_takes_its_connections_with_it() {
        let mut h = harness();
        let ws = h.workspace_id;
        let tx = h.session.begin_write().unwrap();
        let mut ledger = BlobLedger::new();

        let (a, b) = {
            let mut ctx = context(&tx, ws, &h.blobs, &mut ledger);
            let pins = reconcile(&mut ctx, &[pin(1, "a"), pin(2, "b")]).unwrap();
            let link = ConnectionRecord {
                id: Some(0),
                from_note_id: 1,
                to_note_id: 2,
                ..Default::default()
            };
            connection::reconcile(&mut ctx, &[link], &pins.ids).unwrap();
            (pins.ids.resolve(1).unwrap(), pins.ids.resolve(2).unwrap())
        };
        assert_eq!(Connection::count(&tx, ws).unwrap(), 1);
        let link_id = Connection::ids(&tx, ws).unwrap()[0];

        let mut ctx = context(&tx, ws, &h.blobs, &mut ledger);
        reconcile(&mut ctx, &[pin(a, "a")]).unwrap();
        assert!(PinboardNote::exists(&tx, a, ws).unwrap());
        assert!(!PinboardNote::exists(&tx, b, ws).unwrap());
        assert_eq!(Connection::count(&tx, ws).unwrap(), 0);
        assert_eq!(ctx.stats.kind(EntityKind::Connection).deleted, 1);
        assert_eq!(ctx.stats.kind(EntityKind::PinboardNote).deleted, 1);

        let logged: Vec<(EntityKind, i64)> = store::changelog::since(&tx, ws, 0, 100)
            .unwrap()
            .changes
            .into_iter()
            .filter(|c| c.operation == ChangeOperation::Delete)
            .map(|c| (c.entity_kind, c.entity_id))
            .collect();
        assert_eq!(
            logged,
            vec![(EntityKind::Connection, link_id), (EntityKind::PinboardNote, b)]
        );
    }
}
