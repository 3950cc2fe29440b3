//! Connections between pinboard notes.
//!
//! A connection whose endpoint cannot be found is dropped from the snapshot
//! with a warning rather than failing the pass.

use super::{reconcile_all, sweep, Reconciled};
use crate::context::PassContext;
use crate::error::SyncResult;
use crate::idmap::CrossReferenceMap;
use chrono::{DateTime, Utc};
use notesync_core::{Connection, EntityTable, PinboardNote};
use notesync_sync_protocol::ConnectionRecord;
use tracing::warn;

pub(crate) fn reconcile(
    ctx: &mut PassContext<'_>,
    records: &[ConnectionRecord],
    pins: &CrossReferenceMap,
) -> SyncResult<Reconciled> {
    let outcome = reconcile_all(ctx, records, |ctx, r| {
        let from = resolve_endpoint(ctx, pins, r.from_note_id)?;
        let to = resolve_endpoint(ctx, pins, r.to_note_id)?;
        match (from, to) {
            (Some(from), Some(to)) => Ok(Some(draft(r, from, to, ctx.now))),
            _ => {
                warn!(
                    workspace_id = ctx.workspace_id,
                    connection_id = ?r.id,
                    from_note_id = r.from_note_id,
                    to_note_id = r.to_note_id,
                    "skipping connection with unknown endpoint"
                );
                Ok(None)
            }
        }
    })?;
    sweep::<Connection>(ctx, &outcome.processed)?;
    Ok(outcome)
}

fn resolve_endpoint(
    ctx: &PassContext<'_>,
    pins: &CrossReferenceMap,
    raw: i64,
) -> SyncResult<Option<i64>> {
    if let Some(id) = pins.resolve(raw) {
        return Ok(Some(id));
    }
    if raw > 0 && PinboardNote::exists(ctx.conn, raw, ctx.workspace_id)? {
        return Ok(Some(raw));
    }
    Ok(None)
}

fn draft(r: &ConnectionRecord, from: i64, to: i64, now: DateTime<Utc>) -> Connection {
    Connection {
        id: 0,
        workspace_id: 0,
        from_note_id: from,
        to_note_id: to,
        name: r.name.clone(),
        connection_color: r.connection_color,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn to_record(row: &Connection) -> ConnectionRecord {
    ConnectionRecord {
        id: Some(row.id),
        workspace_id: Some(row.workspace_id),
        from_note_id: row.from_note_id,
        to_note_id: row.to_note_id,
        name: row.name.clone(),
        connection_color: row.connection_color,
        created_at: Some(row.created_at),
        updated_at: Some(row.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::pinboard;
    use crate::reconcile::test_support::{context, harness};
    use notesync_blob::BlobLedger;
    use notesync_core::EntityKind;
    use notesync_sync_protocol::PinboardNoteRecord;

    fn link(id: i64, from: i64, to: i64) -> ConnectionRecord {
        ConnectionRecord {
            id: Some(id),
            from_note_id: from,
            to_note_id: to,
            name: "rel".into(),
            ..Default::default()
        }
    }

    #[test]
    fn endpoints_follow_remapped_pins() {
        let mut h = harness();
        let ws = h.workspace_id;
        let tx = h.session.begin_write().unwrap();
        let mut ledger = BlobLedger::new();
        let mut ctx = context(&tx, ws, &h.blobs, &mut ledger);

        let pins = pinboard::reconcile(
            &mut ctx,
            &[
                PinboardNoteRecord {
                    id: Some(5),
                    title: "a".into(),
                    ..Default::default()
                },
                PinboardNoteRecord {
                    id: Some(6),
                    title: "b".into(),
                    ..Default::default()
                },
            ],
        )
        .unwrap();
        let a = pins.ids.resolve(5).unwrap();
        let b = pins.ids.resolve(6).unwrap();

        let out = reconcile(&mut ctx, &[link(0, 5, 6), link(0, 5, 77)], &pins.ids).unwrap();
        assert_eq!(out.assigned[1], None);
        assert_eq!(ctx.stats.kind(EntityKind::Connection).skipped, 1);

        let rows = Connection::list(&tx, ws).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!((rows[0].from_note_id, rows[0].to_note_id), (a, b));
    }

    #[test]
    fn endpoints_fall_back_to_existing_pins() {
        let mut h = harness();
        let ws = h.workspace_id;
        let tx = h.session.begin_write().unwrap();
        let mut ledger = BlobLedger::new();
        let mut ctx = context(&tx, ws, &h.blobs, &mut ledger);

        let pins = pinboard::reconcile(&mut ctx, &vec![PinboardNoteRecord::default(); 2]).unwrap();
        let first = pins.assigned[0].unwrap();
        let second = pins.assigned[1].unwrap();

        let empty = CrossReferenceMap::new(EntityKind::PinboardNote);
        let out = reconcile(&mut ctx, &[link(0, first, second)], &empty).unwrap();
        assert!(out.assigned[0].is_some());
    }
}
