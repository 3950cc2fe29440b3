//! Schedule entries.

use super::{reconcile_all, sweep, Reconciled};
use crate::context::PassContext;
use crate::error::SyncResult;
use chrono::{DateTime, Utc};
use notesync_core::ScheduleEntry;
use notesync_sync_protocol::ScheduleEntryRecord;

pub(crate) fn reconcile(
    ctx: &mut PassContext<'_>,
    records: &[ScheduleEntryRecord],
) -> SyncResult<Reconciled> {
    let outcome = reconcile_all(ctx, records, |ctx, r| Ok(Some(draft(r, ctx.now))))?;
    sweep::<ScheduleEntry>(ctx, &outcome.processed)?;
    Ok(outcome)
}

fn draft(r: &ScheduleEntryRecord, now: DateTime<Utc>) -> ScheduleEntry {
    ScheduleEntry {
        id: 0,
        workspace_id: 0,
        time: r.time.clone(),
        date: r.date.clone(),
        note: r.note.clone(),
        dynamic_fields_json: r.dynamic_fields_json.clone(),
        recurrence_json: r.recurrence_json.clone(),
        tags_json: r.tags_json.clone(),
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn to_record(row: &ScheduleEntry) -> ScheduleEntryRecord {
    ScheduleEntryRecord {
        id: Some(row.id),
        workspace_id: Some(row.workspace_id),
        time: row.time.clone(),
        date: row.date.clone(),
        note: row.note.clone(),
        dynamic_fields_json: row.dynamic_fields_json.clone(),
        recurrence_json: row.recurrence_json.clone(),
        tags_json: row.tags_json.clone(),
        created_at: Some(row.created_at),
        updated_at: Some(row.updated_at),
    }
}
