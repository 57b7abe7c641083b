// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftboard_audit::{Action, ActionKind, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use shiftboard_domain::{EmployeeId, ShiftId, StoreId, WeekStart};

use crate::data_models::{
    ActionData, ActorData, AuditEventRow, CauseData, StateSnapshotData, parse_date,
};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Retrieves an audit event by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such event exists, or an
/// error if the row cannot be decoded.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    let row: Option<AuditEventRow> = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first(conn)
        .optional()?;

    row.map_or_else(
        || Err(PersistenceError::NotFound(format!("audit event {event_id}"))),
        decode,
    )
}

/// Lists a store's audit events, oldest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `store_id` - The store
/// * `after_event_id` - Only events with a larger ID are returned
/// * `limit` - Maximum number of events
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_audit_events(
    conn: &mut SqliteConnection,
    store_id: &StoreId,
    after_event_id: Option<i64>,
    limit: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    tracing::debug!(store_id = %store_id, ?after_event_id, limit, "Retrieving audit events");

    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::store_id.eq(store_id.value()))
        .filter(audit_events::event_id.gt(after_event_id.unwrap_or(0)))
        .order(audit_events::event_id.asc())
        .limit(limit)
        .select(AuditEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(decode).collect()
}

fn decode(row: AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let actor_data: ActorData = serde_json::from_str(&row.actor_json)?;
    let cause_data: CauseData = serde_json::from_str(&row.cause_json)?;
    let action_data: ActionData = serde_json::from_str(&row.action_json)?;
    let before_data: StateSnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
    let after_data: StateSnapshotData = serde_json::from_str(&row.after_snapshot_json)?;

    let kind: ActionKind = action_data
        .name
        .parse()
        .map_err(PersistenceError::ReconstructionError)?;

    let week_start: Option<WeekStart> = row
        .week_start
        .as_deref()
        .map(|value| -> Result<WeekStart, PersistenceError> {
            Ok(WeekStart::new(parse_date(value)?)?)
        })
        .transpose()?;

    let scope: AuditScope = AuditScope {
        store_id: StoreId::new(&row.store_id),
        week_start,
        date: row.slot_date.as_deref().map(parse_date).transpose()?,
        shift_id: row.shift_id.as_deref().map(ShiftId::new),
    };

    Ok(AuditEvent::new(
        Actor::new(EmployeeId::new(&actor_data.employee_id), actor_data.role),
        Cause::new(cause_data.id, cause_data.description),
        Action::new(kind, action_data.details),
        scope,
        StateSnapshot::new(before_data.data),
        StateSnapshot::new(after_data.data),
    )
    .with_id(row.event_id))
}
