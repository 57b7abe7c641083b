// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftboard_audit::AuditEvent;
use shiftboard_domain::ShiftId;
use tracing::debug;

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData, format_date};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Persists an audit event.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `event` - The audit event to persist
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence or serialization fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let actor_data: ActorData = ActorData {
        employee_id: event.actor.employee_id.to_string(),
        role: event.actor.role.clone(),
    };
    let cause_data: CauseData = CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    };
    let action_data: ActionData = ActionData {
        name: event.action.kind.as_str().to_string(),
        details: event.action.details.clone(),
    };
    let before_data: StateSnapshotData = StateSnapshotData {
        data: event.before.data.clone(),
    };
    let after_data: StateSnapshotData = StateSnapshotData {
        data: event.after.data.clone(),
    };

    let week_start: Option<String> = event
        .scope
        .week_start
        .map(|week| format_date(week.date()))
        .transpose()?;
    let slot_date: Option<String> = event.scope.date.map(format_date).transpose()?;

    let event_id: i64 = diesel::insert_into(audit_events::table)
        .values((
            audit_events::store_id.eq(event.scope.store_id.value()),
            audit_events::week_start.eq(week_start),
            audit_events::slot_date.eq(slot_date),
            audit_events::shift_id.eq(event.scope.shift_id.as_ref().map(ShiftId::value)),
            audit_events::action_kind.eq(event.action.kind.as_str()),
            audit_events::actor_json.eq(serde_json::to_string(&actor_data)?),
            audit_events::cause_json.eq(serde_json::to_string(&cause_data)?),
            audit_events::action_json.eq(serde_json::to_string(&action_data)?),
            audit_events::before_snapshot_json.eq(serde_json::to_string(&before_data)?),
            audit_events::after_snapshot_json.eq(serde_json::to_string(&after_data)?),
        ))
        .returning(audit_events::event_id)
        .get_result(conn)?;

    debug!(event_id, action = event.action.kind.as_str(), "Persisted audit event");
    Ok(event_id)
}
