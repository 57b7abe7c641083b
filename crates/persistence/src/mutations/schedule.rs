// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Published schedule writes.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftboard_domain::{EmployeeId, ScheduleSlot};
use tracing::debug;

use crate::data_models::{format_date, format_instant};
use crate::diesel_schema::{schedule_assignments, schedule_slots};
use crate::error::PersistenceError;

/// Writes a slot and replaces its assignment rows.
///
/// Version checks are the caller's job.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn save_slot(conn: &mut SqliteConnection, slot: &ScheduleSlot) -> Result<(), PersistenceError> {
    let published_at: Option<String> = slot.published_at.map(format_instant).transpose()?;
    let published_by: Option<&str> = slot.published_by.as_ref().map(EmployeeId::value);

    let slot_id: i64 = diesel::insert_into(schedule_slots::table)
        .values((
            schedule_slots::store_id.eq(slot.store_id.value()),
            schedule_slots::slot_date.eq(format_date(slot.date)?),
            schedule_slots::shift_id.eq(slot.shift_id.value()),
            schedule_slots::version.eq(slot.version),
            schedule_slots::published_at.eq(&published_at),
            schedule_slots::published_by.eq(published_by),
        ))
        .on_conflict((
            schedule_slots::store_id,
            schedule_slots::slot_date,
            schedule_slots::shift_id,
        ))
        .do_update()
        .set((
            schedule_slots::version.eq(slot.version),
            schedule_slots::published_at.eq(&published_at),
            schedule_slots::published_by.eq(published_by),
        ))
        .returning(schedule_slots::slot_id)
        .get_result(conn)?;

    diesel::delete(schedule_assignments::table.filter(schedule_assignments::slot_id.eq(slot_id)))
        .execute(conn)?;

    let mut position: i32 = 0;
    for (counter_id, assignment) in &slot.assignments {
        for employee_id in &assignment.employee_ids {
            let forced: i32 = i32::from(assignment.assigned_by_manager.contains(employee_id));
            diesel::insert_into(schedule_assignments::table)
                .values((
                    schedule_assignments::slot_id.eq(slot_id),
                    schedule_assignments::employee_id.eq(employee_id.value()),
                    schedule_assignments::counter_id.eq(counter_id.value()),
                    schedule_assignments::position.eq(position),
                    schedule_assignments::assigned_by_manager.eq(forced),
                ))
                .execute(conn)?;
            position += 1;
        }
    }

    debug!(
        slot_id,
        date = %slot.date,
        shift_id = %slot.shift_id,
        version = slot.version,
        "Saved schedule slot"
    );
    Ok(())
}
