// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Published schedule queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftboard_domain::{
    CounterAssignment, CounterId, CounterMap, EmployeeId, ScheduleSlot, ShiftId, StoreId,
    WeekStart,
};

use crate::data_models::{AssignmentRow, SlotRow, format_date, parse_date, parse_instant};
use crate::diesel_schema::{schedule_assignments, schedule_slots};
use crate::error::PersistenceError;

/// Lists the published slots of a store's week.
///
/// Slots that were never published are not stored and are not returned.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_week_slots(
    conn: &mut SqliteConnection,
    store_id: &StoreId,
    week_start: WeekStart,
) -> Result<Vec<ScheduleSlot>, PersistenceError> {
    let days: [time::Date; 7] = week_start.days()?;
    let first: String = format_date(days[0])?;
    let last: String = format_date(days[6])?;

    let rows: Vec<SlotRow> = schedule_slots::table
        .filter(schedule_slots::store_id.eq(store_id.value()))
        .filter(schedule_slots::slot_date.ge(first))
        .filter(schedule_slots::slot_date.le(last))
        .order((schedule_slots::slot_date.asc(), schedule_slots::shift_id.asc()))
        .select(SlotRow::as_select())
        .load(conn)?;

    rows.into_iter().map(|row| assemble(conn, row)).collect()
}

/// Finds one published slot.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn find_slot(
    conn: &mut SqliteConnection,
    store_id: &StoreId,
    date: time::Date,
    shift_id: &ShiftId,
) -> Result<Option<ScheduleSlot>, PersistenceError> {
    let row: Option<SlotRow> = schedule_slots::table
        .filter(schedule_slots::store_id.eq(store_id.value()))
        .filter(schedule_slots::slot_date.eq(format_date(date)?))
        .filter(schedule_slots::shift_id.eq(shift_id.value()))
        .select(SlotRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|row| assemble(conn, row)).transpose()
}

/// Returns the stored version of a slot, `0` if it was never published.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn stored_slot_version(
    conn: &mut SqliteConnection,
    store_id: &StoreId,
    date: time::Date,
    shift_id: &ShiftId,
) -> Result<i64, PersistenceError> {
    let version: Option<i64> = schedule_slots::table
        .filter(schedule_slots::store_id.eq(store_id.value()))
        .filter(schedule_slots::slot_date.eq(format_date(date)?))
        .filter(schedule_slots::shift_id.eq(shift_id.value()))
        .select(schedule_slots::version)
        .first(conn)
        .optional()?;
    Ok(version.unwrap_or(0))
}

fn assemble(conn: &mut SqliteConnection, row: SlotRow) -> Result<ScheduleSlot, PersistenceError> {
    let assignment_rows: Vec<AssignmentRow> = schedule_assignments::table
        .filter(schedule_assignments::slot_id.eq(row.slot_id))
        .order(schedule_assignments::position.asc())
        .select(AssignmentRow::as_select())
        .load(conn)?;

    let mut assignments: CounterMap = CounterMap::new();
    for assignment in assignment_rows {
        let employee_id: EmployeeId = EmployeeId::new(&assignment.employee_id);
        let entry: &mut CounterAssignment = assignments
            .entry(CounterId::new(&assignment.counter_id))
            .or_default();
        if assignment.assigned_by_manager != 0 {
            entry.assigned_by_manager.push(employee_id.clone());
        }
        entry.employee_ids.push(employee_id);
    }

    Ok(ScheduleSlot {
        store_id: StoreId::new(&row.store_id),
        date: parse_date(&row.slot_date)?,
        shift_id: ShiftId::new(&row.shift_id),
        version: row.version,
        assignments,
        published_at: row.published_at.as_deref().map(parse_instant).transpose()?,
        published_by: row.published_by.as_deref().map(EmployeeId::new),
    })
}
