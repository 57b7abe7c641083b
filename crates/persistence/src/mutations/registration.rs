// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly registration writes.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftboard_domain::{EmployeeId, WeekStart, WeeklyRegistration};
use tracing::debug;

use crate::data_models::format_date;
use crate::diesel_schema::{registration_shifts, weekly_registrations};
use crate::error::PersistenceError;

/// Saves a registration as the full week for its employee.
///
/// An existing registration for the same employee and week keeps its ID and
/// has its shift list replaced. An empty shift list is stored as-is.
///
/// # Returns
///
/// The registration ID.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn save_registration(
    conn: &mut SqliteConnection,
    registration: &WeeklyRegistration,
) -> Result<i64, PersistenceError> {
    let week_start: String = format_date(registration.week_start().date())?;

    let registration_id: i64 = diesel::insert_into(weekly_registrations::table)
        .values((
            weekly_registrations::employee_id.eq(registration.employee_id().value()),
            weekly_registrations::store_id.eq(registration.store_id().value()),
            weekly_registrations::week_start.eq(&week_start),
        ))
        .on_conflict((
            weekly_registrations::employee_id,
            weekly_registrations::week_start,
        ))
        .do_update()
        .set(weekly_registrations::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
            "CURRENT_TIMESTAMP",
        )))
        .returning(weekly_registrations::registration_id)
        .get_result(conn)?;

    diesel::delete(
        registration_shifts::table
            .filter(registration_shifts::registration_id.eq(registration_id)),
    )
    .execute(conn)?;

    for entry in registration.shifts() {
        diesel::insert_into(registration_shifts::table)
            .values((
                registration_shifts::registration_id.eq(registration_id),
                registration_shifts::shift_date.eq(format_date(entry.date)?),
                registration_shifts::shift_id.eq(entry.shift_id.value()),
                registration_shifts::origin.eq(entry.origin.as_str()),
            ))
            .execute(conn)?;
    }

    debug!(
        registration_id,
        employee_id = %registration.employee_id(),
        shifts = registration.shifts().len(),
        "Saved registration"
    );
    Ok(registration_id)
}

/// Deletes an employee's registration for a week. Deleting nothing is not an error.
///
/// # Returns
///
/// Whether a registration was deleted.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn delete_registration(
    conn: &mut SqliteConnection,
    employee_id: &EmployeeId,
    week_start: WeekStart,
) -> Result<bool, PersistenceError> {
    let deleted: usize = diesel::delete(
        weekly_registrations::table
            .filter(weekly_registrations::employee_id.eq(employee_id.value()))
            .filter(weekly_registrations::week_start.eq(format_date(week_start.date())?)),
    )
    .execute(conn)?;
    Ok(deleted > 0)
}
