// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly registration queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftboard_domain::{
    EmployeeId, EntryOrigin, ShiftEntry, ShiftId, StoreId, WeekStart, WeeklyRegistration,
};
use tracing::debug;

use crate::data_models::{RegistrationRow, ShiftRow, format_date, parse_date};
use crate::diesel_schema::{registration_shifts, weekly_registrations};
use crate::error::PersistenceError;

/// Lists every saved registration of a store's week.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_week_registrations(
    conn: &mut SqliteConnection,
    store_id: &StoreId,
    week_start: WeekStart,
) -> Result<Vec<WeeklyRegistration>, PersistenceError> {
    let rows: Vec<RegistrationRow> = weekly_registrations::table
        .filter(weekly_registrations::store_id.eq(store_id.value()))
        .filter(weekly_registrations::week_start.eq(format_date(week_start.date())?))
        .order(weekly_registrations::registration_id.asc())
        .select(RegistrationRow::as_select())
        .load(conn)?;

    debug!(
        store_id = %store_id,
        week_start = %week_start,
        count = rows.len(),
        "Loaded week registrations"
    );
    assemble(conn, rows)
}

/// Finds one employee's registration for a week.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn find_registration(
    conn: &mut SqliteConnection,
    employee_id: &EmployeeId,
    week_start: WeekStart,
) -> Result<Option<WeeklyRegistration>, PersistenceError> {
    let rows: Vec<RegistrationRow> = weekly_registrations::table
        .filter(weekly_registrations::employee_id.eq(employee_id.value()))
        .filter(weekly_registrations::week_start.eq(format_date(week_start.date())?))
        .select(RegistrationRow::as_select())
        .load(conn)?;

    Ok(assemble(conn, rows)?.into_iter().next())
}

/// Finds a registration by its storage id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn get_registration(
    conn: &mut SqliteConnection,
    registration_id: i64,
) -> Result<Option<WeeklyRegistration>, PersistenceError> {
    let rows: Vec<RegistrationRow> = weekly_registrations::table
        .filter(weekly_registrations::registration_id.eq(registration_id))
        .select(RegistrationRow::as_select())
        .load(conn)?;

    Ok(assemble(conn, rows)?.into_iter().next())
}

/// Lists an employee's registrations for weeks starting in `[from, to]`.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_employee_registrations(
    conn: &mut SqliteConnection,
    employee_id: &EmployeeId,
    from: WeekStart,
    to: WeekStart,
) -> Result<Vec<WeeklyRegistration>, PersistenceError> {
    // Stored dates are zero-padded ISO strings, so text order is date order.
    let rows: Vec<RegistrationRow> = weekly_registrations::table
        .filter(weekly_registrations::employee_id.eq(employee_id.value()))
        .filter(weekly_registrations::week_start.ge(format_date(from.date())?))
        .filter(weekly_registrations::week_start.le(format_date(to.date())?))
        .order(weekly_registrations::week_start.asc())
        .select(RegistrationRow::as_select())
        .load(conn)?;

    assemble(conn, rows)
}

fn assemble(
    conn: &mut SqliteConnection,
    rows: Vec<RegistrationRow>,
) -> Result<Vec<WeeklyRegistration>, PersistenceError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.registration_id).collect();
    let shift_rows: Vec<ShiftRow> = registration_shifts::table
        .filter(registration_shifts::registration_id.eq_any(&ids))
        .select(ShiftRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| -> Result<WeeklyRegistration, PersistenceError> {
            let mut entries: Vec<ShiftEntry> = Vec::new();
            for shift in shift_rows
                .iter()
                .filter(|shift| shift.registration_id == row.registration_id)
            {
                entries.push(ShiftEntry {
                    date: parse_date(&shift.shift_date)?,
                    shift_id: ShiftId::new(&shift.shift_id),
                    origin: shift.origin.parse::<EntryOrigin>()?,
                });
            }

            let week_start: WeekStart = WeekStart::new(parse_date(&row.week_start)?)?;
            let registration: WeeklyRegistration = WeeklyRegistration::new(
                EmployeeId::new(&row.employee_id),
                StoreId::new(&row.store_id),
                week_start,
                entries,
            )?;
            Ok(registration.with_id(row.registration_id))
        })
        .collect()
}
