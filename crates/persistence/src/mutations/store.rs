// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store configuration writes.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftboard_domain::{Counter, Employee, Settings, StoreId};
use tracing::debug;

use crate::diesel_schema::{counters, employees, stores};
use crate::error::PersistenceError;

/// Creates a store or replaces its settings.
///
/// # Errors
///
/// Returns an error if the settings cannot be encoded or the write fails.
pub fn upsert_store(
    conn: &mut SqliteConnection,
    store_id: &StoreId,
    settings: &Settings,
) -> Result<(), PersistenceError> {
    let settings_json: String = serde_json::to_string(settings)?;

    diesel::insert_into(stores::table)
        .values((
            stores::store_id.eq(store_id.value()),
            stores::settings_json.eq(&settings_json),
        ))
        .on_conflict(stores::store_id)
        .do_update()
        .set(stores::settings_json.eq(&settings_json))
        .execute(conn)?;

    debug!(store_id = %store_id, "Saved store settings");
    Ok(())
}

/// Creates an employee or replaces their profile.
///
/// # Errors
///
/// Returns an error if the write fails (for example an unknown store).
pub fn upsert_employee(
    conn: &mut SqliteConnection,
    employee: &Employee,
) -> Result<(), PersistenceError> {
    let is_active: i32 = i32::from(employee.is_active);

    diesel::insert_into(employees::table)
        .values((
            employees::employee_id.eq(employee.id.value()),
            employees::store_id.eq(employee.store_id.value()),
            employees::name.eq(&employee.name),
            employees::employee_type.eq(employee.employee_type.as_str()),
            employees::role.eq(employee.role.as_str()),
            employees::is_active.eq(is_active),
        ))
        .on_conflict(employees::employee_id)
        .do_update()
        .set((
            employees::store_id.eq(employee.store_id.value()),
            employees::name.eq(&employee.name),
            employees::employee_type.eq(employee.employee_type.as_str()),
            employees::role.eq(employee.role.as_str()),
            employees::is_active.eq(is_active),
        ))
        .execute(conn)?;
    Ok(())
}

/// Replaces a store's counter list, keeping the given order.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn replace_counters(
    conn: &mut SqliteConnection,
    store_id: &StoreId,
    counter_list: &[Counter],
) -> Result<(), PersistenceError> {
    diesel::delete(counters::table.filter(counters::store_id.eq(store_id.value())))
        .execute(conn)?;

    for (position, counter) in counter_list.iter().enumerate() {
        let position: i32 = i32::try_from(position)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        diesel::insert_into(counters::table)
            .values((
                counters::store_id.eq(store_id.value()),
                counters::counter_id.eq(counter.id.value()),
                counters::name.eq(&counter.name),
                counters::position.eq(position),
            ))
            .execute(conn)?;
    }

    debug!(store_id = %store_id, count = counter_list.len(), "Replaced counters");
    Ok(())
}
