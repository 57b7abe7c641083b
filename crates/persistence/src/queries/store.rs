// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store configuration queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use shiftboard::StoreContext;
use shiftboard_domain::{Counter, CounterId, Employee, EmployeeId, Settings, StoreId};

use crate::data_models::{CounterRow, EmployeeRow};
use crate::diesel_schema::{counters, employees, stores};
use crate::error::PersistenceError;

/// Loads a store's settings.
///
/// # Errors
///
/// Returns `PersistenceError::StoreNotFound` if the store is not configured,
/// or an error if the stored settings cannot be decoded.
pub fn load_settings(
    conn: &mut SqliteConnection,
    store_id: &StoreId,
) -> Result<Settings, PersistenceError> {
    let settings_json: Option<String> = stores::table
        .filter(stores::store_id.eq(store_id.value()))
        .select(stores::settings_json)
        .first::<String>(conn)
        .optional()?;

    let settings_json: String =
        settings_json.ok_or_else(|| PersistenceError::StoreNotFound(store_id.to_string()))?;
    Ok(serde_json::from_str(&settings_json)?)
}

/// Lists every employee of a store, active or not.
///
/// # Errors
///
/// Returns an error if the query fails or a row is malformed.
pub fn list_employees(
    conn: &mut SqliteConnection,
    store_id: &StoreId,
) -> Result<Vec<Employee>, PersistenceError> {
    let rows: Vec<EmployeeRow> = employees::table
        .filter(employees::store_id.eq(store_id.value()))
        .order(employees::employee_id.asc())
        .select(EmployeeRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| -> Result<Employee, PersistenceError> {
            Ok(Employee {
                id: EmployeeId::new(&row.employee_id),
                name: row.name,
                employee_type: row.employee_type.parse()?,
                role: row.role.parse()?,
                store_id: StoreId::new(&row.store_id),
                is_active: row.is_active != 0,
            })
        })
        .collect()
}

/// Lists a store's counters in their configured order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_counters(
    conn: &mut SqliteConnection,
    store_id: &StoreId,
) -> Result<Vec<Counter>, PersistenceError> {
    let rows: Vec<CounterRow> = counters::table
        .filter(counters::store_id.eq(store_id.value()))
        .order((counters::position.asc(), counters::counter_id.asc()))
        .select(CounterRow::as_select())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| Counter {
            id: CounterId::new(&row.counter_id),
            name: row.name,
        })
        .collect())
}

/// Loads everything a command needs to know about a store.
///
/// # Errors
///
/// Returns an error if the store is unknown or a row is malformed.
pub fn load_store_context(
    conn: &mut SqliteConnection,
    store_id: &StoreId,
) -> Result<StoreContext, PersistenceError> {
    Ok(StoreContext {
        store_id: store_id.clone(),
        settings: load_settings(conn, store_id)?,
        employees: list_employees(conn, store_id)?,
        counters: list_counters(conn, store_id)?,
    })
}
