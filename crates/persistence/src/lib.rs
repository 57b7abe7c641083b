// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Shiftboard registration engine.
//!
//! This crate stores store configuration, weekly registrations, published
//! schedule slots, draft scratch entries and audit events in `SQLite`
//! through Diesel.
//!
//! ## Write Model
//!
//! Commands are evaluated by the core crate against a state loaded from
//! here. The resulting transition is committed through
//! [`Persistence::persist_transition`], which writes the changed rows and
//! the audit event in one transaction and re-checks the registration gate
//! and slot versions inside it.
//!
//! ## Testing Philosophy
//!
//! - Tests run against isolated in-memory databases
//! - Each call to [`Persistence::new_in_memory`] gets a fresh database

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use shiftboard::{State, StoreContext, TransitionResult};
use shiftboard_audit::AuditEvent;
use shiftboard_domain::{
    Counter, Employee, EmployeeId, ScheduleSlot, Settings, ShiftId, StoreId, WeekStart,
    WeeklyRegistration,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, Month};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod scratch;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use mutations::{CommitGuard, PersistTransitionResult};

/// Persistence adapter for the registration engine.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database, so tests are
    /// isolated from one another.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:shiftboard_mem_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a store or replaces its settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_store(
        &mut self,
        store_id: &StoreId,
        settings: &Settings,
    ) -> Result<(), PersistenceError> {
        mutations::upsert_store(&mut self.conn, store_id, settings)
    }

    /// Creates an employee or replaces their profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_employee(&mut self, employee: &Employee) -> Result<(), PersistenceError> {
        mutations::upsert_employee(&mut self.conn, employee)
    }

    /// Replaces a store's counters, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn replace_counters(
        &mut self,
        store_id: &StoreId,
        counters: &[Counter],
    ) -> Result<(), PersistenceError> {
        mutations::replace_counters(&mut self.conn, store_id, counters)
    }

    /// Loads a store's settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unknown.
    pub fn load_settings(&mut self, store_id: &StoreId) -> Result<Settings, PersistenceError> {
        queries::load_settings(&mut self.conn, store_id)
    }

    /// Loads settings, employees and counters of a store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unknown or a row is malformed.
    pub fn load_store_context(
        &mut self,
        store_id: &StoreId,
    ) -> Result<StoreContext, PersistenceError> {
        queries::load_store_context(&mut self.conn, store_id)
    }

    /// Loads the registrations and published slots of a store's week.
    ///
    /// Published slots list every counter of the store, empty ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a row is malformed.
    pub fn load_state(
        &mut self,
        store: &StoreContext,
        week_start: WeekStart,
    ) -> Result<State, PersistenceError> {
        let mut state: State = State::new(store.store_id.clone(), week_start);
        state.registrations =
            queries::list_week_registrations(&mut self.conn, &store.store_id, week_start)?;
        state.slots = queries::list_week_slots(&mut self.conn, &store.store_id, week_start)?;
        for slot in &mut state.slots {
            for counter in &store.counters {
                slot.assignments.entry(counter.id.clone()).or_default();
            }
        }
        Ok(state)
    }

    /// Finds one employee's registration for a week.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_registration(
        &mut self,
        employee_id: &EmployeeId,
        week_start: WeekStart,
    ) -> Result<Option<WeeklyRegistration>, PersistenceError> {
        queries::find_registration(&mut self.conn, employee_id, week_start)
    }

    /// Finds a registration by its storage id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_registration(
        &mut self,
        registration_id: i64,
    ) -> Result<Option<WeeklyRegistration>, PersistenceError> {
        queries::get_registration(&mut self.conn, registration_id)
    }

    /// Saves a registration as the employee's full week.
    ///
    /// This is a storage primitive: it performs no rule validation and
    /// accepts an empty shift list. Commands go through
    /// [`Persistence::persist_transition`].
    ///
    /// # Returns
    ///
    /// The registration ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save_registration(
        &mut self,
        registration: &WeeklyRegistration,
    ) -> Result<i64, PersistenceError> {
        self.conn
            .immediate_transaction(|conn| mutations::save_registration(conn, registration))
    }

    /// Lists an employee's registrations for every week touching a month.
    ///
    /// # Errors
    ///
    /// Returns an error if the month is invalid or a query fails.
    pub fn registrations_in_month(
        &mut self,
        employee_id: &EmployeeId,
        year: i32,
        month: Month,
    ) -> Result<Vec<WeeklyRegistration>, PersistenceError> {
        let first: Date = Date::from_calendar_date(year, month, 1)
            .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
        let last: Date = Date::from_calendar_date(year, month, month.length(year))
            .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

        queries::list_employee_registrations(
            &mut self.conn,
            employee_id,
            WeekStart::containing(first)?,
            WeekStart::containing(last)?,
        )
    }

    /// Finds one published slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_slot(
        &mut self,
        store_id: &StoreId,
        date: Date,
        shift_id: &ShiftId,
    ) -> Result<Option<ScheduleSlot>, PersistenceError> {
        queries::find_slot(&mut self.conn, store_id, date, shift_id)
    }

    /// Commits a transition result computed against `previous`.
    ///
    /// # Errors
    ///
    /// Returns an error if a guarded condition no longer holds or a write
    /// fails. Nothing is written on error.
    pub fn persist_transition(
        &mut self,
        previous: &State,
        result: &TransitionResult,
        guard: CommitGuard,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        mutations::persist_transition(&mut self.conn, previous, result, guard)
    }

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the event does not exist.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::get_audit_event(&mut self.conn, event_id)
    }

    /// Lists a store's audit events, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_audit_events(
        &mut self,
        store_id: &StoreId,
        after_event_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::list_audit_events(&mut self.conn, store_id, after_event_id, limit)
    }
}
