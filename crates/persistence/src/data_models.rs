// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row shapes and column encodings.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::diesel_schema::{
    audit_events, counters, draft_scratch, employees, registration_shifts, schedule_assignments,
    schedule_slots, weekly_registrations,
};
use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub employee_id: String,
    pub role: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = employees)]
pub struct EmployeeRow {
    pub employee_id: String,
    pub store_id: String,
    pub name: String,
    pub employee_type: String,
    pub role: String,
    pub is_active: i32,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = counters)]
pub struct CounterRow {
    pub counter_id: String,
    pub name: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = weekly_registrations)]
pub struct RegistrationRow {
    pub registration_id: i64,
    pub employee_id: String,
    pub store_id: String,
    pub week_start: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = registration_shifts)]
pub struct ShiftRow {
    pub registration_id: i64,
    pub shift_date: String,
    pub shift_id: String,
    pub origin: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = schedule_slots)]
pub struct SlotRow {
    pub slot_id: i64,
    pub store_id: String,
    pub slot_date: String,
    pub shift_id: String,
    pub version: i64,
    pub published_at: Option<String>,
    pub published_by: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = schedule_assignments)]
pub struct AssignmentRow {
    pub employee_id: String,
    pub counter_id: String,
    pub assigned_by_manager: i32,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = draft_scratch)]
pub struct ScratchRow {
    pub assignments_json: String,
    pub base_version: i64,
}

/// Diesel Queryable struct for full audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
pub struct AuditEventRow {
    pub event_id: i64,
    pub store_id: String,
    pub week_start: Option<String>,
    pub slot_date: Option<String>,
    pub shift_id: Option<String>,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
}

/// Formats a date the way every date column stores it (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn format_date(date: Date) -> Result<String, PersistenceError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored `YYYY-MM-DD` column.
///
/// # Errors
///
/// Returns an error if the column is malformed.
pub fn parse_date(value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| PersistenceError::ReconstructionError(format!("bad date '{value}': {e}")))
}

/// Formats an instant as RFC 3339.
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted.
pub fn format_instant(instant: OffsetDateTime) -> Result<String, PersistenceError> {
    instant
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored RFC 3339 instant.
///
/// # Errors
///
/// Returns an error if the column is malformed.
pub fn parse_instant(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::ReconstructionError(format!("bad instant '{value}': {e}")))
}
