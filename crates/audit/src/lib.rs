// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Audit trail for registration and scheduling changes.
//!
//! Every successful state change produces exactly one [`AuditEvent`].
//! Events are immutable once created.

#[cfg(test)]
mod tests;

use shiftboard_domain::{EmployeeId, ShiftId, StoreId, WeekStart};
use std::str::FromStr;
use time::Date;

/// The employee who performed an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The acting employee.
    pub employee_id: EmployeeId,
    /// The role the employee acted under (e.g., "employee", "manager").
    pub role: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `employee_id` - The acting employee
    /// * `role` - The role the employee acted under
    #[must_use]
    pub const fn new(employee_id: EmployeeId, role: String) -> Self {
        Self { employee_id, role }
    }
}

/// Why an action was performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// Correlation id of the triggering request.
    pub id: String,
    /// A human-readable description.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// The kinds of recorded state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// An employee saved their weekly registration.
    RegistrationSubmitted,
    /// A weekly registration was deleted.
    RegistrationDeleted,
    /// A manager placed an employee into a shift.
    ShiftForceAssigned,
    /// A manager removed a manager-placed shift.
    ShiftForceUnassigned,
    /// A slot's counter assignments were published.
    SchedulePublished,
}

impl ActionKind {
    /// Returns the stable name stored with the event.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RegistrationSubmitted => "RegistrationSubmitted",
            Self::RegistrationDeleted => "RegistrationDeleted",
            Self::ShiftForceAssigned => "ShiftForceAssigned",
            Self::ShiftForceUnassigned => "ShiftForceUnassigned",
            Self::SchedulePublished => "SchedulePublished",
        }
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RegistrationSubmitted" => Ok(Self::RegistrationSubmitted),
            "RegistrationDeleted" => Ok(Self::RegistrationDeleted),
            "ShiftForceAssigned" => Ok(Self::ShiftForceAssigned),
            "ShiftForceUnassigned" => Ok(Self::ShiftForceUnassigned),
            "SchedulePublished" => Ok(Self::SchedulePublished),
            other => Err(format!("Unknown audit action '{other}'")),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The action that was performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// What happened.
    pub kind: ActionKind,
    /// Optional free-form details (e.g., the affected employee).
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(kind: ActionKind, details: Option<String>) -> Self {
        Self { kind, details }
    }
}

/// The records an event touched.
///
/// Registration events are scoped to a week; schedule events to a date
/// and shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditScope {
    /// The store.
    pub store_id: StoreId,
    /// The registration week, when the event concerns one.
    pub week_start: Option<WeekStart>,
    /// The slot date, when the event concerns one.
    pub date: Option<Date>,
    /// The slot shift, when the event concerns one.
    pub shift_id: Option<ShiftId>,
}

impl AuditScope {
    /// Scope for a weekly registration.
    #[must_use]
    pub const fn week(store_id: StoreId, week_start: WeekStart) -> Self {
        Self {
            store_id,
            week_start: Some(week_start),
            date: None,
            shift_id: None,
        }
    }

    /// Scope for a single date and shift.
    #[must_use]
    pub const fn slot(
        store_id: StoreId,
        week_start: WeekStart,
        date: Date,
        shift_id: ShiftId,
    ) -> Self {
        Self {
            store_id,
            week_start: Some(week_start),
            date: Some(date),
            shift_id: Some(shift_id),
        }
    }
}

/// A serialized view of the affected records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A compact text rendering of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable record of one state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Storage id. `None` until persisted.
    pub event_id: Option<i64>,
    /// Who performed the change.
    pub actor: Actor,
    /// Why it was performed.
    pub cause: Cause,
    /// What was performed.
    pub action: Action,
    /// What it touched.
    pub scope: AuditScope,
    /// State before the transition.
    pub before: StateSnapshot,
    /// State after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new, unpersisted `AuditEvent`.
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        scope: AuditScope,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            scope,
            before,
            after,
        }
    }

    /// Attaches the storage id.
    #[must_use]
    pub const fn with_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }
}
