// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use shiftboard_audit::{AuditEvent, StateSnapshot};
use shiftboard_domain::{
    Counter, CounterId, DayOffWarning, Employee, EmployeeId, EmployeeRole, ScheduleSlot, Settings,
    ShiftId, StoreId, WeekStart, WeeklyRegistration,
};
use std::fmt::Write as _;
use time::Date;

/// Read-only store data supplied by the external collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreContext {
    /// The store.
    pub store_id: StoreId,
    /// The store's settings.
    pub settings: Settings,
    /// The store's employees, active or not.
    pub employees: Vec<Employee>,
    /// The store's counters, in display order.
    pub counters: Vec<Counter>,
}

impl StoreContext {
    /// Looks up an employee of the store.
    #[must_use]
    pub fn employee(&self, employee_id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| &e.id == employee_id)
    }

    /// Looks up an active employee of the store.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the employee is unknown, inactive or
    /// belongs to another store.
    pub fn active_employee(&self, employee_id: &EmployeeId) -> Result<&Employee, CoreError> {
        self.employee(employee_id)
            .filter(|e| e.is_active && e.store_id == self.store_id)
            .ok_or_else(|| CoreError::NotFound {
                kind: "employee",
                id: employee_id.to_string(),
            })
    }

    /// Returns whether the employee holds the manager role.
    #[must_use]
    pub fn is_manager(&self, employee_id: &EmployeeId) -> bool {
        self.employee(employee_id)
            .is_some_and(|e| e.role == EmployeeRole::Manager)
    }

    /// Returns the ids of the configured counters.
    #[must_use]
    pub fn counter_ids(&self) -> Vec<CounterId> {
        self.counters.iter().map(|c| c.id.clone()).collect()
    }
}

/// Registrations and published slots of one store for one week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// The store this state is scoped to.
    pub store_id: StoreId,
    /// The week this state is scoped to.
    pub week_start: WeekStart,
    /// Every saved registration for the week.
    pub registrations: Vec<WeeklyRegistration>,
    /// Every published slot for the week.
    pub slots: Vec<ScheduleSlot>,
}

impl State {
    /// Creates an empty state for a store and week.
    #[must_use]
    pub const fn new(store_id: StoreId, week_start: WeekStart) -> Self {
        Self {
            store_id,
            week_start,
            registrations: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Returns an employee's registration, if saved.
    #[must_use]
    pub fn registration_for(&self, employee_id: &EmployeeId) -> Option<&WeeklyRegistration> {
        self.registrations
            .iter()
            .find(|r| r.employee_id() == employee_id)
    }

    /// Returns a registration by storage id.
    #[must_use]
    pub fn registration_by_id(&self, registration_id: i64) -> Option<&WeeklyRegistration> {
        self.registrations
            .iter()
            .find(|r| r.registration_id() == Some(registration_id))
    }

    /// Returns the published slot for a date and shift, if ever published.
    #[must_use]
    pub fn slot_for(&self, date: Date, shift_id: &ShiftId) -> Option<&ScheduleSlot> {
        self.slots
            .iter()
            .find(|s| s.date == date && &s.shift_id == shift_id)
    }

    /// Returns the published slot, or an empty unpublished one.
    #[must_use]
    pub fn slot_or_empty(
        &self,
        context: &StoreContext,
        date: Date,
        shift_id: &ShiftId,
    ) -> ScheduleSlot {
        self.slot_for(date, shift_id).cloned().unwrap_or_else(|| {
            ScheduleSlot::unpublished(
                self.store_id.clone(),
                date,
                shift_id.clone(),
                &context.counters,
            )
        })
    }

    /// Replaces or inserts an employee's registration.
    pub(crate) fn put_registration(&mut self, registration: WeeklyRegistration) {
        self.registrations
            .retain(|r| r.employee_id() != registration.employee_id());
        self.registrations.push(registration);
    }

    /// Replaces or inserts a slot.
    pub(crate) fn put_slot(&mut self, slot: ScheduleSlot) {
        self.slots
            .retain(|s| !(s.date == slot.date && s.shift_id == slot.shift_id));
        self.slots.push(slot);
    }
}

/// Renders a registration for the audit trail.
///
/// Manager-assigned entries carry a trailing `*`.
#[must_use]
pub fn registration_snapshot(registration: Option<&WeeklyRegistration>) -> StateSnapshot {
    let Some(registration) = registration else {
        return StateSnapshot::new(String::from("registration=none"));
    };
    let shifts: Vec<String> = registration
        .shifts()
        .iter()
        .map(|entry| {
            let marker: &str = if entry.is_assigned_by_manager() { "*" } else { "" };
            format!("{}:{}{marker}", entry.date, entry.shift_id)
        })
        .collect();
    StateSnapshot::new(format!(
        "employee={},shifts=[{}]",
        registration.employee_id(),
        shifts.join(",")
    ))
}

/// Renders a slot for the audit trail.
#[must_use]
pub fn slot_snapshot(slot: &ScheduleSlot) -> StateSnapshot {
    let mut data: String = format!("version={}", slot.version);
    for (counter_id, assignment) in &slot.assignments {
        let ids: Vec<String> = assignment
            .employee_ids
            .iter()
            .map(|id| {
                let marker: &str = if assignment.assigned_by_manager.contains(id) {
                    "*"
                } else {
                    ""
                };
                format!("{id}{marker}")
            })
            .collect();
        let _ = write!(data, ";{counter_id}=[{}]", ids.join(","));
    }
    StateSnapshot::new(data)
}

/// Published-slot cleanup caused by a force-unassign.
///
/// Callers must purge the employee from any local draft for the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeNotice {
    /// The removed employee.
    pub employee_id: EmployeeId,
    /// The slot date.
    pub date: Date,
    /// The slot shift.
    pub shift_id: ShiftId,
    /// Counters of the published slot the employee was removed from.
    pub removed_from: Vec<CounterId>,
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: State,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    /// Confirmed warnings carried by the submission.
    pub warnings: Vec<DayOffWarning>,
    /// Published-slot cleanup, for force-unassign.
    pub cascade: Option<CascadeNotice>,
}
