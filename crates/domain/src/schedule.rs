// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Published counter assignments.
//!
//! A slot is every counter of one store for one date and shift. Slots are
//! published as a unit: counters missing from a publish are cleared.

use crate::error::DomainError;
use crate::ids::{CounterId, EmployeeId, ShiftId, StoreId};
use crate::types::Counter;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use time::{Date, OffsetDateTime};

/// Employees placed at one counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterAssignment {
    /// Placed employees, in display order.
    #[serde(default)]
    pub employee_ids: Vec<EmployeeId>,
    /// The subset of `employee_ids` that a manager forced in.
    #[serde(default)]
    pub assigned_by_manager: Vec<EmployeeId>,
}

impl CounterAssignment {
    /// Returns whether nobody is placed at the counter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.employee_ids.is_empty()
    }

    /// Returns whether `employee_id` is placed at the counter.
    #[must_use]
    pub fn contains(&self, employee_id: &EmployeeId) -> bool {
        self.employee_ids.contains(employee_id)
    }

    /// Removes an employee and any manager flag they carried.
    ///
    /// Returns whether the employee was present.
    pub fn remove(&mut self, employee_id: &EmployeeId) -> bool {
        let before: usize = self.employee_ids.len();
        self.employee_ids.retain(|id| id != employee_id);
        self.assigned_by_manager.retain(|id| id != employee_id);
        before != self.employee_ids.len()
    }
}

/// Counter id to assignment, ordered by counter id.
pub type CounterMap = BTreeMap<CounterId, CounterAssignment>;

/// The published state of one (store, date, shift).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    /// The store.
    pub store_id: StoreId,
    /// The date.
    pub date: Date,
    /// The shift.
    pub shift_id: ShiftId,
    /// Publish counter; zero until the first publish.
    pub version: i64,
    /// Assignment for every configured counter.
    pub assignments: CounterMap,
    /// When the slot was last published.
    #[serde(with = "time::serde::rfc3339::option")]
    pub published_at: Option<OffsetDateTime>,
    /// Who last published the slot.
    pub published_by: Option<EmployeeId>,
}

impl ScheduleSlot {
    /// Creates a never-published slot with every counter empty.
    #[must_use]
    pub fn unpublished(
        store_id: StoreId,
        date: Date,
        shift_id: ShiftId,
        counters: &[Counter],
    ) -> Self {
        Self {
            store_id,
            date,
            shift_id,
            version: 0,
            assignments: counters
                .iter()
                .map(|counter| (counter.id.clone(), CounterAssignment::default()))
                .collect(),
            published_at: None,
            published_by: None,
        }
    }

    /// Returns the counter holding `employee_id`, if any.
    #[must_use]
    pub fn counter_of(&self, employee_id: &EmployeeId) -> Option<&CounterId> {
        self.assignments
            .iter()
            .find(|(_, assignment)| assignment.contains(employee_id))
            .map(|(counter_id, _)| counter_id)
    }

    /// Removes an employee from every counter.
    ///
    /// Returns the counters the employee was removed from.
    pub fn remove_employee(&mut self, employee_id: &EmployeeId) -> Vec<CounterId> {
        self.assignments
            .iter_mut()
            .filter_map(|(counter_id, assignment)| {
                assignment.remove(employee_id).then(|| counter_id.clone())
            })
            .collect()
    }
}

/// Validates a publish mapping and fills in omitted counters.
///
/// # Arguments
///
/// * `counters` - Every counter configured for the store
/// * `submitted` - The counters the caller wants to publish
///
/// # Returns
///
/// A mapping holding every configured counter; counters absent from
/// `submitted` are empty.
///
/// # Errors
///
/// Returns an error if:
/// - a counter is not configured for the store
/// - a manager flag names an employee the counter does not hold
/// - an employee is placed more than once in the slot
pub fn normalize_assignments(
    counters: &[Counter],
    submitted: &CounterMap,
) -> Result<CounterMap, DomainError> {
    for counter_id in submitted.keys() {
        if !counters.iter().any(|counter| &counter.id == counter_id) {
            return Err(DomainError::UnknownCounter(counter_id.clone()));
        }
    }

    let mut seen: HashMap<&EmployeeId, &CounterId> = HashMap::new();
    for (counter_id, assignment) in submitted {
        for employee_id in &assignment.assigned_by_manager {
            if !assignment.contains(employee_id) {
                return Err(DomainError::ManagerFlagWithoutAssignment {
                    counter_id: counter_id.clone(),
                    employee_id: employee_id.clone(),
                });
            }
        }
        for employee_id in &assignment.employee_ids {
            if let Some(first_counter) = seen.insert(employee_id, counter_id) {
                return Err(DomainError::DuplicateCounterAssignment {
                    employee_id: employee_id.clone(),
                    first_counter: first_counter.clone(),
                    second_counter: counter_id.clone(),
                });
            }
        }
    }

    Ok(counters
        .iter()
        .map(|counter| {
            let assignment: CounterAssignment =
                submitted.get(&counter.id).cloned().unwrap_or_default();
            (counter.id.clone(), assignment)
        })
        .collect())
}
