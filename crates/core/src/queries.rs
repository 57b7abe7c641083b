// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only evaluations over a week's state.
//!
//! These never produce audit events.

use crate::error::CoreError;
use crate::state::{State, StoreContext};
use shiftboard_domain::{
    EmployeeId, OccupancyCounts, ShiftId, ToggleOutcome, WeekSelection, resolve_capacity,
    toggle_shift_selection,
};
use time::Date;

/// Occupancy versus capacity for one date and shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAvailability {
    /// The date.
    pub date: Date,
    /// The shift.
    pub shift_id: ShiftId,
    /// Self-registered non-manager headcount.
    pub occupied: u32,
    /// Resolved capacity.
    pub capacity: u32,
}

impl SlotAvailability {
    /// Returns whether another registrant fits.
    #[must_use]
    pub const fn has_room(&self) -> bool {
        self.occupied < self.capacity
    }
}

/// Computes availability for every date and configured shift of the week.
///
/// Occupancy is counted the way the registration validator counts it,
/// optionally excluding the viewer's own entries.
///
/// # Errors
///
/// Returns an error if the week cannot be expanded.
pub fn week_availability(
    store: &StoreContext,
    state: &State,
    viewer: Option<&EmployeeId>,
) -> Result<Vec<SlotAvailability>, CoreError> {
    let occupancy: OccupancyCounts =
        OccupancyCounts::tally(&state.registrations, viewer, |id| store.is_manager(id));

    let mut slots: Vec<SlotAvailability> = Vec::new();
    for date in state.week_start.days()? {
        for shift_id in &store.settings.shift_times {
            slots.push(SlotAvailability {
                date,
                shift_id: shift_id.clone(),
                occupied: occupancy.occupied(date, shift_id),
                capacity: resolve_capacity(&store.settings, date, shift_id),
            });
        }
    }
    Ok(slots)
}

/// The selection after a single accepted toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleResult {
    /// Whether the shift was turned on or off.
    pub outcome: ToggleOutcome,
    /// The full selection after the toggle.
    pub selection: Vec<(Date, ShiftId)>,
}

/// Evaluates one toggle of an in-progress selection.
///
/// The selection is not saved; the caller submits it later. Only the
/// toggled slot is capacity-checked.
///
/// # Arguments
///
/// * `store` - Read-only store data
/// * `state` - The week's saved registrations
/// * `employee_id` - The toggling employee
/// * `current` - The selection before the toggle
/// * `date` - The toggled date
/// * `shift_id` - The toggled shift
///
/// # Errors
///
/// Returns an error if the employee is unknown or the toggle is rejected.
pub fn toggle_shift(
    store: &StoreContext,
    state: &State,
    employee_id: &EmployeeId,
    current: &[(Date, ShiftId)],
    date: Date,
    shift_id: &ShiftId,
) -> Result<ToggleResult, CoreError> {
    store.active_employee(employee_id)?;

    let mut selection: WeekSelection = WeekSelection::from_pairs(state.week_start, current)?;
    let occupancy: OccupancyCounts =
        OccupancyCounts::tally(&state.registrations, Some(employee_id), |id| {
            store.is_manager(id)
        });
    let outcome: ToggleOutcome =
        toggle_shift_selection(&store.settings, &occupancy, &mut selection, date, shift_id)?;

    Ok(ToggleResult {
        outcome,
        selection: selection.pairs()?,
    })
}
