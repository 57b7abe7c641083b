// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Weekly registration rules.
//!
//! Everything here is pure: callers gather settings, occupancy and the
//! other managers' weeks, then ask whether a selection is acceptable.
//!
//! ## Rules (first failure wins)
//!
//! 1. at most one shift per day
//! 2. at least one working day
//! 3. full-time staff and managers leave exactly one day empty
//! 4. that day is not Saturday or Sunday
//! 5. a new shift is only accepted while occupancy is below capacity
//! 6. managers get one warning per other manager sharing their day off

use crate::error::DomainError;
use crate::ids::{EmployeeId, ShiftId};
use crate::quota::{is_weekend, resolve_capacity};
use crate::settings::Settings;
use crate::types::{
    EmployeeRole, EmployeeType, EntryOrigin, ShiftEntry, WeekStart, WeeklyRegistration,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;

/// A proposed 7-day shift selection, Monday first.
///
/// A day may temporarily hold more than one shift so that malformed
/// input can be reported rather than silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSelection {
    week_start: WeekStart,
    days: [Vec<ShiftId>; 7],
}

impl WeekSelection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new(week_start: WeekStart) -> Self {
        Self {
            week_start,
            days: Default::default(),
        }
    }

    /// Builds a selection from `(date, shift)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateOutsideWeek` if a date is outside the week.
    pub fn from_pairs(
        week_start: WeekStart,
        pairs: &[(Date, ShiftId)],
    ) -> Result<Self, DomainError> {
        let mut selection: Self = Self::new(week_start);
        for (date, shift_id) in pairs {
            let index: usize = selection.index_of(*date)?;
            selection.days[index].push(shift_id.clone());
        }
        Ok(selection)
    }

    /// Builds the selection currently held by a saved registration.
    #[must_use]
    pub fn from_registration(registration: &WeeklyRegistration) -> Self {
        let week_start: WeekStart = registration.week_start();
        let mut selection: Self = Self::new(week_start);
        for entry in registration.shifts() {
            if let Some(index) = week_start.day_index(entry.date) {
                selection.days[index].push(entry.shift_id.clone());
            }
        }
        selection
    }

    /// Returns the week.
    #[must_use]
    pub const fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// Returns the shifts selected on `date`.
    #[must_use]
    pub fn shifts_on(&self, date: Date) -> &[ShiftId] {
        match self.week_start.day_index(date) {
            Some(index) => &self.days[index],
            None => &[],
        }
    }

    /// Returns `(date, shift)` for every selected shift, in date order.
    ///
    /// # Errors
    ///
    /// Returns an error if the week cannot be expanded.
    pub fn pairs(&self) -> Result<Vec<(Date, ShiftId)>, DomainError> {
        let dates: [Date; 7] = self.week_start.days()?;
        Ok(dates
            .into_iter()
            .zip(self.days.iter())
            .flat_map(|(date, shifts)| shifts.iter().map(move |shift| (date, shift.clone())))
            .collect())
    }

    /// Returns the dates with nothing selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the week cannot be expanded.
    pub fn empty_days(&self) -> Result<Vec<Date>, DomainError> {
        let dates: [Date; 7] = self.week_start.days()?;
        Ok(dates
            .into_iter()
            .zip(self.days.iter())
            .filter(|(_, shifts)| shifts.is_empty())
            .map(|(date, _)| date)
            .collect())
    }

    /// Converts the selection into registration entries.
    ///
    /// Entries that the previous registration held as manager-assigned keep
    /// that origin; everything else is self-registered. Only the first shift
    /// of each day is taken, so validate the selection first.
    ///
    /// # Errors
    ///
    /// Returns an error if the week cannot be expanded.
    pub fn to_entries(
        &self,
        previous: Option<&WeeklyRegistration>,
    ) -> Result<Vec<ShiftEntry>, DomainError> {
        let dates: [Date; 7] = self.week_start.days()?;
        Ok(dates
            .into_iter()
            .zip(self.days.iter())
            .filter_map(|(date, shifts)| {
                let shift_id: &ShiftId = shifts.first()?;
                let origin: EntryOrigin = previous
                    .and_then(|prev| prev.shift_on(date))
                    .filter(|entry| &entry.shift_id == shift_id)
                    .map_or(EntryOrigin::SelfRegistered, |entry| entry.origin);
                Some(ShiftEntry {
                    date,
                    shift_id: shift_id.clone(),
                    origin,
                })
            })
            .collect())
    }

    fn index_of(&self, date: Date) -> Result<usize, DomainError> {
        self.week_start
            .day_index(date)
            .ok_or(DomainError::DateOutsideWeek {
                date,
                week_start: self.week_start.date(),
            })
    }
}

/// The attributes of a registrant that the weekly rules depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrantProfile {
    /// Full-time or part-time.
    pub employee_type: EmployeeType,
    /// Role within the store.
    pub role: EmployeeRole,
}

impl RegistrantProfile {
    /// Full-time staff and managers must take exactly one weekday off.
    #[must_use]
    pub const fn requires_single_day_off(&self) -> bool {
        matches!(self.employee_type, EmployeeType::FullTime)
            || matches!(self.role, EmployeeRole::Manager)
    }

    /// Returns whether the registrant is a manager.
    #[must_use]
    pub const fn is_manager(&self) -> bool {
        matches!(self.role, EmployeeRole::Manager)
    }
}

/// Another manager's week, used for day-off collision warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherManager {
    /// The manager's id.
    pub employee_id: EmployeeId,
    /// The manager's display name.
    pub name: String,
    /// Dates the manager left empty.
    pub days_off: Vec<Date>,
}

impl OtherManager {
    /// Derives the manager's days off from their saved registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the week cannot be expanded.
    pub fn from_registration(
        name: &str,
        registration: &WeeklyRegistration,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            employee_id: registration.employee_id().clone(),
            name: name.to_string(),
            days_off: registration.days_off()?,
        })
    }
}

/// Self-registered headcount per `(date, shift)`.
///
/// Only entries that count against quota are included: self-registered
/// entries of non-manager registrants other than the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyCounts {
    counts: BTreeMap<(Date, ShiftId), u32>,
}

impl OccupancyCounts {
    /// Tallies occupancy from the week's registrations.
    ///
    /// # Arguments
    ///
    /// * `registrations` - Every registration for the store and week
    /// * `excluded` - The registrant whose own entries must not count
    /// * `is_manager` - Whether a registrant holds the manager role
    #[must_use]
    pub fn tally<F>(
        registrations: &[WeeklyRegistration],
        excluded: Option<&EmployeeId>,
        is_manager: F,
    ) -> Self
    where
        F: Fn(&EmployeeId) -> bool,
    {
        let mut counts: BTreeMap<(Date, ShiftId), u32> = BTreeMap::new();
        for registration in registrations {
            let owner: &EmployeeId = registration.employee_id();
            if Some(owner) == excluded || is_manager(owner) {
                continue;
            }
            for entry in registration.shifts() {
                if let EntryOrigin::SelfRegistered = entry.origin {
                    *counts
                        .entry((entry.date, entry.shift_id.clone()))
                        .or_insert(0) += 1;
                }
            }
        }
        Self { counts }
    }

    /// Returns the headcount for a slot.
    #[must_use]
    pub fn occupied(&self, date: Date, shift_id: &ShiftId) -> u32 {
        self.counts
            .get(&(date, shift_id.clone()))
            .copied()
            .unwrap_or(0)
    }
}

/// A non-fatal notice that another manager shares the day off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOffWarning {
    /// The colliding manager.
    pub manager_id: EmployeeId,
    /// The colliding manager's name.
    pub manager_name: String,
    /// The shared day off.
    pub date: Date,
}

impl std::fmt::Display for DayOffWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Manager {} ({}) is also off on {}",
            self.manager_name, self.manager_id, self.date
        )
    }
}

/// Result of a successful validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Warnings the caller must confirm before saving.
    pub warnings: Vec<DayOffWarning>,
}

impl ValidationOutcome {
    /// Returns whether the submission needs explicit confirmation.
    #[must_use]
    pub fn requires_confirmation(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Inputs for validating a weekly submission.
#[derive(Debug, Clone, Copy)]
pub struct RegistrationContext<'a> {
    /// The registrant's type and role.
    pub profile: RegistrantProfile,
    /// The store's settings.
    pub settings: &'a Settings,
    /// Occupancy from all other non-manager registrants.
    pub occupancy: &'a OccupancyCounts,
    /// The registrant's currently saved registration, if any.
    pub previous: Option<&'a WeeklyRegistration>,
    /// The other managers of the store with a saved registration.
    pub other_managers: &'a [OtherManager],
}

/// Validates a complete weekly selection.
///
/// # Arguments
///
/// * `context` - Registrant profile, settings and week context
/// * `selection` - The proposed selection
///
/// # Returns
///
/// The warnings produced for managers; empty for everyone else.
///
/// # Errors
///
/// Returns the first rule violation encountered.
pub fn validate_week_selection(
    context: &RegistrationContext<'_>,
    selection: &WeekSelection,
) -> Result<ValidationOutcome, DomainError> {
    let dates: [Date; 7] = selection.week_start().days()?;

    // Rule 1
    for date in dates {
        let count: usize = selection.shifts_on(date).len();
        if count > 1 {
            return Err(DomainError::MultipleShiftsOnDay { date, count });
        }
    }

    for (_, shift_id) in selection.pairs()? {
        context.settings.ensure_shift(&shift_id)?;
    }

    // Rule 2
    let empty_days: Vec<Date> = selection.empty_days()?;
    if empty_days.len() == dates.len() {
        return Err(DomainError::NoWorkingDays);
    }

    // Rules 3 and 4
    let day_off: Option<Date> = if context.profile.requires_single_day_off() {
        match empty_days.as_slice() {
            [] => return Err(DomainError::MissingDayOff),
            [date] if is_weekend(*date) => {
                return Err(DomainError::WeekendDayOff { date: *date });
            }
            [date] => Some(*date),
            _ => {
                return Err(DomainError::TooManyDaysOff {
                    count: empty_days.len(),
                });
            }
        }
    } else {
        None
    };

    // Rule 5
    validate_new_shift_capacity(context, selection)?;

    // Rule 6
    let mut outcome: ValidationOutcome = ValidationOutcome::default();
    if let (true, Some(date)) = (context.profile.is_manager(), day_off) {
        outcome.warnings = context
            .other_managers
            .iter()
            .filter(|manager| manager.days_off.contains(&date))
            .map(|manager| DayOffWarning {
                manager_id: manager.employee_id.clone(),
                manager_name: manager.name.clone(),
                date,
            })
            .collect();
    }

    Ok(outcome)
}

/// Checks capacity for every shift that is new relative to the saved
/// registration.
///
/// Shifts the registrant already holds are not re-checked, so an earlier
/// accepted toggle is never revoked by later registrants.
///
/// # Errors
///
/// Returns `DomainError::CapacityExceeded` for the first full slot.
pub fn validate_new_shift_capacity(
    context: &RegistrationContext<'_>,
    selection: &WeekSelection,
) -> Result<(), DomainError> {
    for (date, shift_id) in selection.pairs()? {
        let already_held: bool = context
            .previous
            .is_some_and(|previous| previous.has_entry(date, &shift_id));
        if !already_held {
            check_shift_capacity(context.settings, context.occupancy, date, &shift_id)?;
        }
    }
    Ok(())
}

/// Checks that one more registrant fits into a slot.
///
/// # Returns
///
/// The resolved capacity.
///
/// # Errors
///
/// Returns `DomainError::CapacityExceeded` when occupancy has reached capacity.
pub fn check_shift_capacity(
    settings: &Settings,
    occupancy: &OccupancyCounts,
    date: Date,
    shift_id: &ShiftId,
) -> Result<u32, DomainError> {
    let capacity: u32 = resolve_capacity(settings, date, shift_id);
    let occupied: u32 = occupancy.occupied(date, shift_id);
    if occupied >= capacity {
        return Err(DomainError::CapacityExceeded {
            date,
            shift_id: shift_id.clone(),
            occupied,
            capacity,
        });
    }
    Ok(capacity)
}

/// The effect of a single toggle on a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// The shift is now the day's selection.
    Selected,
    /// The shift was removed; the day is empty.
    Deselected,
}

/// Toggles one shift in a selection.
///
/// Turning a selected shift off never checks capacity. Turning a shift on
/// replaces whatever else was selected that day, after the capacity check.
/// A failed check leaves the selection untouched.
///
/// # Errors
///
/// Returns an error if the shift is unknown, the date is outside the
/// week, or the slot is full.
pub fn toggle_shift_selection(
    settings: &Settings,
    occupancy: &OccupancyCounts,
    selection: &mut WeekSelection,
    date: Date,
    shift_id: &ShiftId,
) -> Result<ToggleOutcome, DomainError> {
    settings.ensure_shift(shift_id)?;
    let index: usize = selection.index_of(date)?;

    if selection.days[index].contains(shift_id) {
        selection.days[index].retain(|existing| existing != shift_id);
        return Ok(ToggleOutcome::Deselected);
    }

    check_shift_capacity(settings, occupancy, date, shift_id)?;
    selection.days[index] = vec![shift_id.clone()];
    Ok(ToggleOutcome::Selected)
}
