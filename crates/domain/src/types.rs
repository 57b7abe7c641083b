// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::ids::{CounterId, EmployeeId, ShiftId, StoreId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, Duration, Weekday};

/// Employment type of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeType {
    /// Full-time: must take exactly one weekday off per week.
    #[serde(rename = "FT")]
    FullTime,
    /// Part-time: free to register any number of days.
    #[serde(rename = "PT")]
    PartTime,
}

impl EmployeeType {
    /// Returns the short code used in storage and on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "FT",
            Self::PartTime => "PT",
        }
    }
}

impl FromStr for EmployeeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FT" => Ok(Self::FullTime),
            "PT" => Ok(Self::PartTime),
            _ => Err(DomainError::InvalidEmployeeType(s.to_string())),
        }
    }
}

impl std::fmt::Display for EmployeeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role of an employee within the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    /// Regular staff.
    Employee,
    /// Store manager. Registers like full-time staff and may schedule others.
    Manager,
    /// System administrator.
    Admin,
}

impl EmployeeRole {
    /// Returns the string representation used in storage and on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for EmployeeRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "employee" => Ok(Self::Employee),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An employee as exposed by the employee directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// The employee id.
    pub id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Full-time or part-time.
    pub employee_type: EmployeeType,
    /// Role within the store.
    pub role: EmployeeRole,
    /// The store the employee belongs to.
    pub store_id: StoreId,
    /// Inactive employees cannot be scheduled.
    pub is_active: bool,
}

/// A counter (work position) configured for a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    /// The counter id.
    pub id: CounterId,
    /// Display name.
    pub name: String,
}

/// The Monday that starts a registration week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekStart {
    date: Date,
}

impl WeekStart {
    /// Number of days in a registration week.
    pub const DAYS: usize = 7;

    /// Creates a week start from a Monday.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidWeekStart` if `date` is not a Monday.
    pub fn new(date: Date) -> Result<Self, DomainError> {
        let weekday: Weekday = date.weekday();
        if weekday != Weekday::Monday {
            return Err(DomainError::InvalidWeekStart { date, weekday });
        }
        Ok(Self { date })
    }

    /// Returns the week start containing `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the Monday before `date` is not representable.
    pub fn containing(date: Date) -> Result<Self, DomainError> {
        let offset: i64 = i64::from(date.weekday().number_days_from_monday());
        let monday: Date =
            date.checked_sub(Duration::days(offset))
                .ok_or_else(|| DomainError::DateArithmeticOverflow {
                    operation: format!("finding the Monday before {date}"),
                })?;
        Ok(Self { date: monday })
    }

    /// Returns the Monday date.
    #[must_use]
    pub const fn date(&self) -> Date {
        self.date
    }

    /// Returns the seven dates of the week, Monday first.
    ///
    /// # Errors
    ///
    /// Returns an error if the week runs past the representable date range.
    pub fn days(&self) -> Result<[Date; 7], DomainError> {
        let mut days: [Date; 7] = [self.date; 7];
        for (offset, slot) in (0_i64..).zip(days.iter_mut()) {
            *slot = self.date.checked_add(Duration::days(offset)).ok_or_else(|| {
                DomainError::DateArithmeticOverflow {
                    operation: format!("expanding the week starting {}", self.date),
                }
            })?;
        }
        Ok(days)
    }

    /// Returns the zero-based day index of `date` within this week.
    #[must_use]
    pub fn day_index(&self, date: Date) -> Option<usize> {
        let offset: i64 = (date - self.date).whole_days();
        usize::try_from(offset).ok().filter(|idx| *idx < Self::DAYS)
    }

    /// Checks that `date` falls within this week.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateOutsideWeek` otherwise.
    pub fn ensure_contains(&self, date: Date) -> Result<(), DomainError> {
        if self.day_index(date).is_none() {
            return Err(DomainError::DateOutsideWeek {
                date,
                week_start: self.date,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for WeekStart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date)
    }
}

/// How a shift entry got into a weekly registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    /// Chosen by the employee through self-registration.
    SelfRegistered,
    /// Placed by a manager through force-assignment.
    ManagerAssigned,
}

impl EntryOrigin {
    /// Returns the string representation used in storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SelfRegistered => "self_registered",
            Self::ManagerAssigned => "manager_assigned",
        }
    }
}

impl FromStr for EntryOrigin {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self_registered" => Ok(Self::SelfRegistered),
            "manager_assigned" => Ok(Self::ManagerAssigned),
            _ => Err(DomainError::InvalidEntryOrigin(s.to_string())),
        }
    }
}

/// One shift on one date inside a weekly registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftEntry {
    /// The date worked.
    pub date: Date,
    /// The shift worked.
    pub shift_id: ShiftId,
    /// Who placed the entry.
    pub origin: EntryOrigin,
}

impl ShiftEntry {
    /// Creates an entry chosen by the employee.
    #[must_use]
    pub const fn self_registered(date: Date, shift_id: ShiftId) -> Self {
        Self {
            date,
            shift_id,
            origin: EntryOrigin::SelfRegistered,
        }
    }

    /// Creates an entry placed by a manager.
    #[must_use]
    pub const fn manager_assigned(date: Date, shift_id: ShiftId) -> Self {
        Self {
            date,
            shift_id,
            origin: EntryOrigin::ManagerAssigned,
        }
    }

    /// Returns whether a manager placed this entry.
    #[must_use]
    pub const fn is_assigned_by_manager(&self) -> bool {
        matches!(self.origin, EntryOrigin::ManagerAssigned)
    }
}

/// An employee's shifts for one week.
///
/// Invariants:
/// - every entry date falls within the week
/// - at most one entry per date
/// - entries are kept in date order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyRegistration {
    /// Storage id. `None` until persisted.
    registration_id: Option<i64>,
    employee_id: EmployeeId,
    store_id: StoreId,
    week_start: WeekStart,
    shifts: Vec<ShiftEntry>,
}

// Equality ignores the storage id, like the other persisted entities.
impl PartialEq for WeeklyRegistration {
    fn eq(&self, other: &Self) -> bool {
        self.employee_id == other.employee_id
            && self.store_id == other.store_id
            && self.week_start == other.week_start
            && self.shifts == other.shifts
    }
}

impl Eq for WeeklyRegistration {}

impl WeeklyRegistration {
    /// Creates a registration from a list of entries.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry falls outside the week or two
    /// entries share a date.
    pub fn new(
        employee_id: EmployeeId,
        store_id: StoreId,
        week_start: WeekStart,
        shifts: Vec<ShiftEntry>,
    ) -> Result<Self, DomainError> {
        let mut registration: Self = Self::empty(employee_id, store_id, week_start);
        let mut sorted: Vec<ShiftEntry> = shifts;
        sorted.sort_by_key(|entry| entry.date);

        for pair in sorted.windows(2) {
            if pair[0].date == pair[1].date {
                let count: usize = sorted.iter().filter(|e| e.date == pair[0].date).count();
                return Err(DomainError::MultipleShiftsOnDay {
                    date: pair[0].date,
                    count,
                });
            }
        }
        for entry in &sorted {
            week_start.ensure_contains(entry.date)?;
        }

        registration.shifts = sorted;
        Ok(registration)
    }

    /// Creates a registration with no shifts.
    #[must_use]
    pub const fn empty(employee_id: EmployeeId, store_id: StoreId, week_start: WeekStart) -> Self {
        Self {
            registration_id: None,
            employee_id,
            store_id,
            week_start,
            shifts: Vec::new(),
        }
    }

    /// Attaches the storage id.
    #[must_use]
    pub const fn with_id(mut self, registration_id: i64) -> Self {
        self.registration_id = Some(registration_id);
        self
    }

    /// Returns the storage id if persisted.
    #[must_use]
    pub const fn registration_id(&self) -> Option<i64> {
        self.registration_id
    }

    /// Returns the owning employee.
    #[must_use]
    pub const fn employee_id(&self) -> &EmployeeId {
        &self.employee_id
    }

    /// Returns the store.
    #[must_use]
    pub const fn store_id(&self) -> &StoreId {
        &self.store_id
    }

    /// Returns the week.
    #[must_use]
    pub const fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// Returns the entries in date order.
    #[must_use]
    pub fn shifts(&self) -> &[ShiftEntry] {
        &self.shifts
    }

    /// Returns whether the registration holds no shifts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    /// Returns the entry on `date`, if any.
    #[must_use]
    pub fn shift_on(&self, date: Date) -> Option<&ShiftEntry> {
        self.shifts.iter().find(|entry| entry.date == date)
    }

    /// Returns whether the registration holds `shift_id` on `date`.
    #[must_use]
    pub fn has_entry(&self, date: Date, shift_id: &ShiftId) -> bool {
        self.shift_on(date)
            .is_some_and(|entry| &entry.shift_id == shift_id)
    }

    /// Returns the dates of the week without an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the week cannot be expanded.
    pub fn days_off(&self) -> Result<Vec<Date>, DomainError> {
        Ok(self
            .week_start
            .days()?
            .into_iter()
            .filter(|date| self.shift_on(*date).is_none())
            .collect())
    }

    /// Inserts an entry, replacing any entry already on that date.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateOutsideWeek` if the entry is outside the week.
    pub fn put_entry(&mut self, entry: ShiftEntry) -> Result<(), DomainError> {
        self.week_start.ensure_contains(entry.date)?;
        self.shifts.retain(|existing| existing.date != entry.date);
        self.shifts.push(entry);
        self.shifts.sort_by_key(|e| e.date);
        Ok(())
    }

    /// Removes the entry for `shift_id` on `date`.
    ///
    /// Returns the removed entry, or `None` if no such entry existed.
    pub fn remove_entry(&mut self, date: Date, shift_id: &ShiftId) -> Option<ShiftEntry> {
        let position: usize = self
            .shifts
            .iter()
            .position(|entry| entry.date == date && &entry.shift_id == shift_id)?;
        Some(self.shifts.remove(position))
    }
}
