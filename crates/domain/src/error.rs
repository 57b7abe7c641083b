// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ids::{CounterId, EmployeeId, ShiftId};
use time::{Date, Weekday};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier is empty.
    InvalidIdentifier {
        /// The kind of identifier (e.g., "employee", "counter").
        kind: &'static str,
    },
    /// Employee type is invalid.
    InvalidEmployeeType(String),
    /// Employee role is invalid.
    InvalidRole(String),
    /// Shift entry origin tag is invalid.
    InvalidEntryOrigin(String),
    /// Week start dates must be Mondays.
    InvalidWeekStart {
        /// The rejected date.
        date: Date,
        /// The actual weekday of that date.
        weekday: Weekday,
    },
    /// A shift entry falls outside the registration week.
    DateOutsideWeek {
        /// The offending date.
        date: Date,
        /// The Monday starting the week.
        week_start: Date,
    },
    /// More than one shift was selected for one day.
    MultipleShiftsOnDay {
        /// The day with more than one shift.
        date: Date,
        /// How many shifts were selected on that day.
        count: usize,
    },
    /// Every day of the week is empty.
    NoWorkingDays,
    /// A full-time employee or manager selected a shift on every day.
    MissingDayOff,
    /// A full-time employee or manager left more than one day empty.
    TooManyDaysOff {
        /// The number of empty days.
        count: usize,
    },
    /// A full-time employee or manager chose a weekend day off.
    WeekendDayOff {
        /// The empty weekend day.
        date: Date,
    },
    /// The shift id is not configured for the store.
    UnknownShift(ShiftId),
    /// The counter id is not configured for the store.
    UnknownCounter(CounterId),
    /// The (date, shift) slot is already full.
    CapacityExceeded {
        /// The slot date.
        date: Date,
        /// The slot shift.
        shift_id: ShiftId,
        /// Current non-manager self-registrations.
        occupied: u32,
        /// The resolved capacity.
        capacity: u32,
    },
    /// An employee appears in more than one counter for one date+shift.
    DuplicateCounterAssignment {
        /// The double-booked employee.
        employee_id: EmployeeId,
        /// The first counter holding the employee.
        first_counter: CounterId,
        /// The second counter holding the employee.
        second_counter: CounterId,
    },
    /// A manager-forced flag refers to an employee the counter does not hold.
    ManagerFlagWithoutAssignment {
        /// The counter.
        counter_id: CounterId,
        /// The flagged employee.
        employee_id: EmployeeId,
    },
    /// The employee is not placed in the given counter.
    EmployeeNotInCounter {
        /// The employee.
        employee_id: EmployeeId,
        /// The counter.
        counter_id: CounterId,
    },
    /// Timezone name is not a valid IANA timezone.
    InvalidTimezone(String),
    /// A registration window time is not `HH:MM`.
    InvalidScheduleTime {
        /// The rejected value.
        value: String,
        /// The parsing error message.
        error: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier { kind } => write!(f, "Invalid {kind} id: cannot be empty"),
            Self::InvalidEmployeeType(value) => {
                write!(f, "Invalid employee type '{value}': expected FT or PT")
            }
            Self::InvalidRole(value) => {
                write!(
                    f,
                    "Invalid role '{value}': expected employee, manager or admin"
                )
            }
            Self::InvalidEntryOrigin(value) => write!(f, "Invalid entry origin '{value}'"),
            Self::InvalidWeekStart { date, weekday } => {
                write!(f, "Week start must be a Monday, but {date} is a {weekday}")
            }
            Self::DateOutsideWeek { date, week_start } => {
                write!(f, "Date {date} is outside the week starting {week_start}")
            }
            Self::MultipleShiftsOnDay { date, count } => {
                write!(
                    f,
                    "Only one shift may be selected per day, but {date} has {count}"
                )
            }
            Self::NoWorkingDays => {
                write!(f, "At least one working day must be registered")
            }
            Self::MissingDayOff => {
                write!(f, "Exactly one day off is required, but no day off was left")
            }
            Self::TooManyDaysOff { count } => {
                write!(
                    f,
                    "Exactly one day off is allowed, but {count} days were left empty"
                )
            }
            Self::WeekendDayOff { date } => {
                write!(
                    f,
                    "Full-time staff and managers cannot rest on weekend ({date})"
                )
            }
            Self::UnknownShift(shift_id) => write!(f, "Unknown shift '{shift_id}'"),
            Self::UnknownCounter(counter_id) => write!(f, "Unknown counter '{counter_id}'"),
            Self::CapacityExceeded {
                date,
                shift_id,
                occupied,
                capacity,
            } => {
                write!(
                    f,
                    "Shift '{shift_id}' on {date} is full ({occupied}/{capacity})"
                )
            }
            Self::DuplicateCounterAssignment {
                employee_id,
                first_counter,
                second_counter,
            } => {
                write!(
                    f,
                    "Employee '{employee_id}' is assigned to both counter '{first_counter}' and counter '{second_counter}'"
                )
            }
            Self::ManagerFlagWithoutAssignment {
                counter_id,
                employee_id,
            } => {
                write!(
                    f,
                    "Employee '{employee_id}' is flagged as manager-assigned but is not in counter '{counter_id}'"
                )
            }
            Self::EmployeeNotInCounter {
                employee_id,
                counter_id,
            } => {
                write!(
                    f,
                    "Employee '{employee_id}' is not assigned to counter '{counter_id}'"
                )
            }
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone '{tz}'"),
            Self::InvalidScheduleTime { value, error } => {
                write!(f, "Invalid registration window time '{value}': {error}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
