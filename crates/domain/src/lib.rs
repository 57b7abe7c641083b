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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod ids;
mod monthly;
mod quota;
mod registration_window;
mod schedule;
mod settings;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use ids::{CounterId, EmployeeId, ShiftId, StoreId};
pub use monthly::{MonthlyNotice, MonthlySummary, summarize_month};
pub use quota::{is_weekend, resolve_capacity};
pub use registration_window::{is_registration_open_at, is_within_window};
pub use schedule::{CounterAssignment, CounterMap, ScheduleSlot, normalize_assignments};
pub use settings::{
    DEFAULT_SHIFT_CAPACITY, MonthlyQuotas, QuotaSettings, RegistrationSchedule, Settings,
};
pub use types::{
    Counter, Employee, EmployeeRole, EmployeeType, EntryOrigin, ShiftEntry, WeekStart,
    WeeklyRegistration,
};
pub use validation::{
    DayOffWarning, OccupancyCounts, OtherManager, RegistrantProfile, RegistrationContext,
    ToggleOutcome, ValidationOutcome, WeekSelection, check_shift_capacity,
    toggle_shift_selection, validate_new_shift_capacity, validate_week_selection,
};
