// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftboard_domain::{CounterMap, EmployeeId, ShiftId};
use time::Date;

/// A command represents caller intent as data only.
///
/// Commands are the only way to request state changes. Every command
/// applies to the store and week of the [`crate::State`] it is applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace an employee's weekly registration with a new selection.
    SubmitRegistration {
        /// The registering employee.
        employee_id: EmployeeId,
        /// Selected `(date, shift)` pairs.
        shifts: Vec<(Date, ShiftId)>,
        /// Proceed despite manager day-off collision warnings.
        confirm_warnings: bool,
    },
    /// Delete a weekly registration.
    DeleteRegistration {
        /// The registration's storage id.
        registration_id: i64,
        /// The employee requesting the deletion.
        employee_id: EmployeeId,
    },
    /// Place an employee into a shift on behalf of a manager.
    ForceAssign {
        /// The employee being placed.
        target_employee_id: EmployeeId,
        /// The date.
        date: Date,
        /// The shift.
        shift_id: ShiftId,
    },
    /// Remove an employee's entry for a shift on behalf of a manager.
    ForceUnassign {
        /// The employee being removed.
        target_employee_id: EmployeeId,
        /// The date.
        date: Date,
        /// The shift.
        shift_id: ShiftId,
    },
    /// Replace the published counter assignments of one date and shift.
    PublishSchedule {
        /// The date.
        date: Date,
        /// The shift.
        shift_id: ShiftId,
        /// Counter assignments; omitted counters are cleared.
        assignments: CounterMap,
        /// The slot version the caller last saw. `None` publishes unconditionally.
        expected_version: Option<i64>,
    },
}

impl Command {
    /// Returns whether the command is subject to the registration gate.
    #[must_use]
    pub const fn requires_open_registration(&self) -> bool {
        matches!(
            self,
            Self::SubmitRegistration { .. } | Self::DeleteRegistration { .. }
        )
    }
}
