// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CounterId, DomainError, EmployeeId, ShiftId};
use time::Weekday;
use time::macros::date;

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::CapacityExceeded {
        date: date!(2026 - 03 - 03),
        shift_id: ShiftId::new("Sáng"),
        occupied: 5,
        capacity: 5,
    };
    assert_eq!(format!("{err}"), "Shift 'Sáng' on 2026-03-03 is full (5/5)");

    let err: DomainError = DomainError::WeekendDayOff {
        date: date!(2026 - 03 - 07),
    };
    assert_eq!(
        format!("{err}"),
        "Full-time staff and managers cannot rest on weekend (2026-03-07)"
    );

    let err: DomainError = DomainError::InvalidWeekStart {
        date: date!(2026 - 03 - 04),
        weekday: Weekday::Wednesday,
    };
    assert_eq!(
        format!("{err}"),
        "Week start must be a Monday, but 2026-03-04 is a Wednesday"
    );

    let err: DomainError = DomainError::DuplicateCounterAssignment {
        employee_id: EmployeeId::new("e-1"),
        first_counter: CounterId::new("A"),
        second_counter: CounterId::new("B"),
    };
    assert_eq!(
        format!("{err}"),
        "Employee 'e-1' is assigned to both counter 'A' and counter 'B'"
    );

    let err: DomainError = DomainError::InvalidIdentifier { kind: "counter" };
    assert_eq!(format!("{err}"), "Invalid counter id: cannot be empty");
}

#[test]
fn test_day_off_errors_have_distinct_messages() {
    let missing: String = DomainError::MissingDayOff.to_string();
    let too_many: String = DomainError::TooManyDaysOff { count: 2 }.to_string();
    assert_ne!(missing, too_many);
    assert!(too_many.contains('2'));
}
