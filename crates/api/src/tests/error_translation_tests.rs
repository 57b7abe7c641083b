// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApiError, translate_core_error, translate_domain_error, translate_persistence_error};
use shiftboard::CoreError;
use shiftboard_domain::{DayOffWarning, DomainError, EmployeeId, ShiftId, StoreId};
use shiftboard_persistence::PersistenceError;
use time::macros::date;

#[test]
fn test_capacity_error_keeps_occupancy_in_message() {
    let err: ApiError = translate_domain_error(DomainError::CapacityExceeded {
        date: date!(2026 - 03 - 03),
        shift_id: ShiftId::new("Sáng"),
        occupied: 5,
        capacity: 5,
    });

    match err {
        ApiError::CapacityExceeded { message } => assert!(message.contains("5/5")),
        other => panic!("expected CapacityExceeded, got {other:?}"),
    }
}

#[test]
fn test_rule_violations_name_the_rule() {
    let err: ApiError = translate_domain_error(DomainError::TooManyDaysOff { count: 2 });

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "exactly_one_day_off"
    ));
}

#[test]
fn test_core_errors_translate_by_kind() {
    assert_eq!(
        translate_core_error(CoreError::RegistrationClosed {
            store_id: StoreId::new("store-1"),
        }),
        ApiError::RegistrationClosed {
            store_id: String::from("store-1"),
        }
    );
    assert!(matches!(
        translate_core_error(CoreError::NotFound {
            kind: "registration",
            id: String::from("7"),
        }),
        ApiError::ResourceNotFound { ref resource_type, .. } if resource_type == "registration"
    ));
    assert!(matches!(
        translate_core_error(CoreError::Forbidden {
            reason: String::from("not yours"),
        }),
        ApiError::Forbidden { .. }
    ));
    assert_eq!(
        translate_core_error(CoreError::Conflict {
            expected: 1,
            actual: 2,
        }),
        ApiError::Conflict {
            expected: 1,
            actual: 2,
        }
    );
}

#[test]
fn test_confirmation_warnings_are_rendered() {
    let err: ApiError = translate_core_error(CoreError::ConfirmationRequired {
        warnings: vec![DayOffWarning {
            manager_id: EmployeeId::new("m-2"),
            manager_name: String::from("Lan"),
            date: date!(2026 - 03 - 02),
        }],
    });

    match err {
        ApiError::ConfirmationRequired { warnings } => {
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].contains("Lan"));
        }
        other => panic!("expected ConfirmationRequired, got {other:?}"),
    }
}

#[test]
fn test_commit_guard_failures_keep_their_meaning() {
    assert_eq!(
        translate_persistence_error(PersistenceError::RegistrationClosed(String::from(
            "store-1"
        ))),
        ApiError::RegistrationClosed {
            store_id: String::from("store-1"),
        }
    );
    assert_eq!(
        translate_persistence_error(PersistenceError::VersionConflict {
            expected: 3,
            actual: 4,
        }),
        ApiError::Conflict {
            expected: 3,
            actual: 4,
        }
    );
    assert!(matches!(
        translate_persistence_error(PersistenceError::StoreNotFound(String::from("x"))),
        ApiError::ResourceNotFound { .. }
    ));
    assert!(matches!(
        translate_persistence_error(PersistenceError::DatabaseError(String::from("disk"))),
        ApiError::Internal { .. }
    ));
}
