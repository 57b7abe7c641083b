// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    TUESDAY, chieu, create_test_cause, create_test_store, empty_state, employee_actor, now, sang,
    saved_registration, week_except,
};
use crate::{Command, CoreError, State, StoreContext, TransitionResult, apply};
use shiftboard_audit::ActionKind;
use shiftboard_domain::{DomainError, EmployeeId, EntryOrigin, ShiftEntry, WeeklyRegistration};
use time::macros::date;

fn submit(employee: &str, shifts: Vec<(time::Date, shiftboard_domain::ShiftId)>) -> Command {
    Command::SubmitRegistration {
        employee_id: EmployeeId::new(employee),
        shifts,
        confirm_warnings: false,
    }
}

#[test]
fn test_submit_creates_registration_and_audit_event() {
    let store: StoreContext = create_test_store(true);
    let state: State = empty_state();

    let transition: TransitionResult = apply(
        &store,
        &state,
        submit("e-1", vec![(TUESDAY, sang())]),
        employee_actor("e-1"),
        create_test_cause(),
        now(),
    )
    .unwrap();

    let saved: &WeeklyRegistration = transition
        .new_state
        .registration_for(&EmployeeId::new("e-1"))
        .unwrap();
    assert_eq!(saved.shifts().len(), 1);
    assert_eq!(saved.shifts()[0].origin, EntryOrigin::SelfRegistered);
    assert_eq!(
        transition.audit_event.action.kind,
        ActionKind::RegistrationSubmitted
    );
    assert_eq!(transition.audit_event.before.data, "registration=none");
    assert!(transition.audit_event.after.data.contains("2026-03-03:Sáng"));
}

#[test]
fn test_submit_fails_when_registration_closed() {
    let store: StoreContext = create_test_store(false);
    let state: State = empty_state();

    let result: Result<TransitionResult, CoreError> = apply(
        &store,
        &state,
        submit("e-1", vec![(TUESDAY, sang())]),
        employee_actor("e-1"),
        create_test_cause(),
        now(),
    );
    assert!(matches!(result, Err(CoreError::RegistrationClosed { .. })));
}

#[test]
fn test_resubmit_fully_replaces_and_keeps_id() {
    let store: StoreContext = create_test_store(true);
    let mut state: State = empty_state();
    state.registrations.push(saved_registration(
        41,
        "e-1",
        vec![
            ShiftEntry::self_registered(date!(2026 - 03 - 02), sang()),
            ShiftEntry::self_registered(TUESDAY, sang()),
        ],
    ));

    let transition: TransitionResult = apply(
        &store,
        &state,
        submit("e-1", vec![(date!(2026 - 03 - 05), chieu())]),
        employee_actor("e-1"),
        create_test_cause(),
        now(),
    )
    .unwrap();

    let saved: &WeeklyRegistration = transition
        .new_state
        .registration_for(&EmployeeId::new("e-1"))
        .unwrap();
    assert_eq!(saved.registration_id(), Some(41));
    assert_eq!(saved.shifts().len(), 1);
    assert_eq!(saved.shifts()[0].date, date!(2026 - 03 - 05));
    assert_eq!(transition.new_state.registrations.len(), 1);
}

#[test]
fn test_sixth_registrant_on_full_shift_is_rejected() {
    let store: StoreContext = create_test_store(true);
    let mut state: State = empty_state();
    for n in 1..=5 {
        state.registrations.push(saved_registration(
            n,
            &format!("e-{n}"),
            vec![ShiftEntry::self_registered(TUESDAY, sang())],
        ));
    }

    let result: Result<TransitionResult, CoreError> = apply(
        &store,
        &state,
        submit("e-6", vec![(TUESDAY, sang())]),
        employee_actor("e-6"),
        create_test_cause(),
        now(),
    );

    let err: CoreError = result.unwrap_err();
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::CapacityExceeded {
            occupied: 5,
            capacity: 5,
            ..
        })
    ));
    assert!(err.to_string().contains("5/5"));
}

#[test]
fn test_full_time_weekend_day_off_is_rejected() {
    let store: StoreContext = create_test_store(true);
    let state: State = empty_state();

    // Saturday (index 5) left empty.
    let result: Result<TransitionResult, CoreError> = apply(
        &store,
        &state,
        submit("ft-1", week_except(&chieu(), 5)),
        employee_actor("ft-1"),
        create_test_cause(),
        now(),
    );

    let err: CoreError = result.unwrap_err();
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::WeekendDayOff { .. })
    ));
    assert!(err.to_string().contains("cannot rest on weekend"));
}

#[test]
fn test_manager_day_off_collision_requires_confirmation() {
    let store: StoreContext = create_test_store(true);
    let mut state: State = empty_state();
    // m-2 works every day except Wednesday.
    let m2_entries: Vec<ShiftEntry> = week_except(&chieu(), 2)
        .into_iter()
        .map(|(date, shift)| ShiftEntry::self_registered(date, shift))
        .collect();
    state
        .registrations
        .push(saved_registration(9, "m-2", m2_entries));

    let unconfirmed: Result<TransitionResult, CoreError> = apply(
        &store,
        &state,
        submit("m-1", week_except(&chieu(), 2)),
        employee_actor("m-1"),
        create_test_cause(),
        now(),
    );
    match unconfirmed {
        Err(CoreError::ConfirmationRequired { warnings }) => {
            assert_eq!(warnings.len(), 1);
            assert_eq!(warnings[0].manager_id, EmployeeId::new("m-2"));
            assert_eq!(warnings[0].manager_name, "Name m-2");
        }
        other => panic!("expected confirmation request, got {other:?}"),
    }

    let confirmed: TransitionResult = apply(
        &store,
        &state,
        Command::SubmitRegistration {
            employee_id: EmployeeId::new("m-1"),
            shifts: week_except(&chieu(), 2),
            confirm_warnings: true,
        },
        employee_actor("m-1"),
        create_test_cause(),
        now(),
    )
    .unwrap();
    assert_eq!(confirmed.warnings.len(), 1);
}

#[test]
fn test_manager_registrations_do_not_count_against_quota() {
    let store: StoreContext = create_test_store(true);
    let mut state: State = empty_state();
    for n in 1..=4 {
        state.registrations.push(saved_registration(
            n,
            &format!("e-{n}"),
            vec![ShiftEntry::self_registered(TUESDAY, sang())],
        ));
    }
    state.registrations.push(saved_registration(
        20,
        "m-2",
        vec![ShiftEntry::self_registered(TUESDAY, sang())],
    ));

    let result: Result<TransitionResult, CoreError> = apply(
        &store,
        &state,
        submit("e-6", vec![(TUESDAY, sang())]),
        employee_actor("e-6"),
        create_test_cause(),
        now(),
    );
    assert!(result.is_ok());
}

#[test]
fn test_inactive_employee_cannot_register() {
    let store: StoreContext = create_test_store(true);
    let state: State = empty_state();

    let result: Result<TransitionResult, CoreError> = apply(
        &store,
        &state,
        submit("gone", vec![(TUESDAY, sang())]),
        employee_actor("gone"),
        create_test_cause(),
        now(),
    );
    assert!(matches!(
        result,
        Err(CoreError::NotFound {
            kind: "employee",
            ..
        })
    ));
}

#[test]
fn test_delete_own_registration() {
    let store: StoreContext = create_test_store(true);
    let mut state: State = empty_state();
    state.registrations.push(saved_registration(
        7,
        "e-1",
        vec![ShiftEntry::self_registered(TUESDAY, sang())],
    ));

    let transition: TransitionResult = apply(
        &store,
        &state,
        Command::DeleteRegistration {
            registration_id: 7,
            employee_id: EmployeeId::new("e-1"),
        },
        employee_actor("e-1"),
        create_test_cause(),
        now(),
    )
    .unwrap();
    assert!(transition.new_state.registrations.is_empty());
    assert_eq!(
        transition.audit_event.action.kind,
        ActionKind::RegistrationDeleted
    );
}

#[test]
fn test_delete_someone_elses_registration_is_forbidden() {
    let store: StoreContext = create_test_store(true);
    let mut state: State = empty_state();
    state.registrations.push(saved_registration(
        7,
        "e-1",
        vec![ShiftEntry::self_registered(TUESDAY, sang())],
    ));

    let result: Result<TransitionResult, CoreError> = apply(
        &store,
        &state,
        Command::DeleteRegistration {
            registration_id: 7,
            employee_id: EmployeeId::new("e-2"),
        },
        employee_actor("e-2"),
        create_test_cause(),
        now(),
    );
    assert!(matches!(result, Err(CoreError::Forbidden { .. })));
}

#[test]
fn test_delete_missing_registration_is_not_found() {
    let store: StoreContext = create_test_store(true);
    let state: State = empty_state();

    let result: Result<TransitionResult, CoreError> = apply(
        &store,
        &state,
        Command::DeleteRegistration {
            registration_id: 99,
            employee_id: EmployeeId::new("e-1"),
        },
        employee_actor("e-1"),
        create_test_cause(),
        now(),
    );
    assert!(matches!(
        result,
        Err(CoreError::NotFound {
            kind: "registration",
            ..
        })
    ));
}

#[test]
fn test_delete_is_gated() {
    let store: StoreContext = create_test_store(false);
    let mut state: State = empty_state();
    state.registrations.push(saved_registration(
        7,
        "e-1",
        vec![ShiftEntry::self_registered(TUESDAY, sang())],
    ));

    let result: Result<TransitionResult, CoreError> = apply(
        &store,
        &state,
        Command::DeleteRegistration {
            registration_id: 7,
            employee_id: EmployeeId::new("e-1"),
        },
        employee_actor("e-1"),
        create_test_cause(),
        now(),
    );
    assert!(matches!(result, Err(CoreError::RegistrationClosed { .. })));
}
