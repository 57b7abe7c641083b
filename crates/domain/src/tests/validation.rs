// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    chieu, context, create_test_settings, full_time, manager, part_time, sang, selection_except,
    self_registration, store, test_week, toi,
};
use crate::{
    DomainError, EmployeeId, EntryOrigin, OccupancyCounts, OtherManager, RegistrationContext,
    Settings, ShiftEntry, ShiftId, ToggleOutcome, ValidationOutcome, WeekSelection,
    WeeklyRegistration, check_shift_capacity, toggle_shift_selection, validate_week_selection,
};
use time::Date;
use time::macros::date;

fn no_occupancy() -> OccupancyCounts {
    OccupancyCounts::default()
}

#[test]
fn test_rejects_two_shifts_on_one_day() {
    let settings: Settings = create_test_settings();
    let occupancy: OccupancyCounts = no_occupancy();
    let selection: WeekSelection = WeekSelection::from_pairs(
        test_week(),
        &[
            (date!(2026 - 03 - 03), sang()),
            (date!(2026 - 03 - 03), chieu()),
        ],
    )
    .unwrap();

    // Part-time would otherwise accept this week, so rule 1 is what fails.
    let result: Result<ValidationOutcome, DomainError> =
        validate_week_selection(&context(part_time(), &settings, &occupancy), &selection);
    assert!(matches!(
        result,
        Err(DomainError::MultipleShiftsOnDay { count: 2, .. })
    ));
}

#[test]
fn test_rejects_empty_week() {
    let settings: Settings = create_test_settings();
    let occupancy: OccupancyCounts = no_occupancy();
    let selection: WeekSelection = WeekSelection::new(test_week());

    let result: Result<ValidationOutcome, DomainError> =
        validate_week_selection(&context(part_time(), &settings, &occupancy), &selection);
    assert_eq!(result, Err(DomainError::NoWorkingDays));
}

#[test]
fn test_rejects_unknown_shift() {
    let settings: Settings = create_test_settings();
    let occupancy: OccupancyCounts = no_occupancy();
    let selection: WeekSelection =
        WeekSelection::from_pairs(test_week(), &[(date!(2026 - 03 - 03), ShiftId::new("Đêm"))])
            .unwrap();

    let result: Result<ValidationOutcome, DomainError> =
        validate_week_selection(&context(part_time(), &settings, &occupancy), &selection);
    assert!(matches!(result, Err(DomainError::UnknownShift(_))));
}

#[test]
fn test_part_time_accepts_any_number_of_days_off() {
    let settings: Settings = create_test_settings();
    let occupancy: OccupancyCounts = no_occupancy();

    for empty in [vec![], vec![5, 6], vec![0, 1, 2, 3, 4, 5]] {
        let selection: WeekSelection = selection_except(&toi(), &empty);
        let outcome: ValidationOutcome =
            validate_week_selection(&context(part_time(), &settings, &occupancy), &selection)
                .unwrap();
        assert!(!outcome.requires_confirmation());
    }
}

#[test]
fn test_full_time_requires_a_day_off() {
    let settings: Settings = create_test_settings();
    let occupancy: OccupancyCounts = no_occupancy();
    let selection: WeekSelection = selection_except(&toi(), &[]);

    let result: Result<ValidationOutcome, DomainError> =
        validate_week_selection(&context(full_time(), &settings, &occupancy), &selection);
    assert_eq!(result, Err(DomainError::MissingDayOff));
}

#[test]
fn test_full_time_rejects_more_than_one_day_off() {
    let settings: Settings = create_test_settings();
    let occupancy: OccupancyCounts = no_occupancy();
    let selection: WeekSelection = selection_except(&toi(), &[1, 2]);

    let result: Result<ValidationOutcome, DomainError> =
        validate_week_selection(&context(full_time(), &settings, &occupancy), &selection);
    assert_eq!(result, Err(DomainError::TooManyDaysOff { count: 2 }));
}

#[test]
fn test_full_time_cannot_rest_on_saturday() {
    let settings: Settings = create_test_settings();
    let occupancy: OccupancyCounts = no_occupancy();
    // Mon-Fri and Sun selected, Saturday left empty.
    let selection: WeekSelection = selection_except(&toi(), &[5]);

    let result: Result<ValidationOutcome, DomainError> =
        validate_week_selection(&context(full_time(), &settings, &occupancy), &selection);
    let err: DomainError = result.unwrap_err();
    assert_eq!(
        err,
        DomainError::WeekendDayOff {
            date: date!(2026 - 03 - 07)
        }
    );
    assert!(err.to_string().contains("cannot rest on weekend"));
}

#[test]
fn test_manager_cannot_rest_on_sunday() {
    let settings: Settings = create_test_settings();
    let occupancy: OccupancyCounts = no_occupancy();
    let selection: WeekSelection = selection_except(&toi(), &[6]);

    let result: Result<ValidationOutcome, DomainError> =
        validate_week_selection(&context(manager(), &settings, &occupancy), &selection);
    assert!(matches!(result, Err(DomainError::WeekendDayOff { .. })));
}

#[test]
fn test_full_time_weekday_day_off_is_accepted() {
    let settings: Settings = create_test_settings();
    let occupancy: OccupancyCounts = no_occupancy();
    let selection: WeekSelection = selection_except(&toi(), &[2]);

    let outcome: ValidationOutcome =
        validate_week_selection(&context(full_time(), &settings, &occupancy), &selection).unwrap();
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_manager_day_off_collisions_produce_one_warning_per_manager() {
    let settings: Settings = create_test_settings();
    let occupancy: OccupancyCounts = no_occupancy();
    let selection: WeekSelection = selection_except(&toi(), &[2]);
    let others: Vec<OtherManager> = vec![
        OtherManager {
            employee_id: EmployeeId::new("m-2"),
            name: String::from("Lan"),
            days_off: vec![date!(2026 - 03 - 04)],
        },
        OtherManager {
            employee_id: EmployeeId::new("m-3"),
            name: String::from("Minh"),
            days_off: vec![date!(2026 - 03 - 05)],
        },
        OtherManager {
            employee_id: EmployeeId::new("m-4"),
            name: String::from("Hoa"),
            days_off: vec![date!(2026 - 03 - 04)],
        },
    ];
    let ctx: RegistrationContext<'_> = RegistrationContext {
        other_managers: &others,
        ..context(manager(), &settings, &occupancy)
    };

    let outcome: ValidationOutcome = validate_week_selection(&ctx, &selection).unwrap();
    assert!(outcome.requires_confirmation());
    let ids: Vec<&str> = outcome
        .warnings
        .iter()
        .map(|w| w.manager_id.value())
        .collect();
    assert_eq!(ids, vec!["m-2", "m-4"]);
    assert!(outcome.warnings.iter().all(|w| w.date == date!(2026 - 03 - 04)));
}

#[test]
fn test_full_time_employee_gets_no_manager_warnings() {
    let settings: Settings = create_test_settings();
    let occupancy: OccupancyCounts = no_occupancy();
    let selection: WeekSelection = selection_except(&toi(), &[2]);
    let others: Vec<OtherManager> = vec![OtherManager {
        employee_id: EmployeeId::new("m-2"),
        name: String::from("Lan"),
        days_off: vec![date!(2026 - 03 - 04)],
    }];
    let ctx: RegistrationContext<'_> = RegistrationContext {
        other_managers: &others,
        ..context(full_time(), &settings, &occupancy)
    };

    let outcome: ValidationOutcome = validate_week_selection(&ctx, &selection).unwrap();
    assert!(outcome.warnings.is_empty());
}

fn five_sang_registrants(date: Date) -> Vec<WeeklyRegistration> {
    (1..=5)
        .map(|n| self_registration(&format!("e-{n}"), &[(date, sang())]))
        .collect()
}

#[test]
fn test_sixth_toggle_on_full_weekday_shift_is_rejected() {
    let settings: Settings = create_test_settings();
    let tuesday: Date = date!(2026 - 03 - 03);
    let registrations: Vec<WeeklyRegistration> = five_sang_registrants(tuesday);
    let occupancy: OccupancyCounts =
        OccupancyCounts::tally(&registrations, Some(&EmployeeId::new("e-6")), |_| false);
    let mut selection: WeekSelection = WeekSelection::new(test_week());

    let err: DomainError =
        toggle_shift_selection(&settings, &occupancy, &mut selection, tuesday, &sang())
            .unwrap_err();
    assert!(matches!(err, DomainError::CapacityExceeded { .. }));
    assert!(err.to_string().contains("5/5"));
    // The failed toggle leaves the selection untouched.
    assert!(selection.shifts_on(tuesday).is_empty());

    // Another slot is still available.
    let outcome: ToggleOutcome =
        toggle_shift_selection(&settings, &occupancy, &mut selection, tuesday, &chieu()).unwrap();
    assert_eq!(outcome, ToggleOutcome::Selected);
}

#[test]
fn test_toggle_off_never_checks_capacity() {
    let settings: Settings = create_test_settings();
    let tuesday: Date = date!(2026 - 03 - 03);
    let registrations: Vec<WeeklyRegistration> = five_sang_registrants(tuesday);
    let occupancy: OccupancyCounts = OccupancyCounts::tally(&registrations, None, |_| false);
    let mut selection: WeekSelection =
        WeekSelection::from_pairs(test_week(), &[(tuesday, sang())]).unwrap();

    let outcome: ToggleOutcome =
        toggle_shift_selection(&settings, &occupancy, &mut selection, tuesday, &sang()).unwrap();
    assert_eq!(outcome, ToggleOutcome::Deselected);
    assert!(selection.shifts_on(tuesday).is_empty());
}

#[test]
fn test_toggle_replaces_the_days_previous_shift() {
    let settings: Settings = create_test_settings();
    let occupancy: OccupancyCounts = no_occupancy();
    let tuesday: Date = date!(2026 - 03 - 03);
    let mut selection: WeekSelection =
        WeekSelection::from_pairs(test_week(), &[(tuesday, sang())]).unwrap();

    toggle_shift_selection(&settings, &occupancy, &mut selection, tuesday, &chieu()).unwrap();
    assert_eq!(selection.shifts_on(tuesday), &[chieu()]);
}

#[test]
fn test_occupancy_ignores_managers_forced_entries_and_caller() {
    let tuesday: Date = date!(2026 - 03 - 03);
    let mut forced: WeeklyRegistration = self_registration("e-2", &[]);
    forced
        .put_entry(ShiftEntry::manager_assigned(tuesday, sang()))
        .unwrap();
    let registrations: Vec<WeeklyRegistration> = vec![
        self_registration("e-1", &[(tuesday, sang())]),
        forced,
        self_registration("m-1", &[(tuesday, sang())]),
        self_registration("me", &[(tuesday, sang())]),
        self_registration("e-3", &[(tuesday, sang())]),
    ];

    let occupancy: OccupancyCounts = OccupancyCounts::tally(
        &registrations,
        Some(&EmployeeId::new("me")),
        |id| id.value() == "m-1",
    );
    assert_eq!(occupancy.occupied(tuesday, &sang()), 2);
    assert_eq!(occupancy.occupied(tuesday, &chieu()), 0);
}

#[test]
fn test_submit_rechecks_only_new_shifts() {
    let settings: Settings = create_test_settings();
    let tuesday: Date = date!(2026 - 03 - 03);
    let registrations: Vec<WeeklyRegistration> = five_sang_registrants(tuesday);
    let occupancy: OccupancyCounts = OccupancyCounts::tally(&registrations, None, |_| false);
    let selection: WeekSelection =
        WeekSelection::from_pairs(test_week(), &[(tuesday, sang())]).unwrap();

    // A newcomer is rejected on submit.
    let result: Result<ValidationOutcome, DomainError> =
        validate_week_selection(&context(part_time(), &settings, &occupancy), &selection);
    assert!(matches!(result, Err(DomainError::CapacityExceeded { .. })));

    // Someone who already holds the shift keeps it.
    let previous: WeeklyRegistration = self_registration("e-6", &[(tuesday, sang())]);
    let ctx: RegistrationContext<'_> = RegistrationContext {
        previous: Some(&previous),
        ..context(part_time(), &settings, &occupancy)
    };
    assert!(validate_week_selection(&ctx, &selection).is_ok());
}

#[test]
fn test_check_shift_capacity_returns_capacity() {
    let settings: Settings = create_test_settings();
    let occupancy: OccupancyCounts = no_occupancy();
    assert_eq!(
        check_shift_capacity(&settings, &occupancy, date!(2026 - 03 - 07), &sang()).unwrap(),
        2
    );
}

#[test]
fn test_to_entries_preserves_manager_origin_for_unchanged_shift() {
    let tuesday: Date = date!(2026 - 03 - 03);
    let wednesday: Date = date!(2026 - 03 - 04);
    let mut previous: WeeklyRegistration = WeeklyRegistration::empty(
        EmployeeId::new("e-1"),
        store(),
        test_week(),
    );
    previous
        .put_entry(ShiftEntry::manager_assigned(tuesday, sang()))
        .unwrap();
    previous
        .put_entry(ShiftEntry::manager_assigned(wednesday, sang()))
        .unwrap();

    let selection: WeekSelection =
        WeekSelection::from_pairs(test_week(), &[(tuesday, sang()), (wednesday, chieu())])
            .unwrap();
    let entries: Vec<ShiftEntry> = selection.to_entries(Some(&previous)).unwrap();

    assert_eq!(entries[0].origin, EntryOrigin::ManagerAssigned);
    assert_eq!(entries[1].origin, EntryOrigin::SelfRegistered);
}

#[test]
fn test_other_manager_days_off_come_from_registration() {
    let registration: WeeklyRegistration = self_registration(
        "m-2",
        &[
            (date!(2026 - 03 - 02), sang()),
            (date!(2026 - 03 - 03), sang()),
            (date!(2026 - 03 - 05), sang()),
            (date!(2026 - 03 - 06), sang()),
            (date!(2026 - 03 - 07), sang()),
            (date!(2026 - 03 - 08), sang()),
        ],
    );
    let other: OtherManager = OtherManager::from_registration("Lan", &registration).unwrap();
    assert_eq!(other.days_off, vec![date!(2026 - 03 - 04)]);
}
