// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    EmployeeId, EmployeeRole, EmployeeType, OccupancyCounts, QuotaSettings, RegistrantProfile,
    RegistrationContext, Settings, ShiftEntry, ShiftId, StoreId, WeekSelection, WeekStart,
    WeeklyRegistration,
};
use std::collections::BTreeMap;
use time::Date;
use time::macros::date;

/// Monday 2026-03-02 through Sunday 2026-03-08.
pub fn test_week() -> WeekStart {
    WeekStart::new(date!(2026 - 03 - 02)).unwrap()
}

pub fn sang() -> ShiftId {
    ShiftId::new("Sáng")
}

pub fn chieu() -> ShiftId {
    ShiftId::new("Chiều")
}

pub fn toi() -> ShiftId {
    ShiftId::new("Tối")
}

pub fn store() -> StoreId {
    StoreId::new("store-1")
}

pub fn create_test_settings() -> Settings {
    let mut default_weekday: BTreeMap<ShiftId, u32> = BTreeMap::new();
    default_weekday.insert(sang(), 5);
    default_weekday.insert(chieu(), 3);

    let mut default_weekend: BTreeMap<ShiftId, u32> = BTreeMap::new();
    default_weekend.insert(sang(), 2);

    Settings {
        registration_open: true,
        shift_times: vec![sang(), chieu(), toi()],
        quotas: QuotaSettings {
            default_weekday,
            default_weekend,
            special_dates: BTreeMap::new(),
        },
        ..Settings::default()
    }
}

pub const fn full_time() -> RegistrantProfile {
    RegistrantProfile {
        employee_type: EmployeeType::FullTime,
        role: EmployeeRole::Employee,
    }
}

pub const fn part_time() -> RegistrantProfile {
    RegistrantProfile {
        employee_type: EmployeeType::PartTime,
        role: EmployeeRole::Employee,
    }
}

pub const fn manager() -> RegistrantProfile {
    RegistrantProfile {
        employee_type: EmployeeType::FullTime,
        role: EmployeeRole::Manager,
    }
}

/// Selects `shift` on every day except the given zero-based indices.
pub fn selection_except(shift: &ShiftId, empty: &[usize]) -> WeekSelection {
    let week: WeekStart = test_week();
    let pairs: Vec<(Date, ShiftId)> = week
        .days()
        .unwrap()
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !empty.contains(index))
        .map(|(_, date)| (date, shift.clone()))
        .collect();
    WeekSelection::from_pairs(week, &pairs).unwrap()
}

pub fn self_registration(employee: &str, entries: &[(Date, ShiftId)]) -> WeeklyRegistration {
    WeeklyRegistration::new(
        EmployeeId::new(employee),
        store(),
        test_week(),
        entries
            .iter()
            .map(|(date, shift)| ShiftEntry::self_registered(*date, shift.clone()))
            .collect(),
    )
    .unwrap()
}

pub fn context<'a>(
    profile: RegistrantProfile,
    settings: &'a Settings,
    occupancy: &'a OccupancyCounts,
) -> RegistrationContext<'a> {
    RegistrationContext {
        profile,
        settings,
        occupancy,
        previous: None,
        other_managers: &[],
    }
}
