// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{State, StoreContext};
use shiftboard_audit::{Actor, Cause};
use shiftboard_domain::{
    Counter, CounterId, Employee, EmployeeId, EmployeeRole, EmployeeType, QuotaSettings, Settings,
    ShiftEntry, ShiftId, StoreId, WeekStart, WeeklyRegistration,
};
use std::collections::BTreeMap;
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};

pub fn sang() -> ShiftId {
    ShiftId::new("Sáng")
}

pub fn chieu() -> ShiftId {
    ShiftId::new("Chiều")
}

pub fn store_id() -> StoreId {
    StoreId::new("store-1")
}

/// Monday 2026-03-02.
pub fn test_week() -> WeekStart {
    WeekStart::new(date!(2026 - 03 - 02)).unwrap()
}

pub const TUESDAY: Date = date!(2026 - 03 - 03);

pub const fn now() -> OffsetDateTime {
    datetime!(2026-03-01 09:00 UTC)
}

pub fn create_test_actor() -> Actor {
    Actor::new(EmployeeId::new("m-1"), String::from("manager"))
}

pub fn employee_actor(id: &str) -> Actor {
    Actor::new(EmployeeId::new(id), String::from("employee"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Test request"))
}

fn employee(id: &str, employee_type: EmployeeType, role: EmployeeRole) -> Employee {
    Employee {
        id: EmployeeId::new(id),
        name: format!("Name {id}"),
        employee_type,
        role,
        store_id: store_id(),
        is_active: true,
    }
}

/// Store with part-timers `e-1`..`e-6`, full-timer `ft-1`, managers `m-1`
/// and `m-2`, and counters A, B, C.
pub fn create_test_store(registration_open: bool) -> StoreContext {
    let mut default_weekday: BTreeMap<ShiftId, u32> = BTreeMap::new();
    default_weekday.insert(sang(), 5);
    default_weekday.insert(chieu(), 3);

    let mut employees: Vec<Employee> = (1..=6)
        .map(|n| {
            employee(
                &format!("e-{n}"),
                EmployeeType::PartTime,
                EmployeeRole::Employee,
            )
        })
        .collect();
    employees.push(employee("ft-1", EmployeeType::FullTime, EmployeeRole::Employee));
    employees.push(employee("m-1", EmployeeType::FullTime, EmployeeRole::Manager));
    employees.push(employee("m-2", EmployeeType::FullTime, EmployeeRole::Manager));
    let mut retired: Employee = employee("gone", EmployeeType::PartTime, EmployeeRole::Employee);
    retired.is_active = false;
    employees.push(retired);

    StoreContext {
        store_id: store_id(),
        settings: Settings {
            registration_open,
            shift_times: vec![sang(), chieu()],
            quotas: QuotaSettings {
                default_weekday,
                ..QuotaSettings::default()
            },
            ..Settings::default()
        },
        employees,
        counters: ["A", "B", "C"]
            .iter()
            .map(|id| Counter {
                id: CounterId::new(id),
                name: format!("Counter {id}"),
            })
            .collect(),
    }
}

pub fn empty_state() -> State {
    State::new(store_id(), test_week())
}

pub fn saved_registration(id: i64, employee: &str, entries: Vec<ShiftEntry>) -> WeeklyRegistration {
    WeeklyRegistration::new(EmployeeId::new(employee), store_id(), test_week(), entries)
        .unwrap()
        .with_id(id)
}

/// Every day except `day_off_index` on the given shift.
pub fn week_except(shift: &ShiftId, day_off_index: usize) -> Vec<(Date, ShiftId)> {
    test_week()
        .days()
        .unwrap()
        .into_iter()
        .enumerate()
        .filter(|(index, _)| *index != day_off_index)
        .map(|(_, date)| (date, shift.clone()))
        .collect()
}
