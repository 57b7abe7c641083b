// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use crate::Persistence;
use shiftboard::{State, StoreContext};
use shiftboard_audit::{Actor, Cause};
use shiftboard_domain::{
    Counter, CounterId, Employee, EmployeeId, EmployeeRole, EmployeeType, QuotaSettings, Settings,
    ShiftId, StoreId, WeekStart,
};
use std::collections::BTreeMap;
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};

pub const TUESDAY: Date = date!(2026 - 03 - 03);

pub fn sang() -> ShiftId {
    ShiftId::new("Sáng")
}

pub fn store_id() -> StoreId {
    StoreId::new("store-1")
}

pub fn test_week() -> WeekStart {
    WeekStart::new(date!(2026 - 03 - 02)).unwrap()
}

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
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn test_settings(registration_open: bool) -> Settings {
    let mut default_weekday: BTreeMap<ShiftId, u32> = BTreeMap::new();
    default_weekday.insert(sang(), 5);
    default_weekday.insert(ShiftId::new("Chiều"), 3);
    Settings {
        registration_open,
        shift_times: vec![sang(), ShiftId::new("Chiều")],
        quotas: QuotaSettings {
            default_weekday,
            ..QuotaSettings::default()
        },
        ..Settings::default()
    }
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

/// Creates an in-memory database holding one store with part-timers
/// `e-1`..`e-6`, manager `m-1` and counters A, B, C.
pub fn create_seeded_persistence(registration_open: bool) -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence
        .upsert_store(&store_id(), &test_settings(registration_open))
        .unwrap();
    for n in 1..=6 {
        persistence
            .upsert_employee(&employee(
                &format!("e-{n}"),
                EmployeeType::PartTime,
                EmployeeRole::Employee,
            ))
            .unwrap();
    }
    persistence
        .upsert_employee(&employee("m-1", EmployeeType::FullTime, EmployeeRole::Manager))
        .unwrap();
    let counters: Vec<Counter> = ["A", "B", "C"]
        .iter()
        .map(|id| Counter {
            id: CounterId::new(id),
            name: format!("Counter {id}"),
        })
        .collect();
    persistence.replace_counters(&store_id(), &counters).unwrap();
    persistence
}

/// Loads the store and the test week.
pub fn load(persistence: &mut Persistence) -> (StoreContext, State) {
    let store: StoreContext = persistence.load_store_context(&store_id()).unwrap();
    let state: State = persistence.load_state(&store, test_week()).unwrap();
    (store, state)
}
