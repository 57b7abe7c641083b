// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApiResult, AuthenticatedActor, CounterAssignmentInfo, Permission, PublishScheduleRequest,
    PublishScheduleResponse, ShiftSelection, SubmitRegistrationRequest, SubmitRegistrationResponse,
    publish_schedule, submit_registration,
};
use shiftboard_audit::Cause;
use shiftboard_domain::{
    Counter, CounterId, Employee, EmployeeId, EmployeeRole, EmployeeType, QuotaSettings, Settings,
    ShiftId, StoreId,
};
use shiftboard_persistence::Persistence;
use std::collections::BTreeMap;
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};

pub const SANG: &str = "Sáng";
pub const CHIEU: &str = "Chiều";

/// Monday of the test week.
pub const MONDAY: Date = date!(2026 - 03 - 02);
pub const TUESDAY: Date = date!(2026 - 03 - 03);

pub const fn now() -> OffsetDateTime {
    datetime!(2026-03-01 09:00 UTC)
}

pub fn store_id() -> StoreId {
    StoreId::new("store-1")
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

pub fn create_test_employee(id: &str) -> AuthenticatedActor {
    AuthenticatedActor::new(EmployeeId::new(id), EmployeeRole::Employee, store_id())
}

/// A scheduler with a UI session.
pub fn create_test_manager(id: &str, session: &str) -> AuthenticatedActor {
    AuthenticatedActor::new(EmployeeId::new(id), EmployeeRole::Manager, store_id())
        .with_permission(Permission::ManageSchedule)
        .with_session(session)
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
/// and `m-2`, counters A, B, C, and weekday quotas Sáng=5, Chiều=3.
pub fn create_seeded_persistence(registration_open: bool) -> Persistence {
    let mut default_weekday: BTreeMap<ShiftId, u32> = BTreeMap::new();
    default_weekday.insert(ShiftId::new(SANG), 5);
    default_weekday.insert(ShiftId::new(CHIEU), 3);
    let settings: Settings = Settings {
        registration_open,
        shift_times: vec![ShiftId::new(SANG), ShiftId::new(CHIEU)],
        quotas: QuotaSettings {
            default_weekday,
            ..QuotaSettings::default()
        },
        ..Settings::default()
    };

    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence.upsert_store(&store_id(), &settings).unwrap();
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
        .upsert_employee(&employee("ft-1", EmployeeType::FullTime, EmployeeRole::Employee))
        .unwrap();
    for id in ["m-1", "m-2"] {
        persistence
            .upsert_employee(&employee(id, EmployeeType::FullTime, EmployeeRole::Manager))
            .unwrap();
    }
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

pub fn pick(date: Date, shift_id: &str) -> ShiftSelection {
    ShiftSelection {
        date,
        shift_id: shift_id.to_string(),
    }
}

/// Every day of the test week on `shift_id` except `day_off_index`.
pub fn week_except(shift_id: &str, day_off_index: i64) -> Vec<ShiftSelection> {
    (0..7)
        .filter(|offset| *offset != day_off_index)
        .map(|offset| pick(MONDAY + time::Duration::days(offset), shift_id))
        .collect()
}

pub fn submit(
    persistence: &mut Persistence,
    employee_id: &str,
    shifts: Vec<ShiftSelection>,
) -> ApiResult<SubmitRegistrationResponse> {
    let request: SubmitRegistrationRequest = SubmitRegistrationRequest {
        week_start: MONDAY,
        shifts,
        confirm_warnings: false,
    };
    submit_registration(
        persistence,
        &request,
        &create_test_employee(employee_id),
        create_test_cause(),
        now(),
    )
    .unwrap()
}

pub fn assignment(employee_ids: &[&str]) -> CounterAssignmentInfo {
    CounterAssignmentInfo {
        employee_ids: employee_ids.iter().map(ToString::to_string).collect(),
        assigned_by_manager: Vec::new(),
    }
}

/// Publishes Tuesday's Sáng slot as manager `m-1`.
pub fn publish_tuesday(
    persistence: &mut Persistence,
    assignments: Vec<(&str, CounterAssignmentInfo)>,
    expected_version: Option<i64>,
) -> ApiResult<PublishScheduleResponse> {
    let request: PublishScheduleRequest = PublishScheduleRequest {
        date: TUESDAY,
        shift_id: SANG.to_string(),
        assignments: assignments
            .into_iter()
            .map(|(counter, assignment)| (counter.to_string(), assignment))
            .collect(),
        expected_version,
    };
    publish_schedule(
        persistence,
        &request,
        &create_test_manager("m-1", "sess-1"),
        create_test_cause(),
        now(),
    )
    .unwrap()
}
