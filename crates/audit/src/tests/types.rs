// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Action, ActionKind, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use shiftboard_domain::{EmployeeId, ShiftId, StoreId, WeekStart};
use time::macros::date;

fn create_test_event() -> AuditEvent {
    let week: WeekStart = WeekStart::new(date!(2026 - 03 - 02)).unwrap();
    AuditEvent::new(
        Actor::new(EmployeeId::new("m-1"), String::from("manager")),
        Cause::new(String::from("req-1"), String::from("Force assign")),
        Action::new(ActionKind::ShiftForceAssigned, Some(String::from("e-7"))),
        AuditScope::slot(
            StoreId::new("store-1"),
            week,
            date!(2026 - 03 - 03),
            ShiftId::new("Chiều"),
        ),
        StateSnapshot::new(String::from("shifts=[]")),
        StateSnapshot::new(String::from("shifts=[2026-03-03:Chiều*]")),
    )
}

#[test]
fn test_action_kind_round_trips_through_name() {
    for kind in [
        ActionKind::RegistrationSubmitted,
        ActionKind::RegistrationDeleted,
        ActionKind::ShiftForceAssigned,
        ActionKind::ShiftForceUnassigned,
        ActionKind::SchedulePublished,
    ] {
        assert_eq!(kind.as_str().parse::<ActionKind>().unwrap(), kind);
    }
    assert!("SubmitBid".parse::<ActionKind>().is_err());
}

#[test]
fn test_new_event_is_unpersisted() {
    let event: AuditEvent = create_test_event();
    assert_eq!(event.event_id, None);
    assert_eq!(event.clone().with_id(12).event_id, Some(12));
}

#[test]
fn test_week_scope_has_no_slot() {
    let week: WeekStart = WeekStart::new(date!(2026 - 03 - 02)).unwrap();
    let scope: AuditScope = AuditScope::week(StoreId::new("store-1"), week);
    assert_eq!(scope.week_start, Some(week));
    assert!(scope.date.is_none());
    assert!(scope.shift_id.is_none());
}

#[test]
fn test_events_compare_by_content() {
    let a: AuditEvent = create_test_event();
    let b: AuditEvent = create_test_event();
    assert_eq!(a, b);

    let mut c: AuditEvent = create_test_event();
    c.actor = Actor::new(EmployeeId::new("m-2"), String::from("manager"));
    assert_ne!(a, c);
}
