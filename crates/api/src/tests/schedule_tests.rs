// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    ApiError, ApiResult, CounterAssignmentInfo, DraftEditInfo, DraftResponse, EditDraftRequest,
    ForceAssignResponse, ForceShiftRequest, ForceUnassignResponse, ListAuditEventsRequest,
    ListAuditEventsResponse, PublishScheduleRequest, PublishScheduleResponse, ScheduleSlotInfo,
    SlotRequest, SubmitRegistrationRequest, SubmitRegistrationResponse, edit_draft, force_assign,
    force_unassign, get_schedule_slot, list_audit_events, open_draft, publish_schedule,
    submit_registration,
};
use shiftboard_persistence::Persistence;

use super::helpers::{
    MONDAY, SANG, TUESDAY, assignment, create_seeded_persistence, create_test_cause,
    create_test_employee, create_test_manager, now, pick, publish_tuesday, submit,
};

fn force_request(employee_id: &str) -> ForceShiftRequest {
    ForceShiftRequest {
        employee_id: employee_id.to_string(),
        date: TUESDAY,
        shift_id: SANG.to_string(),
    }
}

fn tuesday_slot() -> SlotRequest {
    SlotRequest {
        date: TUESDAY,
        shift_id: SANG.to_string(),
    }
}

// ============================================================================
// Force-assignment
// ============================================================================

#[test]
fn test_force_assign_bypasses_closed_gate_but_self_registration_does_not() {
    let mut persistence: Persistence = create_seeded_persistence(false);

    let assigned: ApiResult<ForceAssignResponse> = force_assign(
        &mut persistence,
        &force_request("e-1"),
        &create_test_manager("m-1", "sess-1"),
        create_test_cause(),
        now(),
    )
    .unwrap();
    let entry = &assigned.response.registration.shifts[0];
    assert_eq!(entry.date, TUESDAY);
    assert_eq!(entry.origin, "manager_assigned");
    assert!(entry.assigned_by_manager);

    let request: SubmitRegistrationRequest = SubmitRegistrationRequest {
        week_start: MONDAY,
        shifts: vec![pick(TUESDAY, SANG)],
        confirm_warnings: false,
    };
    let result: Result<ApiResult<SubmitRegistrationResponse>, ApiError> = submit_registration(
        &mut persistence,
        &request,
        &create_test_employee("e-1"),
        create_test_cause(),
        now(),
    );
    assert!(matches!(result, Err(ApiError::RegistrationClosed { .. })));
}

#[test]
fn test_force_assign_requires_manage_schedule() {
    let mut persistence: Persistence = create_seeded_persistence(true);

    let result: Result<ApiResult<ForceAssignResponse>, ApiError> = force_assign(
        &mut persistence,
        &force_request("e-2"),
        &create_test_employee("e-1"),
        create_test_cause(),
        now(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_force_assign_unknown_employee_is_not_found() {
    let mut persistence: Persistence = create_seeded_persistence(true);

    let result: Result<ApiResult<ForceAssignResponse>, ApiError> = force_assign(
        &mut persistence,
        &force_request("nobody"),
        &create_test_manager("m-1", "sess-1"),
        create_test_cause(),
        now(),
    );

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_force_unassign_clears_published_slot_and_drafts() {
    let mut persistence: Persistence = create_seeded_persistence(true);
    let manager = create_test_manager("m-1", "sess-1");
    force_assign(
        &mut persistence,
        &force_request("e-1"),
        &manager,
        create_test_cause(),
        now(),
    )
    .unwrap();
    publish_tuesday(&mut persistence, vec![("A", assignment(&["e-1"]))], None);

    let other_session = create_test_manager("m-2", "sess-2");
    edit_draft(
        &mut persistence,
        &EditDraftRequest {
            date: TUESDAY,
            shift_id: SANG.to_string(),
            edit: DraftEditInfo::Add {
                employee_id: String::from("e-2"),
                counter_id: String::from("B"),
                assigned_by_manager: false,
            },
        },
        &other_session,
    )
    .unwrap();

    let removed: ApiResult<ForceUnassignResponse> = force_unassign(
        &mut persistence,
        &force_request("e-1"),
        &manager,
        create_test_cause(),
        now(),
    )
    .unwrap();
    assert_eq!(removed.response.removed_from_counters, vec!["A"]);
    assert_eq!(removed.response.drafts_updated, 1);
    assert!(removed.response.registration.is_none());

    let slot: ScheduleSlotInfo =
        get_schedule_slot(&mut persistence, &tuesday_slot(), &create_test_employee("e-3"))
            .unwrap();
    assert_eq!(slot.version, 2);
    assert!(slot.assignments["A"].employee_ids.is_empty());

    let draft: DraftResponse =
        open_draft(&mut persistence, &tuesday_slot(), &other_session).unwrap();
    assert_eq!(draft.status, "dirty");
    assert!(!draft.stale);
    assert!(draft.local["A"].employee_ids.is_empty());
    assert_eq!(draft.local["B"].employee_ids, vec!["e-2"]);
}

#[test]
fn test_force_unassign_of_missing_entry_is_not_found() {
    let mut persistence: Persistence = create_seeded_persistence(true);
    submit(&mut persistence, "e-1", vec![pick(MONDAY, SANG)]);

    let result: Result<ApiResult<ForceUnassignResponse>, ApiError> = force_unassign(
        &mut persistence,
        &force_request("e-1"),
        &create_test_manager("m-1", "sess-1"),
        create_test_cause(),
        now(),
    );

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

// ============================================================================
// Publish
// ============================================================================

#[test]
fn test_publish_clears_counters_left_out() {
    let mut persistence: Persistence = create_seeded_persistence(true);
    publish_tuesday(
        &mut persistence,
        vec![("A", assignment(&["e-1"])), ("C", assignment(&["e-2"]))],
        None,
    );

    let second: ApiResult<PublishScheduleResponse> = publish_tuesday(
        &mut persistence,
        vec![("A", assignment(&["e-3"])), ("B", assignment(&["e-4"]))],
        Some(1),
    );

    let slot: &ScheduleSlotInfo = &second.response.slot;
    assert_eq!(slot.version, 2);
    assert_eq!(slot.published_by.as_deref(), Some("m-1"));
    assert!(slot.published_at.is_some());
    assert_eq!(slot.assignments["A"].employee_ids, vec!["e-3"]);
    assert_eq!(slot.assignments["B"].employee_ids, vec!["e-4"]);
    assert!(slot.assignments["C"].employee_ids.is_empty());
}

#[test]
fn test_publish_with_stale_version_conflicts() {
    let mut persistence: Persistence = create_seeded_persistence(true);
    publish_tuesday(&mut persistence, vec![("A", assignment(&["e-1"]))], None);

    let request: PublishScheduleRequest = PublishScheduleRequest {
        date: TUESDAY,
        shift_id: SANG.to_string(),
        assignments: [(String::from("B"), assignment(&["e-2"]))]
            .into_iter()
            .collect(),
        expected_version: Some(0),
    };
    let result: Result<ApiResult<PublishScheduleResponse>, ApiError> = publish_schedule(
        &mut persistence,
        &request,
        &create_test_manager("m-2", "sess-2"),
        create_test_cause(),
        now(),
    );

    assert_eq!(
        result.unwrap_err(),
        ApiError::Conflict {
            expected: 0,
            actual: 1
        }
    );
    let slot: ScheduleSlotInfo =
        get_schedule_slot(&mut persistence, &tuesday_slot(), &create_test_employee("e-1"))
            .unwrap();
    assert_eq!(slot.assignments["A"].employee_ids, vec!["e-1"]);
}

#[test]
fn test_publish_rejects_employee_in_two_counters() {
    let mut persistence: Persistence = create_seeded_persistence(true);
    let request: PublishScheduleRequest = PublishScheduleRequest {
        date: TUESDAY,
        shift_id: SANG.to_string(),
        assignments: [
            (String::from("A"), assignment(&["e-1"])),
            (String::from("B"), assignment(&["e-1"])),
        ]
        .into_iter()
        .collect(),
        expected_version: None,
    };

    let result: Result<ApiResult<PublishScheduleResponse>, ApiError> = publish_schedule(
        &mut persistence,
        &request,
        &create_test_manager("m-1", "sess-1"),
        create_test_cause(),
        now(),
    );

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "one_counter_per_employee"
    ));
}

#[test]
fn test_publish_rejects_manager_flag_outside_counter() {
    let mut persistence: Persistence = create_seeded_persistence(true);
    let request: PublishScheduleRequest = PublishScheduleRequest {
        date: TUESDAY,
        shift_id: SANG.to_string(),
        assignments: [(
            String::from("A"),
            CounterAssignmentInfo {
                employee_ids: vec![String::from("e-1")],
                assigned_by_manager: vec![String::from("e-2")],
            },
        )]
        .into_iter()
        .collect(),
        expected_version: None,
    };

    let result: Result<ApiResult<PublishScheduleResponse>, ApiError> = publish_schedule(
        &mut persistence,
        &request,
        &create_test_manager("m-1", "sess-1"),
        create_test_cause(),
        now(),
    );

    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));
}

#[test]
fn test_unpublished_slot_reads_as_empty_version_zero() {
    let mut persistence: Persistence = create_seeded_persistence(true);

    let slot: ScheduleSlotInfo =
        get_schedule_slot(&mut persistence, &tuesday_slot(), &create_test_employee("e-1"))
            .unwrap();

    assert_eq!(slot.version, 0);
    assert!(slot.published_at.is_none());
    assert_eq!(slot.assignments.len(), 3);
}

// ============================================================================
// Audit trail
// ============================================================================

#[test]
fn test_audit_trail_lists_committed_actions() {
    let mut persistence: Persistence = create_seeded_persistence(true);
    submit(&mut persistence, "e-1", vec![pick(TUESDAY, SANG)]);
    publish_tuesday(&mut persistence, vec![("A", assignment(&["e-1"]))], None);

    let page: ListAuditEventsResponse = list_audit_events(
        &mut persistence,
        &ListAuditEventsRequest {
            after_event_id: None,
            limit: None,
        },
        &create_test_manager("m-1", "sess-1"),
    )
    .unwrap();

    let actions: Vec<&str> = page.events.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["RegistrationSubmitted", "SchedulePublished"]);
    assert_eq!(page.events[0].actor_id, "e-1");
    assert_eq!(page.events[1].date, Some(TUESDAY));

    let rest: ListAuditEventsResponse = list_audit_events(
        &mut persistence,
        &ListAuditEventsRequest {
            after_event_id: page.events[0].event_id,
            limit: Some(10),
        },
        &create_test_manager("m-1", "sess-1"),
    )
    .unwrap();
    assert_eq!(rest.events.len(), 1);
}

#[test]
fn test_audit_trail_requires_manage_schedule() {
    let mut persistence: Persistence = create_seeded_persistence(true);

    let result: Result<ListAuditEventsResponse, ApiError> = list_audit_events(
        &mut persistence,
        &ListAuditEventsRequest {
            after_event_id: None,
            limit: None,
        },
        &create_test_employee("e-1"),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}
