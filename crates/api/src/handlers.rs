// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! State-changing handlers load the store and week, apply one core
//! command, and commit the result with the guard that matches the
//! caller: self-service writes re-check the registration gate inside
//! the write transaction, manager writes bypass it.

use std::collections::BTreeMap;
use tracing::debug;

use shiftboard::{
    CascadeNotice, Command, Draft, DraftEdit, SlotAvailability, State, StoreContext, ToggleResult,
    TransitionResult, apply, ensure_registration_open, purge_employee_from_drafts, toggle_shift,
    week_availability,
};
use shiftboard_audit::{AuditEvent, Cause};
use shiftboard_domain::{
    CounterAssignment, CounterId, CounterMap, Employee, EmployeeId, MonthlyNotice, MonthlySummary,
    ScheduleSlot, ShiftEntry, ShiftId, ToggleOutcome, WeekStart, WeeklyRegistration,
    is_registration_open_at, summarize_month,
};
use shiftboard_persistence::{CommitGuard, PersistTransitionResult, Persistence};
use time::{Date, Month, OffsetDateTime};

use crate::auth::{AuthenticatedActor, AuthorizationService, Permission};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AuditEventInfo, AvailabilityRequest, AvailabilityResponse, CounterAssignmentInfo,
    DeleteRegistrationResponse, DraftEditInfo, DraftResponse, EditDraftRequest,
    ForceAssignResponse, ForceShiftRequest, ForceUnassignResponse, ListAuditEventsRequest,
    ListAuditEventsResponse, ListRegistrationsRequest, ListRegistrationsResponse,
    MonthlyNoticeInfo, MonthlySummaryRequest, MonthlySummaryResponse, PublishDraftResponse,
    PublishScheduleRequest, PublishScheduleResponse, RegistrationInfo, ScheduleSlotInfo,
    ShiftEntryInfo, ShiftSelection, SlotAvailabilityInfo, SlotRequest, SubmitRegistrationRequest,
    SubmitRegistrationResponse, ToggleShiftRequest, ToggleShiftResponse,
};

/// Audit page size when the caller does not ask for one.
pub const DEFAULT_AUDIT_PAGE_SIZE: i64 = 100;

/// Largest audit page a caller may request.
pub const MAX_AUDIT_PAGE_SIZE: i64 = 500;

/// The result of a state-changing API operation.
///
/// Successful state-changing operations always produce a persisted audit
/// event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// The persisted audit event, with its storage id.
    pub audit_event: AuditEvent,
}

// ============================================================================
// Self-registration
// ============================================================================

/// Evaluates one toggle of the caller's unsaved weekly selection.
///
/// Nothing is saved. Turning a shift on is capacity-checked against the
/// other non-manager self-registrants; turning it off never is.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The toggle and the selection before it
/// * `actor` - The authenticated caller
///
/// # Errors
///
/// Returns an error if:
/// - the store or caller is unknown
/// - the shift is not configured or the date falls outside the selection's week
/// - the shift is full (`CapacityExceeded`, message includes `occupied/capacity`)
pub fn toggle_registration_shift(
    persistence: &mut Persistence,
    request: &ToggleShiftRequest,
    actor: &AuthenticatedActor,
) -> Result<ToggleShiftResponse, ApiError> {
    let store: StoreContext = load_store(persistence, actor)?;
    let state: State = load_week(persistence, &store, request.date)?;
    let shift_id: ShiftId = parse_shift_id(&request.shift_id)?;
    let current: Vec<(Date, ShiftId)> = parse_selection(&request.current)?;

    let result: ToggleResult = toggle_shift(
        &store,
        &state,
        &actor.employee_id,
        &current,
        request.date,
        &shift_id,
    )
    .map_err(translate_core_error)?;

    Ok(ToggleShiftResponse {
        selected: result.outcome == ToggleOutcome::Selected,
        selection: result
            .selection
            .iter()
            .map(|(date, shift_id)| ShiftSelection {
                date: *date,
                shift_id: shift_id.to_string(),
            })
            .collect(),
    })
}

/// Saves the caller's weekly registration, replacing any saved one.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The week and full selection
/// * `actor` - The authenticated caller
/// * `cause` - The cause or reason for this action
/// * `now` - The instant the registration gate is evaluated at
///
/// # Errors
///
/// Returns an error if:
/// - the registration gate is closed, including when it closes before commit
/// - the selection violates a registration rule
/// - a newly selected shift is full
/// - manager day-off warnings exist and were not confirmed
pub fn submit_registration(
    persistence: &mut Persistence,
    request: &SubmitRegistrationRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<SubmitRegistrationResponse>, ApiError> {
    let store: StoreContext = load_store(persistence, actor)?;
    let week_start: WeekStart =
        WeekStart::new(request.week_start).map_err(translate_domain_error)?;
    let state: State = persistence
        .load_state(&store, week_start)
        .map_err(translate_persistence_error)?;

    let command: Command = Command::SubmitRegistration {
        employee_id: actor.employee_id.clone(),
        shifts: parse_selection(&request.shifts)?,
        confirm_warnings: request.confirm_warnings,
    };
    let result: TransitionResult = apply(
        &store,
        &state,
        command,
        actor.to_audit_actor(),
        cause,
        now,
    )
    .map_err(translate_core_error)?;
    let (audit_event, event_id): (AuditEvent, i64) = commit(
        persistence,
        &state,
        &result,
        CommitGuard::self_service(now),
    )?;

    let saved: WeeklyRegistration = read_back(persistence, &actor.employee_id, week_start)?;
    let message: String = format!(
        "Saved {} shift(s) for the week of {week_start}",
        saved.shifts().len()
    );

    Ok(ApiResult {
        response: SubmitRegistrationResponse {
            registration: registration_info(&saved),
            warnings: result.warnings.iter().map(ToString::to_string).collect(),
            event_id,
            message,
        },
        audit_event,
    })
}

/// Lists registrations of one week of the caller's store.
///
/// Without an employee filter, callers holding `ManageSchedule` see every
/// registration and everyone else sees their own.
///
/// # Errors
///
/// Returns an error if the week start is not a Monday, or the caller asks
/// for someone else's registration without `ManageSchedule`.
pub fn list_registrations(
    persistence: &mut Persistence,
    request: &ListRegistrationsRequest,
    actor: &AuthenticatedActor,
) -> Result<ListRegistrationsResponse, ApiError> {
    let store: StoreContext = load_store(persistence, actor)?;
    let week_start: WeekStart =
        WeekStart::new(request.week_start).map_err(translate_domain_error)?;

    let employee_filter: Option<EmployeeId> = match &request.employee_id {
        Some(raw) => Some(parse_employee_id(raw)?),
        None if actor.has_permission(Permission::ManageSchedule) => None,
        None => Some(actor.employee_id.clone()),
    };

    let mut registrations: Vec<WeeklyRegistration> = match employee_filter {
        Some(employee_id) => {
            AuthorizationService::authorize_view_registrations(actor, &employee_id)?;
            persistence
                .find_registration(&employee_id, week_start)
                .map_err(translate_persistence_error)?
                .into_iter()
                .filter(|r| r.store_id() == &store.store_id)
                .collect()
        }
        None => {
            persistence
                .load_state(&store, week_start)
                .map_err(translate_persistence_error)?
                .registrations
        }
    };
    registrations.sort_by(|a, b| a.employee_id().cmp(b.employee_id()));

    Ok(ListRegistrationsResponse {
        week_start: request.week_start,
        registrations: registrations.iter().map(registration_info).collect(),
    })
}

/// Deletes one of the caller's weekly registrations.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `registration_id` - The registration to delete
/// * `actor` - The authenticated caller
/// * `cause` - The cause or reason for this action
/// * `now` - The instant the registration gate is evaluated at
///
/// # Errors
///
/// Returns an error if:
/// - the registration gate is closed
/// - the registration does not exist in the caller's store
/// - the registration belongs to someone else (`Forbidden`)
pub fn delete_registration(
    persistence: &mut Persistence,
    registration_id: i64,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<DeleteRegistrationResponse>, ApiError> {
    let store: StoreContext = load_store(persistence, actor)?;
    ensure_registration_open(&store.settings, &store.store_id, now)
        .map_err(translate_core_error)?;

    let registration: WeeklyRegistration = persistence
        .get_registration(registration_id)
        .map_err(translate_persistence_error)?
        .filter(|r| r.store_id() == &store.store_id)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("registration"),
            message: format!("registration '{registration_id}' does not exist"),
        })?;
    let state: State = persistence
        .load_state(&store, registration.week_start())
        .map_err(translate_persistence_error)?;

    let command: Command = Command::DeleteRegistration {
        registration_id,
        employee_id: actor.employee_id.clone(),
    };
    let result: TransitionResult = apply(
        &store,
        &state,
        command,
        actor.to_audit_actor(),
        cause,
        now,
    )
    .map_err(translate_core_error)?;
    let (audit_event, event_id): (AuditEvent, i64) = commit(
        persistence,
        &state,
        &result,
        CommitGuard::self_service(now),
    )?;

    Ok(ApiResult {
        response: DeleteRegistrationResponse {
            registration_id,
            event_id,
            message: format!(
                "Deleted the registration for the week of {}",
                registration.week_start()
            ),
        },
        audit_event,
    })
}

/// Reports occupancy versus capacity for every date and shift of a week.
///
/// The caller's own entries are not counted, so `has_room` answers
/// "could I still take this shift".
///
/// # Errors
///
/// Returns an error if the week start is not a Monday or the registration
/// window is misconfigured.
pub fn get_week_availability(
    persistence: &mut Persistence,
    request: &AvailabilityRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<AvailabilityResponse, ApiError> {
    let store: StoreContext = load_store(persistence, actor)?;
    let week_start: WeekStart =
        WeekStart::new(request.week_start).map_err(translate_domain_error)?;
    let state: State = persistence
        .load_state(&store, week_start)
        .map_err(translate_persistence_error)?;

    let slots: Vec<SlotAvailability> =
        week_availability(&store, &state, Some(&actor.employee_id))
            .map_err(translate_core_error)?;
    let registration_open: bool =
        is_registration_open_at(&store.settings, now).map_err(translate_domain_error)?;

    Ok(AvailabilityResponse {
        week_start: request.week_start,
        registration_open,
        slots: slots
            .iter()
            .map(|slot| SlotAvailabilityInfo {
                date: slot.date,
                shift_id: slot.shift_id.to_string(),
                occupied: slot.occupied,
                capacity: slot.capacity,
                has_room: slot.has_room(),
            })
            .collect(),
    })
}

/// Summarizes an employee's month against the store's advisory targets.
///
/// # Errors
///
/// Returns an error if the month is invalid, the employee is not an active
/// member of the store, or the caller asks for someone else without
/// `ManageSchedule`.
pub fn get_monthly_summary(
    persistence: &mut Persistence,
    request: &MonthlySummaryRequest,
    actor: &AuthenticatedActor,
) -> Result<MonthlySummaryResponse, ApiError> {
    let employee_id: EmployeeId = match &request.employee_id {
        Some(raw) => parse_employee_id(raw)?,
        None => actor.employee_id.clone(),
    };
    AuthorizationService::authorize_view_registrations(actor, &employee_id)?;

    let month: Month = Month::try_from(request.month).map_err(|e| ApiError::InvalidInput {
        field: String::from("month"),
        message: e.to_string(),
    })?;
    let store: StoreContext = load_store(persistence, actor)?;
    let employee: &Employee = store
        .active_employee(&employee_id)
        .map_err(translate_core_error)?;

    let registrations: Vec<WeeklyRegistration> = persistence
        .registrations_in_month(&employee_id, request.year, month)
        .map_err(translate_persistence_error)?;
    let summary: MonthlySummary = summarize_month(
        employee.employee_type,
        &store.settings.monthly_quotas,
        request.year,
        month,
        &registrations,
    )
    .map_err(translate_domain_error)?;

    Ok(MonthlySummaryResponse {
        employee_id: employee_id.to_string(),
        year: summary.year,
        month: u8::from(summary.month),
        shifts_worked: summary.shifts_worked,
        days_off: summary.days_off,
        notices: summary.notices.iter().map(notice_info).collect(),
    })
}

// ============================================================================
// Manager force-assignment
// ============================================================================

/// Places an employee into a shift on behalf of a manager.
///
/// Registration rules, capacity and the registration gate do not apply.
///
/// # Errors
///
/// Returns an error if:
/// - the caller lacks `ManageSchedule`
/// - the target is not an active member of the store
/// - the shift is not configured
pub fn force_assign(
    persistence: &mut Persistence,
    request: &ForceShiftRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<ForceAssignResponse>, ApiError> {
    AuthorizationService::authorize_manage_schedule(actor, "force_assign")?;

    let store: StoreContext = load_store(persistence, actor)?;
    let target: EmployeeId = parse_employee_id(&request.employee_id)?;
    let shift_id: ShiftId = parse_shift_id(&request.shift_id)?;
    let state: State = load_week(persistence, &store, request.date)?;

    let command: Command = Command::ForceAssign {
        target_employee_id: target.clone(),
        date: request.date,
        shift_id: shift_id.clone(),
    };
    let result: TransitionResult = apply(
        &store,
        &state,
        command,
        actor.to_audit_actor(),
        cause,
        now,
    )
    .map_err(translate_core_error)?;
    let (audit_event, event_id): (AuditEvent, i64) =
        commit(persistence, &state, &result, CommitGuard::manager())?;

    let saved: WeeklyRegistration = read_back(persistence, &target, state.week_start)?;
    Ok(ApiResult {
        response: ForceAssignResponse {
            registration: registration_info(&saved),
            event_id,
            message: format!("Assigned {target} to '{shift_id}' on {}", request.date),
        },
        audit_event,
    })
}

/// Removes an employee's entry for a shift on behalf of a manager.
///
/// The employee is also taken off the published slot in the same
/// transaction, and then purged from every manager draft of that slot.
///
/// # Errors
///
/// Returns an error if:
/// - the caller lacks `ManageSchedule`
/// - the target has no registration or no entry for the shift
/// - a draft could not be updated
pub fn force_unassign(
    persistence: &mut Persistence,
    request: &ForceShiftRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<ForceUnassignResponse>, ApiError> {
    AuthorizationService::authorize_manage_schedule(actor, "force_unassign")?;

    let store: StoreContext = load_store(persistence, actor)?;
    let target: EmployeeId = parse_employee_id(&request.employee_id)?;
    let shift_id: ShiftId = parse_shift_id(&request.shift_id)?;
    let state: State = load_week(persistence, &store, request.date)?;

    let command: Command = Command::ForceUnassign {
        target_employee_id: target.clone(),
        date: request.date,
        shift_id: shift_id.clone(),
    };
    let result: TransitionResult = apply(
        &store,
        &state,
        command,
        actor.to_audit_actor(),
        cause,
        now,
    )
    .map_err(translate_core_error)?;
    let (audit_event, event_id): (AuditEvent, i64) =
        commit(persistence, &state, &result, CommitGuard::manager())?;

    let removed_from: Vec<CounterId> = result
        .cascade
        .as_ref()
        .map(|notice: &CascadeNotice| notice.removed_from.clone())
        .unwrap_or_default();
    let slot: ScheduleSlot = published_slot(persistence, &store, request.date, &shift_id)?;
    let drafts_updated: usize = purge_employee_from_drafts(
        &mut *persistence,
        &slot,
        &store.counters,
        &target,
        !removed_from.is_empty(),
    )
    .map_err(translate_core_error)?;
    debug!(
        employee_id = %target,
        date = %request.date,
        shift_id = %shift_id,
        drafts_updated,
        "Purged force-unassigned employee from drafts"
    );

    let remaining: Option<WeeklyRegistration> = persistence
        .find_registration(&target, state.week_start)
        .map_err(translate_persistence_error)?
        .filter(|r| !r.is_empty());

    Ok(ApiResult {
        response: ForceUnassignResponse {
            registration: remaining.as_ref().map(registration_info),
            removed_from_counters: removed_from.iter().map(ToString::to_string).collect(),
            drafts_updated,
            event_id,
            message: format!("Removed {target} from '{shift_id}' on {}", request.date),
        },
        audit_event,
    })
}

// ============================================================================
// Published schedule
// ============================================================================

/// Publishes the counter assignments of one date and shift.
///
/// Every configured counter is replaced; counters missing from the request
/// are cleared. With `expected_version` the publish fails instead of
/// overwriting a slot someone else published in the meantime; without it
/// the last write wins.
///
/// # Errors
///
/// Returns an error if:
/// - the caller lacks `ManageSchedule` (`Unauthorized`)
/// - an employee appears in two counters, a counter is unknown, or a
///   manager flag names an unassigned employee
/// - the slot version differs from `expected_version` (`Conflict`)
pub fn publish_schedule(
    persistence: &mut Persistence,
    request: &PublishScheduleRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<PublishScheduleResponse>, ApiError> {
    AuthorizationService::authorize_manage_schedule(actor, "publish_schedule")?;

    let store: StoreContext = load_store(persistence, actor)?;
    let shift_id: ShiftId = parse_shift_id(&request.shift_id)?;
    let assignments: CounterMap = counter_map_from_wire(&request.assignments)?;
    let state: State = load_week(persistence, &store, request.date)?;

    let command: Command = Command::PublishSchedule {
        date: request.date,
        shift_id: shift_id.clone(),
        assignments,
        expected_version: request.expected_version,
    };
    let result: TransitionResult = apply(
        &store,
        &state,
        command,
        actor.to_audit_actor(),
        cause,
        now,
    )
    .map_err(translate_core_error)?;
    let guard: CommitGuard = if request.expected_version.is_some() {
        CommitGuard::manager()
    } else {
        CommitGuard::manager().last_write_wins()
    };
    let (audit_event, event_id): (AuditEvent, i64) =
        commit(persistence, &state, &result, guard)?;

    let slot: ScheduleSlot = published_slot(persistence, &store, request.date, &shift_id)?;

    Ok(ApiResult {
        response: PublishScheduleResponse {
            slot: slot_info(&slot)?,
            event_id,
            message: format!(
                "Published '{shift_id}' on {} as version {}",
                request.date, slot.version
            ),
        },
        audit_event,
    })
}

/// Returns the published slot of one date and shift.
///
/// A slot that was never published is returned empty at version 0.
///
/// # Errors
///
/// Returns an error if the shift is not configured for the store.
pub fn get_schedule_slot(
    persistence: &mut Persistence,
    request: &SlotRequest,
    actor: &AuthenticatedActor,
) -> Result<ScheduleSlotInfo, ApiError> {
    let store: StoreContext = load_store(persistence, actor)?;
    let shift_id: ShiftId = parse_shift_id(&request.shift_id)?;
    store
        .settings
        .ensure_shift(&shift_id)
        .map_err(translate_domain_error)?;
    let slot: ScheduleSlot = published_slot(persistence, &store, request.date, &shift_id)?;
    slot_info(&slot)
}

// ============================================================================
// Manager drafts
// ============================================================================

/// Opens the caller's draft of a slot.
///
/// Returns the session's unpublished edits when they exist (`dirty`),
/// otherwise the published mapping (`clean`).
///
/// # Errors
///
/// Returns an error if the caller lacks `ManageSchedule` or a session, or
/// the shift is not configured.
pub fn open_draft(
    persistence: &mut Persistence,
    request: &SlotRequest,
    actor: &AuthenticatedActor,
) -> Result<DraftResponse, ApiError> {
    AuthorizationService::authorize_manage_schedule(actor, "open_draft")?;
    let store: StoreContext = load_store(persistence, actor)?;
    let draft: Draft =
        open_slot_draft(persistence, &store, actor, request.date, &request.shift_id)?;
    Ok(draft_response(&draft))
}

/// Applies one edit to the caller's draft of a slot.
///
/// # Errors
///
/// Returns an error if the caller lacks `ManageSchedule` or a session, a
/// counter is unknown, or the edit does not fit the local mapping.
pub fn edit_draft(
    persistence: &mut Persistence,
    request: &EditDraftRequest,
    actor: &AuthenticatedActor,
) -> Result<DraftResponse, ApiError> {
    AuthorizationService::authorize_manage_schedule(actor, "edit_draft")?;
    let store: StoreContext = load_store(persistence, actor)?;
    let edit: DraftEdit = draft_edit_from_wire(&request.edit)?;

    let mut draft: Draft =
        open_slot_draft(persistence, &store, actor, request.date, &request.shift_id)?;
    draft
        .edit(&mut *persistence, edit)
        .map_err(translate_core_error)?;
    Ok(draft_response(&draft))
}

/// Drops the caller's unpublished edits of a slot.
///
/// # Errors
///
/// Returns an error if the caller lacks `ManageSchedule` or a session.
pub fn discard_draft(
    persistence: &mut Persistence,
    request: &SlotRequest,
    actor: &AuthenticatedActor,
) -> Result<DraftResponse, ApiError> {
    AuthorizationService::authorize_manage_schedule(actor, "discard_draft")?;
    let store: StoreContext = load_store(persistence, actor)?;

    let mut draft: Draft =
        open_slot_draft(persistence, &store, actor, request.date, &request.shift_id)?;
    draft
        .discard(&mut *persistence)
        .map_err(translate_core_error)?;
    Ok(draft_response(&draft))
}

/// Publishes the caller's draft of a slot.
///
/// The publish carries the version the draft was started from. On success
/// the scratch copy is cleared and the draft is clean; on conflict the
/// draft stays dirty so it can be discarded or reapplied.
///
/// # Errors
///
/// Returns an error if the caller lacks `ManageSchedule` or a session, the
/// local mapping fails publish validation, or the slot was republished
/// since the draft started (`Conflict`).
pub fn publish_draft(
    persistence: &mut Persistence,
    request: &SlotRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ApiResult<PublishDraftResponse>, ApiError> {
    AuthorizationService::authorize_manage_schedule(actor, "publish_draft")?;
    let store: StoreContext = load_store(persistence, actor)?;

    let mut draft: Draft =
        open_slot_draft(persistence, &store, actor, request.date, &request.shift_id)?;
    let state: State = load_week(persistence, &store, request.date)?;

    let result: TransitionResult = apply(
        &store,
        &state,
        draft.publish_command(),
        actor.to_audit_actor(),
        cause,
        now,
    )
    .map_err(translate_core_error)?;
    let (audit_event, event_id): (AuditEvent, i64) =
        commit(persistence, &state, &result, CommitGuard::manager())?;

    let slot: ScheduleSlot = result
        .new_state
        .slot_for(draft.key().date, &draft.key().shift_id)
        .cloned()
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Published slot missing from the new state"),
        })?;
    draft
        .confirm_published(&mut *persistence, &slot)
        .map_err(translate_core_error)?;

    Ok(ApiResult {
        response: PublishDraftResponse {
            draft: draft_response(&draft),
            event_id,
            message: format!(
                "Published '{}' on {} as version {}",
                slot.shift_id, slot.date, slot.version
            ),
        },
        audit_event,
    })
}

// ============================================================================
// Audit trail
// ============================================================================

/// Lists a page of the store's audit trail, oldest first.
///
/// # Errors
///
/// Returns an error if the caller lacks `ManageSchedule`.
pub fn list_audit_events(
    persistence: &mut Persistence,
    request: &ListAuditEventsRequest,
    actor: &AuthenticatedActor,
) -> Result<ListAuditEventsResponse, ApiError> {
    AuthorizationService::authorize_manage_schedule(actor, "view_audit_trail")?;

    let limit: i64 = request
        .limit
        .unwrap_or(DEFAULT_AUDIT_PAGE_SIZE)
        .clamp(1, MAX_AUDIT_PAGE_SIZE);
    let events: Vec<AuditEvent> = persistence
        .list_audit_events(&actor.store_id, request.after_event_id, limit)
        .map_err(translate_persistence_error)?;

    Ok(ListAuditEventsResponse {
        events: events.iter().map(audit_event_info).collect(),
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn load_store(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<StoreContext, ApiError> {
    persistence
        .load_store_context(&actor.store_id)
        .map_err(translate_persistence_error)
}

/// Loads the state of the week containing `date`.
fn load_week(
    persistence: &mut Persistence,
    store: &StoreContext,
    date: Date,
) -> Result<State, ApiError> {
    let week_start: WeekStart = WeekStart::containing(date).map_err(translate_domain_error)?;
    persistence
        .load_state(store, week_start)
        .map_err(translate_persistence_error)
}

fn commit(
    persistence: &mut Persistence,
    previous: &State,
    result: &TransitionResult,
    guard: CommitGuard,
) -> Result<(AuditEvent, i64), ApiError> {
    let persisted: PersistTransitionResult = persistence
        .persist_transition(previous, result, guard)
        .map_err(translate_persistence_error)?;
    Ok((
        result.audit_event.clone().with_id(persisted.event_id),
        persisted.event_id,
    ))
}

fn read_back(
    persistence: &mut Persistence,
    employee_id: &EmployeeId,
    week_start: WeekStart,
) -> Result<WeeklyRegistration, ApiError> {
    persistence
        .find_registration(employee_id, week_start)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("Registration of {employee_id} for {week_start} was not saved"),
        })
}

/// Loads a published slot with every counter listed, or an empty one.
fn published_slot(
    persistence: &mut Persistence,
    store: &StoreContext,
    date: Date,
    shift_id: &ShiftId,
) -> Result<ScheduleSlot, ApiError> {
    let found: Option<ScheduleSlot> = persistence
        .find_slot(&store.store_id, date, shift_id)
        .map_err(translate_persistence_error)?;
    Ok(match found {
        Some(mut slot) => {
            for counter in &store.counters {
                slot.assignments.entry(counter.id.clone()).or_default();
            }
            slot
        }
        None => ScheduleSlot::unpublished(
            store.store_id.clone(),
            date,
            shift_id.clone(),
            &store.counters,
        ),
    })
}

fn open_slot_draft(
    persistence: &mut Persistence,
    store: &StoreContext,
    actor: &AuthenticatedActor,
    date: Date,
    shift_id: &str,
) -> Result<Draft, ApiError> {
    let session_id: &str = actor
        .session_id
        .as_deref()
        .ok_or_else(|| ApiError::InvalidInput {
            field: String::from("session_id"),
            message: String::from("Draft operations require a manager session"),
        })?;
    let shift_id: ShiftId = parse_shift_id(shift_id)?;
    store
        .settings
        .ensure_shift(&shift_id)
        .map_err(translate_domain_error)?;

    let slot: ScheduleSlot = published_slot(persistence, store, date, &shift_id)?;
    Draft::open(&mut *persistence, session_id, &slot, &store.counters).map_err(translate_core_error)
}

fn parse_shift_id(value: &str) -> Result<ShiftId, ApiError> {
    ShiftId::parse(value).map_err(translate_domain_error)
}

fn parse_employee_id(value: &str) -> Result<EmployeeId, ApiError> {
    EmployeeId::parse(value).map_err(translate_domain_error)
}

fn parse_counter_id(value: &str) -> Result<CounterId, ApiError> {
    CounterId::parse(value).map_err(translate_domain_error)
}

fn parse_selection(selection: &[ShiftSelection]) -> Result<Vec<(Date, ShiftId)>, ApiError> {
    selection
        .iter()
        .map(|pick| -> Result<(Date, ShiftId), ApiError> {
            Ok((pick.date, parse_shift_id(&pick.shift_id)?))
        })
        .collect()
}

fn parse_employee_ids(values: &[String]) -> Result<Vec<EmployeeId>, ApiError> {
    values.iter().map(|value| parse_employee_id(value)).collect()
}

fn counter_map_from_wire(
    assignments: &BTreeMap<String, CounterAssignmentInfo>,
) -> Result<CounterMap, ApiError> {
    let mut map: CounterMap = CounterMap::new();
    for (counter_id, assignment) in assignments {
        map.insert(
            parse_counter_id(counter_id)?,
            CounterAssignment {
                employee_ids: parse_employee_ids(&assignment.employee_ids)?,
                assigned_by_manager: parse_employee_ids(&assignment.assigned_by_manager)?,
            },
        );
    }
    Ok(map)
}

fn counter_map_to_wire(map: &CounterMap) -> BTreeMap<String, CounterAssignmentInfo> {
    map.iter()
        .map(|(counter_id, assignment)| {
            (
                counter_id.to_string(),
                CounterAssignmentInfo {
                    employee_ids: assignment
                        .employee_ids
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                    assigned_by_manager: assignment
                        .assigned_by_manager
                        .iter()
                        .map(ToString::to_string)
                        .collect(),
                },
            )
        })
        .collect()
}

fn draft_edit_from_wire(edit: &DraftEditInfo) -> Result<DraftEdit, ApiError> {
    Ok(match edit {
        DraftEditInfo::Add {
            employee_id,
            counter_id,
            assigned_by_manager,
        } => DraftEdit::Add {
            employee_id: parse_employee_id(employee_id)?,
            counter_id: parse_counter_id(counter_id)?,
            assigned_by_manager: *assigned_by_manager,
        },
        DraftEditInfo::Remove {
            employee_id,
            counter_id,
        } => DraftEdit::Remove {
            employee_id: parse_employee_id(employee_id)?,
            counter_id: parse_counter_id(counter_id)?,
        },
        DraftEditInfo::Move {
            employee_id,
            from,
            to,
        } => DraftEdit::Move {
            employee_id: parse_employee_id(employee_id)?,
            from: parse_counter_id(from)?,
            to: parse_counter_id(to)?,
        },
    })
}

fn registration_info(registration: &WeeklyRegistration) -> RegistrationInfo {
    RegistrationInfo {
        registration_id: registration.registration_id(),
        employee_id: registration.employee_id().to_string(),
        week_start: registration.week_start().date(),
        shifts: registration.shifts().iter().map(entry_info).collect(),
    }
}

fn entry_info(entry: &ShiftEntry) -> ShiftEntryInfo {
    ShiftEntryInfo {
        date: entry.date,
        shift_id: entry.shift_id.to_string(),
        origin: entry.origin.as_str().to_string(),
        assigned_by_manager: entry.is_assigned_by_manager(),
    }
}

fn slot_info(slot: &ScheduleSlot) -> Result<ScheduleSlotInfo, ApiError> {
    let published_at: Option<String> = slot
        .published_at
        .map(|at| at.format(&time::format_description::well_known::Rfc3339))
        .transpose()
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format publish time: {e}"),
        })?;

    Ok(ScheduleSlotInfo {
        date: slot.date,
        shift_id: slot.shift_id.to_string(),
        version: slot.version,
        published_at,
        published_by: slot.published_by.as_ref().map(ToString::to_string),
        assignments: counter_map_to_wire(&slot.assignments),
    })
}

fn draft_response(draft: &Draft) -> DraftResponse {
    DraftResponse {
        date: draft.key().date,
        shift_id: draft.key().shift_id.to_string(),
        status: draft.status().as_str().to_string(),
        base_version: draft.base_version(),
        published_version: draft.published_version(),
        stale: draft.is_stale(),
        local: counter_map_to_wire(draft.local()),
        published: counter_map_to_wire(draft.published()),
    }
}

fn notice_info(notice: &MonthlyNotice) -> MonthlyNoticeInfo {
    let (kind, actual, target): (&str, u32, u32) = match *notice {
        MonthlyNotice::DaysOffAboveTarget { taken, target } => {
            ("days_off_above_target", taken, target)
        }
        MonthlyNotice::DaysOffBelowTarget { taken, target } => {
            ("days_off_below_target", taken, target)
        }
        MonthlyNotice::ShiftsBelowMinimum { worked, minimum } => {
            ("shifts_below_minimum", worked, minimum)
        }
        MonthlyNotice::ShiftsAboveMaximum { worked, maximum } => {
            ("shifts_above_maximum", worked, maximum)
        }
    };
    MonthlyNoticeInfo {
        kind: kind.to_string(),
        actual,
        target,
    }
}

fn audit_event_info(event: &AuditEvent) -> AuditEventInfo {
    AuditEventInfo {
        event_id: event.event_id,
        actor_id: event.actor.employee_id.to_string(),
        actor_role: event.actor.role.clone(),
        cause_id: event.cause.id.clone(),
        cause_description: event.cause.description.clone(),
        action: event.action.kind.as_str().to_string(),
        details: event.action.details.clone(),
        week_start: event.scope.week_start.map(|week| week.date()),
        date: event.scope.date,
        shift_id: event.scope.shift_id.as_ref().map(ToString::to_string),
        before: event.before.data.clone(),
        after: event.after.data.clone(),
    }
}
