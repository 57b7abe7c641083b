// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{
    CascadeNotice, State, StoreContext, TransitionResult, registration_snapshot, slot_snapshot,
};
use shiftboard_audit::{Action, ActionKind, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use shiftboard_domain::{
    CounterId, CounterMap, Employee, EmployeeId, OccupancyCounts, OtherManager, RegistrantProfile,
    RegistrationContext, ScheduleSlot, Settings, ShiftEntry, ShiftId, StoreId, ValidationOutcome,
    WeekSelection, WeeklyRegistration, is_registration_open_at, normalize_assignments,
    validate_week_selection,
};
use time::{Date, OffsetDateTime};

/// Checks the effective registration gate at `now`.
///
/// # Errors
///
/// Returns `CoreError::RegistrationClosed` if the gate is closed, or a
/// domain error if the registration window is misconfigured.
pub fn ensure_registration_open(
    settings: &Settings,
    store_id: &StoreId,
    now: OffsetDateTime,
) -> Result<(), CoreError> {
    if is_registration_open_at(settings, now)? {
        Ok(())
    } else {
        Err(CoreError::RegistrationClosed {
            store_id: store_id.clone(),
        })
    }
}

/// Applies a command to the current state, producing a new state and audit event.
///
/// # Arguments
///
/// * `store` - Read-only store data (settings, employees, counters)
/// * `state` - The current state of the store's week (immutable)
/// * `command` - The command to apply
/// * `actor` - The employee performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The instant the command is evaluated at
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The registration gate is closed for a self-service command
/// - The command violates domain rules
/// - A referenced employee, registration or entry does not exist
/// - The caller does not own the registration being deleted
/// - A publish carries a stale version
pub fn apply(
    store: &StoreContext,
    state: &State,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    if command.requires_open_registration() {
        ensure_registration_open(&store.settings, &state.store_id, now)?;
    }

    match command {
        Command::SubmitRegistration {
            employee_id,
            shifts,
            confirm_warnings,
        } => apply_submit(store, state, &employee_id, &shifts, confirm_warnings, actor, cause),
        Command::DeleteRegistration {
            registration_id,
            employee_id,
        } => {
            let registration: &WeeklyRegistration = state
                .registration_by_id(registration_id)
                .ok_or_else(|| CoreError::NotFound {
                    kind: "registration",
                    id: registration_id.to_string(),
                })?;

            if registration.employee_id() != &employee_id {
                return Err(CoreError::Forbidden {
                    reason: format!(
                        "registration {registration_id} belongs to another employee"
                    ),
                });
            }

            let before: StateSnapshot = registration_snapshot(Some(registration));
            let mut new_state: State = state.clone();
            new_state
                .registrations
                .retain(|r| r.registration_id() != Some(registration_id));
            let after: StateSnapshot = registration_snapshot(None);

            let action: Action = Action::new(
                ActionKind::RegistrationDeleted,
                Some(format!(
                    "Deleted registration {registration_id} for week {}",
                    state.week_start
                )),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                AuditScope::week(state.store_id.clone(), state.week_start),
                before,
                after,
            );

            Ok(TransitionResult {
                new_state,
                audit_event,
                warnings: Vec::new(),
                cascade: None,
            })
        }
        Command::ForceAssign {
            target_employee_id,
            date,
            shift_id,
        } => {
            store.active_employee(&target_employee_id)?;
            store.settings.ensure_shift(&shift_id)?;
            state.week_start.ensure_contains(date)?;

            let previous: Option<&WeeklyRegistration> = state.registration_for(&target_employee_id);
            let mut registration: WeeklyRegistration = previous.cloned().unwrap_or_else(|| {
                WeeklyRegistration::empty(
                    target_employee_id.clone(),
                    state.store_id.clone(),
                    state.week_start,
                )
            });
            registration.put_entry(ShiftEntry::manager_assigned(date, shift_id.clone()))?;

            let before: StateSnapshot = registration_snapshot(previous);
            let after: StateSnapshot = registration_snapshot(Some(&registration));
            let mut new_state: State = state.clone();
            new_state.put_registration(registration);

            let action: Action = Action::new(
                ActionKind::ShiftForceAssigned,
                Some(format!(
                    "Assigned {target_employee_id} to '{shift_id}' on {date}"
                )),
            );
            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                AuditScope::slot(state.store_id.clone(), state.week_start, date, shift_id),
                before,
                after,
            );

            Ok(TransitionResult {
                new_state,
                audit_event,
                warnings: Vec::new(),
                cascade: None,
            })
        }
        Command::ForceUnassign {
            target_employee_id,
            date,
            shift_id,
        } => apply_force_unassign(
            state,
            target_employee_id,
            date,
            shift_id,
            actor,
            cause,
            now,
        ),
        Command::PublishSchedule {
            date,
            shift_id,
            assignments,
            expected_version,
        } => apply_publish(
            store,
            state,
            date,
            shift_id,
            &assignments,
            expected_version,
            actor,
            cause,
            now,
        ),
    }
}

fn apply_submit(
    store: &StoreContext,
    state: &State,
    employee_id: &EmployeeId,
    shifts: &[(Date, ShiftId)],
    confirm_warnings: bool,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let employee: &Employee = store.active_employee(employee_id)?;
    let profile: RegistrantProfile = RegistrantProfile {
        employee_type: employee.employee_type,
        role: employee.role,
    };

    let selection: WeekSelection = WeekSelection::from_pairs(state.week_start, shifts)?;
    let previous: Option<&WeeklyRegistration> = state.registration_for(employee_id);
    let occupancy: OccupancyCounts =
        OccupancyCounts::tally(&state.registrations, Some(employee_id), |id| {
            store.is_manager(id)
        });

    let mut other_managers: Vec<OtherManager> = Vec::new();
    if profile.is_manager() {
        for registration in &state.registrations {
            let owner: &EmployeeId = registration.employee_id();
            if owner == employee_id || !store.is_manager(owner) {
                continue;
            }
            let name: String = store
                .employee(owner)
                .map_or_else(|| owner.to_string(), |e| e.name.clone());
            other_managers.push(OtherManager::from_registration(&name, registration)?);
        }
    }

    let context: RegistrationContext<'_> = RegistrationContext {
        profile,
        settings: &store.settings,
        occupancy: &occupancy,
        previous,
        other_managers: &other_managers,
    };
    let outcome: ValidationOutcome = validate_week_selection(&context, &selection)?;
    if outcome.requires_confirmation() && !confirm_warnings {
        return Err(CoreError::ConfirmationRequired {
            warnings: outcome.warnings,
        });
    }

    let entries: Vec<ShiftEntry> = selection.to_entries(previous)?;
    let mut registration: WeeklyRegistration = WeeklyRegistration::new(
        employee_id.clone(),
        state.store_id.clone(),
        state.week_start,
        entries,
    )?;
    if let Some(id) = previous.and_then(WeeklyRegistration::registration_id) {
        registration = registration.with_id(id);
    }

    let before: StateSnapshot = registration_snapshot(previous);
    let after: StateSnapshot = registration_snapshot(Some(&registration));
    let shift_count: usize = registration.shifts().len();
    let mut new_state: State = state.clone();
    new_state.put_registration(registration);

    let action: Action = Action::new(
        ActionKind::RegistrationSubmitted,
        Some(format!(
            "Saved {shift_count} shift(s) for week {}",
            state.week_start
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        AuditScope::week(state.store_id.clone(), state.week_start),
        before,
        after,
    );

    Ok(TransitionResult {
        new_state,
        audit_event,
        warnings: outcome.warnings,
        cascade: None,
    })
}

fn apply_force_unassign(
    state: &State,
    target_employee_id: EmployeeId,
    date: Date,
    shift_id: ShiftId,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    state.week_start.ensure_contains(date)?;

    let previous: &WeeklyRegistration =
        state
            .registration_for(&target_employee_id)
            .ok_or_else(|| CoreError::NotFound {
                kind: "registration",
                id: target_employee_id.to_string(),
            })?;
    let mut registration: WeeklyRegistration = previous.clone();
    if registration.remove_entry(date, &shift_id).is_none() {
        return Err(CoreError::NotFound {
            kind: "shift entry",
            id: format!("{target_employee_id}:{date}:{shift_id}"),
        });
    }

    let before: StateSnapshot = registration_snapshot(Some(previous));
    let after: StateSnapshot = registration_snapshot(Some(&registration));
    let mut new_state: State = state.clone();
    new_state.put_registration(registration);

    let mut removed_from: Vec<CounterId> = Vec::new();
    if let Some(published) = state.slot_for(date, &shift_id) {
        let mut slot: ScheduleSlot = published.clone();
        removed_from = slot.remove_employee(&target_employee_id);
        if !removed_from.is_empty() {
            slot.version += 1;
            slot.published_at = Some(now);
            slot.published_by = Some(actor.employee_id.clone());
            new_state.put_slot(slot);
        }
    }

    let counters: Vec<String> = removed_from.iter().map(ToString::to_string).collect();
    let action: Action = Action::new(
        ActionKind::ShiftForceUnassigned,
        Some(format!(
            "Removed {target_employee_id} from '{shift_id}' on {date}; counters cleared: [{}]",
            counters.join(",")
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        AuditScope::slot(
            state.store_id.clone(),
            state.week_start,
            date,
            shift_id.clone(),
        ),
        before,
        after,
    );

    Ok(TransitionResult {
        new_state,
        audit_event,
        warnings: Vec::new(),
        cascade: Some(CascadeNotice {
            employee_id: target_employee_id,
            date,
            shift_id,
            removed_from,
        }),
    })
}

#[allow(clippy::too_many_arguments)]
fn apply_publish(
    store: &StoreContext,
    state: &State,
    date: Date,
    shift_id: ShiftId,
    assignments: &CounterMap,
    expected_version: Option<i64>,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    store.settings.ensure_shift(&shift_id)?;
    state.week_start.ensure_contains(date)?;

    let current: ScheduleSlot = state.slot_or_empty(store, date, &shift_id);
    if let Some(expected) = expected_version.filter(|v| *v != current.version) {
        return Err(CoreError::Conflict {
            expected,
            actual: current.version,
        });
    }

    let normalized: CounterMap = normalize_assignments(&store.counters, assignments)?;
    for assignment in normalized.values() {
        for employee_id in &assignment.employee_ids {
            store.active_employee(employee_id)?;
        }
    }

    let slot: ScheduleSlot = ScheduleSlot {
        store_id: state.store_id.clone(),
        date,
        shift_id: shift_id.clone(),
        version: current.version + 1,
        assignments: normalized,
        published_at: Some(now),
        published_by: Some(actor.employee_id.clone()),
    };

    let before: StateSnapshot = slot_snapshot(&current);
    let after: StateSnapshot = slot_snapshot(&slot);
    let version: i64 = slot.version;
    let mut new_state: State = state.clone();
    new_state.put_slot(slot);

    let action: Action = Action::new(
        ActionKind::SchedulePublished,
        Some(format!(
            "Published '{shift_id}' on {date} as version {version}"
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        AuditScope::slot(state.store_id.clone(), state.week_start, date, shift_id),
        before,
        after,
    );

    Ok(TransitionResult {
        new_state,
        audit_event,
        warnings: Vec::new(),
        cascade: None,
    })
}
