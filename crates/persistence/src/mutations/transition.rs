// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Atomic commit of a transition result.
//!
//! A transition is computed against a state read earlier. Committing it
//! writes only what changed relative to that state, together with its audit
//! event, in one write transaction. Two conditions are re-checked inside the
//! transaction:
//!
//! - self-service writes re-evaluate the registration gate, so a write that
//!   races a gate flip is rejected
//! - a changed schedule slot must still carry the version it was read at,
//!   unless the guard allows last-write-wins

use diesel::SqliteConnection;
use shiftboard::{State, TransitionResult, ensure_registration_open};
use shiftboard_domain::{ScheduleSlot, Settings, WeeklyRegistration};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::error::PersistenceError;
use crate::mutations::{delete_registration, persist_audit_event, save_registration, save_slot};
use crate::queries::{load_settings, stored_slot_version};

/// Conditions re-checked at commit time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitGuard {
    /// When set, the registration gate must be open at this instant.
    pub registration_gate_at: Option<OffsetDateTime>,
    /// When set, a changed slot must still be stored at the version it was
    /// read at. Otherwise the write replaces whatever is stored.
    pub check_slot_versions: bool,
}

impl CommitGuard {
    /// A guard for employee self-service writes.
    #[must_use]
    pub const fn self_service(now: OffsetDateTime) -> Self {
        Self {
            registration_gate_at: Some(now),
            check_slot_versions: true,
        }
    }

    /// A guard for manager writes, which bypass the registration gate.
    #[must_use]
    pub const fn manager() -> Self {
        Self {
            registration_gate_at: None,
            check_slot_versions: true,
        }
    }

    /// Lets slot writes overwrite a slot republished since it was read.
    ///
    /// The written version still moves past the stored one.
    #[must_use]
    pub const fn last_write_wins(self) -> Self {
        Self {
            check_slot_versions: false,
            ..self
        }
    }
}

/// What a commit wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistTransitionResult {
    /// The ID of the persisted audit event.
    pub event_id: i64,
    /// IDs of registrations that were created or replaced.
    pub saved_registration_ids: Vec<i64>,
    /// Number of registrations deleted.
    pub deleted_registrations: usize,
    /// Number of schedule slots written.
    pub saved_slots: usize,
}

/// Commits a transition result.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `previous` - The state the transition was computed from
/// * `result` - The transition result
/// * `guard` - Conditions to re-check before writing
///
/// # Errors
///
/// Returns an error if:
/// - the registration gate closed (`RegistrationClosed`)
/// - a changed slot was republished meanwhile and the guard checks slot
///   versions (`VersionConflict`)
/// - any write fails
///
/// On error nothing is written.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    previous: &State,
    result: &TransitionResult,
    guard: CommitGuard,
) -> Result<PersistTransitionResult, PersistenceError> {
    let outcome: Result<PersistTransitionResult, PersistenceError> =
        conn.immediate_transaction(|conn| {
            if let Some(now) = guard.registration_gate_at {
                let settings: Settings = load_settings(conn, &previous.store_id)?;
                ensure_registration_open(&settings, &previous.store_id, now)?;
            }

            let mut saved_registration_ids: Vec<i64> = Vec::new();
            for registration in &result.new_state.registrations {
                let before: Option<&WeeklyRegistration> =
                    previous.registration_for(registration.employee_id());
                if before != Some(registration) {
                    saved_registration_ids.push(save_registration(conn, registration)?);
                }
            }

            let mut deleted_registrations: usize = 0;
            for registration in &previous.registrations {
                if result
                    .new_state
                    .registration_for(registration.employee_id())
                    .is_none()
                    && delete_registration(
                        conn,
                        registration.employee_id(),
                        registration.week_start(),
                    )?
                {
                    deleted_registrations += 1;
                }
            }

            let mut saved_slots: usize = 0;
            for slot in &result.new_state.slots {
                let before: Option<&ScheduleSlot> = previous.slot_for(slot.date, &slot.shift_id);
                if before == Some(slot) {
                    continue;
                }
                let expected: i64 = before.map_or(0, |s| s.version);
                let actual: i64 =
                    stored_slot_version(conn, &slot.store_id, slot.date, &slot.shift_id)?;
                if actual == expected {
                    save_slot(conn, slot)?;
                } else if guard.check_slot_versions {
                    return Err(PersistenceError::VersionConflict { expected, actual });
                } else {
                    debug!(
                        date = %slot.date,
                        shift_id = %slot.shift_id,
                        expected,
                        actual,
                        "Overwriting republished slot"
                    );
                    let mut overwrite: ScheduleSlot = slot.clone();
                    overwrite.version = actual + 1;
                    save_slot(conn, &overwrite)?;
                }
                saved_slots += 1;
            }

            let event_id: i64 = persist_audit_event(conn, &result.audit_event)?;

            Ok(PersistTransitionResult {
                event_id,
                saved_registration_ids,
                deleted_registrations,
                saved_slots,
            })
        });

    match &outcome {
        Ok(persisted) => info!(
            event_id = persisted.event_id,
            action = result.audit_event.action.kind.as_str(),
            registrations = persisted.saved_registration_ids.len(),
            deleted = persisted.deleted_registrations,
            slots = persisted.saved_slots,
            "Persisted transition"
        ),
        Err(e) => warn!(error = %e, "Transition rolled back"),
    }
    outcome
}
