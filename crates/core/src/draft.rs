// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Draft/publish reconciliation for counter assignments.
//!
//! A draft is one manager session's in-progress edit of a slot. It starts
//! from the published mapping and is written behind to a scratch store on
//! every edit, so reopening the slot from the same session restores it.
//!
//! ## States
//!
//! - `Clean`: the local mapping is the published mapping
//! - `Dirty`: the local mapping has edits that are not published
//!
//! `Clean -> Dirty` on any add, remove or move. `Dirty -> Clean` on a
//! confirmed publish or a discard; both clear the scratch entry.
//!
//! Drafts never lock the slot. A publish carries the version the draft was
//! started from, so a slot republished in the meantime is reported as a
//! conflict instead of being overwritten.

use crate::command::Command;
use crate::error::CoreError;
use shiftboard_domain::{
    Counter, CounterAssignment, CounterId, CounterMap, DomainError, EmployeeId, ScheduleSlot,
    ShiftId, StoreId, WeekStart,
};
use std::collections::HashMap;
use time::Date;

/// Identifies the slot a draft edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraftKey {
    /// The store.
    pub store_id: StoreId,
    /// The week containing `date`.
    pub week_start: WeekStart,
    /// The slot date.
    pub date: Date,
    /// The slot shift.
    pub shift_id: ShiftId,
}

impl DraftKey {
    /// Creates a key, deriving the week from the date.
    ///
    /// # Errors
    ///
    /// Returns an error if the week start cannot be computed.
    pub fn new(store_id: StoreId, date: Date, shift_id: ShiftId) -> Result<Self, DomainError> {
        Ok(Self {
            store_id,
            week_start: WeekStart::containing(date)?,
            date,
            shift_id,
        })
    }

    /// Returns the key of a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the week start cannot be computed.
    pub fn for_slot(slot: &ScheduleSlot) -> Result<Self, DomainError> {
        Self::new(slot.store_id.clone(), slot.date, slot.shift_id.clone())
    }
}

/// Whether a draft differs from the published mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStatus {
    /// No unpublished edits.
    Clean,
    /// Unpublished edits exist.
    Dirty,
}

impl DraftStatus {
    /// Returns the string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Dirty => "dirty",
        }
    }
}

/// The persisted part of a dirty draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchDraft {
    /// The local mapping.
    pub assignments: CounterMap,
    /// The published version the edits were started from.
    pub base_version: i64,
}

/// Session-local write-behind storage for dirty drafts.
///
/// Entries are keyed by `(session, slot)` and are never visible to other
/// sessions through [`Draft::open`].
pub trait ScratchStore {
    /// Loads a session's draft for a slot.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ScratchStorage` if the store fails.
    fn load_scratch(
        &mut self,
        session_id: &str,
        key: &DraftKey,
    ) -> Result<Option<ScratchDraft>, CoreError>;

    /// Saves a session's draft for a slot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ScratchStorage` if the store fails.
    fn save_scratch(
        &mut self,
        session_id: &str,
        key: &DraftKey,
        draft: &ScratchDraft,
    ) -> Result<(), CoreError>;

    /// Removes a session's draft for a slot. Removing nothing is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ScratchStorage` if the store fails.
    fn clear_scratch(&mut self, session_id: &str, key: &DraftKey) -> Result<(), CoreError>;

    /// Lists the sessions holding a draft for a slot.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ScratchStorage` if the store fails.
    fn scratch_sessions(&mut self, key: &DraftKey) -> Result<Vec<String>, CoreError>;
}

/// A process-local scratch store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScratchStore {
    drafts: HashMap<(String, DraftKey), ScratchDraft>,
}

impl InMemoryScratchStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScratchStore for InMemoryScratchStore {
    fn load_scratch(
        &mut self,
        session_id: &str,
        key: &DraftKey,
    ) -> Result<Option<ScratchDraft>, CoreError> {
        Ok(self
            .drafts
            .get(&(session_id.to_string(), key.clone()))
            .cloned())
    }

    fn save_scratch(
        &mut self,
        session_id: &str,
        key: &DraftKey,
        draft: &ScratchDraft,
    ) -> Result<(), CoreError> {
        self.drafts
            .insert((session_id.to_string(), key.clone()), draft.clone());
        Ok(())
    }

    fn clear_scratch(&mut self, session_id: &str, key: &DraftKey) -> Result<(), CoreError> {
        self.drafts.remove(&(session_id.to_string(), key.clone()));
        Ok(())
    }

    fn scratch_sessions(&mut self, key: &DraftKey) -> Result<Vec<String>, CoreError> {
        let mut sessions: Vec<String> = self
            .drafts
            .keys()
            .filter(|(_, k)| k == key)
            .map(|(session, _)| session.clone())
            .collect();
        sessions.sort();
        Ok(sessions)
    }
}

/// One edit of a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    /// Place an employee at a counter.
    Add {
        /// The employee.
        employee_id: EmployeeId,
        /// The counter.
        counter_id: CounterId,
        /// Whether the placement is manager-forced.
        assigned_by_manager: bool,
    },
    /// Take an employee off a counter.
    Remove {
        /// The employee.
        employee_id: EmployeeId,
        /// The counter.
        counter_id: CounterId,
    },
    /// Move an employee between counters, keeping any manager flag.
    Move {
        /// The employee.
        employee_id: EmployeeId,
        /// The counter the employee is at.
        from: CounterId,
        /// The destination counter.
        to: CounterId,
    },
}

/// A manager session's view of one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    key: DraftKey,
    session_id: String,
    published: CounterMap,
    published_version: i64,
    local: CounterMap,
    base_version: i64,
    status: DraftStatus,
}

impl Draft {
    /// Opens a slot for editing.
    ///
    /// The published mapping is authoritative unless the session has a
    /// scratch draft for the slot, in which case that draft is loaded and
    /// the result is `Dirty`.
    ///
    /// # Arguments
    ///
    /// * `scratch` - The scratch store
    /// * `session_id` - The manager session
    /// * `slot` - The published slot (or an unpublished empty one)
    /// * `counters` - Every counter configured for the store
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch store fails.
    pub fn open<S: ScratchStore + ?Sized>(
        scratch: &mut S,
        session_id: &str,
        slot: &ScheduleSlot,
        counters: &[Counter],
    ) -> Result<Self, CoreError> {
        let key: DraftKey = DraftKey::for_slot(slot)?;
        let published: CounterMap = with_all_counters(&slot.assignments, counters);

        let (local, base_version, status) = match scratch.load_scratch(session_id, &key)? {
            Some(saved) => (
                with_all_counters(&saved.assignments, counters),
                saved.base_version,
                DraftStatus::Dirty,
            ),
            None => (published.clone(), slot.version, DraftStatus::Clean),
        };

        Ok(Self {
            key,
            session_id: session_id.to_string(),
            published,
            published_version: slot.version,
            local,
            base_version,
            status,
        })
    }

    /// Returns the slot key.
    #[must_use]
    pub const fn key(&self) -> &DraftKey {
        &self.key
    }

    /// Returns the owning session.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns the draft status.
    #[must_use]
    pub const fn status(&self) -> DraftStatus {
        self.status
    }

    /// Returns the last-known published mapping.
    #[must_use]
    pub const fn published(&self) -> &CounterMap {
        &self.published
    }

    /// Returns the last-known published version.
    #[must_use]
    pub const fn published_version(&self) -> i64 {
        self.published_version
    }

    /// Returns the local mapping.
    #[must_use]
    pub const fn local(&self) -> &CounterMap {
        &self.local
    }

    /// Returns the version the local edits are based on.
    #[must_use]
    pub const fn base_version(&self) -> i64 {
        self.base_version
    }

    /// Returns whether the slot was republished after the edits started.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.base_version != self.published_version
    }

    /// Applies an edit and writes the draft behind to scratch.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a counter is not configured for the store
    /// - an added employee is already placed in the slot
    /// - a removed or moved employee is not at the given counter
    /// - the scratch store fails
    pub fn edit<S: ScratchStore + ?Sized>(
        &mut self,
        scratch: &mut S,
        edit: DraftEdit,
    ) -> Result<(), CoreError> {
        match edit {
            DraftEdit::Add {
                employee_id,
                counter_id,
                assigned_by_manager,
            } => {
                self.ensure_counter(&counter_id)?;
                if let Some(existing) = self.counter_of(&employee_id) {
                    return Err(DomainError::DuplicateCounterAssignment {
                        employee_id,
                        first_counter: existing,
                        second_counter: counter_id,
                    }
                    .into());
                }
                let target: &mut CounterAssignment = self.local.entry(counter_id).or_default();
                target.employee_ids.push(employee_id.clone());
                if assigned_by_manager {
                    target.assigned_by_manager.push(employee_id);
                }
            }
            DraftEdit::Remove {
                employee_id,
                counter_id,
            } => {
                self.ensure_counter(&counter_id)?;
                self.take(&employee_id, &counter_id)?;
            }
            DraftEdit::Move {
                employee_id,
                from,
                to,
            } => {
                self.ensure_counter(&from)?;
                self.ensure_counter(&to)?;
                let forced: bool = self.take(&employee_id, &from)?;
                let target: &mut CounterAssignment = self.local.entry(to).or_default();
                target.employee_ids.push(employee_id.clone());
                if forced {
                    target.assigned_by_manager.push(employee_id);
                }
            }
        }

        self.settle(scratch)
    }

    /// Drops local edits and returns to the published mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch store fails.
    pub fn discard<S: ScratchStore + ?Sized>(&mut self, scratch: &mut S) -> Result<(), CoreError> {
        scratch.clear_scratch(&self.session_id, &self.key)?;
        self.local = self.published.clone();
        self.base_version = self.published_version;
        self.status = DraftStatus::Clean;
        Ok(())
    }

    /// Builds the publish command for the local mapping.
    ///
    /// The command carries the draft's base version, so a slot that was
    /// republished in the meantime is rejected with a conflict.
    #[must_use]
    pub fn publish_command(&self) -> Command {
        Command::PublishSchedule {
            date: self.key.date,
            shift_id: self.key.shift_id.clone(),
            assignments: self.local.clone(),
            expected_version: Some(self.base_version),
        }
    }

    /// Adopts the just-published slot as the new baseline.
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch store fails.
    pub fn confirm_published<S: ScratchStore + ?Sized>(
        &mut self,
        scratch: &mut S,
        slot: &ScheduleSlot,
    ) -> Result<(), CoreError> {
        scratch.clear_scratch(&self.session_id, &self.key)?;
        let mut published: CounterMap = slot.assignments.clone();
        for counter_id in self.published.keys() {
            published.entry(counter_id.clone()).or_default();
        }
        self.published = published;
        self.published_version = slot.version;
        self.local = self.published.clone();
        self.base_version = slot.version;
        self.status = DraftStatus::Clean;
        Ok(())
    }

    /// Removes an employee from every counter of the local mapping.
    ///
    /// Used after a force-unassign. When `slot_changed` is true the
    /// published slot was bumped by that cleanup alone, so a draft based on
    /// the prior version is rebased instead of turning stale.
    ///
    /// Returns whether the local mapping changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch store fails.
    pub fn purge_employee<S: ScratchStore + ?Sized>(
        &mut self,
        scratch: &mut S,
        employee_id: &EmployeeId,
        slot_changed: bool,
    ) -> Result<bool, CoreError> {
        if slot_changed && self.base_version + 1 == self.published_version {
            self.base_version = self.published_version;
        }

        let mut changed: bool = false;
        for assignment in self.local.values_mut() {
            changed |= assignment.remove(employee_id);
        }

        if self.status == DraftStatus::Dirty {
            self.settle(scratch)?;
        }
        Ok(changed)
    }

    fn ensure_counter(&self, counter_id: &CounterId) -> Result<(), CoreError> {
        if self.published.contains_key(counter_id) {
            Ok(())
        } else {
            Err(DomainError::UnknownCounter(counter_id.clone()).into())
        }
    }

    fn counter_of(&self, employee_id: &EmployeeId) -> Option<CounterId> {
        self.local
            .iter()
            .find(|(_, assignment)| assignment.contains(employee_id))
            .map(|(counter_id, _)| counter_id.clone())
    }

    /// Takes an employee off a counter, returning their manager flag.
    fn take(
        &mut self,
        employee_id: &EmployeeId,
        counter_id: &CounterId,
    ) -> Result<bool, CoreError> {
        let not_there = || {
            CoreError::from(DomainError::EmployeeNotInCounter {
                employee_id: employee_id.clone(),
                counter_id: counter_id.clone(),
            })
        };
        let assignment: &mut CounterAssignment =
            self.local.get_mut(counter_id).ok_or_else(not_there)?;
        let forced: bool = assignment.assigned_by_manager.contains(employee_id);
        if !assignment.remove(employee_id) {
            return Err(not_there());
        }
        Ok(forced)
    }

    /// Recomputes the status after a local change.
    ///
    /// Edits that lead back to the published mapping at the published
    /// version leave nothing to keep, so the scratch copy is dropped.
    fn settle<S: ScratchStore + ?Sized>(&mut self, scratch: &mut S) -> Result<(), CoreError> {
        if self.local == self.published && !self.is_stale() {
            self.status = DraftStatus::Clean;
            scratch.clear_scratch(&self.session_id, &self.key)
        } else {
            self.status = DraftStatus::Dirty;
            self.write_behind(scratch)
        }
    }

    fn write_behind<S: ScratchStore + ?Sized>(&self, scratch: &mut S) -> Result<(), CoreError> {
        scratch.save_scratch(
            &self.session_id,
            &self.key,
            &ScratchDraft {
                assignments: self.local.clone(),
                base_version: self.base_version,
            },
        )
    }
}

/// Purges an employee from every session's draft of a slot.
///
/// # Arguments
///
/// * `scratch` - The scratch store
/// * `slot` - The published slot after the force-unassign
/// * `counters` - Every counter configured for the store
/// * `employee_id` - The removed employee
/// * `slot_changed` - Whether the force-unassign bumped the published slot
///
/// # Returns
///
/// The number of drafts whose local mapping changed.
///
/// # Errors
///
/// Returns an error if the scratch store fails.
pub fn purge_employee_from_drafts<S: ScratchStore + ?Sized>(
    scratch: &mut S,
    slot: &ScheduleSlot,
    counters: &[Counter],
    employee_id: &EmployeeId,
    slot_changed: bool,
) -> Result<usize, CoreError> {
    let key: DraftKey = DraftKey::for_slot(slot)?;
    let mut changed: usize = 0;
    for session_id in scratch.scratch_sessions(&key)? {
        let mut draft: Draft = Draft::open(scratch, &session_id, slot, counters)?;
        if draft.purge_employee(scratch, employee_id, slot_changed)? {
            changed += 1;
        }
    }
    Ok(changed)
}

fn with_all_counters(assignments: &CounterMap, counters: &[Counter]) -> CounterMap {
    let mut filled: CounterMap = assignments.clone();
    for counter in counters {
        filled.entry(counter.id.clone()).or_default();
    }
    filled
}
