// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! These DTOs are distinct from domain types and represent the API contract.
//! Dates travel as `YYYY-MM-DD`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;

/// One `(date, shift)` pick in a weekly selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSelection {
    /// The day.
    pub date: Date,
    /// The shift id.
    pub shift_id: String,
}

/// One entry of a saved registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftEntryInfo {
    /// The day.
    pub date: Date,
    /// The shift id.
    pub shift_id: String,
    /// `self_registered` or `manager_assigned`.
    pub origin: String,
    /// Whether a manager placed this entry.
    pub assigned_by_manager: bool,
}

/// A saved weekly registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationInfo {
    /// The registration's storage id.
    pub registration_id: Option<i64>,
    /// The owning employee.
    pub employee_id: String,
    /// The Monday starting the week.
    pub week_start: Date,
    /// The saved entries, in date order.
    pub shifts: Vec<ShiftEntryInfo>,
}

/// API request to toggle one shift in an unsaved selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleShiftRequest {
    /// The toggled day. Its week scopes the selection.
    pub date: Date,
    /// The toggled shift.
    pub shift_id: String,
    /// The selection before the toggle.
    #[serde(default)]
    pub current: Vec<ShiftSelection>,
}

/// API response for an accepted toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleShiftResponse {
    /// Whether the shift is now selected.
    pub selected: bool,
    /// The selection after the toggle.
    pub selection: Vec<ShiftSelection>,
}

/// API request to save the caller's weekly registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRegistrationRequest {
    /// The Monday starting the week.
    pub week_start: Date,
    /// The full selection; it replaces any saved one.
    pub shifts: Vec<ShiftSelection>,
    /// Proceed despite manager day-off collision warnings.
    #[serde(default)]
    pub confirm_warnings: bool,
}

/// API response for a saved registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRegistrationResponse {
    /// The saved registration.
    pub registration: RegistrationInfo,
    /// Confirmed warnings carried by the submission.
    pub warnings: Vec<String>,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API query to list registrations of a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRegistrationsRequest {
    /// The Monday starting the week.
    pub week_start: Date,
    /// Restrict to one employee. Without it, schedulers see the whole
    /// store and everyone else sees their own.
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// API response listing registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRegistrationsResponse {
    /// The Monday starting the week.
    pub week_start: Date,
    /// The registrations, ordered by employee id.
    pub registrations: Vec<RegistrationInfo>,
}

/// API response for a deleted registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRegistrationResponse {
    /// The deleted registration's id.
    pub registration_id: i64,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API query for a week's availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    /// The Monday starting the week.
    pub week_start: Date,
}

/// Occupancy versus capacity for one date and shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAvailabilityInfo {
    /// The day.
    pub date: Date,
    /// The shift id.
    pub shift_id: String,
    /// Other non-manager self-registrants.
    pub occupied: u32,
    /// Resolved capacity.
    pub capacity: u32,
    /// Whether the caller could still register.
    pub has_room: bool,
}

/// API response for a week's availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// The Monday starting the week.
    pub week_start: Date,
    /// Whether the registration gate is open right now.
    pub registration_open: bool,
    /// Every date and configured shift of the week.
    pub slots: Vec<SlotAvailabilityInfo>,
}

/// API request to force-assign or force-unassign a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceShiftRequest {
    /// The target employee.
    pub employee_id: String,
    /// The day.
    pub date: Date,
    /// The shift id.
    pub shift_id: String,
}

/// API response for a force-assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceAssignResponse {
    /// The target's registration after the change.
    pub registration: RegistrationInfo,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API response for a force-unassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceUnassignResponse {
    /// The target's registration after the change, if any entries remain.
    pub registration: Option<RegistrationInfo>,
    /// Published counters the employee was removed from.
    pub removed_from_counters: Vec<String>,
    /// Number of manager drafts the employee was purged from.
    pub drafts_updated: usize,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// One counter's assignment on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterAssignmentInfo {
    /// Assigned employees, in display order.
    pub employee_ids: Vec<String>,
    /// The subset placed by a manager.
    #[serde(default)]
    pub assigned_by_manager: Vec<String>,
}

/// API request to publish one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishScheduleRequest {
    /// The day.
    pub date: Date,
    /// The shift id.
    pub shift_id: String,
    /// Counter id to assignment. Omitted counters are cleared.
    pub assignments: BTreeMap<String, CounterAssignmentInfo>,
    /// The slot version the caller last saw.
    #[serde(default)]
    pub expected_version: Option<i64>,
}

/// A published slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSlotInfo {
    /// The day.
    pub date: Date,
    /// The shift id.
    pub shift_id: String,
    /// Publish count; 0 when never published.
    pub version: i64,
    /// RFC 3339 time of the last publish.
    pub published_at: Option<String>,
    /// Who published last.
    pub published_by: Option<String>,
    /// Every configured counter.
    pub assignments: BTreeMap<String, CounterAssignmentInfo>,
}

/// API response for a publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishScheduleResponse {
    /// The confirmed slot.
    pub slot: ScheduleSlotInfo,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// Identifies a slot in queries and draft requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRequest {
    /// The day.
    pub date: Date,
    /// The shift id.
    pub shift_id: String,
}

/// One draft edit on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DraftEditInfo {
    /// Place an employee at a counter.
    Add {
        /// The employee.
        employee_id: String,
        /// The counter.
        counter_id: String,
        /// Whether the placement is manager-forced.
        #[serde(default)]
        assigned_by_manager: bool,
    },
    /// Take an employee off a counter.
    Remove {
        /// The employee.
        employee_id: String,
        /// The counter.
        counter_id: String,
    },
    /// Move an employee between counters.
    Move {
        /// The employee.
        employee_id: String,
        /// The source counter.
        from: String,
        /// The destination counter.
        to: String,
    },
}

/// API request to edit a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDraftRequest {
    /// The day.
    pub date: Date,
    /// The shift id.
    pub shift_id: String,
    /// The edit.
    pub edit: DraftEditInfo,
}

/// A manager session's draft of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftResponse {
    /// The day.
    pub date: Date,
    /// The shift id.
    pub shift_id: String,
    /// `clean` or `dirty`.
    pub status: String,
    /// The published version the local edits are based on.
    pub base_version: i64,
    /// The last-known published version.
    pub published_version: i64,
    /// Whether the slot was republished after the edits started.
    pub stale: bool,
    /// The local mapping.
    pub local: BTreeMap<String, CounterAssignmentInfo>,
    /// The last-known published mapping.
    pub published: BTreeMap<String, CounterAssignmentInfo>,
}

/// API response for a published draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishDraftResponse {
    /// The draft after publishing; always clean.
    pub draft: DraftResponse,
    /// The event ID of the persisted audit event.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API query for a monthly workload summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummaryRequest {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u8,
    /// The employee; defaults to the caller.
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// A deviation from a monthly target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyNoticeInfo {
    /// `days_off_above_target`, `days_off_below_target`,
    /// `shifts_below_minimum` or `shifts_above_maximum`.
    pub kind: String,
    /// The registrant's figure.
    pub actual: u32,
    /// The store's target.
    pub target: u32,
}

/// API response for a monthly workload summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummaryResponse {
    /// The employee.
    pub employee_id: String,
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u8,
    /// Shifts registered on dates inside the month.
    pub shifts_worked: u32,
    /// Empty days inside the month belonging to registered weeks.
    pub days_off: u32,
    /// Deviations from the store's targets.
    pub notices: Vec<MonthlyNoticeInfo>,
}

/// API query for a page of the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAuditEventsRequest {
    /// Only events with a larger id.
    #[serde(default)]
    pub after_event_id: Option<i64>,
    /// Page size; defaults to 100.
    #[serde(default)]
    pub limit: Option<i64>,
}

/// One recorded state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventInfo {
    /// The event's storage id.
    pub event_id: Option<i64>,
    /// Who performed the change.
    pub actor_id: String,
    /// The actor's role at the time.
    pub actor_role: String,
    /// The request that caused the change.
    pub cause_id: String,
    /// Why it was performed.
    pub cause_description: String,
    /// The action name.
    pub action: String,
    /// Extra action details.
    pub details: Option<String>,
    /// The week touched, if any.
    pub week_start: Option<Date>,
    /// The day touched, if any.
    pub date: Option<Date>,
    /// The shift touched, if any.
    pub shift_id: Option<String>,
    /// State before the change.
    pub before: String,
    /// State after the change.
    pub after: String,
}

/// API response listing audit events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAuditEventsResponse {
    /// The events, oldest first.
    pub events: Vec<AuditEventInfo>,
}
