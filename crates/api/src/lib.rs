// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary of the shift registration engine.
//!
//! Handlers authorize the caller, translate DTOs into core commands,
//! apply them, and commit the results through the persistence layer.
//! Errors from every lower layer are translated explicitly into
//! [`ApiError`]; none leak through.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Permission};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    ApiResult, DEFAULT_AUDIT_PAGE_SIZE, MAX_AUDIT_PAGE_SIZE, delete_registration, discard_draft,
    edit_draft, force_assign, force_unassign, get_monthly_summary, get_schedule_slot,
    get_week_availability, list_audit_events, list_registrations, open_draft, publish_draft,
    publish_schedule, submit_registration, toggle_registration_shift,
};
pub use request_response::{
    AuditEventInfo, AvailabilityRequest, AvailabilityResponse, CounterAssignmentInfo,
    DeleteRegistrationResponse, DraftEditInfo, DraftResponse, EditDraftRequest,
    ForceAssignResponse, ForceShiftRequest, ForceUnassignResponse, ListAuditEventsRequest,
    ListAuditEventsResponse, ListRegistrationsRequest, ListRegistrationsResponse,
    MonthlyNoticeInfo, MonthlySummaryRequest, MonthlySummaryResponse, PublishDraftResponse,
    PublishScheduleRequest, PublishScheduleResponse, RegistrationInfo, ScheduleSlotInfo,
    ShiftEntryInfo, ShiftSelection, SlotAvailabilityInfo, SlotRequest, SubmitRegistrationRequest,
    SubmitRegistrationResponse, ToggleShiftRequest, ToggleShiftResponse,
};
