// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side queries.
//!
//! All queries use Diesel DSL and rebuild domain values from rows.

pub mod audit;
pub mod registration;
pub mod schedule;
pub mod store;

pub use audit::{get_audit_event, list_audit_events};
pub use registration::{
    find_registration, get_registration, list_employee_registrations, list_week_registrations,
};
pub use schedule::{find_slot, list_week_slots, stored_slot_version};
pub use store::{load_settings, load_store_context};
