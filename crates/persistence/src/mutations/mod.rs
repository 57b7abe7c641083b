// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side mutations.
//!
//! Every function here expects to run inside the caller's transaction
//! when it is part of a larger write.

pub mod audit;
pub mod registration;
pub mod schedule;
pub mod store;
pub mod transition;

pub use audit::persist_audit_event;
pub use registration::{delete_registration, save_registration};
pub use schedule::save_slot;
pub use store::{replace_counters, upsert_employee, upsert_store};
pub use transition::{CommitGuard, PersistTransitionResult, persist_transition};
