// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod apply;
mod command;
mod draft;
mod error;
mod queries;
mod state;

#[cfg(test)]
mod tests;

pub use apply::{apply, ensure_registration_open};
pub use command::Command;
pub use draft::{
    Draft, DraftEdit, DraftKey, DraftStatus, InMemoryScratchStore, ScratchDraft, ScratchStore,
    purge_employee_from_drafts,
};
pub use error::CoreError;
pub use queries::{SlotAvailability, ToggleResult, toggle_shift, week_availability};
pub use state::{
    CascadeNotice, State, StoreContext, TransitionResult, registration_snapshot, slot_snapshot,
};
