// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift capacity resolution.
//!
//! Lookup order:
//! 1. special-date override for the exact date and shift
//! 2. weekend or weekday default for the shift
//! 3. the store's fallback capacity
//!
//! Missing configuration degrades to the fallback; resolution never fails.

use crate::ids::ShiftId;
use crate::settings::Settings;
use time::{Date, Weekday};

/// Returns whether `date` falls on Saturday or Sunday.
#[must_use]
pub const fn is_weekend(date: Date) -> bool {
    matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

/// Resolves the maximum headcount for `shift_id` on `date`.
///
/// # Arguments
///
/// * `settings` - The store's settings
/// * `date` - The calendar date of the shift
/// * `shift_id` - The shift
///
/// # Returns
///
/// The capacity for the slot.
#[must_use]
pub fn resolve_capacity(settings: &Settings, date: Date, shift_id: &ShiftId) -> u32 {
    if let Some(capacity) = settings.quotas.special_capacity(date, shift_id) {
        return capacity;
    }

    let defaults = if is_weekend(date) {
        &settings.quotas.default_weekend
    } else {
        &settings.quotas.default_weekday
    };

    defaults
        .get(shift_id)
        .copied()
        .unwrap_or(settings.fallback_capacity)
}
