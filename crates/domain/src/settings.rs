// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-store scheduling settings.
//!
//! Settings are owned by the store administration collaborator and are
//! read-only from the engine's point of view. They are persisted as one
//! JSON document per store.

use crate::error::DomainError;
use crate::ids::ShiftId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::{Date, Weekday};

/// Capacity used when neither a special date nor a default quota is set.
pub const DEFAULT_SHIFT_CAPACITY: u32 = 5;

const fn default_fallback_capacity() -> u32 {
    DEFAULT_SHIFT_CAPACITY
}

/// Store-wide scheduling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Manual registration gate.
    #[serde(default)]
    pub registration_open: bool,
    /// Shift ids offered by the store, in display order.
    #[serde(default)]
    pub shift_times: Vec<ShiftId>,
    /// Per-shift capacity quotas.
    #[serde(default)]
    pub quotas: QuotaSettings,
    /// Advisory monthly targets.
    #[serde(default)]
    pub monthly_quotas: MonthlyQuotas,
    /// Optional weekly registration window.
    #[serde(default)]
    pub registration_schedule: Option<RegistrationSchedule>,
    /// Capacity used when no quota is configured for a shift.
    #[serde(default = "default_fallback_capacity")]
    pub fallback_capacity: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registration_open: false,
            shift_times: Vec::new(),
            quotas: QuotaSettings::default(),
            monthly_quotas: MonthlyQuotas::default(),
            registration_schedule: None,
            fallback_capacity: DEFAULT_SHIFT_CAPACITY,
        }
    }
}

impl Settings {
    /// Returns whether `shift_id` is one of the store's configured shifts.
    #[must_use]
    pub fn offers_shift(&self, shift_id: &ShiftId) -> bool {
        self.shift_times.contains(shift_id)
    }

    /// Checks that `shift_id` is configured for the store.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownShift` otherwise.
    pub fn ensure_shift(&self, shift_id: &ShiftId) -> Result<(), DomainError> {
        if self.offers_shift(shift_id) {
            Ok(())
        } else {
            Err(DomainError::UnknownShift(shift_id.clone()))
        }
    }
}

/// Capacity quotas for a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaSettings {
    /// Capacity per shift on Monday through Friday.
    #[serde(default)]
    pub default_weekday: BTreeMap<ShiftId, u32>,
    /// Capacity per shift on Saturday and Sunday.
    #[serde(default)]
    pub default_weekend: BTreeMap<ShiftId, u32>,
    /// Date-specific overrides, capacity per shift on each listed date.
    #[serde(default)]
    pub special_dates: BTreeMap<Date, BTreeMap<ShiftId, u32>>,
}

impl QuotaSettings {
    /// Returns the override for `shift_id` on `date`, if one exists.
    #[must_use]
    pub fn special_capacity(&self, date: Date, shift_id: &ShiftId) -> Option<u32> {
        self.special_dates
            .get(&date)
            .and_then(|capacities| capacities.get(shift_id).copied())
    }
}

/// Advisory monthly targets used for the monthly summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyQuotas {
    /// Days off a full-time employee is expected to take per month.
    #[serde(default)]
    pub ft_days_off: u32,
    /// Minimum shifts a part-time employee should work per month.
    #[serde(default)]
    pub pt_min_shifts: u32,
    /// Maximum shifts a part-time employee should work per month.
    #[serde(default)]
    pub pt_max_shifts: u32,
}

/// Weekly window during which self-registration is open.
///
/// Times are wall-clock `HH:MM` in the declared timezone. The window may
/// wrap past Sunday into the following week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSchedule {
    /// IANA timezone name (e.g., "Asia/Ho_Chi_Minh").
    pub timezone: String,
    /// Day the window opens.
    pub open_day: Weekday,
    /// Time the window opens (`HH:MM`).
    pub open_time: String,
    /// Day the window closes.
    pub close_day: Weekday,
    /// Time the window closes (`HH:MM`).
    pub close_time: String,
    /// When true the window drives the gate instead of `registration_open`.
    #[serde(default)]
    pub auto_toggle: bool,
}
