// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Registration gate evaluation.
//!
//! The gate is either the manual `registration_open` flag or, when the
//! store declares an auto-toggled weekly window, whether the current
//! wall-clock time in the store's timezone falls inside that window.
//!
//! ## Invariants
//!
//! - Window bounds are wall-clock times in the declared timezone
//! - The opening instant is inclusive, the closing instant exclusive
//! - A window whose close precedes its open wraps into the next week
//! - Identical open and close bounds describe an always-closed window

use crate::error::DomainError;
use crate::settings::{RegistrationSchedule, Settings};
use chrono::{DateTime, Datelike, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use time::{OffsetDateTime, Weekday};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Returns whether self-registration is open at `now`.
///
/// # Arguments
///
/// * `settings` - The store's settings
/// * `now` - The instant to evaluate
///
/// # Errors
///
/// Returns an error if the schedule's timezone or times are invalid.
pub fn is_registration_open_at(
    settings: &Settings,
    now: OffsetDateTime,
) -> Result<bool, DomainError> {
    match &settings.registration_schedule {
        Some(schedule) if schedule.auto_toggle => is_within_window(schedule, now),
        _ => Ok(settings.registration_open),
    }
}

/// Returns whether `now` falls inside the schedule's weekly window.
///
/// # Errors
///
/// Returns an error if the schedule's timezone or times are invalid.
pub fn is_within_window(
    schedule: &RegistrationSchedule,
    now: OffsetDateTime,
) -> Result<bool, DomainError> {
    let tz: Tz = schedule
        .timezone
        .parse()
        .map_err(|_| DomainError::InvalidTimezone(schedule.timezone.clone()))?;

    let open: u32 = minute_of_week(schedule.open_day, parse_wall_clock(&schedule.open_time)?);
    let close: u32 = minute_of_week(schedule.close_day, parse_wall_clock(&schedule.close_time)?);

    let utc: DateTime<Utc> = DateTime::<Utc>::from_timestamp(now.unix_timestamp(), 0)
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("converting {now} to a UTC timestamp"),
        })?;
    let local = utc.with_timezone(&tz);
    let current: u32 = local.weekday().num_days_from_monday() * MINUTES_PER_DAY
        + local.hour() * 60
        + local.minute();

    Ok(if open <= close {
        open <= current && current < close
    } else {
        current >= open || current < close
    })
}

fn parse_wall_clock(value: &str) -> Result<NaiveTime, DomainError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| DomainError::InvalidScheduleTime {
        value: value.to_string(),
        error: e.to_string(),
    })
}

fn minute_of_week(day: Weekday, time: NaiveTime) -> u32 {
    u32::from(day.number_days_from_monday()) * MINUTES_PER_DAY + time.hour() * 60 + time.minute()
}
