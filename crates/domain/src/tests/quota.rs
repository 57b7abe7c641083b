// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{chieu, create_test_settings, sang, toi};
use crate::{DEFAULT_SHIFT_CAPACITY, Settings, is_weekend, resolve_capacity};
use std::collections::BTreeMap;
use time::macros::date;

#[test]
fn test_weekday_default_applies_monday_to_friday() {
    let settings: Settings = create_test_settings();
    assert_eq!(resolve_capacity(&settings, date!(2026 - 03 - 02), &sang()), 5);
    assert_eq!(resolve_capacity(&settings, date!(2026 - 03 - 06), &chieu()), 3);
}

#[test]
fn test_weekend_default_applies_saturday_and_sunday() {
    let settings: Settings = create_test_settings();
    assert!(is_weekend(date!(2026 - 03 - 07)));
    assert!(is_weekend(date!(2026 - 03 - 08)));
    assert!(!is_weekend(date!(2026 - 03 - 06)));
    assert_eq!(resolve_capacity(&settings, date!(2026 - 03 - 07), &sang()), 2);
}

#[test]
fn test_missing_quota_falls_back() {
    let settings: Settings = create_test_settings();
    assert_eq!(
        resolve_capacity(&settings, date!(2026 - 03 - 03), &toi()),
        DEFAULT_SHIFT_CAPACITY
    );
    // Weekend map has no "Chiều" entry, weekday value is not borrowed.
    assert_eq!(
        resolve_capacity(&settings, date!(2026 - 03 - 08), &chieu()),
        DEFAULT_SHIFT_CAPACITY
    );
}

#[test]
fn test_configured_fallback_capacity_is_used() {
    let mut settings: Settings = create_test_settings();
    settings.fallback_capacity = 9;
    assert_eq!(resolve_capacity(&settings, date!(2026 - 03 - 03), &toi()), 9);
}

#[test]
fn test_special_date_overrides_default() {
    let mut settings: Settings = create_test_settings();
    settings
        .quotas
        .special_dates
        .insert(date!(2026 - 03 - 04), BTreeMap::from([(sang(), 0)]));

    assert_eq!(resolve_capacity(&settings, date!(2026 - 03 - 04), &sang()), 0);
    // Shifts absent from the override use the regular defaults.
    assert_eq!(resolve_capacity(&settings, date!(2026 - 03 - 04), &chieu()), 3);
    assert_eq!(resolve_capacity(&settings, date!(2026 - 03 - 05), &sang()), 5);
}

#[test]
fn test_settings_json_defaults_fallback_capacity() {
    let settings: Settings = serde_json::from_str(r#"{"shift_times": ["Sáng"]}"#).unwrap();
    assert_eq!(settings.fallback_capacity, DEFAULT_SHIFT_CAPACITY);
    assert!(!settings.registration_open);
    assert!(settings.offers_shift(&sang()));
}

#[test]
fn test_special_dates_read_from_a_date_keyed_map() {
    let settings: Settings = serde_json::from_str(
        r#"{
            "shift_times": ["Sáng", "Chiều"],
            "quotas": {
                "special_dates": {
                    "2026-03-04": { "Sáng": 1 },
                    "2026-03-08": { "Chiều": 7 }
                }
            }
        }"#,
    )
    .unwrap();

    assert_eq!(settings.quotas.special_dates.len(), 2);
    assert_eq!(resolve_capacity(&settings, date!(2026 - 03 - 04), &sang()), 1);
    assert_eq!(resolve_capacity(&settings, date!(2026 - 03 - 08), &chieu()), 7);
    assert_eq!(
        resolve_capacity(&settings, date!(2026 - 03 - 04), &chieu()),
        DEFAULT_SHIFT_CAPACITY
    );
}
