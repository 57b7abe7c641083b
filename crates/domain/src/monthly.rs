// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Monthly workload summary.
//!
//! Monthly quotas are advisory. The summary never rejects anything; it
//! reports how a registrant's month compares to the store's targets.
//! A target of zero means "not configured" and produces no notice.

use crate::error::DomainError;
use crate::settings::MonthlyQuotas;
use crate::types::{EmployeeType, WeeklyRegistration};
use serde::{Deserialize, Serialize};
use time::{Date, Month};

/// A deviation from a monthly target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MonthlyNotice {
    /// A full-time registrant took more days off than expected.
    DaysOffAboveTarget {
        /// Days off taken in registered weeks.
        taken: u32,
        /// Expected days off.
        target: u32,
    },
    /// A full-time registrant took fewer days off than expected.
    DaysOffBelowTarget {
        /// Days off taken in registered weeks.
        taken: u32,
        /// Expected days off.
        target: u32,
    },
    /// A part-time registrant works fewer shifts than the minimum.
    ShiftsBelowMinimum {
        /// Shifts registered in the month.
        worked: u32,
        /// Minimum shifts.
        minimum: u32,
    },
    /// A part-time registrant works more shifts than the maximum.
    ShiftsAboveMaximum {
        /// Shifts registered in the month.
        worked: u32,
        /// Maximum shifts.
        maximum: u32,
    },
}

/// A registrant's month at a glance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: Month,
    /// Shifts registered on dates inside the month.
    pub shifts_worked: u32,
    /// Empty days inside the month that belong to a registered week.
    pub days_off: u32,
    /// Deviations from the store's targets.
    pub notices: Vec<MonthlyNotice>,
}

/// Summarizes a registrant's month.
///
/// # Arguments
///
/// * `employee_type` - The registrant's employment type
/// * `quotas` - The store's monthly targets
/// * `year` - Calendar year
/// * `month` - Calendar month
/// * `registrations` - The registrant's registrations for weeks touching the month
///
/// # Errors
///
/// Returns an error if a registration week cannot be expanded.
pub fn summarize_month(
    employee_type: EmployeeType,
    quotas: &MonthlyQuotas,
    year: i32,
    month: Month,
    registrations: &[WeeklyRegistration],
) -> Result<MonthlySummary, DomainError> {
    let in_month = |date: &Date| date.year() == year && date.month() == month;

    let mut shifts_worked: u32 = 0;
    let mut days_off: u32 = 0;
    for registration in registrations {
        for date in registration.week_start().days()? {
            if !in_month(&date) {
                continue;
            }
            if registration.shift_on(date).is_some() {
                shifts_worked += 1;
            } else {
                days_off += 1;
            }
        }
    }

    let mut notices: Vec<MonthlyNotice> = Vec::new();
    match employee_type {
        EmployeeType::FullTime if quotas.ft_days_off > 0 => {
            if days_off > quotas.ft_days_off {
                notices.push(MonthlyNotice::DaysOffAboveTarget {
                    taken: days_off,
                    target: quotas.ft_days_off,
                });
            } else if days_off < quotas.ft_days_off {
                notices.push(MonthlyNotice::DaysOffBelowTarget {
                    taken: days_off,
                    target: quotas.ft_days_off,
                });
            }
        }
        EmployeeType::PartTime => {
            if quotas.pt_min_shifts > 0 && shifts_worked < quotas.pt_min_shifts {
                notices.push(MonthlyNotice::ShiftsBelowMinimum {
                    worked: shifts_worked,
                    minimum: quotas.pt_min_shifts,
                });
            }
            if quotas.pt_max_shifts > 0 && shifts_worked > quotas.pt_max_shifts {
                notices.push(MonthlyNotice::ShiftsAboveMaximum {
                    worked: shifts_worked,
                    maximum: quotas.pt_max_shifts,
                });
            }
        }
        EmployeeType::FullTime => {}
    }

    Ok(MonthlySummary {
        year,
        month,
        shifts_worked,
        days_off,
        notices,
    })
}
