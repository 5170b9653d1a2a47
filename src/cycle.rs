// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Benefit cycle calculator: given a recurrence rule and a reference date,
//! compute the current cycle's number and the instant the cycle ends.
//!
//! Everything here is pure. Callers supply the reference date; the system
//! clock is only touched in `utils::today` at the CLI boundary.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 23:59:59.999 — the last representable instant of a day at millisecond
/// precision, matching how period ends are stored and compared.
static DAY_END: Lazy<NaiveTime> =
    Lazy::new(|| NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleType {
    Monthly,
    Quarterly,
    SemiAnnually,
    Yearly,
    OneTime,
}

impl CycleType {
    /// Parse a stored cycle-type string. Legacy aliases are accepted;
    /// anything else is `None` (indeterminate, never an error).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MONTHLY" | "CALENDAR_MONTH" => Some(Self::Monthly),
            "QUARTERLY" => Some(Self::Quarterly),
            "SEMI_ANNUALLY" | "SEMI_ANNUAL" => Some(Self::SemiAnnually),
            "YEARLY" | "ANNUALLY" => Some(Self::Yearly),
            "ONE_TIME" | "ONCE" => Some(Self::OneTime),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "MONTHLY",
            Self::Quarterly => "QUARTERLY",
            Self::SemiAnnually => "SEMI_ANNUALLY",
            Self::Yearly => "YEARLY",
            Self::OneTime => "ONE_TIME",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::SemiAnnually => "Semi-annually",
            Self::Yearly => "Yearly",
            Self::OneTime => "One-time",
        }
    }

    /// Cycle length in months; `None` for one-time benefits.
    fn months(self) -> Option<u32> {
        match self {
            Self::Monthly => Some(1),
            Self::Quarterly => Some(3),
            Self::SemiAnnually => Some(6),
            Self::Yearly => Some(12),
            Self::OneTime => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("unknown cycle type '{0}'")]
    UnknownCycleType(String),
    #[error("personal cycle requires a start date")]
    MissingStartDate,
    #[error("end month and end day must be set together")]
    PartialEndDate,
    #[error("end month {0} is outside 1-12")]
    EndMonthOutOfRange(u32),
    #[error("day {day} does not exist in month {month} of every year")]
    EndDayOutOfRange { month: u32, day: u32 },
}

/// Validate a raw cycle-type string at the boundary where rules are first
/// accepted, so an unrecognized string is rejected there instead of
/// surfacing later as a silent "no deadline".
pub fn validate_cycle_type(raw: &str) -> Result<CycleType, RuleError> {
    CycleType::parse(raw).ok_or_else(|| RuleError::UnknownCycleType(raw.to_string()))
}

/// How a benefit repeats. `cycle_type` is `None` when the stored string was
/// unrecognized; every computation then degrades to `None` rather than
/// failing, per the calculator's indeterminate-result policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub cycle_type: Option<CycleType>,
    pub is_personal_cycle: bool,
    pub custom_start_date: Option<NaiveDate>,
    pub end_month: Option<u32>,
    pub end_day: Option<u32>,
}

/// The computed identity of the cycle containing a reference date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleInstance {
    pub year: i32,
    pub cycle_number: Option<u32>,
    pub period_end: Option<NaiveDateTime>,
}

impl RecurrenceRule {
    /// Structural validation, run where rules are constructed (`benefit add`)
    /// and re-checked by `doctor`. The calculator itself never validates; it
    /// degrades to `None` so display code can render "no deadline".
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.is_personal_cycle && self.custom_start_date.is_none() {
            return Err(RuleError::MissingStartDate);
        }
        match (self.end_month, self.end_day) {
            (None, None) => Ok(()),
            (Some(_), None) | (None, Some(_)) => Err(RuleError::PartialEndDate),
            (Some(month), Some(day)) => {
                if !(1..=12).contains(&month) {
                    return Err(RuleError::EndMonthOutOfRange(month));
                }
                // Probe a non-leap year: a recurring year-end must exist
                // every year, which rules out Feb 29.
                if NaiveDate::from_ymd_opt(2001, month, day).is_none() {
                    return Err(RuleError::EndDayOutOfRange { month, day });
                }
                Ok(())
            }
        }
    }

    /// The last instant (23:59:59.999) at which the cycle containing
    /// `reference` is still active, or `None` when no deadline can be
    /// determined (unrecognized type, personal cycle without an anchor,
    /// one-time benefit without an end date).
    pub fn period_end(&self, reference: NaiveDate) -> Option<NaiveDateTime> {
        let cycle_type = self.cycle_type?;

        // Personal cycles are anchored to the user's start date, not the
        // calendar: anchor + cycle length - 1 day.
        if self.is_personal_cycle && cycle_type != CycleType::OneTime {
            let start = self.custom_start_date?;
            let months = cycle_type.months()?;
            let end = start.checked_add_months(Months::new(months))?.pred_opt()?;
            return Some(end_of_day(end));
        }

        let year = reference.year();
        match cycle_type {
            CycleType::Monthly => last_day_of_month(year, reference.month()).map(end_of_day),
            CycleType::Quarterly => {
                let quarter = quarter_of(reference.month());
                last_day_of_month(year, quarter * 3).map(end_of_day)
            }
            CycleType::SemiAnnually => {
                let end_month = if reference.month() <= 6 { 6 } else { 12 };
                last_day_of_month(year, end_month).map(end_of_day)
            }
            CycleType::Yearly => match (self.end_month, self.end_day) {
                (Some(month), Some(day)) => {
                    NaiveDate::from_ymd_opt(year, month, day).map(end_of_day)
                }
                _ => last_day_of_month(year, 12).map(end_of_day),
            },
            CycleType::OneTime => match (self.end_month, self.end_day) {
                (Some(month), Some(day)) => {
                    NaiveDate::from_ymd_opt(year, month, day).map(end_of_day)
                }
                _ => None,
            },
        }
    }

    /// 1-based sub-period index used as a display/grouping label and as part
    /// of a cycle instance's identity: month 1-12, quarter 1-4, half 1-2,
    /// always 1 for yearly, `None` for one-time or unrecognized types.
    pub fn cycle_number(&self, reference: NaiveDate) -> Option<u32> {
        match self.cycle_type? {
            CycleType::Monthly => Some(reference.month()),
            CycleType::Quarterly => Some(quarter_of(reference.month())),
            CycleType::SemiAnnually => Some(if reference.month() <= 6 { 1 } else { 2 }),
            CycleType::Yearly => Some(1),
            CycleType::OneTime => None,
        }
    }

    pub fn cycle_instance(&self, reference: NaiveDate) -> CycleInstance {
        CycleInstance {
            year: reference.year(),
            cycle_number: self.cycle_number(reference),
            period_end: self.period_end(reference),
        }
    }
}

/// Quarter (1-4) containing a 1-based month, i.e. ceil(month / 3).
pub fn quarter_of(month: u32) -> u32 {
    (month + 2) / 3
}

/// Last day of the given month, computed as the day before the first day of
/// the following month. This single technique yields 28/29/30/31 correctly
/// for every month, leap years included.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(*DAY_END)
}
