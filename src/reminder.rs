// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Reminder-window arithmetic over a computed period end.
//!
//! The window is the closed date interval [period_end - reminder_days,
//! period_end], evaluated on calendar days: a reminder fires on the lead day
//! itself and on every day up to and including the expiry day. Whether a
//! reminder was already sent for a cycle instance is the notification log's
//! concern, not this module's.

use chrono::{Duration, NaiveDate, NaiveDateTime};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// First calendar day of the reminder window. `reminder_days` of 0 yields
/// the expiry day itself. A lead time reaching past the calendar clamps to
/// the earliest representable date, leaving the window simply open.
pub fn reminder_date(period_end: NaiveDateTime, reminder_days: u32) -> NaiveDate {
    period_end
        .date()
        .checked_sub_signed(Duration::days(i64::from(reminder_days)))
        .unwrap_or(NaiveDate::MIN)
}

/// True iff `now` falls inside the reminder window, compared on calendar
/// days so the time of day never shifts the edges. A missing period end
/// means "no deadline" and never triggers.
pub fn should_send(
    period_end: Option<NaiveDateTime>,
    reminder_days: u32,
    now: NaiveDateTime,
) -> bool {
    let Some(end) = period_end else {
        return false;
    };
    let today = now.date();
    today >= reminder_date(end, reminder_days) && today <= end.date()
}

/// Days left until the deadline, rounded up; 0 once expired, `None` when
/// there is no deadline.
pub fn days_remaining(period_end: Option<NaiveDateTime>, now: NaiveDateTime) -> Option<i64> {
    let end = period_end?;
    if end < now {
        return Some(0);
    }
    let ms = (end - now).num_milliseconds();
    Some((ms + MS_PER_DAY - 1) / MS_PER_DAY)
}

/// True iff the deadline is still ahead of `now` but no more than `days`
/// days away. Instant-based, used by the upcoming listing.
pub fn expiring_within(period_end: Option<NaiveDateTime>, days: u32, now: NaiveDateTime) -> bool {
    let Some(end) = period_end else {
        return false;
    };
    end >= now && end <= now + Duration::days(i64::from(days))
}
