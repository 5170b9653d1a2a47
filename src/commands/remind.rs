// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The reminder job. Delivery here is stdout; the decision and the
//! once-per-cycle-instance suppression are the part that matters.

use crate::cycle::end_of_day;
use crate::reminder;
use crate::utils::{benefit_from_row, is_completed, parse_date, reminder_logged, today};
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DueReminder {
    pub benefit_id: i64,
    pub card: String,
    pub title: String,
    pub year: i32,
    pub cycle_number: Option<u32>,
    pub period_end: NaiveDateTime,
    pub days_remaining: i64,
}

/// Scan active, notifiable benefits and return those whose reminder window
/// contains `reference`, skipping completed cycles and instances already in
/// the notification log.
pub fn due_reminders(conn: &Connection, reference: NaiveDate) -> Result<Vec<DueReminder>> {
    let now = end_of_day(reference);
    let mut stmt = conn.prepare(
        "SELECT b.id, b.card_id, b.title, b.cycle_type, b.is_personal_cycle, b.custom_start_date,
                b.end_month, b.end_day, b.cap_amount, b.reminder_days, b.notifiable, b.is_active,
                c.name
         FROM benefits b JOIN cards c ON b.card_id=c.id
         WHERE b.is_active=1 AND b.notifiable=1
         ORDER BY c.name, b.title",
    )?;
    let rows: Vec<_> = stmt
        .query_map([], |r| {
            let b = benefit_from_row(r)?;
            let card: String = r.get(12)?;
            Ok((b, card))
        })?
        .collect::<rusqlite::Result<_>>()?;

    let mut due = Vec::new();
    for (benefit, card) in rows {
        let instance = benefit.rule().cycle_instance(reference);
        if !reminder::should_send(instance.period_end, benefit.reminder_days, now) {
            continue;
        }
        if is_completed(conn, benefit.id, instance.year, instance.cycle_number)? {
            continue;
        }
        if reminder_logged(conn, benefit.id, instance.year, instance.cycle_number)? {
            continue;
        }
        let Some(period_end) = instance.period_end else {
            continue;
        };
        let Some(days) = reminder::days_remaining(instance.period_end, now) else {
            continue;
        };
        due.push(DueReminder {
            benefit_id: benefit.id,
            card,
            title: benefit.title,
            year: instance.year,
            cycle_number: instance.cycle_number,
            period_end,
            days_remaining: days,
        });
    }
    Ok(due)
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let reference = match m.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let dry_run = m.get_flag("dry-run");

    let due = due_reminders(conn, reference)?;
    if due.is_empty() {
        println!("No reminders due");
        return Ok(());
    }
    for r in &due {
        println!(
            "Reminder: '{}' on {} expires in {} day(s) ({})",
            r.title,
            r.card,
            r.days_remaining,
            r.period_end.date()
        );
        if !dry_run {
            crate::utils::log_reminder(conn, r.benefit_id, r.year, r.cycle_number)?;
        }
    }
    if dry_run {
        println!("(dry run, nothing logged)");
    }
    Ok(())
}
