// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Integrity pass over stored data. Rules are validated when first accepted,
//! but rows written by older versions or edited by hand can still be broken;
//! surfacing them here keeps a missing deadline meaning "no deadline" rather
//! than a data bug.

use crate::cycle::{validate_cycle_type, CycleType};
use crate::utils::{benefit_from_row, pretty_table, today, used_in_cycle};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    let mut stmt = conn.prepare(
        "SELECT id, card_id, title, cycle_type, is_personal_cycle, custom_start_date,
                end_month, end_day, cap_amount, reminder_days, notifiable, is_active
         FROM benefits ORDER BY id",
    )?;
    let benefits: Vec<_> = stmt
        .query_map([], benefit_from_row)?
        .collect::<rusqlite::Result<_>>()?;

    let reference = today();
    for b in &benefits {
        let label = format!("benefit {} '{}'", b.id, b.title);

        if let Err(e) = validate_cycle_type(&b.cycle_type) {
            rows.push(vec!["invalid_rule".into(), format!("{}: {}", label, e)]);
            continue;
        }
        if let Err(e) = b.rule().validate() {
            rows.push(vec!["invalid_rule".into(), format!("{}: {}", label, e)]);
            continue;
        }

        // A valid one-time rule with no end date never has a deadline; that
        // is legitimate, but worth flagging when reminders are on.
        if b.rule().cycle_type == Some(CycleType::OneTime)
            && b.notifiable
            && b.rule().period_end(reference).is_none()
        {
            rows.push(vec![
                "unreachable_reminder".into(),
                format!("{}: one-time benefit with no end date", label),
            ]);
        }

        // The CLI caps the lead time at a year; rows edited by hand can
        // still exceed it, which would keep the window permanently open.
        if b.reminder_days > 365 {
            rows.push(vec![
                "excessive_reminder_days".into(),
                format!("{}: lead time of {} days", label, b.reminder_days),
            ]);
        }

        if let Some(cap) = b.cap_amount {
            let instance = b.rule().cycle_instance(reference);
            let used = used_in_cycle(conn, b.id, instance.year, instance.cycle_number)?;
            if used > cap {
                rows.push(vec![
                    "over_cap".into(),
                    format!("{}: {} used of {} cap", label, used, cap),
                ]);
            }
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
