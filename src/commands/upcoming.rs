// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cycle::end_of_day;
use crate::reminder;
use crate::utils::{
    benefit_from_row, fmt_amount, is_completed, maybe_print_json, parse_date, pretty_table, today,
    used_in_cycle,
};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let days = *m.get_one::<u32>("days").unwrap();
    let reference = match m.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    // Window opens at the start of the reference day so a deadline later
    // today still counts as upcoming.
    let now = reference.and_time(chrono::NaiveTime::MIN);

    let mut stmt = conn.prepare(
        "SELECT b.id, b.card_id, b.title, b.cycle_type, b.is_personal_cycle, b.custom_start_date,
                b.end_month, b.end_day, b.cap_amount, b.reminder_days, b.notifiable, b.is_active,
                c.name
         FROM benefits b JOIN cards c ON b.card_id=c.id
         WHERE b.is_active=1
         ORDER BY c.name, b.title",
    )?;
    let rows: Vec<_> = stmt
        .query_map([], |r| {
            let b = benefit_from_row(r)?;
            let card: String = r.get(12)?;
            Ok((b, card))
        })?
        .collect::<rusqlite::Result<_>>()?;

    let mut items = Vec::new();
    let mut data = Vec::new();
    for (benefit, card) in rows {
        let instance = benefit.rule().cycle_instance(reference);
        if !reminder::expiring_within(instance.period_end, days, now) {
            continue;
        }
        if is_completed(conn, benefit.id, instance.year, instance.cycle_number)? {
            continue;
        }
        let Some(period_end) = instance.period_end else {
            continue;
        };
        let days_left =
            reminder::days_remaining(instance.period_end, end_of_day(reference)).unwrap_or(0);
        let used = used_in_cycle(conn, benefit.id, instance.year, instance.cycle_number)?;
        items.push(json!({
            "benefit_id": benefit.id,
            "card": card,
            "title": benefit.title,
            "period_end": period_end.date().to_string(),
            "days_remaining": days_left,
            "used": fmt_amount(&used),
            "cap": benefit.cap_amount.map(|c| fmt_amount(&c)),
        }));
        data.push(vec![
            card,
            benefit.title.clone(),
            period_end.date().to_string(),
            days_left.to_string(),
            match benefit.cap_amount {
                Some(cap) => format!("{} / {}", fmt_amount(&used), fmt_amount(&cap)),
                None => fmt_amount(&used),
            },
        ]);
    }

    if !maybe_print_json(json_flag, jsonl_flag, &items)? {
        if data.is_empty() {
            println!("Nothing expiring in the next {} days", days);
        } else {
            println!(
                "{}",
                pretty_table(&["Card", "Benefit", "Period end", "Days left", "Used"], data)
            );
        }
    }
    Ok(())
}
