// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    benefit_from_row, fmt_period_end, is_completed, parse_date, today, used_in_cycle,
};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("benefits", sub)) => export_benefits(conn, sub),
        _ => Ok(()),
    }
}

fn export_benefits(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let reference = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };

    let mut stmt = conn.prepare(
        "SELECT b.id, b.card_id, b.title, b.cycle_type, b.is_personal_cycle, b.custom_start_date,
                b.end_month, b.end_day, b.cap_amount, b.reminder_days, b.notifiable, b.is_active,
                c.name
         FROM benefits b JOIN cards c ON b.card_id=c.id
         ORDER BY c.name, b.title",
    )?;
    let rows: Vec<_> = stmt
        .query_map([], |r| {
            let b = benefit_from_row(r)?;
            let card: String = r.get(12)?;
            Ok((b, card))
        })?
        .collect::<rusqlite::Result<_>>()?;

    let mut records = Vec::new();
    for (b, card) in rows {
        let instance = b.rule().cycle_instance(reference);
        let used = used_in_cycle(conn, b.id, instance.year, instance.cycle_number)?;
        let done = is_completed(conn, b.id, instance.year, instance.cycle_number)?;
        records.push((
            card,
            b.title.clone(),
            b.cycle_type.clone(),
            instance.year.to_string(),
            instance
                .cycle_number
                .map(|n| n.to_string())
                .unwrap_or_default(),
            fmt_period_end(instance.period_end),
            used.to_string(),
            b.cap_amount.map(|c| c.to_string()).unwrap_or_default(),
            if done { "yes" } else { "no" }.to_string(),
        ));
    }

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "card",
                "benefit",
                "cycle_type",
                "year",
                "cycle_number",
                "period_end",
                "used",
                "cap",
                "completed",
            ])?;
            for (card, title, cycle_type, year, number, end, used, cap, done) in records {
                wtr.write_record([card, title, cycle_type, year, number, end, used, cap, done])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for (card, title, cycle_type, year, number, end, used, cap, done) in records {
                items.push(json!({
                    "card": card, "benefit": title, "cycle_type": cycle_type,
                    "year": year, "cycle_number": number, "period_end": end,
                    "used": used, "cap": cap, "completed": done
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported benefits to {}", out);
    Ok(())
}
