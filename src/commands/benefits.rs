// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cycle::{end_of_day, validate_cycle_type, RecurrenceRule};
use crate::reminder;
use crate::utils::{
    benefit_from_row, clear_completed, fmt_amount, id_for_card, is_completed, load_benefit,
    mark_completed, maybe_print_json, parse_date, parse_decimal, pretty_table, today,
    used_in_cycle,
};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("complete", sub)) => complete(conn, sub, true)?,
        Some(("uncomplete", sub)) => complete(conn, sub, false)?,
        Some(("notify", sub)) => notify(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn reference_date(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("date") {
        Some(s) => parse_date(s),
        None => Ok(today()),
    }
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let title = sub.get_one::<String>("title").unwrap();
    let card = sub.get_one::<String>("card").unwrap();
    let cycle_raw = sub.get_one::<String>("cycle").unwrap().to_uppercase();
    let personal = sub.get_flag("personal");
    let start_date = sub
        .get_one::<String>("start-date")
        .map(|s| parse_date(s))
        .transpose()?;
    let end_month = sub.get_one::<u32>("end-month").copied();
    let end_day = sub.get_one::<u32>("end-day").copied();
    let cap = sub
        .get_one::<String>("cap")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let reminder_days = *sub.get_one::<u32>("reminder-days").unwrap();
    let notifiable = !sub.get_flag("no-notify");

    // Boundary validation: a structurally invalid rule is rejected here so a
    // missing deadline downstream always means a genuine "no deadline".
    let cycle_type = validate_cycle_type(&cycle_raw)?;
    let rule = RecurrenceRule {
        cycle_type: Some(cycle_type),
        is_personal_cycle: personal,
        custom_start_date: start_date,
        end_month,
        end_day,
    };
    rule.validate()?;

    let card_id = id_for_card(conn, card)?;
    conn.execute(
        "INSERT INTO benefits(card_id, title, cycle_type, is_personal_cycle, custom_start_date,
                              end_month, end_day, cap_amount, reminder_days, notifiable)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
        params![
            card_id,
            title,
            cycle_type.as_str(),
            personal as i64,
            start_date,
            end_month,
            end_day,
            cap.map(|d| d.to_string()),
            reminder_days,
            notifiable as i64,
        ],
    )?;
    println!("Added benefit '{}' ({}) to {}", title, cycle_type.label(), card);
    Ok(())
}

/// One benefit with its computed current cycle, keyed the same way as the
/// `upcoming` output so both listings script alike.
#[derive(Debug, Serialize)]
pub struct BenefitRow {
    pub benefit_id: i64,
    pub card: String,
    pub title: String,
    pub cycle: String,
    pub period_end: Option<String>,
    pub days_remaining: Option<i64>,
    pub used: String,
    pub cap: Option<String>,
    pub completed: bool,
}

pub fn benefit_rows(
    conn: &Connection,
    card_filter: Option<&str>,
    reference: NaiveDate,
) -> Result<Vec<BenefitRow>> {
    let mut sql = String::from(
        "SELECT b.id, b.card_id, b.title, b.cycle_type, b.is_personal_cycle, b.custom_start_date,
                b.end_month, b.end_day, b.cap_amount, b.reminder_days, b.notifiable, b.is_active,
                c.name
         FROM benefits b JOIN cards c ON b.card_id=c.id WHERE b.is_active=1",
    );
    if card_filter.is_some() {
        sql.push_str(" AND c.name=?1");
    }
    sql.push_str(" ORDER BY c.name, b.title");

    let mut stmt = conn.prepare(&sql)?;
    let map_row = |r: &rusqlite::Row<'_>| {
        let b = benefit_from_row(r)?;
        let card: String = r.get(12)?;
        Ok((b, card))
    };
    let rows: Vec<_> = if let Some(card) = card_filter {
        stmt.query_map(params![card], map_row)?
            .collect::<rusqlite::Result<_>>()?
    } else {
        stmt.query_map([], map_row)?
            .collect::<rusqlite::Result<_>>()?
    };

    let mut out = Vec::new();
    for (b, card) in rows {
        let instance = b.rule().cycle_instance(reference);
        let used = used_in_cycle(conn, b.id, instance.year, instance.cycle_number)?;
        let done = is_completed(conn, b.id, instance.year, instance.cycle_number)?;
        out.push(BenefitRow {
            benefit_id: b.id,
            card,
            title: b.title.clone(),
            cycle: b
                .rule()
                .cycle_type
                .map(|t| t.label().to_string())
                .unwrap_or_else(|| b.cycle_type.clone()),
            period_end: instance.period_end.map(|e| e.date().to_string()),
            days_remaining: reminder::days_remaining(instance.period_end, end_of_day(reference)),
            used: fmt_amount(&used),
            cap: b.cap_amount.map(|c| fmt_amount(&c)),
            completed: done,
        });
    }
    Ok(out)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let reference = reference_date(sub)?;
    let card_filter = sub.get_one::<String>("card").map(String::as_str);

    let rows = benefit_rows(conn, card_filter, reference)?;
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let data = rows
            .into_iter()
            .map(|r| {
                vec![
                    r.benefit_id.to_string(),
                    r.card,
                    r.title,
                    r.cycle,
                    r.period_end.unwrap_or_else(|| "-".into()),
                    r.days_remaining
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".into()),
                    match r.cap {
                        Some(cap) => format!("{} / {}", r.used, cap),
                        None => r.used,
                    },
                    if r.completed { "yes".into() } else { "no".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Card", "Benefit", "Cycle", "Period end", "Days left", "Used", "Done"],
                data
            )
        );
    }
    Ok(())
}

fn complete(conn: &Connection, sub: &clap::ArgMatches, done: bool) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let reference = reference_date(sub)?;
    let benefit = load_benefit(conn, id)?;
    let instance = benefit.rule().cycle_instance(reference);
    if done {
        mark_completed(conn, id, instance.year, instance.cycle_number)?;
        println!("Marked '{}' completed for this cycle", benefit.title);
    } else {
        clear_completed(conn, id, instance.year, instance.cycle_number)?;
        println!("Cleared completion for '{}'", benefit.title);
    }
    Ok(())
}

fn notify(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let state = sub.get_one::<String>("state").unwrap();
    let on = state == "on";
    let changed = conn.execute(
        "UPDATE benefits SET notifiable=?1 WHERE id=?2",
        params![on as i64, id],
    )?;
    if changed == 0 {
        return Err(anyhow!("Benefit {} not found", id));
    }
    println!("Reminders {} for benefit {}", if on { "on" } else { "off" }, id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let changed = conn.execute("DELETE FROM benefits WHERE id=?1", params![id])?;
    if changed == 0 {
        return Err(anyhow!("Benefit {} not found", id));
    }
    println!("Removed benefit {}", id);
    Ok(())
}
