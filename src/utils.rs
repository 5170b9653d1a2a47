// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::models::Benefit;

/// The only place the system clock is read. Library code takes the
/// reference date as a parameter; commands call this when `--date` is not
/// given.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_amount(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn fmt_period_end(end: Option<NaiveDateTime>) -> String {
    match end {
        Some(e) => e.date().to_string(),
        None => "-".into(),
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn id_for_card(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM cards WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Card '{}' not found", name))?;
    Ok(id)
}

pub fn load_benefit(conn: &Connection, id: i64) -> Result<Benefit> {
    let mut stmt = conn.prepare(
        "SELECT id, card_id, title, cycle_type, is_personal_cycle, custom_start_date,
                end_month, end_day, cap_amount, reminder_days, notifiable, is_active
         FROM benefits WHERE id=?1",
    )?;
    let b = stmt
        .query_row(params![id], benefit_from_row)
        .with_context(|| format!("Benefit {} not found", id))?;
    Ok(b)
}

pub fn benefit_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Benefit> {
    let cap: Option<String> = r.get(8)?;
    Ok(Benefit {
        id: r.get(0)?,
        card_id: r.get(1)?,
        title: r.get(2)?,
        cycle_type: r.get(3)?,
        is_personal_cycle: r.get::<_, i64>(4)? != 0,
        custom_start_date: r.get(5)?,
        end_month: r.get(6)?,
        end_day: r.get(7)?,
        cap_amount: cap.and_then(|s| s.parse().ok()),
        reminder_days: r.get(9)?,
        notifiable: r.get::<_, i64>(10)? != 0,
        is_active: r.get::<_, i64>(11)? != 0,
    })
}

/// Total logged usage for one cycle instance.
pub fn used_in_cycle(
    conn: &Connection,
    benefit_id: i64,
    year: i32,
    cycle_number: Option<u32>,
) -> Result<Decimal> {
    let mut stmt = conn.prepare(
        "SELECT amount FROM usages WHERE benefit_id=?1 AND year=?2 AND cycle_number IS ?3",
    )?;
    let mut rows = stmt.query(params![benefit_id, year, cycle_number])?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let s: String = r.get(0)?;
        total += s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' in usages", s))?;
    }
    Ok(total)
}

pub fn is_completed(
    conn: &Connection,
    benefit_id: i64,
    year: i32,
    cycle_number: Option<u32>,
) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM completions WHERE benefit_id=?1 AND year=?2 AND cycle_number=?3",
            params![benefit_id, year, cycle_number.unwrap_or(0)],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn mark_completed(
    conn: &Connection,
    benefit_id: i64,
    year: i32,
    cycle_number: Option<u32>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO completions(benefit_id, year, cycle_number) VALUES (?1,?2,?3)
         ON CONFLICT(benefit_id, year, cycle_number) DO NOTHING",
        params![benefit_id, year, cycle_number.unwrap_or(0)],
    )?;
    Ok(())
}

pub fn clear_completed(
    conn: &Connection,
    benefit_id: i64,
    year: i32,
    cycle_number: Option<u32>,
) -> Result<()> {
    conn.execute(
        "DELETE FROM completions WHERE benefit_id=?1 AND year=?2 AND cycle_number=?3",
        params![benefit_id, year, cycle_number.unwrap_or(0)],
    )?;
    Ok(())
}

/// True when a reminder was already sent for this cycle instance.
pub fn reminder_logged(
    conn: &Connection,
    benefit_id: i64,
    year: i32,
    cycle_number: Option<u32>,
) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM notification_log WHERE benefit_id=?1 AND year=?2 AND cycle_number=?3",
            params![benefit_id, year, cycle_number.unwrap_or(0)],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn log_reminder(
    conn: &Connection,
    benefit_id: i64,
    year: i32,
    cycle_number: Option<u32>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO notification_log(benefit_id, year, cycle_number) VALUES (?1,?2,?3)
         ON CONFLICT(benefit_id, year, cycle_number) DO NOTHING",
        params![benefit_id, year, cycle_number.unwrap_or(0)],
    )?;
    Ok(())
}
