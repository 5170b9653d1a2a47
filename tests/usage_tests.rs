// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use perkclip::cycle::CycleType;
use perkclip::{db, utils};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO cards(name, issuer) VALUES('Platinum', 'Amex')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO benefits(card_id, title, cycle_type, cap_amount, reminder_days)
         VALUES(1, 'Dining credit', 'QUARTERLY', '50', 7)",
        [],
    )
    .unwrap();
    conn
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn log_usage(conn: &Connection, benefit_id: i64, used_at: NaiveDate, amount: &str) {
    let benefit = utils::load_benefit(conn, benefit_id).unwrap();
    let instance = benefit.rule().cycle_instance(used_at);
    conn.execute(
        "INSERT INTO usages(benefit_id, year, cycle_number, amount, used_at)
         VALUES(?1,?2,?3,?4,?5)",
        params![benefit_id, instance.year, instance.cycle_number, amount, used_at],
    )
    .unwrap();
}

#[test]
fn benefit_row_round_trips_into_a_rule() {
    let conn = setup();
    let benefit = utils::load_benefit(&conn, 1).unwrap();
    assert_eq!(benefit.title, "Dining credit");
    assert_eq!(benefit.rule().cycle_type, Some(CycleType::Quarterly));
    assert!(!benefit.rule().is_personal_cycle);
    assert_eq!(benefit.cap_amount, Some(Decimal::from(50)));
    assert_eq!(benefit.reminder_days, 7);
}

#[test]
fn usage_accumulates_within_one_cycle_only() {
    let conn = setup();
    // Two usages in Q1, one in Q2.
    log_usage(&conn, 1, d(2025, 1, 10), "20");
    log_usage(&conn, 1, d(2025, 3, 31), "15");
    log_usage(&conn, 1, d(2025, 4, 1), "40");

    let q1 = utils::used_in_cycle(&conn, 1, 2025, Some(1)).unwrap();
    assert_eq!(q1, Decimal::from(35));
    let q2 = utils::used_in_cycle(&conn, 1, 2025, Some(2)).unwrap();
    assert_eq!(q2, Decimal::from(40));
    // Same quarter, different year.
    let q1_2024 = utils::used_in_cycle(&conn, 1, 2024, Some(1)).unwrap();
    assert_eq!(q1_2024, Decimal::ZERO);
}

#[test]
fn usage_is_attributed_to_the_cycle_containing_its_date() {
    let conn = setup();
    log_usage(&conn, 1, d(2025, 9, 30), "10");
    let (year, number): (i32, u32) = conn
        .query_row(
            "SELECT year, cycle_number FROM usages WHERE benefit_id=1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!((year, number), (2025, 3));
}

#[test]
fn completion_is_per_cycle_instance() {
    let conn = setup();
    assert!(!utils::is_completed(&conn, 1, 2025, Some(1)).unwrap());
    utils::mark_completed(&conn, 1, 2025, Some(1)).unwrap();
    assert!(utils::is_completed(&conn, 1, 2025, Some(1)).unwrap());
    // Marking twice is a no-op, not an error.
    utils::mark_completed(&conn, 1, 2025, Some(1)).unwrap();
    // Other instances are untouched.
    assert!(!utils::is_completed(&conn, 1, 2025, Some(2)).unwrap());
    assert!(!utils::is_completed(&conn, 1, 2024, Some(1)).unwrap());

    utils::clear_completed(&conn, 1, 2025, Some(1)).unwrap();
    assert!(!utils::is_completed(&conn, 1, 2025, Some(1)).unwrap());
}

#[test]
fn cycleless_benefits_share_the_zero_slot() {
    let conn = setup();
    conn.execute(
        "INSERT INTO benefits(card_id, title, cycle_type, end_month, end_day)
         VALUES(1, 'Signup bonus', 'ONE_TIME', 9, 30)",
        [],
    )
    .unwrap();
    utils::mark_completed(&conn, 2, 2025, None).unwrap();
    assert!(utils::is_completed(&conn, 2, 2025, None).unwrap());
    utils::log_reminder(&conn, 2, 2025, None).unwrap();
    assert!(utils::reminder_logged(&conn, 2, 2025, None).unwrap());
    // The same instance logged again stays a single row.
    utils::log_reminder(&conn, 2, 2025, None).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM notification_log WHERE benefit_id=2", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(count, 1);
}
