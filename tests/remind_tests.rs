// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use perkclip::commands::remind::due_reminders;
use perkclip::{db, utils};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO cards(name) VALUES('Sapphire')", [])
        .unwrap();
    // Monthly benefit with a 7-day lead: March window opens on the 24th.
    conn.execute(
        "INSERT INTO benefits(card_id, title, cycle_type, reminder_days)
         VALUES(1, 'Travel credit', 'MONTHLY', 7)",
        [],
    )
    .unwrap();
    conn
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn fires_inside_the_window_with_cycle_identity() {
    let conn = setup();
    assert!(due_reminders(&conn, d(2025, 3, 23)).unwrap().is_empty());

    let due = due_reminders(&conn, d(2025, 3, 24)).unwrap();
    assert_eq!(due.len(), 1);
    let r = &due[0];
    assert_eq!(r.benefit_id, 1);
    assert_eq!(r.card, "Sapphire");
    assert_eq!((r.year, r.cycle_number), (2025, Some(3)));
    assert_eq!(r.period_end.date(), d(2025, 3, 31));
    assert_eq!(r.days_remaining, 7);
}

#[test]
fn logging_suppresses_the_same_cycle_instance() {
    let conn = setup();
    let due = due_reminders(&conn, d(2025, 3, 28)).unwrap();
    assert_eq!(due.len(), 1);
    utils::log_reminder(&conn, due[0].benefit_id, due[0].year, due[0].cycle_number).unwrap();

    // Every later day of the same cycle stays quiet.
    assert!(due_reminders(&conn, d(2025, 3, 29)).unwrap().is_empty());
    assert!(due_reminders(&conn, d(2025, 3, 31)).unwrap().is_empty());

    // The next cycle is a fresh instance.
    let next = due_reminders(&conn, d(2025, 4, 28)).unwrap();
    assert_eq!(next.len(), 1);
    assert_eq!(next[0].cycle_number, Some(4));
}

#[test]
fn completed_cycles_are_not_reminded() {
    let conn = setup();
    utils::mark_completed(&conn, 1, 2025, Some(3)).unwrap();
    assert!(due_reminders(&conn, d(2025, 3, 28)).unwrap().is_empty());
}

#[test]
fn muted_benefits_are_skipped() {
    let conn = setup();
    conn.execute("UPDATE benefits SET notifiable=0 WHERE id=1", [])
        .unwrap();
    assert!(due_reminders(&conn, d(2025, 3, 28)).unwrap().is_empty());
}

#[test]
fn benefits_without_a_deadline_never_fire() {
    let conn = setup();
    conn.execute(
        "INSERT INTO benefits(card_id, title, cycle_type) VALUES(1, 'Lounge pass', 'ONE_TIME')",
        [],
    )
    .unwrap();
    let due = due_reminders(&conn, d(2025, 3, 28)).unwrap();
    // Only the monthly benefit fires; the dateless one-time benefit cannot.
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].benefit_id, 1);
}

#[test]
fn one_time_benefit_with_end_date_fires_once() {
    let conn = setup();
    conn.execute(
        "INSERT INTO benefits(card_id, title, cycle_type, end_month, end_day, reminder_days)
         VALUES(1, 'Signup bonus', 'ONE_TIME', 9, 30, 14)",
        [],
    )
    .unwrap();
    let due = due_reminders(&conn, d(2025, 9, 20)).unwrap();
    let bonus: Vec<_> = due.iter().filter(|r| r.benefit_id == 2).collect();
    assert_eq!(bonus.len(), 1);
    assert_eq!(bonus[0].cycle_number, None);
    assert_eq!(bonus[0].period_end.date(), d(2025, 9, 30));

    utils::log_reminder(&conn, 2, 2025, None).unwrap();
    let again = due_reminders(&conn, d(2025, 9, 25)).unwrap();
    assert!(again.iter().all(|r| r.benefit_id != 2));
}
