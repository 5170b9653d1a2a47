// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use perkclip::commands::benefits::benefit_rows;
use perkclip::db;
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO cards(name) VALUES('Gold')", [])
        .unwrap();
    conn.execute("INSERT INTO cards(name) VALUES('Sapphire')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO benefits(card_id, title, cycle_type, cap_amount) VALUES(1, 'Uber cash', 'MONTHLY', '15')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO benefits(card_id, title, cycle_type) VALUES(2, 'Lounge pass', 'ONE_TIME')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO usages(benefit_id, year, cycle_number, amount, used_at)
         VALUES(1, 2025, 8, '10', '2025-08-05')",
        [],
    )
    .unwrap();
    conn
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn listing_serializes_keyed_objects_like_upcoming() {
    let conn = setup();
    let rows = benefit_rows(&conn, None, d(2025, 8, 20)).unwrap();
    let json = serde_json::to_value(&rows).unwrap();
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);

    // Same field names the upcoming listing emits.
    let monthly = &items[0];
    assert_eq!(monthly["benefit_id"], 1);
    assert_eq!(monthly["card"], "Gold");
    assert_eq!(monthly["title"], "Uber cash");
    assert_eq!(monthly["cycle"], "Monthly");
    assert_eq!(monthly["period_end"], "2025-08-31");
    assert_eq!(monthly["days_remaining"], 11);
    assert_eq!(monthly["used"], "10.00");
    assert_eq!(monthly["cap"], "15.00");
    assert_eq!(monthly["completed"], false);

    // No deadline stays a null, not a placeholder string.
    let one_time = &items[1];
    assert_eq!(one_time["title"], "Lounge pass");
    assert!(one_time["period_end"].is_null());
    assert!(one_time["days_remaining"].is_null());
    assert!(one_time["cap"].is_null());
}

#[test]
fn listing_filters_by_card() {
    let conn = setup();
    let rows = benefit_rows(&conn, Some("Sapphire"), d(2025, 8, 20)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Lounge pass");
}
