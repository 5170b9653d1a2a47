// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use perkclip::{cli, commands, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute("INSERT INTO cards(name) VALUES('Gold')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO benefits(card_id, title, cycle_type, cap_amount) VALUES(1, 'Uber cash', 'MONTHLY', '15')",
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

#[test]
fn csv_export_snapshots_the_current_cycle() {
    let conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("benefits.csv");

    let matches = cli::build_cli().get_matches_from([
        "perkclip",
        "export",
        "benefits",
        "--format",
        "csv",
        "--out",
        out.to_str().unwrap(),
        "--date",
        "2025-08-20",
    ]);
    let (_, sub) = matches.subcommand().unwrap();
    commands::exporter::handle(&conn, sub).unwrap();

    let body = std::fs::read_to_string(&out).unwrap();
    let mut lines = body.lines();
    assert_eq!(
        lines.next().unwrap(),
        "card,benefit,cycle_type,year,cycle_number,period_end,used,cap,completed"
    );
    assert_eq!(
        lines.next().unwrap(),
        "Gold,Uber cash,MONTHLY,2025,8,2025-08-31,10,15,no"
    );
}

#[test]
fn json_export_writes_records() {
    let conn = setup();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("benefits.json");

    let matches = cli::build_cli().get_matches_from([
        "perkclip",
        "export",
        "benefits",
        "--format",
        "json",
        "--out",
        out.to_str().unwrap(),
        "--date",
        "2025-08-20",
    ]);
    let (_, sub) = matches.subcommand().unwrap();
    commands::exporter::handle(&conn, sub).unwrap();

    let body = std::fs::read_to_string(&out).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["benefit"], "Uber cash");
    assert_eq!(items[0]["period_end"], "2025-08-31");
    assert_eq!(items[0]["cycle_number"], "8");
    assert_eq!(items[0]["used"], "10");
}
