// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Perkclip", "perkclip"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("perkclip.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS cards(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        issuer TEXT,
        annual_fee TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS benefits(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        card_id INTEGER NOT NULL,
        title TEXT NOT NULL,
        cycle_type TEXT NOT NULL,
        is_personal_cycle INTEGER NOT NULL DEFAULT 0,
        custom_start_date TEXT,
        end_month INTEGER,
        end_day INTEGER,
        cap_amount TEXT,
        reminder_days INTEGER NOT NULL DEFAULT 7,
        notifiable INTEGER NOT NULL DEFAULT 1,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(card_id, title),
        FOREIGN KEY(card_id) REFERENCES cards(id) ON DELETE CASCADE
    );

    -- Usage is attributed to the cycle instance containing used_at.
    CREATE TABLE IF NOT EXISTS usages(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        benefit_id INTEGER NOT NULL,
        year INTEGER NOT NULL,
        cycle_number INTEGER,
        amount TEXT NOT NULL,
        used_at TEXT NOT NULL,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(benefit_id) REFERENCES benefits(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_usages_cycle ON usages(benefit_id, year, cycle_number);

    -- Per-cycle completion marks. cycle_number is 0 for cycle-less benefits
    -- so the UNIQUE key cannot be defeated by NULL-distinct semantics.
    CREATE TABLE IF NOT EXISTS completions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        benefit_id INTEGER NOT NULL,
        year INTEGER NOT NULL,
        cycle_number INTEGER NOT NULL DEFAULT 0,
        completed_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(benefit_id, year, cycle_number),
        FOREIGN KEY(benefit_id) REFERENCES benefits(id) ON DELETE CASCADE
    );

    -- Idempotency log for the reminder job: one row per notified cycle
    -- instance, keyed (benefit_id, year, cycle_number).
    CREATE TABLE IF NOT EXISTS notification_log(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        benefit_id INTEGER NOT NULL,
        year INTEGER NOT NULL,
        cycle_number INTEGER NOT NULL DEFAULT 0,
        sent_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(benefit_id, year, cycle_number),
        FOREIGN KEY(benefit_id) REFERENCES benefits(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}
