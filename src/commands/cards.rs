// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_card, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", _)) => list(conn)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let issuer = sub.get_one::<String>("issuer");
    let fee = sub
        .get_one::<String>("annual-fee")
        .map(|s| parse_decimal(s))
        .transpose()?;
    conn.execute(
        "INSERT INTO cards(name, issuer, annual_fee) VALUES (?1,?2,?3)",
        params![name, issuer, fee.map(|d| d.to_string())],
    )?;
    println!("Added card '{}'", name);
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT c.name, c.issuer, c.annual_fee,
                (SELECT COUNT(*) FROM benefits b WHERE b.card_id=c.id AND b.is_active=1)
         FROM cards c ORDER BY c.name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, i64>(3)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (name, issuer, fee, benefits) = row?;
        data.push(vec![
            name,
            issuer.unwrap_or_default(),
            fee.unwrap_or_default(),
            benefits.to_string(),
        ]);
    }
    println!(
        "{}",
        pretty_table(&["Card", "Issuer", "Annual fee", "Benefits"], data)
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let id = id_for_card(conn, name)?;
    conn.execute("DELETE FROM cards WHERE id=?1", params![id])?;
    println!("Removed card '{}'", name);
    Ok(())
}
