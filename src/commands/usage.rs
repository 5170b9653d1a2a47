// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{
    fmt_amount, load_benefit, parse_date, parse_decimal, pretty_table, today, used_in_cycle,
};
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let benefit_id = *sub.get_one::<i64>("benefit").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let used_at = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    let note = sub.get_one::<String>("note");

    let benefit = load_benefit(conn, benefit_id)?;
    // Usage belongs to the cycle instance containing the usage date.
    let instance = benefit.rule().cycle_instance(used_at);

    conn.execute(
        "INSERT INTO usages(benefit_id, year, cycle_number, amount, used_at, note)
         VALUES (?1,?2,?3,?4,?5,?6)",
        params![
            benefit_id,
            instance.year,
            instance.cycle_number,
            amount.to_string(),
            used_at,
            note,
        ],
    )?;

    let used = used_in_cycle(conn, benefit_id, instance.year, instance.cycle_number)?;
    println!(
        "{}",
        usage_line(&benefit.title, &amount, &used, benefit.cap_amount.as_ref())
    );
    Ok(())
}

fn usage_line(
    title: &str,
    amount: &rust_decimal::Decimal,
    used: &rust_decimal::Decimal,
    cap: Option<&rust_decimal::Decimal>,
) -> String {
    match cap {
        Some(cap) if used > cap => format!(
            "Logged {} for '{}' (over cap: {} of {} used this cycle)",
            fmt_amount(amount),
            title,
            fmt_amount(used),
            fmt_amount(cap)
        ),
        Some(cap) => format!(
            "Logged {} for '{}' ({} of {} used this cycle)",
            fmt_amount(amount),
            title,
            fmt_amount(used),
            fmt_amount(cap)
        ),
        None => format!(
            "Logged {} for '{}' ({} used this cycle)",
            fmt_amount(amount),
            title,
            fmt_amount(used)
        ),
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let benefit_id = *sub.get_one::<i64>("benefit").unwrap();
    let benefit = load_benefit(conn, benefit_id)?;

    let mut stmt = conn.prepare(
        "SELECT used_at, year, cycle_number, amount, note FROM usages
         WHERE benefit_id=?1 ORDER BY used_at, id",
    )?;
    let rows = stmt.query_map(params![benefit_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, i32>(1)?,
            r.get::<_, Option<u32>>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, Option<String>>(4)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (used_at, year, cycle_number, amount, note) = row?;
        let cycle = match cycle_number {
            Some(n) => format!("{}-{}", year, n),
            None => year.to_string(),
        };
        data.push(vec![used_at, cycle, amount, note.unwrap_or_default()]);
    }
    println!("Usage for '{}':", benefit.title);
    println!(
        "{}",
        pretty_table(&["Date", "Cycle", "Amount", "Note"], data)
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::usage_line;
    use rust_decimal::Decimal;

    #[test]
    fn summary_line_covers_cap_states() {
        let amount = Decimal::from(10);
        assert_eq!(
            usage_line("Dining credit", &amount, &Decimal::from(35), Some(&Decimal::from(50))),
            "Logged 10.00 for 'Dining credit' (35.00 of 50.00 used this cycle)"
        );
        assert_eq!(
            usage_line("Dining credit", &amount, &Decimal::from(60), Some(&Decimal::from(50))),
            "Logged 10.00 for 'Dining credit' (over cap: 60.00 of 50.00 used this cycle)"
        );
        assert_eq!(
            usage_line("Lounge pass", &amount, &Decimal::from(10), None),
            "Logged 10.00 for 'Lounge pass' (10.00 used this cycle)"
        );
    }
}
