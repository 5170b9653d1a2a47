// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use perkclip::{cli, commands, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("card", sub)) => commands::cards::handle(&conn, sub)?,
        Some(("benefit", sub)) => commands::benefits::handle(&conn, sub)?,
        Some(("usage", sub)) => commands::usage::handle(&conn, sub)?,
        Some(("upcoming", sub)) => commands::upcoming::handle(&conn, sub)?,
        Some(("remind", sub)) => commands::remind::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
