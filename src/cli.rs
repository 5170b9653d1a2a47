// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{crate_version, Arg, ArgAction, Command};

fn date_arg() -> Arg {
    // Reference date override; defaults to today at the handler.
    Arg::new("date")
        .long("date")
        .value_name("YYYY-MM-DD")
        .help("Reference date (defaults to today)")
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("perkclip")
        .version(crate_version!())
        .about("Track credit-card benefit cycles, log capped usage, and catch expiring perks")
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("card")
                .about("Manage cards")
                .subcommand(
                    Command::new("add")
                        .about("Add a card")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("issuer").long("issuer").value_name("NAME"))
                        .arg(
                            Arg::new("annual-fee")
                                .long("annual-fee")
                                .value_name("AMOUNT"),
                        ),
                )
                .subcommand(Command::new("list").about("List cards"))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a card and its benefits")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("benefit")
                .about("Manage benefits")
                .subcommand(
                    Command::new("add")
                        .about("Add a benefit to a card")
                        .arg(Arg::new("title").required(true))
                        .arg(
                            Arg::new("card")
                                .long("card")
                                .value_name("NAME")
                                .required(true),
                        )
                        .arg(
                            Arg::new("cycle")
                                .long("cycle")
                                .value_name("TYPE")
                                .required(true)
                                .help("MONTHLY, QUARTERLY, SEMI_ANNUALLY, YEARLY or ONE_TIME"),
                        )
                        .arg(
                            Arg::new("personal")
                                .long("personal")
                                .action(ArgAction::SetTrue)
                                .help("Anchor cycles to --start-date instead of the calendar"),
                        )
                        .arg(
                            Arg::new("start-date")
                                .long("start-date")
                                .value_name("YYYY-MM-DD"),
                        )
                        .arg(
                            Arg::new("end-month")
                                .long("end-month")
                                .value_name("1-12")
                                .value_parser(clap::value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("end-day")
                                .long("end-day")
                                .value_name("1-31")
                                .value_parser(clap::value_parser!(u32)),
                        )
                        .arg(
                            Arg::new("cap")
                                .long("cap")
                                .value_name("AMOUNT")
                                .help("Reimbursement cap per cycle"),
                        )
                        .arg(
                            Arg::new("reminder-days")
                                .long("reminder-days")
                                .value_name("DAYS")
                                .value_parser(clap::value_parser!(u32).range(0..=365))
                                .default_value("7")
                                .help("Lead time in days, at most 365"),
                        )
                        .arg(
                            Arg::new("no-notify")
                                .long("no-notify")
                                .action(ArgAction::SetTrue)
                                .help("Never remind for this benefit"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List benefits with their current cycle")
                        .arg(Arg::new("card").long("card").value_name("NAME"))
                        .arg(date_arg()),
                ))
                .subcommand(
                    Command::new("complete")
                        .about("Mark the current cycle as used up")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(date_arg()),
                )
                .subcommand(
                    Command::new("uncomplete")
                        .about("Clear the current cycle's completion mark")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(date_arg()),
                )
                .subcommand(
                    Command::new("notify")
                        .about("Turn reminders on or off for a benefit")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("state")
                                .required(true)
                                .value_parser(["on", "off"]),
                        ),
                )
                .subcommand(
                    Command::new("rm").about("Remove a benefit").arg(
                        Arg::new("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("usage")
                .about("Log usage toward capped benefits")
                .subcommand(
                    Command::new("add")
                        .about("Log a usage amount")
                        .arg(
                            Arg::new("benefit")
                                .long("benefit")
                                .value_name("ID")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .value_name("AMOUNT")
                                .required(true),
                        )
                        .arg(date_arg())
                        .arg(Arg::new("note").long("note").value_name("TEXT")),
                )
                .subcommand(
                    Command::new("list")
                        .about("List logged usage for a benefit")
                        .arg(
                            Arg::new("benefit")
                                .long("benefit")
                                .value_name("ID")
                                .required(true)
                                .value_parser(clap::value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(json_flags(
            Command::new("upcoming")
                .about("Benefits expiring within the next N days")
                .arg(
                    Arg::new("days")
                        .long("days")
                        .value_name("DAYS")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("30"),
                )
                .arg(date_arg()),
        ))
        .subcommand(
            Command::new("remind")
                .about("Print due reminders, once per cycle instance")
                .arg(date_arg())
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .action(ArgAction::SetTrue)
                        .help("Show what would fire without logging it as sent"),
                ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("benefits")
                    .about("Export benefits with their current cycle snapshot")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .value_parser(["csv", "json"])
                            .default_value("csv"),
                    )
                    .arg(
                        Arg::new("out")
                            .long("out")
                            .value_name("FILE")
                            .required(true),
                    )
                    .arg(date_arg()),
            ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for problems"))
}
