// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON document per line"),
    ]
}

fn date_arg(help: &'static str) -> Arg {
    Arg::new("date").long("date").value_name("YYYY-MM-DD").help(help)
}

fn name_arg() -> Arg {
    Arg::new("name").long("name").required(true)
}

pub fn build_cli() -> Command {
    Command::new("ledgerpulse")
        .version(crate_version!())
        .about("Habit streaks, monthly budgeting, and financial risk insights")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging on stderr"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("tx")
                .about("Record and inspect income and expenses")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["expense", "income"])
                                .default_value("expense"),
                        )
                        .arg(Arg::new("desc").long("desc").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(date_arg("Defaults to today in the reporting zone"))
                        .arg(Arg::new("category").long("category")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("month").long("month").value_name("YYYY-MM"))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["expense", "income"]),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true)))
                .subcommand(
                    Command::new("summary")
                        .about("Today's spend and this month's income, expense and net")
                        .arg(date_arg("Summarise as of this day"))
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly spending budget")
                .subcommand(
                    Command::new("set").arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(Command::new("clear"))
                .subcommand(
                    Command::new("status")
                        .arg(date_arg("Report the month containing this day"))
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("habit")
                .about("Daily habits and streaks")
                .subcommand(Command::new("add").arg(name_arg()))
                .subcommand(
                    Command::new("done")
                        .arg(name_arg())
                        .arg(date_arg("Completion day, defaults to today")),
                )
                .subcommand(Command::new("reset").arg(name_arg()))
                .subcommand(Command::new("rm").arg(name_arg()))
                .subcommand(
                    Command::new("list")
                        .arg(date_arg("Mark habits completed on this day"))
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("calendar")
                .about("Per-day habits, spend and income")
                .subcommand(
                    Command::new("month")
                        .arg(Arg::new("month").long("month").value_name("YYYY-MM"))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("day")
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .required(true),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("insights")
                .about("Burn rate, risk score and spending patterns")
                .arg(date_arg("Evaluate as of this day"))
                .args(json_args()),
        )
        .subcommand(
            Command::new("rules")
                .about("Regex rules that assign categories to new transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("pattern").long("pattern").required(true))
                        .arg(Arg::new("category").long("category").required(true)),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true))),
        )
        .subcommand(
            Command::new("export")
                .about("Export the ledger")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Reporting zone and engine thresholds")
                .subcommand(Command::new("show").args(json_args()))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").long("key").required(true))
                        .arg(
                            Arg::new("value")
                                .long("value")
                                .required(true)
                                .allow_hyphen_values(true),
                        ),
                )
                .subcommand(
                    Command::new("reset").arg(Arg::new("key").long("key").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Scan the ledger for bad entries"))
}
