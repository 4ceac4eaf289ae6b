// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

const KIND_HELP: &str = "Rule collection: monthly|weekly|onetime";

fn budget_source(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("config")
            .long("config")
            .short('c')
            .help("Budget record JSON file")
            .conflicts_with("profile"),
    )
    .arg(
        Arg::new("profile")
            .long("profile")
            .short('p')
            .help("Saved budget profile name"),
    )
    .arg(
        Arg::new("seed")
            .long("seed")
            .allow_hyphen_values(true)
            .help("Override the starting balance"),
    )
    .arg(
        Arg::new("start")
            .long("start")
            .help("Override the start date (YYYY-MM-DD)"),
    )
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
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .default_value("csv")
        .help("csv|json")
}

pub fn build_cli() -> Command {
    Command::new("flowcast")
        .version(crate_version!())
        .about("Project a checking balance through the end of the year")
        .subcommand(Command::new("init").about("Create the data directory and database"))
        .subcommand(
            Command::new("budget")
                .about("Create and inspect budget records")
                .subcommand(
                    Command::new("new")
                        .about("Write a starter budget record")
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(
                            Arg::new("seed")
                                .long("seed")
                                .allow_hyphen_values(true)
                                .default_value("3500"),
                        )
                        .arg(Arg::new("start").long("start").help("YYYY-MM-DD, default today")),
                )
                .subcommand(json_flags(budget_source(
                    Command::new("show").about("List the rules of a budget"),
                ))),
        )
        .subcommand(json_flags(budget_source(
            Command::new("forecast")
                .about("Forecast the running balance through December 31")
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize))
                        .help("Show only the first N rows"),
                )
                .arg(
                    Arg::new("no_cache")
                        .long("no-cache")
                        .action(ArgAction::SetTrue)
                        .help("Recompute even if a cached forecast exists"),
                ),
        )))
        .subcommand(
            Command::new("report")
                .about("Summaries derived from a forecast")
                .subcommand(json_flags(budget_source(
                    Command::new("cashflow").about("Income, expense and closing balance per month"),
                )))
                .subcommand(json_flags(budget_source(
                    Command::new("spend-by-category").about("Bill totals per category"),
                ))),
        )
        .subcommand(
            Command::new("import").about("Import rule rows").subcommand(
                Command::new("rows")
                    .about("Replace one collection of a budget file from CSV or JSON rows")
                    .arg(Arg::new("kind").long("kind").required(true).help(KIND_HELP))
                    .arg(Arg::new("path").long("path").required(true))
                    .arg(
                        Arg::new("config")
                            .long("config")
                            .short('c')
                            .required(true)
                            .help("Budget record JSON file to update"),
                    ),
            ),
        )
        .subcommand(
            Command::new("export")
                .about("Export rule rows or forecasts")
                .subcommand(
                    Command::new("rows")
                        .about("Write one collection of a budget file")
                        .arg(Arg::new("kind").long("kind").required(true).help(KIND_HELP))
                        .arg(
                            Arg::new("config")
                                .long("config")
                                .short('c')
                                .required(true),
                        )
                        .arg(format_arg())
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    budget_source(Command::new("forecast").about("Write forecast rows"))
                        .arg(format_arg())
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("profile")
                .about("Named budgets stored in the database")
                .subcommand(
                    Command::new("save")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("config")
                                .long("config")
                                .short('c')
                                .required(true),
                        ),
                )
                .subcommand(
                    Command::new("load")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("config")
                .about("Display settings")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(Command::new("get").arg(Arg::new("key").required(true))),
        )
        .subcommand(
            Command::new("cache")
                .about("Forecast cache")
                .subcommand(Command::new("clear")),
        )
        .subcommand(budget_source(
            Command::new("doctor").about("Report rows that will be clamped, defaulted or skipped"),
        ))
}
