// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .value_name("NAME")
        .default_value("default")
        .help("Profile the command acts on")
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print JSON lines instead of a table"),
    )
}

pub fn build_cli() -> Command {
    Command::new("billkeep")
        .about("Personal budgets, bill reminders, and threshold alerts")
        .version(clap::crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("user")
                .about("Manage profiles")
                .subcommand(
                    Command::new("add")
                        .about("Add a profile")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("email").long("email").value_name("EMAIL")),
                )
                .subcommand(Command::new("list").about("List profiles"))
                .subcommand(
                    Command::new("set-email")
                        .about("Set the email address used for email alerts")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("email").required(true)),
                ),
        )
        .subcommand(
            Command::new("push")
                .about("Manage push notification endpoints")
                .subcommand(
                    Command::new("add")
                        .about("Register a push endpoint")
                        .arg(user_arg())
                        .arg(Arg::new("label").required(true))
                        .arg(Arg::new("url").required(true)),
                )
                .subcommand(Command::new("list").about("List push endpoints").arg(user_arg()))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a push endpoint")
                        .arg(user_arg())
                        .arg(Arg::new("label").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage spending categories")
                .subcommand(
                    Command::new("add")
                        .about("Add a category")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(Command::new("list").about("List categories"))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a category")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction (negative amount = expense)")
                        .arg(user_arg())
                        .arg(Arg::new("date").long("date").required(true).value_name("YYYY-MM-DD"))
                        .arg(Arg::new("amount").long("amount").required(true).allow_hyphen_values(true))
                        .arg(Arg::new("payee").long("payee").required(true))
                        .arg(Arg::new("category").long("category").value_name("NAME"))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(user_arg())
                        .arg(Arg::new("month").long("month").value_name("YYYY-MM"))
                        .arg(Arg::new("category").long("category").value_name("NAME"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage budgets and spending thresholds")
                .subcommand(
                    Command::new("set")
                        .about("Create or update a budget window")
                        .arg(user_arg())
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .required(true)
                                .value_name("weekly|monthly|quarterly|yearly"),
                        )
                        .arg(Arg::new("from").long("from").required(true).value_name("YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").required(true).value_name("YYYY-MM-DD"))
                        .arg(
                            Arg::new("threshold")
                                .long("threshold")
                                .value_name("PCT")
                                .help("Alert threshold percent, 1-100 (default 80)"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List budgets").arg(user_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("status")
                        .about("Spend, remaining, and alert state per budget")
                        .arg(user_arg())
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD")),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a budget")
                        .arg(user_arg())
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("bill")
                .about("Manage bill obligations")
                .subcommand(
                    Command::new("add")
                        .about("Add a bill")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .value_name("housing|utilities|insurance|subscription|loan|other"),
                        )
                        .arg(Arg::new("due").long("due").required(true).value_name("YYYY-MM-DD"))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .default_value("once")
                                .value_name("once|weekly|monthly|quarterly|yearly"),
                        )
                        .arg(
                            Arg::new("reminder-days")
                                .long("reminder-days")
                                .default_value("3")
                                .value_name("DAYS"),
                        )
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List bills")
                        .arg(user_arg())
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Include paid bills"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("upcoming")
                        .about("Unpaid bills with their reminder state")
                        .arg(user_arg())
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD")),
                ))
                .subcommand(
                    Command::new("pay")
                        .about("Mark a bill paid; recurring bills spawn their next occurrence")
                        .arg(user_arg())
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Edit a bill")
                        .arg(user_arg())
                        .arg(Arg::new("id").required(true))
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("due").long("due").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("frequency").long("frequency"))
                        .arg(Arg::new("reminder-days").long("reminder-days").value_name("DAYS"))
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a bill")
                        .arg(user_arg())
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("sweep")
                .about("Reminder sweep over unpaid bills")
                .subcommand(
                    Command::new("run")
                        .about("Run one sweep now")
                        .arg(Arg::new("date").long("date").value_name("YYYY-MM-DD")),
                )
                .subcommand(
                    Command::new("watch")
                        .about("Run the sweep scheduler until interrupted")
                        .arg(
                            Arg::new("interval")
                                .long("interval")
                                .value_name("SECONDS")
                                .help("Tick cadence (default: sweep_interval_secs setting or 86400)"),
                        ),
                ),
        )
        .subcommand(
            Command::new("rules")
                .about("Payee auto-tagging rules")
                .subcommand(
                    Command::new("add")
                        .about("Add a rule")
                        .arg(Arg::new("pattern").required(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("payee_rewrite").long("rewrite")),
                )
                .subcommand(Command::new("list").about("List rules"))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a rule")
                        .arg(Arg::new("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("Engine configuration")
                .subcommand(
                    Command::new("set-relay")
                        .about("Set the email relay URL enabling the email channel")
                        .arg(Arg::new("url").required(true)),
                )
                .subcommand(
                    Command::new("set-interval")
                        .about("Set the sweep cadence in seconds")
                        .arg(Arg::new("seconds").required(true)),
                )
                .subcommand(Command::new("show").about("Show configured settings")),
        )
        .subcommand(Command::new("doctor").about("Run integrity checks"))
}
