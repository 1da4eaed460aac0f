//! Clap command tree.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the `backtrack` command.
pub fn build_cli() -> Command {
    Command::new("backtrack")
        .about("Cross-camera custody tracking: object histories, blacklist and requests")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .global(true)
                .help("Config file (default: ./backtrack.toml if present)"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .short('d')
                .value_name("DIR")
                .global(true)
                .help("Data directory (overrides config and BACKTRACK_DATA_DIR)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Print JSON instead of text"),
        )
        .subcommand(
            Command::new("history")
                .about("Show an object's chain of custody (pick interactively if omitted)")
                .arg(Arg::new("object").value_name("OBJECT"))
                .arg(
                    Arg::new("wait")
                        .long("wait")
                        .value_name("SECS")
                        .value_parser(value_parser!(u64))
                        .help("Poll up to SECS seconds for the object to appear"),
                ),
        )
        .subcommand(Command::new("objects").about("List objects with a recorded history"))
        .subcommand(
            Command::new("person")
                .about("Show what a person carried and where they were last seen")
                .arg(Arg::new("id").required(true).value_name("Person_NNN")),
        )
        .subcommand(Command::new("people").about("Summarize objects and cameras per person"))
        .subcommand(
            Command::new("reset")
                .about("Forget registered identities and truncate the transition log")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .action(ArgAction::SetTrue)
                        .help("Do not ask for confirmation"),
                ),
        )
        .subcommand(
            Command::new("blacklist")
                .about("Blacklist administration")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List blacklist entries"))
                .subcommand(
                    Command::new("remove")
                        .about("Remove a blacklist entry")
                        .arg(Arg::new("id").required(true).value_name("BLACK_NNN")),
                ),
        )
        .subcommand(
            Command::new("requests")
                .about("Backtrack request workflow")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list").about("List requests").arg(
                        Arg::new("status")
                            .long("status")
                            .value_parser(["pending", "approved", "rejected", "failed"])
                            .help("Only requests in this state"),
                    ),
                )
                .subcommand(
                    Command::new("create")
                        .about("File a request for a lost object")
                        .arg(Arg::new("person").required(true).value_name("PERSON"))
                        .arg(Arg::new("object").required(true).value_name("OBJECT"))
                        .arg(
                            Arg::new("image")
                                .long("image")
                                .value_name("PATH")
                                .default_value("")
                                .help("Evidence photo"),
                        ),
                )
                .subcommand(
                    Command::new("approve")
                        .about("Approve a pending request")
                        .arg(Arg::new("id").required(true).value_name("req_N")),
                )
                .subcommand(
                    Command::new("reject")
                        .about("Reject a pending request")
                        .arg(Arg::new("id").required(true).value_name("req_N")),
                ),
        )
}
