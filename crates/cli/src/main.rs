//! Backtrack CLI: query and administer a Backtrack data directory.
//!
//! - `backtrack history [OBJECT]`: chain of custody (interactive pick if omitted)
//! - `backtrack objects`: objects with a recorded history
//! - `backtrack person <ID>` / `backtrack people`: per-person activity
//! - `backtrack reset`: forget identities, truncate the log
//! - `backtrack blacklist ...` / `backtrack requests ...`: administration

mod commands;
mod format;
mod parse;
mod prompt;

use std::io::IsTerminal;
use std::path::Path;
use std::process;

use anyhow::{bail, Context, Result};
use backtrack::{Backtrack, Config};
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{
    format_blacklist, format_history, format_objects, format_people, format_person,
    format_request, format_requests, OutputMode,
};
use parse::{matches_to_action, Action};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = build_cli().get_matches();
    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    if let Err(e) = run(&matches, mode) {
        eprintln!("(error) {:#}", e);
        process::exit(1);
    }
}

fn run(matches: &clap::ArgMatches, mode: OutputMode) -> Result<()> {
    let action = matches_to_action(matches).map_err(anyhow::Error::msg)?;

    let mut config = Config::load(matches.get_one::<String>("config").map(Path::new))
        .context("failed to load configuration")?;
    if let Some(dir) = matches.get_one::<String>("data-dir") {
        config.storage.data_dir = dir.into();
    }
    let data_dir = config.storage.data_dir.clone();
    let bt = Backtrack::from_config(config)
        .with_context(|| format!("failed to open {}", data_dir.display()))?;

    execute(&bt, action, mode)
}

fn execute(bt: &Backtrack, action: Action, mode: OutputMode) -> Result<()> {
    match action {
        Action::History { object, wait } => {
            let object = match object {
                Some(object) => object,
                None => {
                    let tracked = bt.objects.tracked();
                    if tracked.is_empty() {
                        println!("No tracked objects found in the log file.");
                        println!("Run the tracker first to generate some tracking data.");
                        return Ok(());
                    }
                    if !std::io::stdin().is_terminal() {
                        bail!("no object given and stdin is not a terminal");
                    }
                    match prompt::pick_object(&tracked)? {
                        Some(object) => object,
                        None => return Ok(()),
                    }
                }
            };
            let history = match wait {
                Some(budget) => bt.objects.find_history_within(&object, budget)?,
                None => bt.objects.history(&object),
            };
            match history {
                Some(history) => println!("{}", format_history(&history, mode)),
                None => println!("No history found for {}", object),
            }
        }
        Action::Objects => println!("{}", format_objects(&bt.objects.tracked(), mode)),
        Action::Person { id } => match bt.objects.by_person(&id) {
            Some(activity) => println!("{}", format_person(&activity, mode)),
            None => println!("No records found for {}", id),
        },
        Action::People => println!("{}", format_people(&bt.objects.people(), mode)),
        Action::Reset { confirmed } => {
            if !confirmed {
                if !std::io::stdin().is_terminal() {
                    bail!("refusing to reset without --yes");
                }
                if !prompt::confirm("Clear all identities and the transition log?")? {
                    return Ok(());
                }
            }
            bt.reset()?;
            println!("Reset complete. All tracking data has been cleared.");
        }
        Action::BlacklistList => println!("{}", format_blacklist(&bt.blacklist.list(), mode)),
        Action::BlacklistRemove { id } => {
            let removed = bt.blacklist.remove(&id)?;
            println!("Removed {} ({})", removed.id, removed.name);
        }
        Action::RequestsList { status } => {
            let requests = match status {
                Some(status) => bt.requests.list_by_status(status),
                None => bt.requests.list(),
            };
            println!("{}", format_requests(&requests, mode));
        }
        Action::RequestsCreate {
            person,
            object,
            image,
        } => {
            let request = bt.requests.create(&person, &object, &image)?;
            println!("{}", format_request(&request, mode));
        }
        Action::RequestsApprove { id } => {
            let request = bt.requests.approve(&id)?;
            println!("{}", format_request(&request, mode));
        }
        Action::RequestsReject { id } => {
            let request = bt.requests.reject(&id)?;
            println!("{}", format_request(&request, mode));
        }
    }
    Ok(())
}
