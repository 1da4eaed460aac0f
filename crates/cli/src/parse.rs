//! ArgMatches → Action conversion.

use std::time::Duration;

use backtrack::{BlacklistId, PersonId, RequestId, RequestStatus};
use clap::ArgMatches;

/// What the user asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    History {
        object: Option<String>,
        wait: Option<Duration>,
    },
    Objects,
    Person {
        id: PersonId,
    },
    People,
    Reset {
        confirmed: bool,
    },
    BlacklistList,
    BlacklistRemove {
        id: BlacklistId,
    },
    RequestsList {
        status: Option<RequestStatus>,
    },
    RequestsCreate {
        person: String,
        object: String,
        image: String,
    },
    RequestsApprove {
        id: RequestId,
    },
    RequestsReject {
        id: RequestId,
    },
}

/// Convert clap ArgMatches into an Action.
pub fn matches_to_action(matches: &ArgMatches) -> Result<Action, String> {
    let (sub_name, sub) = matches
        .subcommand()
        .ok_or_else(|| "No command provided (try --help)".to_string())?;

    match sub_name {
        "history" => Ok(Action::History {
            object: sub.get_one::<String>("object").cloned(),
            wait: sub.get_one::<u64>("wait").map(|s| Duration::from_secs(*s)),
        }),
        "objects" => Ok(Action::Objects),
        "person" => Ok(Action::Person {
            id: PersonId::from(required(sub, "id")?),
        }),
        "people" => Ok(Action::People),
        "reset" => Ok(Action::Reset {
            confirmed: sub.get_flag("yes"),
        }),
        "blacklist" => parse_blacklist(sub),
        "requests" => parse_requests(sub),
        other => Err(format!("Unknown command: {}", other)),
    }
}

fn required<'a>(m: &'a ArgMatches, name: &str) -> Result<&'a str, String> {
    m.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| format!("missing <{}>", name))
}

fn parse_blacklist(matches: &ArgMatches) -> Result<Action, String> {
    let (sub, m) = matches.subcommand().ok_or("No blacklist subcommand")?;
    match sub {
        "list" => Ok(Action::BlacklistList),
        "remove" => Ok(Action::BlacklistRemove {
            id: BlacklistId::from(required(m, "id")?),
        }),
        other => Err(format!("Unknown blacklist subcommand: {}", other)),
    }
}

fn parse_requests(matches: &ArgMatches) -> Result<Action, String> {
    let (sub, m) = matches.subcommand().ok_or("No requests subcommand")?;
    match sub {
        "list" => {
            let status = match m.get_one::<String>("status") {
                Some(s) => Some(
                    RequestStatus::parse(s).ok_or_else(|| format!("Unknown status: {}", s))?,
                ),
                None => None,
            };
            Ok(Action::RequestsList { status })
        }
        "create" => Ok(Action::RequestsCreate {
            person: required(m, "person")?.to_string(),
            object: required(m, "object")?.to_string(),
            image: m.get_one::<String>("image").cloned().unwrap_or_default(),
        }),
        "approve" => Ok(Action::RequestsApprove {
            id: RequestId::from(required(m, "id")?),
        }),
        "reject" => Ok(Action::RequestsReject {
            id: RequestId::from(required(m, "id")?),
        }),
        other => Err(format!("Unknown requests subcommand: {}", other)),
    }
}
