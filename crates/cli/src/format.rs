//! Output formatting for the CLI.

use backtrack::{
    BacktrackRequest, BlacklistRecord, ObjectHistory, PersonActivity, HISTORY_TIMESTAMP_FORMAT,
};
use serde::Serialize;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

fn json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("(error) {}", e))
}

pub fn format_history(history: &ObjectHistory, mode: OutputMode) -> String {
    if mode == OutputMode::Json {
        return json(history);
    }
    let mut out = format!("History for {}:\n", history.object);
    out.push_str(&format!("Current status: {}\n", history.current_status));
    out.push_str(&format!("Current camera: Camera {}\n", history.current_camera));
    if let Some(person) = &history.last_person {
        out.push_str(&format!("Last person: {}\n", person));
    }
    out.push_str("\nTimeline:");
    for line in &history.timeline {
        out.push_str("\n  ");
        out.push_str(line);
    }
    out
}

pub fn format_objects(objects: &[String], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json(objects),
        OutputMode::Human if objects.is_empty() => "(no tracked objects)".to_string(),
        OutputMode::Human => objects
            .iter()
            .enumerate()
            .map(|(i, o)| format!("{}. {}", i + 1, o))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_person(activity: &PersonActivity, mode: OutputMode) -> String {
    if mode == OutputMode::Json {
        return json(activity);
    }
    let mut out = format!("Activity for {}:\n", activity.person);
    out.push_str(&format!("Objects: {}\n", join(&activity.objects)));
    out.push_str(&format!("Cameras: {}\n", join(&activity.cameras)));
    out.push_str(&format!(
        "Last seen: {} on camera {}\n",
        activity.last_seen.format(HISTORY_TIMESTAMP_FORMAT),
        activity.last_camera
    ));
    out.push_str("\nTimeline:");
    for line in &activity.timeline {
        out.push_str("\n  ");
        out.push_str(line);
    }
    out
}

pub fn format_people(people: &[PersonActivity], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json(people),
        OutputMode::Human if people.is_empty() => "(no people in the timeline)".to_string(),
        OutputMode::Human => people
            .iter()
            .map(|a| {
                format!(
                    "{}\n  Cameras: {}\n  Objects: {}",
                    a.person,
                    join(&a.cameras),
                    join(&a.objects)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn format_blacklist(records: &[BlacklistRecord], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json(records),
        OutputMode::Human if records.is_empty() => "(blacklist is empty)".to_string(),
        OutputMode::Human => records
            .iter()
            .map(|r| {
                format!(
                    "{}  {}  (added {})",
                    r.id,
                    r.name,
                    r.blacklisted_at.format(HISTORY_TIMESTAMP_FORMAT)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn format_request(request: &BacktrackRequest, mode: OutputMode) -> String {
    if mode == OutputMode::Json {
        return json(request);
    }
    let mut out = format!(
        "{}  [{}]  {} lost {}",
        request.id, request.status, request.person_id, request.object_name
    );
    if !request.image_path.is_empty() {
        out.push_str(&format!("  (image: {})", request.image_path));
    }
    match &request.result {
        Some(serde_json::Value::String(message)) => {
            out.push_str("\n  ");
            out.push_str(message);
        }
        Some(value) => {
            if let Ok(history) = serde_json::from_value::<ObjectHistory>(value.clone()) {
                for line in format_history(&history, OutputMode::Human).lines() {
                    out.push_str("\n  ");
                    out.push_str(line);
                }
            }
        }
        None => {}
    }
    out
}

pub fn format_requests(requests: &[BacktrackRequest], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json(requests),
        OutputMode::Human if requests.is_empty() => "(no requests)".to_string(),
        OutputMode::Human => requests
            .iter()
            .map(|r| format_request(r, mode))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
