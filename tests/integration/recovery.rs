//! Recovery Tests
//!
//! Stores and the transition log reload into the same state; malformed
//! files fail open instead of silently dropping records.

use crate::*;
use std::fs;

const HEADER: &str = "timestamp,camera,event_type,details\n";

#[test]
fn test_recorded_transitions_replay_identically() {
    let dir = TempDir::new().unwrap();
    let (labels, before) = {
        let bt = Backtrack::open(dir.path()).unwrap();
        play(
            &bt,
            0,
            vec![
                Frame::person(&[0.0, 0.0], &["backpack", "laptop"]),
                Frame::empty(&["laptop"]),
                Frame::person(&[9.0, 9.0], &["laptop"]),
            ],
        );
        let labels = bt.objects.tracked();
        let before: Vec<Vec<TimelineEvent>> = labels.iter().map(|l| bt.objects.events(l)).collect();
        (labels, before)
    };

    // All four kinds were produced
    let kinds: std::collections::HashSet<EventKind> =
        before.iter().flatten().map(|e| e.kind).collect();
    assert_eq!(kinds.len(), 4);

    let bt = Backtrack::open(dir.path()).unwrap();
    let after: Vec<Vec<TimelineEvent>> = labels.iter().map(|l| bt.objects.events(l)).collect();
    assert_eq!(after, before);
    assert_eq!(bt.objects.tracked(), labels);
    assert!(bt.replayed().person_rows >= 3);
    assert_eq!(bt.identities().len(), 2);
}

#[test]
fn test_hand_written_log_is_read() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(TRACK_LOG_FILE),
        format!(
            "{}{}{}{}",
            HEADER,
            "09-03-2024 14:00:00.000000,0,person_detected,Person_001\n",
            "09-03-2024 14:00:00.100000,0,objects_with_person,\"Person_001: backpack, laptop\"\n",
            "09-03-2024 14:00:05.000000,1,objects_abandoned,laptop\n",
        ),
    )
    .unwrap();

    let bt = Backtrack::open(dir.path()).unwrap();
    let laptop = bt.objects.history("laptop").unwrap();
    assert_eq!(laptop.current_status, EventKind::Abandoned);
    assert_eq!(laptop.current_camera, CameraId(1));
    assert_eq!(laptop.last_person.unwrap().as_str(), "Person_001");
    assert_eq!(
        bt.objects.history("backpack").unwrap().current_status,
        EventKind::PickedUp
    );
    assert_eq!(bt.replayed().rows_read, 3);
}

#[test]
fn test_malformed_stores_fail_open() {
    for file in [EMBEDDINGS_FILE, BLACKLIST_FILE, REQUESTS_FILE] {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(file), "[{\"id\": \"Person_001\", \"embed").unwrap();
        let err = Backtrack::open(dir.path()).err().unwrap();
        assert!(err.is_corruption(), "{}: {}", file, err);
    }
}

#[test]
fn test_malformed_log_row() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(TRACK_LOG_FILE),
        format!(
            "{}{}{}",
            HEADER,
            "09-03-2024 14:00:00.000000,0,objects_abandoned,cup\n",
            "yesterday,0,objects_abandoned,book\n",
        ),
    )
    .unwrap();

    let err = Backtrack::open(dir.path()).err().unwrap();
    assert!(err.is_corruption());

    let bt = Backtrack::builder()
        .path(dir.path())
        .replay_options(ReplayOptions::permissive())
        .open()
        .unwrap();
    assert_eq!(bt.replayed().corrupt_rows_skipped, 1);
    assert!(bt.objects.history("cup").is_some());
    assert!(bt.objects.history("book").is_none());
}

#[test]
fn test_reset_truncates_log_and_identities() {
    let dir = TempDir::new().unwrap();
    {
        let bt = Backtrack::open(dir.path()).unwrap();
        play(&bt, 0, vec![Frame::person(&[1.0], &["bottle"]), Frame::empty(&[])]);
        bt.blacklist.add("Mallory", &[7.0]).unwrap();
        assert!(bt.objects.history("bottle").is_some());
        bt.reset().unwrap();
        assert!(bt.objects.tracked().is_empty());
    }

    assert_eq!(
        fs::read_to_string(dir.path().join(TRACK_LOG_FILE)).unwrap(),
        HEADER
    );
    assert_eq!(
        fs::read_to_string(dir.path().join(EMBEDDINGS_FILE)).unwrap().trim(),
        "[]"
    );

    let bt = Backtrack::open(dir.path()).unwrap();
    assert!(bt.objects.tracked().is_empty());
    assert!(bt.identities().is_empty());
    assert_eq!(bt.blacklist.list().len(), 1);
}

#[test]
fn test_strict_mode_round_trip() {
    let dir = TempDir::new().unwrap();
    {
        let bt = Backtrack::builder().path(dir.path()).strict().open().unwrap();
        bt.objects
            .append(event("clock", EventKind::Abandoned, None, 3, 0))
            .unwrap();
    }
    let bt = Backtrack::builder().path(dir.path()).strict().open().unwrap();
    assert_eq!(bt.durability_mode(), DurabilityMode::Strict);
    assert_eq!(
        bt.objects.events("clock"),
        vec![event("clock", EventKind::Abandoned, None, 3, 0)]
    );
}
