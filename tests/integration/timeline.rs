//! Custody Timeline Tests
//!
//! History reconstruction from appended events.

use crate::*;

#[test]
fn test_picked_up_then_removed() {
    let bt = ephemeral();
    bt.objects
        .append(event("backpack", EventKind::PickedUp, Some(1), 0, 0))
        .unwrap();
    bt.objects
        .append(event("backpack", EventKind::RemovedFromPerson, Some(1), 0, 3))
        .unwrap();

    let h = bt.objects.history("backpack").unwrap();
    assert_eq!(h.current_status, EventKind::RemovedFromPerson);
    assert_eq!(h.last_person, Some(PersonId::from_sequence(1)));
    assert_eq!(h.current_camera, CameraId(0));
    assert_eq!(h.timeline.len(), 2);
}

#[test]
fn test_last_person_survives_anonymous_events() {
    let bt = ephemeral();
    bt.objects
        .append(event("laptop", EventKind::PickedUp, Some(1), 0, 0))
        .unwrap();
    bt.objects
        .append(event("laptop", EventKind::Abandoned, None, 1, 10))
        .unwrap();
    bt.objects
        .append(event("laptop", EventKind::PickedFromAbandoned, None, 1, 20))
        .unwrap();

    let h = bt.objects.history("laptop").unwrap();
    assert_eq!(h.current_status, EventKind::PickedFromAbandoned);
    assert_eq!(h.last_person.unwrap().as_str(), "Person_001");
    assert_eq!(h.current_camera, CameraId(1));
}

#[test]
fn test_history_lines() {
    let bt = ephemeral();
    bt.objects
        .append(event("umbrella", EventKind::PickedUp, Some(3), 2, 0))
        .unwrap();
    bt.objects
        .append(event("umbrella", EventKind::Abandoned, None, 4, 65))
        .unwrap();

    let h = bt.objects.history("umbrella").unwrap();
    assert_eq!(
        h.timeline,
        vec![
            "09-03-2024 14:00:00: picked_up by Person_003 on camera 2".to_string(),
            "09-03-2024 14:01:05: abandoned on camera 4".to_string(),
        ]
    );
}

#[test]
fn test_history_is_idempotent() {
    let bt = ephemeral();
    bt.objects
        .append(event("cup", EventKind::Abandoned, None, 0, 0))
        .unwrap();
    let first = bt.objects.history("cup");
    let second = bt.objects.history("cup");
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn test_unseen_and_unknown_objects() {
    let bt = ephemeral();
    assert!(bt.objects.history("wallet").is_none());
    assert!(bt
        .objects
        .append(event("sandwich", EventKind::Abandoned, None, 0, 0))
        .unwrap_err()
        .is_input_error());
}

#[test]
fn test_events_for_one_object_stay_ordered() {
    let bt = ephemeral();
    bt.objects
        .append(event("book", EventKind::Abandoned, None, 0, 10))
        .unwrap();
    assert!(bt
        .objects
        .append(event("book", EventKind::PickedFromAbandoned, None, 0, 5))
        .is_err());
    // Another object is independent
    bt.objects
        .append(event("vase", EventKind::Abandoned, None, 0, 1))
        .unwrap();

    assert_eq!(bt.objects.events("book").len(), 1);
    assert_eq!(bt.objects.tracked(), vec!["book".to_string(), "vase".to_string()]);
}
