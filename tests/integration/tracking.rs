//! Camera Tracking Tests
//!
//! Scripted cameras driven through `Backtrack::start_camera`.

use crate::*;
use parking_lot::Mutex;

const ALICE: [f32; 3] = [0.0, 0.0, 0.0];
const BOB: [f32; 3] = [5.0, 5.0, 5.0];

#[test]
fn test_walk_off_with_object() {
    let bt = ephemeral();
    play(
        &bt,
        0,
        vec![Frame::person(&ALICE, &["backpack"]), Frame::empty(&[])],
    );

    let h = bt.objects.history("backpack").unwrap();
    assert_eq!(h.current_status, EventKind::RemovedFromPerson);
    assert_eq!(h.last_person.unwrap().as_str(), "Person_001");
    assert_eq!(h.timeline.len(), 2);
}

#[test]
fn test_leave_object_behind() {
    let bt = ephemeral();
    play(
        &bt,
        0,
        vec![
            Frame::person(&ALICE, &["laptop"]),
            Frame::empty(&["laptop"]),
            Frame::empty(&["laptop"]),
        ],
    );

    let h = bt.objects.history("laptop").unwrap();
    assert_eq!(h.current_status, EventKind::Abandoned);
    assert_eq!(h.last_person.unwrap().as_str(), "Person_001");
    // Still lying there: no new events on the third frame
    assert_eq!(bt.objects.events("laptop").len(), 3);
}

#[test]
fn test_object_changes_hands_across_cameras() {
    let bt = ephemeral();
    play(
        &bt,
        0,
        vec![Frame::person(&ALICE, &["suitcase"]), Frame::empty(&["suitcase"])],
    );
    play(
        &bt,
        1,
        vec![Frame::empty(&["suitcase"]), Frame::person(&BOB, &["suitcase"])],
    );

    let h = bt.objects.history("suitcase").unwrap();
    // Bob's pickup on camera 1 also clears it from that camera's abandoned set
    assert_eq!(h.current_status, EventKind::PickedFromAbandoned);
    assert_eq!(h.current_camera, CameraId(1));
    assert_eq!(h.last_person.unwrap().as_str(), "Person_002");
    assert_eq!(bt.identities().len(), 2);

    let kinds: Vec<(EventKind, u32)> = bt
        .objects
        .events("suitcase")
        .iter()
        .map(|e| (e.kind, e.camera.0))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (EventKind::PickedUp, 0),
            (EventKind::RemovedFromPerson, 0),
            (EventKind::Abandoned, 0),
            (EventKind::Abandoned, 1),
            (EventKind::PickedUp, 1),
            (EventKind::PickedFromAbandoned, 1),
        ]
    );
}

#[test]
fn test_unattended_object_is_abandoned() {
    let bt = ephemeral();
    play(&bt, 2, vec![Frame::empty(&["cup", "sandwich"])]);

    let h = bt.objects.history("cup").unwrap();
    assert_eq!(h.current_status, EventKind::Abandoned);
    assert!(h.last_person.is_none());
    assert_eq!(bt.objects.tracked(), vec!["cup".to_string()]);
}

#[test]
fn test_blacklisted_person_alerts_every_tick_even_if_sink_fails() {
    let bt = ephemeral();
    let id = bt.blacklist.add("Mallory", &BOB).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = Arc::clone(&seen);
    bt.set_alert_sink(move |alert: &Alert| -> std::result::Result<(), AlertError> {
        sink_seen.lock().push(alert.clone());
        Err("pager offline".into())
    });

    play(
        &bt,
        5,
        vec![
            Frame::person(&BOB, &[]),
            Frame::person(&BOB, &["cell phone"]),
            Frame::person(&ALICE, &[]),
        ],
    );

    let seen = seen.lock();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|a| a.blacklist_id == id && a.camera == CameraId(5)));
    assert_eq!(bt.alerts_dispatched(), 2);
    // Tracking went on regardless
    assert_eq!(bt.identities().len(), 2);
}

#[test]
fn test_camera_lifecycle() {
    let bt = ephemeral();
    let (source, _) = ScriptedSource::new(vec![Frame::empty(&[]); 3]);
    bt.start_camera(CameraId(3), source, ScriptedModels).unwrap();
    assert!(bt.is_tracking());

    let (again, _) = ScriptedSource::new(Vec::new());
    assert!(bt
        .start_camera(CameraId(3), again, ScriptedModels)
        .unwrap_err()
        .is_input_error());

    assert!(bt.reset().unwrap_err().is_conflict());
    assert!(!bt.release_camera(CameraId(9)));

    bt.shutdown();
    assert!(!bt.is_tracking());
    bt.reset().unwrap();
}
