//! Polling Lookup Tests
//!
//! `find_history` waits for an object to show up without blocking writers;
//! person lookups gather one person's events across objects.

use crate::*;

fn quick() -> Backtrack {
    Backtrack::builder()
        .no_durability()
        .poll_interval(Duration::from_millis(20))
        .open()
        .unwrap()
}

#[test]
fn test_find_returns_once_object_appears() {
    let bt = Arc::new(quick());
    let writer = {
        let bt = Arc::clone(&bt);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(300));
            bt.objects
                .append(event("backpack", EventKind::Abandoned, None, 0, 0))
                .unwrap();
        })
    };

    let start = Instant::now();
    let found = bt
        .objects
        .find_history_within("backpack", Duration::from_secs(5))
        .unwrap();
    let elapsed = start.elapsed();
    writer.join().unwrap();

    assert_eq!(found.unwrap().current_status, EventKind::Abandoned);
    assert!(elapsed >= Duration::from_millis(250), "returned too early: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(2), "returned too late: {:?}", elapsed);
}

#[test]
fn test_find_gives_up_after_budget() {
    let bt = quick();
    let start = Instant::now();
    let found = bt
        .objects
        .find_history_within("wallet", Duration::from_millis(150))
        .unwrap();
    assert!(found.is_none());
    assert!(start.elapsed() >= Duration::from_millis(150));
}

#[test]
fn test_find_hit_is_immediate() {
    let bt = quick();
    bt.objects
        .append(event("book", EventKind::Abandoned, None, 0, 0))
        .unwrap();
    let start = Instant::now();
    assert!(bt
        .objects
        .find_history_within("book", Duration::from_secs(20))
        .unwrap()
        .is_some());
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[test]
fn test_find_lost_object() {
    let bt = quick();
    let owner = bt.resolve_identity(&[1.0, 1.0]).unwrap();
    bt.objects
        .append(event("handbag", EventKind::PickedUp, Some(1), 0, 0))
        .unwrap();

    let lost = bt
        .objects
        .find_lost(&[1.05, 1.0], "handbag", Duration::ZERO)
        .unwrap();
    assert_eq!(lost.person, owner);
    assert_eq!(lost.history.unwrap().last_person, Some(owner));

    let stranger = bt
        .objects
        .find_lost(&[9.0, 9.0], "handbag", Duration::ZERO)
        .unwrap_err();
    assert!(stranger.is_not_found());
    // Lookups never register anyone
    assert_eq!(bt.identities().len(), 1);
}

#[test]
fn test_unbounded_budget_returns_existing_history() {
    let bt = quick();
    bt.objects
        .append(event("book", EventKind::Abandoned, None, 0, 0))
        .unwrap();
    let found = bt
        .objects
        .find_history_within("book", Duration::from_secs(u64::MAX))
        .unwrap();
    assert_eq!(found.unwrap().current_camera, CameraId(0));
}

#[test]
fn test_person_activity_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let bt = Backtrack::open(dir.path()).unwrap();
        bt.objects
            .append(event("suitcase", EventKind::PickedUp, Some(3), 0, 0))
            .unwrap();
        bt.objects
            .append(event("umbrella", EventKind::PickedUp, Some(3), 1, 4))
            .unwrap();
        bt.objects
            .append(event("suitcase", EventKind::RemovedFromPerson, Some(3), 2, 8))
            .unwrap();
        bt.objects
            .append(event("suitcase", EventKind::Abandoned, None, 2, 9))
            .unwrap();
        bt.objects
            .append(event("cup", EventKind::PickedUp, Some(5), 1, 10))
            .unwrap();
    }

    let bt = Backtrack::open(dir.path()).unwrap();
    let activity = bt.objects.by_person(&PersonId::from_sequence(3)).unwrap();
    assert_eq!(activity.objects, vec!["suitcase", "umbrella"]);
    assert_eq!(activity.last_camera, CameraId(2));
    assert_eq!(activity.last_seen, base_time() + chrono::Duration::seconds(8));
    assert_eq!(activity.timeline.len(), 3);

    let people: Vec<PersonId> = bt.objects.people().into_iter().map(|a| a.person).collect();
    assert_eq!(people, vec![PersonId::from_sequence(3), PersonId::from_sequence(5)]);
    assert!(bt.objects.by_person(&PersonId::from_sequence(4)).is_none());
}
