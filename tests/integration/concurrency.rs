//! Concurrency Tests
//!
//! Many threads against one context.

use crate::*;
use std::sync::Barrier;

#[test]
fn test_concurrent_resolution_registers_once() {
    let bt = Arc::new(ephemeral());
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let bt = Arc::clone(&bt);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                bt.resolve_identity(&[0.3, 0.3 + i as f32 * 0.01]).unwrap()
            })
        })
        .collect();

    let ids: Vec<PersonId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(ids.iter().all(|id| id.as_str() == "Person_001"));
    assert_eq!(bt.identities().len(), 1);
}

#[test]
fn test_parallel_cameras_share_one_timeline() {
    let dir = TempDir::new().unwrap();
    let bt = Backtrack::open(dir.path()).unwrap();
    let objects = ["backpack", "laptop", "umbrella", "book"];
    let face = |cam: usize| [cam as f32 * 10.0, 0.0];

    let counters: Vec<_> = objects
        .iter()
        .enumerate()
        .map(|(cam, label)| {
            let frames = vec![
                Frame::person(&face(cam), &[*label]),
                Frame::empty(&[*label]),
                Frame::person(&face(cam), &[*label]),
            ];
            let (source, consumed) = ScriptedSource::new(frames);
            bt.start_camera(CameraId(cam as u32), source, ScriptedModels)
                .unwrap();
            consumed
        })
        .collect();

    assert!(wait_for(|| counters.iter().all(|c| c.load(Ordering::Acquire) >= 3)));
    bt.shutdown();

    assert_eq!(bt.identities().len(), objects.len());
    for (cam, label) in objects.iter().enumerate() {
        let owner = bt.match_identity(&face(cam)).unwrap();
        let h = bt.objects.history(label).unwrap();
        assert_eq!(h.current_camera, CameraId(cam as u32));
        assert_eq!(h.last_person, owner);
        let events = bt.objects.events(label);
        assert_eq!(events.len(), 5);
        assert!(events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }
}

#[test]
fn test_readers_see_a_growing_prefix() {
    let bt = Arc::new(ephemeral());
    let writer = {
        let bt = Arc::clone(&bt);
        thread::spawn(move || {
            for i in 0..200 {
                let kind = if i % 2 == 0 {
                    EventKind::Abandoned
                } else {
                    EventKind::PickedFromAbandoned
                };
                bt.objects.append(event("box", kind, None, 0, i)).unwrap();
            }
        })
    };

    let mut seen = 0;
    while !writer.is_finished() {
        let len = bt.objects.history("box").map_or(0, |h| h.timeline.len());
        assert!(len >= seen);
        seen = len;
    }
    writer.join().unwrap();
    assert_eq!(bt.objects.events("box").len(), 200);
}
