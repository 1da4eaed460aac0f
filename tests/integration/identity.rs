//! Identity Resolution Tests
//!
//! Registration and matching of face embeddings through the context.

use crate::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_close_embeddings_share_an_identity() {
    let bt = ephemeral();
    let mut rng = StdRng::seed_from_u64(7);
    let e1 = random_embedding(&mut rng, 128);
    let e2 = nudge(&e1, 0.5);

    let a = bt.resolve_identity(&e1).unwrap();
    let b = bt.resolve_identity(&e2).unwrap();
    assert_eq!(a, b);
    assert_eq!(bt.identities().len(), 1);
}

#[test]
fn test_distant_embeddings_get_sequential_ids() {
    let bt = ephemeral();
    let base = vec![0.0f32; 128];
    let ids: Vec<String> = (0..12)
        .map(|i| {
            bt.resolve_identity(&nudge(&base, i as f32 * 10.0))
                .unwrap()
                .to_string()
        })
        .collect();
    let expected: Vec<String> = (1..=12).map(|n| format!("Person_{:03}", n)).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_match_never_registers() {
    let bt = ephemeral();
    assert_eq!(bt.match_identity(&[1.0, 2.0]).unwrap(), None);
    assert!(bt.identities().is_empty());

    let p = bt.resolve_identity(&[1.0, 2.0]).unwrap();
    assert_eq!(bt.match_identity(&[1.1, 2.0]).unwrap(), Some(p));
}

#[test]
fn test_bad_embeddings_rejected() {
    let bt = ephemeral();
    bt.resolve_identity(&[0.0, 0.0, 0.0]).unwrap();

    assert!(bt.resolve_identity(&[]).unwrap_err().is_input_error());
    assert!(bt.resolve_identity(&[0.0, 0.0]).unwrap_err().is_input_error());
    assert!(bt
        .resolve_identity(&[f32::NAN, 0.0, 0.0])
        .unwrap_err()
        .is_input_error());
    assert_eq!(bt.identities().len(), 1);
}

#[test]
fn test_threshold_is_configurable() {
    let strict = Backtrack::builder()
        .no_durability()
        .threshold(0.1)
        .open()
        .unwrap();
    let a = strict.resolve_identity(&[0.0, 0.0]).unwrap();
    let b = strict.resolve_identity(&[0.5, 0.0]).unwrap();
    assert_ne!(a, b);

    let loose = Backtrack::builder()
        .no_durability()
        .threshold(1.0)
        .open()
        .unwrap();
    let a = loose.resolve_identity(&[0.0, 0.0]).unwrap();
    let b = loose.resolve_identity(&[0.5, 0.0]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_numbering_continues_after_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let bt = Backtrack::open(dir.path()).unwrap();
        bt.resolve_identity(&[0.0]).unwrap();
        bt.resolve_identity(&[10.0]).unwrap();
    }
    let bt = Backtrack::open(dir.path()).unwrap();
    assert_eq!(bt.match_identity(&[10.1]).unwrap().unwrap().as_str(), "Person_002");
    assert_eq!(bt.resolve_identity(&[20.0]).unwrap().as_str(), "Person_003");
}

#[test]
fn test_blacklist_ids_never_reused() {
    let bt = ephemeral();
    let first = bt.blacklist.add("Mallory", &[1.0, 1.0]).unwrap();
    bt.blacklist.remove(&first).unwrap();
    let second = bt.blacklist.add("Trudy", &[5.0, 5.0]).unwrap();
    assert_eq!(first.as_str(), "BLACK_001");
    assert_eq!(second.as_str(), "BLACK_002");
    assert!(bt.blacklist.add("  ", &[2.0, 2.0]).unwrap_err().is_input_error());
}
