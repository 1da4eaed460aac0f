//! Backtrack Request Workflow Tests

use crate::*;

#[test]
fn test_approve_without_history_fails() {
    let bt = ephemeral();
    let req = bt.requests.create("Person_001", "wallet", "uploads/w.jpg").unwrap();
    assert_eq!(req.status, RequestStatus::Pending);

    let decided = bt.requests.approve(&req.id).unwrap();
    assert_eq!(decided.status, RequestStatus::Failed);
    assert_eq!(
        decided.result,
        Some(serde_json::Value::String(
            "No history found for object 'wallet'".to_string()
        ))
    );
}

#[test]
fn test_approve_attaches_history() {
    let bt = ephemeral();
    bt.objects
        .append(event("backpack", EventKind::PickedUp, Some(2), 1, 0))
        .unwrap();
    let req = bt.requests.create("Person_002", "backpack", "").unwrap();

    let approved = bt.requests.approve(&req.id).unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);
    let history: ObjectHistory = serde_json::from_value(approved.result.unwrap()).unwrap();
    assert_eq!(history, bt.objects.history("backpack").unwrap());
}

#[test]
fn test_terminal_requests_cannot_move() {
    let bt = ephemeral();
    let req = bt.requests.create("Person_001", "laptop", "").unwrap();
    bt.requests.reject(&req.id).unwrap();

    assert!(bt.requests.approve(&req.id).unwrap_err().is_conflict());
    assert!(bt.requests.reject(&req.id).unwrap_err().is_conflict());
    assert_eq!(
        bt.requests.get(&req.id).unwrap().status,
        RequestStatus::Rejected
    );
}

#[test]
fn test_unknown_request_and_bad_input() {
    let bt = ephemeral();
    assert!(bt
        .requests
        .approve(&RequestId::from("req_42"))
        .unwrap_err()
        .is_not_found());
    assert!(bt.requests.get(&RequestId::from("req_42")).is_none());
    assert!(bt.requests.create("", "laptop", "").unwrap_err().is_input_error());
    assert!(bt
        .requests
        .create("Person_001", "sandwich", "")
        .unwrap_err()
        .is_input_error());
    assert!(bt.requests.list().is_empty());
}

#[test]
fn test_listing_by_status() {
    let bt = ephemeral();
    let a = bt.requests.create("Person_001", "laptop", "").unwrap();
    let b = bt.requests.create("Person_002", "book", "").unwrap();
    let c = bt.requests.create("Person_003", "cup", "").unwrap();
    bt.requests.reject(&b.id).unwrap();
    bt.requests.approve(&c.id).unwrap();

    let ids = |v: Vec<BacktrackRequest>| v.into_iter().map(|r| r.id).collect::<Vec<_>>();
    assert_eq!(ids(bt.requests.list()), vec![a.id.clone(), b.id.clone(), c.id.clone()]);
    assert_eq!(ids(bt.requests.pending()), vec![a.id]);
    assert_eq!(ids(bt.requests.list_by_status(RequestStatus::Rejected)), vec![b.id]);
    assert_eq!(ids(bt.requests.list_by_status(RequestStatus::Failed)), vec![c.id]);
}

#[test]
fn test_requests_persist_across_reopen() {
    let dir = TempDir::new().unwrap();
    let first = {
        let bt = Backtrack::open(dir.path()).unwrap();
        let r = bt.requests.create("Person_001", "umbrella", "u.png").unwrap();
        bt.requests.reject(&r.id).unwrap();
        r
    };

    let bt = Backtrack::open(dir.path()).unwrap();
    let stored = bt.requests.get(&first.id).unwrap();
    assert_eq!(stored.status, RequestStatus::Rejected);
    assert_eq!(stored.image_path, "u.png");
    assert_eq!(
        bt.requests.create("Person_001", "book", "").unwrap().id.as_str(),
        "req_2"
    );
}
