//! Calls captured before a loader is installed.

mod common;

use std::sync::{Arc, Mutex};

use common::Fixture;
use umbed_loader::{CallQueue, EmbedOptions};

fn recording(order: &Arc<Mutex<Vec<&'static str>>>, id: &'static str) -> EmbedOptions {
    let order = order.clone();
    EmbedOptions::new(id).with_init(move || order.lock().unwrap().push(id))
}

#[tokio::test]
async fn queued_calls_replay_most_recent_first() {
    let fixture = Fixture::auto_load();
    fixture.document.add_element("first");
    fixture.document.add_element("second");
    let order = Arc::new(Mutex::new(Vec::new()));
    let queue = CallQueue::new();

    assert!(queue.submit(recording(&order, "first")).await.is_none());
    assert!(queue.submit(recording(&order, "second")).await.is_none());
    assert_eq!(queue.queued(), 2);
    assert!(!queue.is_installed());
    assert!(order.lock().unwrap().is_empty());

    let results = queue.install(Arc::new(fixture.loader())).await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(*order.lock().unwrap(), ["second", "first"]);
    assert_eq!(queue.queued(), 0);
    assert!(queue.is_installed());
}

#[tokio::test]
async fn calls_after_install_run_immediately() {
    let fixture = Fixture::auto_load();
    fixture.document.add_element("late");
    let order = Arc::new(Mutex::new(Vec::new()));
    let queue = CallQueue::new();

    assert!(queue.install(Arc::new(fixture.loader())).await.is_empty());

    let result = queue.submit(recording(&order, "late")).await;

    assert!(matches!(result, Some(Ok(ref report)) if report.init_invoked));
    assert_eq!(*order.lock().unwrap(), ["late"]);
}

#[tokio::test]
async fn replayed_failures_are_returned_not_dropped() {
    let fixture = Fixture::auto_load();
    let queue = CallQueue::new();

    queue.submit(EmbedOptions::new("missing")).await;
    let results = queue.install(Arc::new(fixture.loader())).await;

    assert_eq!(results.len(), 1);
    assert!(results[0].is_err());
}
