use pretty_assertions::assert_eq;
use scrape_core::Severity;
use scrape_engine::LogBroadcaster;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

#[tokio::test]
async fn subscribers_receive_lines_in_publish_order() {
    let log = LogBroadcaster::default();
    let mut rx = log.subscribe();

    log.publish(Severity::Info, "Opening table URL 1");
    log.publish(Severity::Info, "Found 4 rows in table 1");
    log.publish(Severity::Success, "Saved: W1_P1.txt (120 bytes)");

    assert_eq!(rx.recv().await.unwrap().message, "Opening table URL 1");
    assert_eq!(rx.recv().await.unwrap().message, "Found 4 rows in table 1");
    let third = rx.recv().await.unwrap();
    assert_eq!(third.severity, Severity::Success);
    assert_eq!(third.message, "Saved: W1_P1.txt (120 bytes)");
}

#[tokio::test]
async fn late_subscriber_gets_no_replay() {
    let log = LogBroadcaster::default();
    log.publish(Severity::Info, "before anyone listened");

    let mut rx = log.subscribe();
    log.publish(Severity::Info, "after subscribing");

    assert_eq!(rx.recv().await.unwrap().message, "after subscribing");
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

    // History still covers what the live stream missed.
    let history = log.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].message, "before anyone listened");
}

#[tokio::test]
async fn dropped_subscriber_does_not_poison_publishing() {
    let log = LogBroadcaster::default();
    let rx = log.subscribe();
    assert_eq!(log.subscriber_count(), 1);

    drop(rx);
    assert_eq!(log.subscriber_count(), 0);

    // Publishing with no subscribers at all is fine too.
    log.publish(Severity::Info, "nobody listening");
    assert_eq!(log.history().len(), 1);
}

#[tokio::test]
async fn slow_subscriber_lags_instead_of_stalling_the_publisher() {
    let log = LogBroadcaster::new(2);
    let mut rx = log.subscribe();

    for index in 0..5 {
        log.publish(Severity::Info, format!("Processing row {}", index + 1));
    }

    // The oldest three lines were overwritten while the subscriber slept.
    assert!(matches!(rx.recv().await, Err(RecvError::Lagged(3))));
    assert_eq!(rx.recv().await.unwrap().message, "Processing row 4");
    assert_eq!(rx.recv().await.unwrap().message, "Processing row 5");

    // Nothing was lost from history.
    assert_eq!(log.history().len(), 5);
}

#[tokio::test]
async fn clear_drops_history_but_keeps_subscribers() {
    let log = LogBroadcaster::default();
    let mut rx = log.subscribe();
    log.publish(Severity::Info, "first job line");

    log.clear();
    assert!(log.history().is_empty());

    log.publish(Severity::Info, "second job line");
    assert_eq!(rx.recv().await.unwrap().message, "first job line");
    assert_eq!(rx.recv().await.unwrap().message, "second job line");
}
