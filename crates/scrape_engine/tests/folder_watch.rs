use std::fs;
use std::time::Duration;

use scrape_engine::{FolderWatch, LogBroadcaster, ProgressTracker};
use tempfile::TempDir;

fn watch_parts() -> (ProgressTracker, LogBroadcaster) {
    scrape_logging::initialize_for_tests();
    (ProgressTracker::new(), LogBroadcaster::default())
}

/// Polls the tracker until `predicate` holds or the deadline passes.
async fn wait_for(tracker: &ProgressTracker, predicate: impl Fn(&ProgressTracker) -> bool) -> bool {
    for _ in 0..100 {
        if predicate(tracker) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn preexisting_files_are_recorded_complete_on_spawn() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("earlier.txt"), b"already here").unwrap();
    fs::write(dir.path().join("another.txt"), b"me too").unwrap();

    let (tracker, log) = watch_parts();
    let _watch = FolderWatch::spawn(dir.path(), tracker.clone(), log.clone()).unwrap();

    // The initial scan is synchronous, so the records exist immediately.
    let snapshot = tracker.snapshot();
    assert_eq!(snapshot.total_count, 2);
    assert_eq!(snapshot.completed_count, 2);
    assert!(log
        .history()
        .iter()
        .any(|entry| entry.message.contains("Monitoring downloads in folder")));
}

#[tokio::test]
async fn renamed_file_is_observed_as_a_completed_download() {
    let dir = TempDir::new().unwrap();
    let (tracker, log) = watch_parts();
    let _watch = FolderWatch::spawn(dir.path(), tracker.clone(), log).unwrap();

    // The atomic-writer pattern: hidden temp file, then rename into place.
    let temp = dir.path().join(".tmp-download");
    fs::write(&temp, b"document body").unwrap();
    fs::rename(&temp, dir.path().join("report.txt")).unwrap();

    let seen = wait_for(&tracker, |tracker| {
        tracker
            .snapshot()
            .records
            .iter()
            .any(|record| record.name == "report.txt" && record.complete)
    })
    .await;
    assert!(seen, "rename event never reached the tracker");
}

#[tokio::test]
async fn hidden_temp_files_are_not_recorded() {
    let dir = TempDir::new().unwrap();
    let (tracker, log) = watch_parts();
    let _watch = FolderWatch::spawn(dir.path(), tracker.clone(), log).unwrap();

    fs::write(dir.path().join(".tmp-partial"), b"half written").unwrap();
    fs::write(dir.path().join("visible.txt"), b"real artifact").unwrap();

    let seen = wait_for(&tracker, |tracker| {
        tracker
            .snapshot()
            .records
            .iter()
            .any(|record| record.name == "visible.txt")
    })
    .await;
    assert!(seen, "create event never reached the tracker");
    assert!(tracker
        .snapshot()
        .records
        .iter()
        .all(|record| !record.name.starts_with('.')));
}

#[tokio::test]
async fn dropping_the_watch_stops_observation() {
    let dir = TempDir::new().unwrap();
    let (tracker, log) = watch_parts();
    let watch = FolderWatch::spawn(dir.path(), tracker.clone(), log).unwrap();
    drop(watch);

    fs::write(dir.path().join("late.txt"), b"after the watch ended").unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(tracker.snapshot().total_count, 0);
}

#[tokio::test]
async fn spawning_on_a_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("not_created");
    let (tracker, log) = watch_parts();
    assert!(FolderWatch::spawn(&missing, tracker, log).is_err());
}
