//! Integration tests for the durable metrics store

use px_validator::utils::constants::{METRICS_FILE_NAME, UPTIME_FILE_NAME};
use px_validator::MetricsStore;
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn read_file(dir: &TempDir) -> Value {
    let raw = fs::read_to_string(dir.path().join(METRICS_FILE_NAME)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_empty_store_summary() {
    let dir = TempDir::new().unwrap();
    let store = MetricsStore::open(dir.path()).unwrap();

    let summary = store.summary().unwrap();
    assert_eq!(summary.status, "online");
    assert_eq!(summary.total, 0);
    assert_eq!(summary.avg_response_ms, 0.0);
    assert!(summary.last.is_empty());
    assert!(summary.error.is_none());
}

#[test]
fn test_single_event() {
    let dir = TempDir::new().unwrap();
    let store = MetricsStore::open(dir.path()).unwrap();

    store.record_event(50, 100.0).unwrap();

    let summary = store.summary().unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.total_validations, 1);
    assert!((summary.avg_response_ms - 100.0).abs() < 1e-9);
    assert!((summary.average_response_time - 0.1).abs() < 1e-9);
    assert_eq!(summary.last.len(), 1);
    assert_eq!(summary.last[0].score, 50);
}

#[test]
fn test_state_survives_restart() {
    let dir = TempDir::new().unwrap();
    {
        let store = MetricsStore::open(dir.path()).unwrap();
        store.record_event(10, 20.0).unwrap();
        store.record_event(30, 40.0).unwrap();
    }

    let reopened = MetricsStore::open(dir.path()).unwrap();
    let summary = reopened.summary().unwrap();
    assert_eq!(summary.total, 2);
    assert!((summary.avg_response_ms - 30.0).abs() < 1e-9);

    reopened.record_event(90, 90.0).unwrap();
    assert_eq!(reopened.summary().unwrap().total, 3);
}

#[test]
fn test_recent_window_is_bounded_and_ordered() {
    let dir = TempDir::new().unwrap();
    let store = MetricsStore::open(dir.path()).unwrap();

    for i in 0..150u32 {
        store.record_event((i % 100) as u8, 1.0).unwrap();
    }

    let window = store.recent_window().unwrap();
    assert_eq!(window.len(), 100);
    // Oldest kept event is #50
    assert_eq!(window[0].score, 50);
    assert_eq!(window[99].score, 49);
    assert!(window.windows(2).all(|w| w[0].ts <= w[1].ts));

    let summary = store.summary().unwrap();
    assert_eq!(summary.total, 150);
    let last: Vec<u8> = summary.last.iter().map(|s| s.score).collect();
    assert_eq!(last, vec![45, 46, 47, 48, 49]);
}

#[test]
fn test_legacy_list_is_upgraded_on_open() {
    let dir = TempDir::new().unwrap();
    let legacy = r#"[
        {"timestamp": 1700000000.0, "score": 10, "duration": 0.2},
        {"timestamp": 1700000001.0, "score": {"score": 20}, "duration": 0.2},
        {"timestamp": 1700000002.0, "score": 30, "duration": 0.2}
    ]"#;
    fs::write(dir.path().join(METRICS_FILE_NAME), legacy).unwrap();

    let store = MetricsStore::open(dir.path()).unwrap();

    let on_disk = read_file(&dir);
    assert_eq!(on_disk["version"], 2);
    assert_eq!(on_disk["total"], 3);
    assert!((on_disk["sum_duration_ms"].as_f64().unwrap() - 600.0).abs() < 1e-6);

    let summary = store.summary().unwrap();
    assert_eq!(summary.total, 3);
    assert!((summary.avg_response_ms - 200.0).abs() < 1e-6);
    let scores: Vec<u8> = summary.last.iter().map(|s| s.score).collect();
    assert_eq!(scores, vec![10, 20, 30]);
}

#[test]
fn test_legacy_list_with_string_numbers_keeps_history() {
    let dir = TempDir::new().unwrap();
    let legacy = r#"[
        {"timestamp": 1.0, "score": 10, "duration": "0.2"},
        {"timestamp": 2.0, "score": 20, "duration": 0.2}
    ]"#;
    fs::write(dir.path().join(METRICS_FILE_NAME), legacy).unwrap();

    let store = MetricsStore::open(dir.path()).unwrap();

    let summary = store.summary().unwrap();
    assert_eq!(summary.total, 2);
    assert!((summary.avg_response_ms - 200.0).abs() < 1e-6);
    assert_eq!(read_file(&dir)["version"], 2);
    assert!((read_file(&dir)["sum_duration_ms"].as_f64().unwrap() - 400.0).abs() < 1e-6);
}

#[test]
fn test_unwritable_metrics_file_surfaces_error() {
    let dir = TempDir::new().unwrap();
    let store = MetricsStore::open(dir.path()).unwrap();
    fs::create_dir(store.path()).unwrap();

    assert!(store.record_event(10, 5.0).is_err());
    assert!(store.summary().is_err());
}

#[test]
fn test_unversioned_object_is_upgraded_on_open() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(METRICS_FILE_NAME),
        r#"{"total":2,"sum_duration":300.0,"recent":[{"ts":1.0,"score":5},{"ts":2.0,"score":6}]}"#,
    )
    .unwrap();

    let store = MetricsStore::open(dir.path()).unwrap();

    assert_eq!(read_file(&dir)["version"], 2);
    let summary = store.summary().unwrap();
    assert_eq!(summary.total, 2);
    assert!((summary.avg_response_ms - 150.0).abs() < 1e-9);
}

#[test]
fn test_corrupt_file_resets_to_baseline() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(METRICS_FILE_NAME), "{ truncated").unwrap();

    let store = MetricsStore::open(dir.path()).unwrap();
    assert_eq!(store.summary().unwrap().total, 0);

    store.record_event(40, 12.0).unwrap();
    assert_eq!(store.summary().unwrap().total, 1);
    assert_eq!(read_file(&dir)["version"], 2);
}

#[test]
fn test_uptime_anchor_reused_across_reopen() {
    let dir = TempDir::new().unwrap();
    let first = MetricsStore::open(dir.path()).unwrap();
    let anchor = first.service_start_time();
    assert!(dir.path().join(UPTIME_FILE_NAME).exists());
    drop(first);

    let second = MetricsStore::open(dir.path()).unwrap();
    assert_eq!(second.service_start_time(), anchor);
}

#[test]
fn test_preexisting_uptime_anchor_drives_uptime() {
    let dir = TempDir::new().unwrap();
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs_f64();
    fs::write(dir.path().join(UPTIME_FILE_NAME), format!("{}", now - 3600.0)).unwrap();

    let store = MetricsStore::open(dir.path()).unwrap();
    let uptime = store.summary().unwrap().uptime_sec;
    assert!((3599..=3700).contains(&uptime), "uptime was {}", uptime);
}

#[test]
fn test_concurrent_writers_lose_nothing() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MetricsStore::open(dir.path()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    store.record_event(((t * 25 + i) % 100) as u8, 2.0).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let summary = store.summary().unwrap();
    assert_eq!(summary.total, 200);
    assert!((summary.avg_response_ms - 2.0).abs() < 1e-9);
    assert_eq!(store.recent_window().unwrap().len(), 100);
}

#[test]
fn test_no_temp_files_left_behind() {
    let dir = TempDir::new().unwrap();
    let store = MetricsStore::open(dir.path()).unwrap();
    store.record_event(1, 1.0).unwrap();

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
