use chrono::Utc;
use opsboard::{
    EventRecord, Sample,
    buffers::{feed::EventFeed, series::SeriesWindow},
};

fn sample(label: &str, value: f64) -> Sample {
    Sample::new(label, value)
}

fn event(id: &str) -> EventRecord {
    EventRecord {
        event_id: id.to_string(),
        timestamp: Utc::now(),
        kind: "a-f-G-U-C".to_string(),
        is_anomaly: false,
    }
}

#[test]
fn series_rejects_zero_capacity() {
    let err = SeriesWindow::new(0).expect_err("zero capacity should fail");
    assert!(format!("{err}").contains("series capacity"));
}

#[test]
fn feed_rejects_zero_capacity() {
    let err = EventFeed::new(0).expect_err("zero capacity should fail");
    assert!(format!("{err}").contains("feed capacity"));
}

#[test]
fn series_snapshot_lengths_stay_parallel_and_bounded() {
    let mut window = SeriesWindow::new(10).expect("window");
    for i in 0..25 {
        window.append(sample(&format!("t{i}"), i as f64));
        let snapshot = window.snapshot();
        assert_eq!(snapshot.labels.len(), snapshot.values.len());
        assert!(snapshot.len() <= 10);
    }
}

#[test]
fn series_evicts_exactly_one_at_capacity_boundary() {
    let mut window = SeriesWindow::new(3).expect("window");
    for value in [10.0, 20.0, 30.0] {
        window.append(sample(&format!("t{value}"), value));
    }
    assert_eq!(window.len(), 3);

    window.append(sample("t40", 40.0));
    assert_eq!(window.len(), 3);
    assert_eq!(window.snapshot().values, vec![20.0, 30.0, 40.0]);
}

#[test]
fn series_snapshot_is_oldest_first() {
    let mut window = SeriesWindow::new(5).expect("window");
    window.append(sample("first", 1.0));
    window.append(sample("second", 2.0));
    let snapshot = window.snapshot();
    assert_eq!(snapshot.labels, vec!["first", "second"]);
    assert_eq!(snapshot.values, vec![1.0, 2.0]);
}

#[test]
fn series_append_from_empty() {
    let mut window = SeriesWindow::new(4).expect("window");
    assert!(window.is_empty());
    window.append(sample("only", 7.0));
    assert_eq!(window.len(), 1);
    assert_eq!(window.snapshot().values, vec![7.0]);
}

#[test]
fn feed_snapshot_is_most_recent_first() {
    let mut feed = EventFeed::new(5).expect("feed");
    feed.append(event("EVT-1"));
    feed.append(event("EVT-2"));
    let ids: Vec<_> = feed.snapshot().into_iter().map(|e| e.event_id).collect();
    assert_eq!(ids, vec!["EVT-2", "EVT-1"]);
}

#[test]
fn feed_never_exceeds_capacity() {
    let mut feed = EventFeed::new(2).expect("feed");
    feed.append(event("EVT-a"));
    feed.append(event("EVT-b"));
    feed.append(event("EVT-c"));
    assert_eq!(feed.len(), 2);
    let ids: Vec<_> = feed.snapshot().into_iter().map(|e| e.event_id).collect();
    assert_eq!(ids, vec!["EVT-c", "EVT-b"]);
}

#[test]
fn feed_passes_duplicate_ids_through() {
    let mut feed = EventFeed::new(4).expect("feed");
    feed.append(event("EVT-dup"));
    feed.append(event("EVT-dup"));
    assert_eq!(feed.len(), 2);
}

#[test]
fn empty_buffers_produce_empty_snapshots() {
    let window = SeriesWindow::new(3).expect("window");
    assert!(window.snapshot().is_empty());
    let feed = EventFeed::new(3).expect("feed");
    assert!(feed.snapshot().is_empty());
}
