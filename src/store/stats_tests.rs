//! Tests for `StatsCell`.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use super::StatsCell;
use crate::model::WebhookStats;

#[test]
fn default_cell_is_empty() {
    let stats = StatsCell::default().snapshot();

    assert_eq!(stats, WebhookStats::default());
    assert!(stats.last_request_at.is_none());
}

#[test]
fn record_counts_success_and_failure_separately() {
    let cell = StatsCell::default();
    let at = Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap();

    cell.record(true, 12, at);
    cell.record(true, 8, at);
    cell.record(false, 40, at);

    let stats = cell.snapshot();
    assert_eq!(stats.total_requests, 3);
    assert_eq!(stats.success_requests, 2);
    assert_eq!(stats.failed_requests, 1);
    assert_eq!(stats.last_request_at, Some(at));
}

#[test]
fn average_response_is_last_write_not_mean() {
    // Known simplification: the field holds the most recent elapsed time.
    // A true running average of 10, 20 and 90 would be 40.
    let cell = StatsCell::default();
    let at = Utc::now();

    cell.record(true, 10, at);
    cell.record(true, 20, at);
    cell.record(true, 90, at);

    assert_eq!(cell.snapshot().average_response, 90);
}

#[test]
fn seeded_cell_continues_from_snapshot() {
    let seed = WebhookStats {
        total_requests: 10,
        success_requests: 9,
        failed_requests: 1,
        last_request_at: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
        average_response: 5,
        requests_today: 3,
        requests_this_week: 7,
    };
    let cell = StatsCell::from_snapshot(&seed);

    assert_eq!(cell.snapshot(), seed);

    cell.record(true, 6, Utc::now());
    let stats = cell.snapshot();
    assert_eq!(stats.total_requests, 11);
    assert_eq!(stats.success_requests, 10);
    // Periodic counters are not advanced here.
    assert_eq!(stats.requests_today, 3);
    assert_eq!(stats.requests_this_week, 7);
}

#[test]
fn concurrent_records_lose_no_increments() {
    let cell = Arc::new(StatsCell::default());
    let threads: Vec<_> = (0..8)
        .map(|i| {
            let cell = Arc::clone(&cell);
            std::thread::spawn(move || {
                for _ in 0..1_000 {
                    cell.record(i % 2 == 0, 1, Utc::now());
                }
            })
        })
        .collect();
    for thread in threads {
        thread.join().unwrap();
    }

    let stats = cell.snapshot();
    assert_eq!(stats.total_requests, 8_000);
    assert_eq!(stats.success_requests, 4_000);
    assert_eq!(stats.failed_requests, 4_000);
}
