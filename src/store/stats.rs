//! Lock-free per-endpoint statistics.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

use crate::model::WebhookStats;

/// Sentinel for "no request recorded yet".
const NEVER: i64 = i64::MIN;

/// Concurrency-safe counters for one endpoint.
///
/// Counters are only ever advanced with `fetch_add`, so concurrent calls
/// never lose increments. `last_request_at` and `average_response` are
/// plain atomic stores: whichever call records last wins.
#[derive(Debug)]
pub struct StatsCell {
    total_requests: AtomicI64,
    success_requests: AtomicI64,
    failed_requests: AtomicI64,
    /// Milliseconds since the Unix epoch, or [`NEVER`].
    last_request_at: AtomicI64,
    average_response: AtomicI64,
    requests_today: AtomicI64,
    requests_this_week: AtomicI64,
}

impl Default for StatsCell {
    fn default() -> Self {
        Self::from_snapshot(&WebhookStats::default())
    }
}

impl StatsCell {
    /// Seeds a cell from previously stored statistics.
    #[must_use]
    pub fn from_snapshot(stats: &WebhookStats) -> Self {
        Self {
            total_requests: AtomicI64::new(stats.total_requests),
            success_requests: AtomicI64::new(stats.success_requests),
            failed_requests: AtomicI64::new(stats.failed_requests),
            last_request_at: AtomicI64::new(
                stats
                    .last_request_at
                    .map_or(NEVER, |at| at.timestamp_millis()),
            ),
            average_response: AtomicI64::new(stats.average_response),
            requests_today: AtomicI64::new(stats.requests_today),
            requests_this_week: AtomicI64::new(stats.requests_this_week),
        }
    }

    /// Counts one handled call that finished at `at` after `elapsed_ms`.
    pub fn record(&self, success: bool, elapsed_ms: i64, at: DateTime<Utc>) {
        self.total_requests.fetch_add(1, Ordering::SeqCst);
        if success {
            self.success_requests.fetch_add(1, Ordering::SeqCst);
        } else {
            self.failed_requests.fetch_add(1, Ordering::SeqCst);
        }
        self.last_request_at
            .store(at.timestamp_millis(), Ordering::SeqCst);
        self.average_response.store(elapsed_ms, Ordering::SeqCst);
    }

    /// Reads the current values.
    ///
    /// Fields are read independently; a snapshot taken while calls are
    /// being recorded may mix values from before and after a call.
    #[must_use]
    pub fn snapshot(&self) -> WebhookStats {
        let last = self.last_request_at.load(Ordering::SeqCst);
        WebhookStats {
            total_requests: self.total_requests.load(Ordering::SeqCst),
            success_requests: self.success_requests.load(Ordering::SeqCst),
            failed_requests: self.failed_requests.load(Ordering::SeqCst),
            last_request_at: if last == NEVER {
                None
            } else {
                DateTime::from_timestamp_millis(last)
            },
            average_response: self.average_response.load(Ordering::SeqCst),
            requests_today: self.requests_today.load(Ordering::SeqCst),
            requests_this_week: self.requests_this_week.load(Ordering::SeqCst),
        }
    }
}
