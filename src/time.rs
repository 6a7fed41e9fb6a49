//! Injected time sources.
//!
//! Endpoint expiry, history timestamps and configured response delays all
//! go through [`Clock`] and [`Sleeper`], so tests can pin the wall clock
//! and skip the waiting.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Wall-clock source in UTC.
///
/// ```
/// use volt_engine::time::{Clock, SystemClock};
///
/// let stamped = SystemClock.now();
/// assert!(stamped.timestamp() > 0);
/// ```
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<T: Clock> Clock for std::sync::Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Abstraction over suspending the current task.
pub trait Sleeper: Send + Sync {
    /// Suspends the calling task for `duration`.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Production sleeper backed by the tokio timer.
///
/// Only the calling task is suspended; other in-flight calls keep running.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately. Intended for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
