//! Default values for configuration options.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

/// Default listen address.
pub const LISTEN: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8080));

/// Default cap on inbound request bodies, in bytes (2 MiB).
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Default number of request logs kept per webhook.
pub const MAX_LOGS_PER_WEBHOOK: usize = 1000;

/// Default bound on one outbound execution, in seconds.
pub const EXECUTE_TIMEOUT_SECS: u64 = 30;

/// Default outbound execution bound as Duration.
#[must_use]
pub const fn execute_timeout() -> Duration {
    Duration::from_secs(EXECUTE_TIMEOUT_SECS)
}
