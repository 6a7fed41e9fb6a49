//! Volt engine: request execution and configurable webhook responses for an
//! API-testing platform.
//!
//! Two halves share one store:
//!
//! - [`executor`] sends stored requests to third-party servers and records
//!   what came back.
//! - [`webhook`] answers inbound calls on token-addressed endpoints with a
//!   per-endpoint configured response, then logs and counts them.
//!
//! [`server`] exposes both over HTTP; [`config`] resolves the runtime
//! settings.

pub mod auth;
pub mod config;
pub mod executor;
pub mod model;
pub mod server;
pub mod store;
pub mod time;
pub mod transport;
pub mod webhook;

#[cfg(test)]
mod test_fixtures;
