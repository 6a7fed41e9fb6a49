//! Inbound webhook responder.
//!
//! Every call addressed to `/webhook/{token}` passes through an ordered set
//! of gates before a response is produced:
//!
//! 1. token lookup (404)
//! 2. endpoint status (403)
//! 3. expiry (403)
//! 4. allowed methods (405)
//! 5. inbound authentication, when enabled (401)
//!
//! Calls that pass every gate are delayed as configured, answered with the
//! endpoint's canned response, and then logged and counted through a
//! [`Followup`]. Rejected calls leave no trace in logs or statistics.

mod auth;
mod inbound;
mod responder;
mod response;

#[cfg(test)]
mod inbound_tests;

pub use auth::verify;
pub use inbound::InboundRequest;
pub use responder::{Followup, Handled, Rejection, Responder};
pub use response::{ACK_MESSAGE, CORS_ALLOW_HEADERS, ResponseError, WebhookResponse, build_response};
