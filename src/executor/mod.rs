//! Outbound request execution.
//!
//! [`ExecutionEngine`] turns a stored [`RequestSpec`](crate::model::RequestSpec)
//! into a live HTTP call, normalizes whatever the remote server answers,
//! and appends the outcome to the execution history.

mod engine;
mod error;


pub use engine::{ExecutionEngine, build_request};
pub use error::ExecuteError;
