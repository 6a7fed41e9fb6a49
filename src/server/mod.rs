//! HTTP surface.
//!
//! | Route | Purpose |
//! |---|---|
//! | `GET /health` | liveness |
//! | `ANY /webhook/{token}` | public webhook endpoints |
//! | `POST /api/requests/{id}/execute` | run a stored request |
//! | `POST /api/workspaces/{id}/webhooks` | create an endpoint |
//! | `GET /api/webhooks/{id}` | endpoint details and statistics |
//! | `GET /api/webhooks/{id}/requests` | paginated request logs |
//!
//! `/api` routes act on behalf of the user named in the `X-User-Id` header.

mod caller;
mod error;
mod handlers;


use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{any, get, post};
use tower_http::trace::TraceLayer;

use crate::executor::ExecutionEngine;
use crate::store::MemoryStore;
use crate::transport::HttpClient;
use crate::webhook::Responder;

pub use caller::{Caller, USER_ID_HEADER};
pub use error::ApiError;
pub use handlers::{WebhookRequestList, WebhookView};

/// Shared handler state.
#[derive(Debug)]
pub struct AppState<H> {
    pub engine: Arc<ExecutionEngine<H, Arc<MemoryStore>>>,
    pub responder: Arc<Responder<Arc<MemoryStore>>>,
    pub store: Arc<MemoryStore>,
}

impl<H> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            responder: Arc::clone(&self.responder),
            store: Arc::clone(&self.store),
        }
    }
}

impl<H> AppState<H> {
    /// Wires the engine and the responder to one store.
    #[must_use]
    pub fn new(client: H, store: Arc<MemoryStore>) -> Self {
        Self {
            engine: Arc::new(ExecutionEngine::new(client, Arc::clone(&store))),
            responder: Arc::new(Responder::new(Arc::clone(&store))),
            store,
        }
    }
}

/// Builds the application router.
///
/// Inbound bodies larger than `max_body_bytes` are rejected with 413.
pub fn router<H: HttpClient + 'static>(state: AppState<H>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/webhook/{token}", any(handlers::receive_webhook::<H>))
        .route(
            "/api/requests/{id}/execute",
            post(handlers::execute_request::<H>),
        )
        .route(
            "/api/workspaces/{id}/webhooks",
            post(handlers::create_webhook::<H>),
        )
        .route("/api/webhooks/{id}", get(handlers::get_webhook::<H>))
        .route(
            "/api/webhooks/{id}/requests",
            get(handlers::list_webhook_requests::<H>),
        )
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
