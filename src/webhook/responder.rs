//! Gate evaluation, response emission and post-response bookkeeping.

use std::time::Duration;

use http::StatusCode;
use thiserror::Error;

use super::response::{WebhookResponse, build_response};
use super::{InboundRequest, verify};
use crate::model::{EndpointId, EndpointStatus, LogId, WebhookEndpoint, WebhookRequestLog};
use crate::store::{StoreError, WebhookStore};
use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};

/// Why an inbound call was turned away before reaching the endpoint.
#[derive(Debug, Error)]
pub enum Rejection {
    /// The path carried no token.
    #[error("Webhook token is required")]
    MissingToken,

    /// No endpoint has this token.
    #[error("Webhook not found")]
    NotFound,

    /// The endpoint lookup itself failed.
    #[error("Failed to find webhook")]
    Lookup(#[source] StoreError),

    /// The endpoint is not active.
    #[error("Webhook is inactive")]
    Inactive,

    /// The endpoint's expiry has passed.
    #[error("Webhook has expired")]
    Expired,

    /// The method is not among the endpoint's allowed methods.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Authentication is enabled and the call did not satisfy it.
    #[error("Authentication failed")]
    Unauthorized,
}

impl Rejection {
    /// HTTP status reported to the caller.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingToken => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Inactive | Self::Expired => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn into_response(self) -> WebhookResponse {
        WebhookResponse::error(self.status(), &self.to_string())
    }
}

/// Bookkeeping owed for a call that reached emission.
///
/// Pass it to [`Responder::record`] once the response is on its way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Followup {
    pub endpoint: EndpointId,
    /// `false` only when the endpoint's own response could not be built.
    pub success: bool,
    /// Milliseconds from intake to just before emission.
    pub elapsed_ms: i64,
    /// Present when the endpoint logs requests.
    pub log: Option<WebhookRequestLog>,
}

/// Outcome of [`Responder::handle`].
#[derive(Debug)]
pub struct Handled {
    pub response: WebhookResponse,
    /// `None` for rejected calls, which are neither logged nor counted.
    pub followup: Option<Followup>,
}

/// Serves token-addressed webhook endpoints.
///
/// # Type Parameters
///
/// - `S`: The store resolving tokens and receiving logs and statistics
/// - `C`: The clock for expiry checks and timestamps (defaults to [`SystemClock`])
/// - `Z`: The sleeper applying configured delays (defaults to [`TokioSleeper`])
#[derive(Debug)]
pub struct Responder<S, C = SystemClock, Z = TokioSleeper> {
    store: S,
    clock: C,
    sleeper: Z,
}

impl<S> Responder<S, SystemClock, TokioSleeper> {
    /// Creates a responder using the system clock and the tokio timer.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
            sleeper: TokioSleeper,
        }
    }
}

impl<S, C, Z> Responder<S, C, Z> {
    /// Sets a custom clock.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> Responder<S, C2, Z> {
        Responder {
            store: self.store,
            clock,
            sleeper: self.sleeper,
        }
    }

    /// Sets a custom sleeper for configured delays.
    #[must_use]
    pub fn with_sleeper<Z2>(self, sleeper: Z2) -> Responder<S, C, Z2> {
        Responder {
            store: self.store,
            clock: self.clock,
            sleeper,
        }
    }

    /// Returns the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: WebhookStore, C: Clock, Z: Sleeper> Responder<S, C, Z> {
    /// Answers one inbound call to the endpoint addressed by `token`.
    ///
    /// Rejections produce an error response and no followup. Otherwise the
    /// configured delay is applied in full before the response is built.
    /// Elapsed time runs from `request.received_at`.
    pub async fn handle(&self, token: &str, request: &InboundRequest) -> Handled {
        let endpoint = match self.admit(token, request).await {
            Ok(endpoint) => endpoint,
            Err(rejection) => {
                tracing::debug!(
                    method = %request.method,
                    reason = %rejection,
                    "Webhook call rejected"
                );
                return Handled {
                    response: rejection.into_response(),
                    followup: None,
                };
            }
        };

        let config = &endpoint.config;
        if config.response_delay > 0 {
            self.sleeper
                .sleep(Duration::from_millis(config.response_delay))
                .await;
        }

        let now = self.clock.now();
        let (response, error) = match build_response(config, now) {
            Ok(response) => (response, None),
            Err(e) => {
                tracing::warn!(webhook_id = %endpoint.id, error = %e, "Invalid webhook response configuration");
                (
                    WebhookResponse::error(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to build webhook response",
                    ),
                    Some(e.to_string()),
                )
            }
        };
        let elapsed_ms =
            i64::try_from(request.received_at.elapsed().as_millis()).unwrap_or(i64::MAX);

        let log = config.log_requests.then(|| WebhookRequestLog {
            id: LogId::new(),
            webhook_id: endpoint.id,
            method: request.method.as_str().to_string(),
            path: request.path.clone(),
            query: request.query_map(),
            headers: request.header_map(),
            body: request.body_text_lossy(),
            user_agent: request.user_agent(),
            ip: request
                .remote_addr
                .map(|addr| addr.to_string())
                .unwrap_or_default(),
            size: byte_len(request.body.len()),
            response_status: response.status.as_u16(),
            response_time: elapsed_ms,
            response_size: byte_len(response.body.len()),
            timestamp: now,
            processed: true,
            error: error.clone(),
        });

        tracing::debug!(
            webhook_id = %endpoint.id,
            method = %request.method,
            status = response.status.as_u16(),
            elapsed_ms,
            "Webhook call answered"
        );

        Handled {
            response,
            followup: Some(Followup {
                endpoint: endpoint.id,
                success: error.is_none(),
                elapsed_ms,
                log,
            }),
        }
    }

    /// Persists the log entry and counts the call.
    ///
    /// Failures are logged and otherwise ignored; the caller already has
    /// its response.
    pub async fn record(&self, followup: Followup) {
        if let Some(log) = followup.log {
            if let Err(e) = self.store.append_webhook_log(log).await {
                tracing::warn!(webhook_id = %followup.endpoint, error = %e, "Failed to log webhook request");
            }
        }

        if let Err(e) = self
            .store
            .increment_webhook_stats(followup.endpoint, followup.success, followup.elapsed_ms)
            .await
        {
            tracing::warn!(webhook_id = %followup.endpoint, error = %e, "Failed to update webhook stats");
        }
    }

    /// Runs the gates in order, returning the endpoint if all pass.
    async fn admit(
        &self,
        token: &str,
        request: &InboundRequest,
    ) -> Result<WebhookEndpoint, Rejection> {
        if token.is_empty() {
            return Err(Rejection::MissingToken);
        }

        let endpoint = match self.store.get_endpoint_by_token(token).await {
            Ok(endpoint) => endpoint,
            Err(StoreError::NotFound(_)) => return Err(Rejection::NotFound),
            Err(e) => return Err(Rejection::Lookup(e)),
        };

        if endpoint.status != EndpointStatus::Active {
            return Err(Rejection::Inactive);
        }
        if endpoint.is_expired(self.clock.now()) {
            return Err(Rejection::Expired);
        }
        if !endpoint.config.allows_method(request.method.as_str()) {
            return Err(Rejection::MethodNotAllowed);
        }

        let auth = &endpoint.config.authentication;
        if auth.enabled && !verify(auth, &request.headers) {
            return Err(Rejection::Unauthorized);
        }

        Ok(endpoint)
    }
}

fn byte_len(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}
