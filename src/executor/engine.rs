//! Request execution engine.

use http::header::{HeaderName, HeaderValue};
use tokio::time::Instant;

use super::ExecuteError;
use crate::auth;
use crate::model::{ExecuteResponse, ExecutionId, ExecutionRecord, RequestId, RequestSpec, UserId};
use crate::store::RequestStore;
use crate::time::{Clock, SystemClock};
use crate::transport::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Executes stored requests against remote servers.
///
/// The engine holds no per-call state, so one instance serves any number
/// of concurrent executions. The call duration bound belongs to the
/// injected [`HttpClient`].
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The store providing requests and receiving execution history
/// - `C`: The clock stamping history entries (defaults to [`SystemClock`])
#[derive(Debug)]
pub struct ExecutionEngine<H, S, C = SystemClock> {
    client: H,
    store: S,
    clock: C,
}

impl<H, S> ExecutionEngine<H, S, SystemClock> {
    /// Creates an engine using the system clock.
    #[must_use]
    pub const fn new(client: H, store: S) -> Self {
        Self {
            client,
            store,
            clock: SystemClock,
        }
    }
}

impl<H, S, C> ExecutionEngine<H, S, C> {
    /// Sets a custom clock for history timestamps.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> ExecutionEngine<H, S, C2> {
        ExecutionEngine {
            client: self.client,
            store: self.store,
            clock,
        }
    }

    /// Returns the backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

/// Builds the transport request for `spec` without sending it.
///
/// Stored headers are inserted first; credentials from `spec.auth` are
/// applied afterwards and replace a stored header of the same name.
/// Empty body content produces a request with no body at all.
///
/// # Errors
///
/// Returns [`ExecuteError::InvalidRequest`] if the URL is malformed or not
/// `http`/`https`, or a stored header cannot be encoded.
pub fn build_request(spec: &RequestSpec) -> Result<HttpRequest, ExecuteError> {
    if spec.url.trim().is_empty() {
        return Err(ExecuteError::InvalidRequest("URL is required".to_string()));
    }

    let url = url::Url::parse(&spec.url)
        .map_err(|e| ExecuteError::InvalidRequest(format!("Invalid URL '{}': {e}", spec.url)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ExecuteError::InvalidRequest(format!(
            "Unsupported URL scheme '{}'",
            url.scheme()
        )));
    }

    let mut request = HttpRequest::new(spec.method.as_method(), url);

    for (name, value) in &spec.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ExecuteError::InvalidRequest(format!("Invalid header name '{name}': {e}"))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            ExecuteError::InvalidRequest(format!("Invalid header value for '{name}': {e}"))
        })?;
        request.headers.insert(header_name, header_value);
    }

    auth::apply(&spec.auth, &mut request.headers);

    if !spec.body.is_empty() {
        request.body = Some(spec.body.content.clone().into_bytes());
    }

    Ok(request)
}

fn normalize(response: &HttpResponse, time_ms: u64) -> ExecuteResponse {
    ExecuteResponse {
        status: response.status.as_u16(),
        headers: response.first_header_values(),
        body: response.body_text_lossy(),
        time_ms,
    }
}

impl<H: HttpClient, S: RequestStore, C: Clock> ExecutionEngine<H, S, C> {
    /// Executes `spec` on behalf of `caller`.
    ///
    /// Elapsed time is measured from just before dispatch until the full
    /// body has been read. The outcome is appended to the execution
    /// history; a failure to do so is logged and does not affect the
    /// returned response.
    ///
    /// # Errors
    ///
    /// - [`ExecuteError::InvalidRequest`] if the request cannot be built;
    ///   nothing is sent
    /// - [`ExecuteError::ExecutionFailed`] if the call does not complete;
    ///   there is no retry
    pub async fn execute(
        &self,
        spec: &RequestSpec,
        caller: UserId,
    ) -> Result<ExecuteResponse, ExecuteError> {
        let request = build_request(spec)?;

        tracing::debug!(
            request_id = %spec.id,
            method = %spec.method,
            url = %request.url,
            "Executing request"
        );

        let started = Instant::now();
        let response = match self.client.request(request).await {
            Ok(response) => response,
            Err(HttpError::InvalidRequest(reason)) => {
                return Err(ExecuteError::InvalidRequest(reason));
            }
            Err(cause) => {
                tracing::info!(request_id = %spec.id, error = %cause, "Request execution failed");
                return Err(ExecuteError::ExecutionFailed { cause });
            }
        };
        let time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let response = normalize(&response, time_ms);

        tracing::debug!(
            request_id = %spec.id,
            status = response.status,
            time_ms,
            "Request executed"
        );

        self.record(spec, caller, &response).await;
        Ok(response)
    }

    /// Loads a stored request, checks the caller may use its collection,
    /// and executes it.
    ///
    /// # Errors
    ///
    /// [`ExecuteError::NotFound`] or [`ExecuteError::AccessDenied`] from the
    /// lookup, otherwise as [`execute`](Self::execute).
    pub async fn execute_stored(
        &self,
        id: RequestId,
        caller: UserId,
    ) -> Result<ExecuteResponse, ExecuteError> {
        let spec = self.store.get_request_spec(id).await?;
        self.store
            .authorize_collection(caller, spec.collection_id)
            .await?;
        self.execute(&spec, caller).await
    }

    async fn record(&self, spec: &RequestSpec, caller: UserId, response: &ExecuteResponse) {
        let record = ExecutionRecord {
            id: ExecutionId::new(),
            request_id: spec.id,
            user_id: caller,
            request_data: spec.clone(),
            response_data: response.clone(),
            executed_at: self.clock.now(),
        };

        if let Err(e) = self.store.append_execution_record(record).await {
            tracing::warn!(request_id = %spec.id, error = %e, "Failed to store execution history");
        }
    }
}
