//! Route handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, FromRequest, Path, Query, Request, State};
use axum::http::header::HOST;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::{ApiError, AppState, Caller};
use crate::model::{
    EndpointId, ExecuteResponse, NewWebhook, RequestId, WebhookEndpoint, WebhookRequestLog,
    WorkspaceId, webhook_url,
};
use crate::store::{PageRequest, WebhookStore};
use crate::transport::HttpClient;
use crate::webhook::{Handled, InboundRequest, WebhookResponse};

const FORWARDED_HOST: &str = "x-forwarded-host";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `ANY /webhook/{token}`
///
/// Elapsed time is measured from here, so a slow upload counts toward it.
/// Bookkeeping for answered calls runs in a spawned task, after the
/// response has been produced.
pub async fn receive_webhook<H: HttpClient + 'static>(
    State(state): State<AppState<H>>,
    Path(token): Path<String>,
    request: Request,
) -> Response {
    let received_at = Instant::now();
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let headers = request.headers().clone();

    let body = match Bytes::from_request(request, &state).await {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Failed to read webhook body");
            return into_response(WebhookResponse::error(
                rejection.status(),
                &rejection.body_text(),
            ));
        }
    };

    let inbound = InboundRequest {
        method,
        path,
        query,
        headers,
        body: body.to_vec(),
        remote_addr,
        received_at,
    };

    let Handled { response, followup } = state.responder.handle(&token, &inbound).await;

    if let Some(followup) = followup {
        let responder = Arc::clone(&state.responder);
        tokio::spawn(async move {
            responder.record(followup).await;
        });
    }

    into_response(response)
}

fn into_response(webhook: WebhookResponse) -> Response {
    let mut response = Response::new(Body::from(webhook.body));
    *response.status_mut() = webhook.status;
    *response.headers_mut() = webhook.headers;
    response
}

/// `POST /api/requests/{id}/execute`
pub async fn execute_request<H: HttpClient + 'static>(
    State(state): State<AppState<H>>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    let id: RequestId = id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid request ID".to_string()))?;

    let response = state.engine.execute_stored(id, caller).await?;
    Ok(Json(response))
}

/// An endpoint together with its public URL.
#[derive(Debug, Serialize)]
pub struct WebhookView {
    #[serde(flatten)]
    pub endpoint: WebhookEndpoint,
    pub url: String,
}

impl WebhookView {
    fn new(endpoint: WebhookEndpoint, headers: &HeaderMap) -> Self {
        let url = webhook_url(&public_host(headers), &endpoint.token);
        Self { endpoint, url }
    }
}

/// Host the caller used to reach this service.
fn public_host(headers: &HeaderMap) -> String {
    headers
        .get(FORWARDED_HOST)
        .or_else(|| headers.get(HOST))
        .and_then(|value| value.to_str().ok())
        .filter(|host| !host.is_empty())
        .unwrap_or("localhost")
        .to_string()
}

/// `POST /api/workspaces/{id}/webhooks`
pub async fn create_webhook<H: HttpClient + 'static>(
    State(state): State<AppState<H>>,
    Caller(caller): Caller,
    Path(workspace): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<NewWebhook>, JsonRejection>,
) -> Result<(StatusCode, Json<WebhookView>), ApiError> {
    let workspace: WorkspaceId = workspace
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid workspace ID".to_string()))?;
    let Json(new) = payload?;
    new.validate()
        .map_err(|reason| ApiError::BadRequest(reason.to_string()))?;

    state.store.authorize_workspace(caller, workspace).await?;

    let endpoint = WebhookEndpoint::create(new, workspace, caller, chrono::Utc::now());
    state.store.insert_endpoint(endpoint.clone())?;

    tracing::info!(webhook_id = %endpoint.id, workspace_id = %workspace, "Webhook created");

    Ok((StatusCode::CREATED, Json(WebhookView::new(endpoint, &headers))))
}

/// Loads an endpoint the caller may see.
async fn visible_endpoint<H>(
    state: &AppState<H>,
    caller: Caller,
    id: &str,
) -> Result<WebhookEndpoint, ApiError> {
    let id: EndpointId = id
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid webhook ID".to_string()))?;
    let endpoint = state.store.get_endpoint(id).await?;
    state
        .store
        .authorize_workspace(caller.0, endpoint.workspace_id)
        .await?;
    Ok(endpoint)
}

/// `GET /api/webhooks/{id}`
pub async fn get_webhook<H: HttpClient + 'static>(
    State(state): State<AppState<H>>,
    caller: Caller,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<WebhookView>, ApiError> {
    let endpoint = visible_endpoint(&state, caller, &id).await?;
    Ok(Json(WebhookView::new(endpoint, &headers)))
}

/// Raw paging parameters. Unparseable values fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    page: Option<String>,
    limit: Option<String>,
}

impl PageParams {
    /// Out-of-range values are left for [`PageRequest::normalized`].
    fn to_page_request(&self) -> PageRequest {
        let parse = |value: &Option<String>| {
            value
                .as_deref()
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(0)
        };
        PageRequest {
            page: parse(&self.page),
            limit: parse(&self.limit),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WebhookRequestList {
    pub requests: Vec<WebhookRequestLog>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

/// `GET /api/webhooks/{id}/requests?page=&limit=`
pub async fn list_webhook_requests<H: HttpClient + 'static>(
    State(state): State<AppState<H>>,
    caller: Caller,
    Path(id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<WebhookRequestList>, ApiError> {
    let endpoint = visible_endpoint(&state, caller, &id).await?;
    let page = state
        .store
        .list_webhook_logs(endpoint.id, params.to_page_request())
        .await?;

    Ok(Json(WebhookRequestList {
        requests: page.items,
        total: page.total,
        page: page.page,
        limit: page.limit,
        has_more: page.has_more,
    }))
}
