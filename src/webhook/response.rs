//! Building the configured response of an endpoint.

use chrono::{DateTime, SecondsFormat, Utc};
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
};
use http::StatusCode;
use thiserror::Error;

use crate::model::WebhookConfig;

/// Acknowledgment sent when an endpoint has no configured body.
pub const ACK_MESSAGE: &str = "Webhook received successfully";

/// Content type sent when the endpoint configures none.
pub const FALLBACK_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Request headers a CORS-enabled endpoint allows.
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// The configured response cannot be represented in HTTP.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The configured status code is outside 100..=999.
    #[error("Invalid response status {0}")]
    InvalidStatus(u16),

    /// A configured header name or value cannot be encoded.
    #[error("Invalid response header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
}

/// A fully built webhook response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl WebhookResponse {
    /// A JSON `{"error": message}` response.
    #[must_use]
    pub fn error(status: StatusCode, message: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            status,
            headers,
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }
}

/// Builds the response `config` describes, stamping the default
/// acknowledgment with `now`.
///
/// Headers are applied in order: CORS, custom headers, then the content
/// type, so the configured content type wins over a custom `Content-Type`.
/// An empty content type falls back to [`FALLBACK_CONTENT_TYPE`].
///
/// # Errors
///
/// Returns [`ResponseError`] if the status or any header is unrepresentable.
pub fn build_response(
    config: &WebhookConfig,
    now: DateTime<Utc>,
) -> Result<WebhookResponse, ResponseError> {
    let status = StatusCode::from_u16(config.response_status)
        .map_err(|_| ResponseError::InvalidStatus(config.response_status))?;

    let mut headers = HeaderMap::new();

    if config.cors_enabled {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            header_value("Access-Control-Allow-Methods", &config.methods.join(", "))?,
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CORS_ALLOW_HEADERS),
        );
    }

    for (name, value) in &config.response_headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ResponseError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        headers.insert(header_name, header_value(name, value)?);
    }

    let content_type = if config.content_type.is_empty() {
        HeaderValue::from_static(FALLBACK_CONTENT_TYPE)
    } else {
        header_value("Content-Type", &config.content_type)?
    };
    headers.insert(CONTENT_TYPE, content_type);

    let body = if config.response_body.is_empty() {
        acknowledgment(now)
    } else {
        config.response_body.clone()
    };

    Ok(WebhookResponse {
        status,
        headers,
        body,
    })
}

/// The default body: `{"message": …, "timestamp": <RFC 3339>}`.
#[must_use]
pub fn acknowledgment(now: DateTime<Utc>) -> String {
    serde_json::json!({
        "message": ACK_MESSAGE,
        "timestamp": now.to_rfc3339_opts(SecondsFormat::Secs, true),
    })
    .to_string()
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, ResponseError> {
    HeaderValue::from_str(value).map_err(|e| ResponseError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
