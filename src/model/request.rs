//! Stored outbound request descriptions and execution results.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CollectionId, ExecutionId, RequestId, UserId};

/// HTTP methods a stored request may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Returns the equivalent `http` crate method.
    #[must_use]
    pub fn as_method(self) -> http::Method {
        match self {
            Self::Get => http::Method::GET,
            Self::Post => http::Method::POST,
            Self::Put => http::Method::PUT,
            Self::Delete => http::Method::DELETE,
            Self::Patch => http::Method::PATCH,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_method().as_str())
    }
}

/// How the body content is encoded. Informational only; the content is
/// sent verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    Json,
    Form,
    #[default]
    Raw,
    Binary,
}

/// Body of a stored request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(rename = "type", default)]
    pub kind: BodyType,
    #[serde(default)]
    pub content: String,
}

impl RequestBody {
    /// Returns `true` when there is no content to send.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Outbound authentication scheme.
///
/// Unknown tags are rejected when a request is deserialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    #[default]
    None,
    Bearer,
    Basic,
    #[serde(rename = "apikey")]
    ApiKey,
}

/// Outbound authentication descriptor: a scheme plus its credentials.
///
/// Expected credential keys per scheme: `token` (bearer), `username` and
/// `password` (basic), `key` and `header` (apikey).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    #[serde(rename = "type", default)]
    pub kind: AuthType,
    #[serde(default)]
    pub credentials: HashMap<String, String>,
}

impl Auth {
    /// Creates a descriptor from a scheme and `(key, value)` credential pairs.
    #[must_use]
    pub fn new<'a>(kind: AuthType, credentials: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            kind,
            credentials: credentials
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Looks up a credential by key.
    #[must_use]
    pub fn credential(&self, key: &str) -> Option<&str> {
        self.credentials.get(key).map(String::as_str)
    }
}

/// A stored, replayable description of an outbound HTTP call.
///
/// Header, body, auth and tests are always present once deserialized;
/// absent fields become empty containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    pub id: RequestId,
    pub name: String,
    pub method: HttpMethod,
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: RequestBody,
    #[serde(default)]
    pub auth: Auth,
    /// Opaque assertion scripts; stored, never evaluated.
    #[serde(default)]
    pub tests: Vec<String>,
    pub collection_id: CollectionId,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized result of one outbound call.
///
/// Multi-valued response headers collapse to their first value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    /// Elapsed wall time in whole milliseconds, including body drain.
    #[serde(rename = "time")]
    pub time_ms: u64,
}

/// Append-only history entry for one execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub id: ExecutionId,
    pub request_id: RequestId,
    pub user_id: UserId,
    pub request_data: RequestSpec,
    pub response_data: ExecuteResponse,
    pub executed_at: DateTime<Utc>,
}
