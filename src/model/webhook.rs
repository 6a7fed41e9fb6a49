//! Webhook endpoint configuration, statistics and request logs.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::token::generate_token;
use super::{EndpointId, LogId, UserId, WorkspaceId};

/// Default response status for new endpoints.
pub const DEFAULT_RESPONSE_STATUS: u16 = 200;

/// Default response content type for new endpoints.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Default allowed method for new endpoints.
pub const DEFAULT_METHOD: &str = "POST";

/// Lifecycle status of an endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointStatus {
    #[default]
    Active,
    Inactive,
}

/// Inbound authentication scheme for an endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookAuthKind {
    #[default]
    None,
    Basic,
    Bearer,
    /// Declared but not implemented; every call passes.
    Signature,
    /// Any tag this build does not recognize. Treated as a pass.
    #[serde(other)]
    Unknown,
}

/// Inbound authentication requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookAuth {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: WebhookAuthKind,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
    /// Shared secret for signature verification.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

/// Response behaviour of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Allowed inbound methods, matched case-insensitively.
    pub methods: Vec<String>,
    pub response_status: u16,
    pub response_headers: HashMap<String, String>,
    /// Canned body; empty means the default acknowledgment envelope.
    pub response_body: String,
    /// Artificial delay before responding, in milliseconds.
    pub response_delay: u64,
    pub content_type: String,
    pub cors_enabled: bool,
    pub log_requests: bool,
    /// Stored for the dashboard; not enforced here.
    pub max_requests: u32,
    pub authentication: WebhookAuth,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            methods: vec![DEFAULT_METHOD.to_string()],
            response_status: DEFAULT_RESPONSE_STATUS,
            response_headers: HashMap::new(),
            response_body: String::new(),
            response_delay: 0,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            cors_enabled: false,
            log_requests: true,
            max_requests: 0,
            authentication: WebhookAuth::default(),
        }
    }
}

impl WebhookConfig {
    /// Fills zero values with creation defaults and forces request logging on.
    #[must_use]
    pub fn with_creation_defaults(mut self) -> Self {
        if self.response_status == 0 {
            self.response_status = DEFAULT_RESPONSE_STATUS;
        }
        if self.content_type.is_empty() {
            self.content_type = DEFAULT_CONTENT_TYPE.to_string();
        }
        if self.methods.is_empty() {
            self.methods = vec![DEFAULT_METHOD.to_string()];
        }
        self.log_requests = true;
        self
    }

    /// Returns `true` if `method` is one of the allowed methods, ignoring case.
    #[must_use]
    pub fn allows_method(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }
}

/// Accumulated usage statistics.
///
/// `average_response` holds the elapsed time of whichever call was recorded
/// last; it is not a mean. `requests_today` and `requests_this_week` are
/// carried through but rolled over elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookStats {
    pub total_requests: i64,
    pub success_requests: i64,
    pub failed_requests: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_request_at: Option<DateTime<Utc>>,
    /// Milliseconds.
    pub average_response: i64,
    pub requests_today: i64,
    pub requests_this_week: i64,
}

/// A token-addressed inbound mock endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEndpoint {
    pub id: EndpointId,
    pub workspace_id: WorkspaceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Secret routing key. Generated once, never changed.
    pub token: String,
    #[serde(default)]
    pub status: EndpointStatus,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub config: WebhookConfig,
    #[serde(default)]
    pub stats: WebhookStats,
}

/// Input for creating an endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewWebhook {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Lifetime in days; zero means the endpoint never expires.
    #[serde(default)]
    pub expires_in_days: u32,
    #[serde(default)]
    pub config: WebhookConfig,
}

/// Longest accepted endpoint name, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Longest accepted lifetime, in days.
pub const MAX_EXPIRY_DAYS: u32 = 365;

impl NewWebhook {
    /// Checks field limits.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first field out of bounds.
    pub fn validate(&self) -> Result<(), &'static str> {
        let name = self.name.trim().chars().count();
        if name == 0 || name > MAX_NAME_CHARS {
            return Err("Name must be between 1 and 100 characters");
        }
        if self.description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err("Description must be at most 500 characters");
        }
        if self.expires_in_days > MAX_EXPIRY_DAYS {
            return Err("Expiry must be at most 365 days");
        }
        Ok(())
    }
}

impl WebhookEndpoint {
    /// Creates an active endpoint with a freshly generated token.
    #[must_use]
    pub fn create(
        new: NewWebhook,
        workspace_id: WorkspaceId,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Self {
        let expires_at = (new.expires_in_days > 0)
            .then(|| now + Duration::days(i64::from(new.expires_in_days)));

        Self {
            id: EndpointId::new(),
            workspace_id,
            name: new.name,
            description: new.description,
            token: generate_token(),
            status: EndpointStatus::Active,
            created_by,
            created_at: now,
            updated_at: now,
            expires_at,
            config: new.config.with_creation_defaults(),
            stats: WebhookStats::default(),
        }
    }

    /// Returns `true` if an expiry is set and `now` is past it.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| now > expiry)
    }
}

/// Builds the public URL for an endpoint token.
///
/// Local hosts are addressed over plain HTTP, everything else over HTTPS.
#[must_use]
pub fn webhook_url(host: &str, token: &str) -> String {
    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };
    format!("{scheme}://{host}/webhook/{token}")
}

/// One logged inbound call. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookRequestLog {
    pub id: LogId,
    pub webhook_id: EndpointId,
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub user_agent: String,
    pub ip: String,
    /// Inbound body length in bytes.
    pub size: i64,
    pub response_status: u16,
    /// Milliseconds from intake to just before emission.
    pub response_time: i64,
    pub response_size: i64,
    pub timestamp: DateTime<Utc>,
    pub processed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
