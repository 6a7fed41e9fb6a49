//! Domain types shared by the executor, the responder and the store.
//!
//! - Stored outbound requests and their execution results ([`RequestSpec`],
//!   [`ExecuteResponse`], [`ExecutionRecord`])
//! - Webhook endpoints, their configuration and statistics
//!   ([`WebhookEndpoint`], [`WebhookConfig`], [`WebhookStats`])
//! - Inbound request logs ([`WebhookRequestLog`])
//! - Identifier newtypes and token generation

mod ids;
mod request;
mod token;
mod webhook;


pub use ids::{CollectionId, EndpointId, ExecutionId, LogId, RequestId, UserId, WorkspaceId};
pub use request::{
    Auth, AuthType, BodyType, ExecuteResponse, ExecutionRecord, HttpMethod, RequestBody,
    RequestSpec,
};
pub use token::{TOKEN_BYTES, generate_token};
pub use webhook::{
    DEFAULT_CONTENT_TYPE, DEFAULT_METHOD, DEFAULT_RESPONSE_STATUS, EndpointStatus,
    MAX_DESCRIPTION_CHARS, MAX_EXPIRY_DAYS, MAX_NAME_CHARS, NewWebhook, WebhookAuth,
    WebhookAuthKind, WebhookConfig, WebhookEndpoint, WebhookRequestLog, WebhookStats, webhook_url,
};
