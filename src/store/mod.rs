//! Persistence collaborators consumed by the executor and the responder.
//!
//! The traits here are the only contact points with stored data:
//! - [`RequestStore`]: stored requests, collection access, execution history
//! - [`WebhookStore`]: endpoint lookup, workspace access, request logs, stats
//!
//! [`MemoryStore`] implements both over concurrent maps and can be seeded
//! from a fixtures file ([`load_fixtures`]).

mod fixtures;
mod memory;
mod stats;

#[cfg(test)]
mod memory_tests;
#[cfg(test)]
mod stats_tests;

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    CollectionId, EndpointId, ExecutionRecord, RequestId, RequestSpec, UserId, WebhookEndpoint,
    WebhookRequestLog, WorkspaceId,
};

pub use fixtures::{
    Collection, FIXTURE_FILE_VERSION, FixtureError, FixtureFile, Workspace, load_fixtures,
};
pub use memory::MemoryStore;
pub use stats::StatsCell;

/// Errors reported by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested document does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The caller may not access the document.
    #[error("Access denied")]
    AccessDenied,

    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing store failed.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Default page size for log listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest accepted page size.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// A requested page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

const fn first_page() -> u32 {
    1
}

const fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: first_page(),
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    /// Clamps out-of-range values: page 0 becomes 1, a limit outside
    /// `1..=MAX_PAGE_LIMIT` becomes [`DEFAULT_PAGE_LIMIT`].
    #[must_use]
    pub const fn normalized(self) -> Self {
        let page = if self.page < 1 { 1 } else { self.page };
        let limit = if self.limit < 1 || self.limit > MAX_PAGE_LIMIT {
            DEFAULT_PAGE_LIMIT
        } else {
            self.limit
        };
        Self { page, limit }
    }

    /// Number of items preceding this page.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.page.saturating_sub(1) as usize * self.limit as usize
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

/// Access to stored requests and execution history.
pub trait RequestStore: Send + Sync {
    /// Fetches a stored request.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no request has this id.
    fn get_request_spec(
        &self,
        id: RequestId,
    ) -> impl Future<Output = Result<RequestSpec, StoreError>> + Send;

    /// Succeeds if `caller` belongs to the workspace owning `collection`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] for an unknown collection,
    /// [`StoreError::AccessDenied`] for a non-member.
    fn authorize_collection(
        &self,
        caller: UserId,
        collection: CollectionId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Appends an execution to the history.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    fn append_execution_record(
        &self,
        record: ExecutionRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Access to webhook endpoints, their logs and statistics.
pub trait WebhookStore: Send + Sync {
    /// Fetches an endpoint by id, with current statistics.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no endpoint has this id.
    fn get_endpoint(
        &self,
        id: EndpointId,
    ) -> impl Future<Output = Result<WebhookEndpoint, StoreError>> + Send;

    /// Fetches an endpoint by exact token match, with current statistics.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if no endpoint has this token.
    fn get_endpoint_by_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<WebhookEndpoint, StoreError>> + Send;

    /// Succeeds if `caller` owns or is a member of `workspace`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] for an unknown workspace,
    /// [`StoreError::AccessDenied`] for a non-member.
    fn authorize_workspace(
        &self,
        caller: UserId,
        workspace: WorkspaceId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Appends an inbound request log entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be persisted.
    fn append_webhook_log(
        &self,
        entry: WebhookRequestLog,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Atomically counts one handled call: increments the total and either
    /// the success or failure counter, and overwrites the last-request time
    /// and the response-time value.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the endpoint no longer exists.
    fn increment_webhook_stats(
        &self,
        id: EndpointId,
        success: bool,
        elapsed_ms: i64,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Lists an endpoint's logs, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs cannot be read.
    fn list_webhook_logs(
        &self,
        id: EndpointId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<WebhookRequestLog>, StoreError>> + Send;
}

impl<T: RequestStore> RequestStore for Arc<T> {
    fn get_request_spec(
        &self,
        id: RequestId,
    ) -> impl Future<Output = Result<RequestSpec, StoreError>> + Send {
        (**self).get_request_spec(id)
    }

    fn authorize_collection(
        &self,
        caller: UserId,
        collection: CollectionId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).authorize_collection(caller, collection)
    }

    fn append_execution_record(
        &self,
        record: ExecutionRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).append_execution_record(record)
    }
}

impl<T: WebhookStore> WebhookStore for Arc<T> {
    fn get_endpoint(
        &self,
        id: EndpointId,
    ) -> impl Future<Output = Result<WebhookEndpoint, StoreError>> + Send {
        (**self).get_endpoint(id)
    }

    fn get_endpoint_by_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<WebhookEndpoint, StoreError>> + Send {
        (**self).get_endpoint_by_token(token)
    }

    fn authorize_workspace(
        &self,
        caller: UserId,
        workspace: WorkspaceId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).authorize_workspace(caller, workspace)
    }

    fn append_webhook_log(
        &self,
        entry: WebhookRequestLog,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).append_webhook_log(entry)
    }

    fn increment_webhook_stats(
        &self,
        id: EndpointId,
        success: bool,
        elapsed_ms: i64,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).increment_webhook_stats(id, success, elapsed_ms)
    }

    fn list_webhook_logs(
        &self,
        id: EndpointId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<WebhookRequestLog>, StoreError>> + Send {
        (**self).list_webhook_logs(id, page)
    }
}
