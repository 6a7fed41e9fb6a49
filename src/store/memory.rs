//! In-process store over concurrent maps.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::fixtures::{Collection, Workspace};
use super::{Page, PageRequest, RequestStore, StatsCell, StoreError, WebhookStore};
use crate::model::{
    CollectionId, EndpointId, ExecutionRecord, RequestId, RequestSpec, UserId, WebhookEndpoint,
    WebhookRequestLog, WorkspaceId,
};

const REQUEST: &str = "Request";
const COLLECTION: &str = "Collection";
const WORKSPACE: &str = "Workspace";
const WEBHOOK: &str = "Webhook";

/// Store holding every document in memory.
///
/// Each endpoint's statistics live in a shared [`StatsCell`] so that
/// concurrent calls to the same endpoint update them without locking.
/// Execution history and request logs are append-only. With a log cap set,
/// each endpoint keeps only its most recent request logs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    workspaces: DashMap<WorkspaceId, Workspace>,
    collections: DashMap<CollectionId, WorkspaceId>,
    requests: DashMap<RequestId, RequestSpec>,
    endpoints: DashMap<EndpointId, WebhookEndpoint>,
    tokens: DashMap<String, EndpointId>,
    stats: DashMap<EndpointId, Arc<StatsCell>>,
    executions: DashMap<RequestId, Vec<ExecutionRecord>>,
    webhook_logs: DashMap<EndpointId, VecDeque<WebhookRequestLog>>,
    log_cap: Option<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at most `cap` request logs per endpoint, dropping the oldest.
    /// A cap of 0 is treated as 1.
    #[must_use]
    pub fn with_log_cap(mut self, cap: usize) -> Self {
        self.log_cap = Some(cap.max(1));
        self
    }

    /// Adds or replaces a workspace.
    pub fn insert_workspace(&self, workspace: Workspace) {
        self.workspaces.insert(workspace.id, workspace);
    }

    /// Adds or replaces a collection's workspace assignment.
    pub fn insert_collection(&self, collection: Collection) {
        self.collections
            .insert(collection.id, collection.workspace_id);
    }

    /// Adds or replaces a stored request.
    pub fn insert_request(&self, spec: RequestSpec) {
        self.requests.insert(spec.id, spec);
    }

    /// Adds an endpoint, seeding its statistics from `endpoint.stats`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Conflict`] if the token or the id is already taken.
    pub fn insert_endpoint(&self, endpoint: WebhookEndpoint) -> Result<(), StoreError> {
        let id = endpoint.id;
        let Entry::Vacant(token_slot) = self.tokens.entry(endpoint.token.clone()) else {
            return Err(StoreError::Conflict(format!(
                "webhook token already in use (endpoint {id})"
            )));
        };
        let Entry::Vacant(endpoint_slot) = self.endpoints.entry(id) else {
            return Err(StoreError::Conflict(format!("webhook {id} already exists")));
        };

        self.stats
            .insert(id, Arc::new(StatsCell::from_snapshot(&endpoint.stats)));
        endpoint_slot.insert(endpoint);
        token_slot.insert(id);
        Ok(())
    }

    /// Returns the execution history of a request, oldest first.
    #[must_use]
    pub fn executions(&self, request: RequestId) -> Vec<ExecutionRecord> {
        self.executions
            .get(&request)
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    fn check_member(&self, caller: UserId, workspace: WorkspaceId) -> Result<(), StoreError> {
        let workspace = self
            .workspaces
            .get(&workspace)
            .ok_or(StoreError::NotFound(WORKSPACE))?;
        if workspace.has_member(caller) {
            Ok(())
        } else {
            Err(StoreError::AccessDenied)
        }
    }

    fn endpoint_with_stats(&self, id: EndpointId) -> Result<WebhookEndpoint, StoreError> {
        let mut endpoint = self
            .endpoints
            .get(&id)
            .map(|e| e.clone())
            .ok_or(StoreError::NotFound(WEBHOOK))?;
        if let Some(cell) = self.stats.get(&id) {
            endpoint.stats = cell.snapshot();
        }
        Ok(endpoint)
    }
}

impl RequestStore for MemoryStore {
    async fn get_request_spec(&self, id: RequestId) -> Result<RequestSpec, StoreError> {
        self.requests
            .get(&id)
            .map(|spec| spec.clone())
            .ok_or(StoreError::NotFound(REQUEST))
    }

    async fn authorize_collection(
        &self,
        caller: UserId,
        collection: CollectionId,
    ) -> Result<(), StoreError> {
        let workspace = self
            .collections
            .get(&collection)
            .map(|w| *w)
            .ok_or(StoreError::NotFound(COLLECTION))?;
        self.check_member(caller, workspace)
    }

    async fn append_execution_record(&self, record: ExecutionRecord) -> Result<(), StoreError> {
        self.executions
            .entry(record.request_id)
            .or_default()
            .push(record);
        Ok(())
    }
}

impl WebhookStore for MemoryStore {
    async fn get_endpoint(&self, id: EndpointId) -> Result<WebhookEndpoint, StoreError> {
        self.endpoint_with_stats(id)
    }

    async fn get_endpoint_by_token(&self, token: &str) -> Result<WebhookEndpoint, StoreError> {
        let id = self
            .tokens
            .get(token)
            .map(|id| *id)
            .ok_or(StoreError::NotFound(WEBHOOK))?;
        self.endpoint_with_stats(id)
    }

    async fn authorize_workspace(
        &self,
        caller: UserId,
        workspace: WorkspaceId,
    ) -> Result<(), StoreError> {
        self.check_member(caller, workspace)
    }

    async fn append_webhook_log(&self, entry: WebhookRequestLog) -> Result<(), StoreError> {
        let mut logs = self.webhook_logs.entry(entry.webhook_id).or_default();
        if let Some(cap) = self.log_cap {
            while logs.len() >= cap {
                logs.pop_front();
            }
        }
        logs.push_back(entry);
        Ok(())
    }

    async fn increment_webhook_stats(
        &self,
        id: EndpointId,
        success: bool,
        elapsed_ms: i64,
    ) -> Result<(), StoreError> {
        let cell = self
            .stats
            .get(&id)
            .map(|cell| Arc::clone(cell.value()))
            .ok_or(StoreError::NotFound(WEBHOOK))?;
        cell.record(success, elapsed_ms, Utc::now());
        Ok(())
    }

    async fn list_webhook_logs(
        &self,
        id: EndpointId,
        page: PageRequest,
    ) -> Result<Page<WebhookRequestLog>, StoreError> {
        let page = page.normalized();

        let mut logs: Vec<WebhookRequestLog> = self
            .webhook_logs
            .get(&id)
            .map(|logs| logs.iter().rev().cloned().collect())
            .unwrap_or_default();
        // Stable sort: equal timestamps keep the latest append first.
        logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let total = logs.len();
        let offset = page.offset();
        let items: Vec<_> = logs
            .into_iter()
            .skip(offset)
            .take(page.limit as usize)
            .collect();
        let has_more = offset.saturating_add(items.len()) < total;

        Ok(Page {
            items,
            total: total as u64,
            page: page.page,
            limit: page.limit,
            has_more,
        })
    }
}
