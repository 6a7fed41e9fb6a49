//! Shared builders and mocks for unit tests.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

use crate::model::{
    CollectionId, HttpMethod, RequestId, RequestSpec, UserId, WebhookConfig, WebhookEndpoint,
    WorkspaceId,
};
use crate::store::{Collection, MemoryStore, Workspace};
use crate::time::Clock;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// Clock returning a settable instant, in milliseconds since the epoch.
pub struct MockClock {
    millis: AtomicI64,
}

impl MockClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(now.timestamp_millis()),
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        self.millis.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap()
    }
}

/// A workspace, one of its collections, and its owner.
pub struct Team {
    pub workspace: WorkspaceId,
    pub collection: CollectionId,
    pub owner: UserId,
    pub member: UserId,
}

impl Team {
    /// Registers a fresh workspace with an owner, one member and one collection.
    pub fn register(store: &MemoryStore) -> Self {
        let team = Self {
            workspace: WorkspaceId::new(),
            collection: CollectionId::new(),
            owner: UserId::new(),
            member: UserId::new(),
        };
        store.insert_workspace(Workspace {
            id: team.workspace,
            name: "Team".to_string(),
            owner: team.owner,
            members: vec![team.member],
        });
        store.insert_collection(Collection {
            id: team.collection,
            workspace_id: team.workspace,
            name: "Smoke".to_string(),
        });
        team
    }
}

pub fn request_spec(collection: CollectionId, method: HttpMethod, url: &str) -> RequestSpec {
    RequestSpec {
        id: RequestId::new(),
        name: "Sample".to_string(),
        method,
        url: url.to_string(),
        headers: std::collections::HashMap::new(),
        body: crate::model::RequestBody::default(),
        auth: crate::model::Auth::default(),
        tests: Vec::new(),
        collection_id: collection,
        created_by: UserId::new(),
        created_at: fixed_now(),
        updated_at: fixed_now(),
    }
}

pub fn endpoint(workspace: WorkspaceId, config: WebhookConfig) -> WebhookEndpoint {
    WebhookEndpoint::create(
        crate::model::NewWebhook {
            name: "Hook".to_string(),
            description: String::new(),
            expires_in_days: 0,
            config,
        },
        workspace,
        UserId::new(),
        fixed_now(),
    )
}
