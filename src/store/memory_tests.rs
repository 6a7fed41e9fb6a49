//! Tests for `MemoryStore`.

use chrono::Duration;

use super::{MemoryStore, PageRequest, RequestStore, StoreError, WebhookStore};
use crate::model::{
    EndpointId, ExecuteResponse, ExecutionId, ExecutionRecord, HttpMethod, LogId, UserId,
    WebhookConfig, WebhookRequestLog, WorkspaceId,
};
use crate::test_fixtures::{Team, endpoint, fixed_now, request_spec};

fn log_entry(webhook: EndpointId, minutes: i64) -> WebhookRequestLog {
    WebhookRequestLog {
        id: LogId::new(),
        webhook_id: webhook,
        method: "POST".to_string(),
        path: "/webhook/t".to_string(),
        query: Default::default(),
        headers: Default::default(),
        body: format!("call {minutes}"),
        user_agent: String::new(),
        ip: "127.0.0.1".to_string(),
        size: 0,
        response_status: 200,
        response_time: 1,
        response_size: 0,
        timestamp: fixed_now() + Duration::minutes(minutes),
        processed: true,
        error: None,
    }
}

mod requests {
    use super::*;

    #[tokio::test]
    async fn get_request_spec_returns_inserted_spec() {
        let store = MemoryStore::new();
        let team = Team::register(&store);
        let spec = request_spec(team.collection, HttpMethod::Get, "https://example.com");
        store.insert_request(spec.clone());

        let found = store.get_request_spec(spec.id).await.unwrap();

        assert_eq!(found, spec);
    }

    #[tokio::test]
    async fn unknown_request_is_not_found() {
        let store = MemoryStore::new();

        let result = store.get_request_spec(crate::model::RequestId::new()).await;

        assert!(matches!(result, Err(StoreError::NotFound("Request"))));
    }

    #[tokio::test]
    async fn owner_and_member_may_use_collection() {
        let store = MemoryStore::new();
        let team = Team::register(&store);

        store
            .authorize_collection(team.owner, team.collection)
            .await
            .unwrap();
        store
            .authorize_collection(team.member, team.collection)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn stranger_is_denied_collection() {
        let store = MemoryStore::new();
        let team = Team::register(&store);

        let result = store
            .authorize_collection(UserId::new(), team.collection)
            .await;

        assert!(matches!(result, Err(StoreError::AccessDenied)));
    }

    #[tokio::test]
    async fn unknown_collection_is_not_found() {
        let store = MemoryStore::new();

        let result = store
            .authorize_collection(UserId::new(), crate::model::CollectionId::new())
            .await;

        assert!(matches!(result, Err(StoreError::NotFound("Collection"))));
    }

    #[tokio::test]
    async fn execution_records_are_appended_in_order() {
        let store = MemoryStore::new();
        let team = Team::register(&store);
        let spec = request_spec(team.collection, HttpMethod::Get, "https://example.com");

        for status in [200, 500] {
            store
                .append_execution_record(ExecutionRecord {
                    id: ExecutionId::new(),
                    request_id: spec.id,
                    user_id: team.owner,
                    request_data: spec.clone(),
                    response_data: ExecuteResponse {
                        status,
                        headers: Default::default(),
                        body: String::new(),
                        time_ms: 3,
                    },
                    executed_at: fixed_now(),
                })
                .await
                .unwrap();
        }

        let history = store.executions(spec.id);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].response_data.status, 200);
        assert_eq!(history[1].response_data.status, 500);
    }
}

mod endpoints {
    use super::*;

    #[tokio::test]
    async fn lookup_by_id_and_token_agree() {
        let store = MemoryStore::new();
        let hook = endpoint(WorkspaceId::new(), WebhookConfig::default());
        store.insert_endpoint(hook.clone()).unwrap();

        let by_id = store.get_endpoint(hook.id).await.unwrap();
        let by_token = store.get_endpoint_by_token(&hook.token).await.unwrap();

        assert_eq!(by_id, hook);
        assert_eq!(by_token, hook);
    }

    #[tokio::test]
    async fn token_lookup_requires_exact_match() {
        let store = MemoryStore::new();
        let hook = endpoint(WorkspaceId::new(), WebhookConfig::default());
        store.insert_endpoint(hook.clone()).unwrap();

        let upper = hook.token.to_uppercase();
        let prefix = &hook.token[..10];

        assert!(matches!(
            store.get_endpoint_by_token(&upper).await,
            Err(StoreError::NotFound("Webhook"))
        ));
        assert!(store.get_endpoint_by_token(prefix).await.is_err());
    }

    #[test]
    fn duplicate_token_is_rejected() {
        let store = MemoryStore::new();
        let first = endpoint(WorkspaceId::new(), WebhookConfig::default());
        let mut second = endpoint(WorkspaceId::new(), WebhookConfig::default());
        second.token.clone_from(&first.token);

        store.insert_endpoint(first).unwrap();
        let result = store.insert_endpoint(second);

        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[test]
    fn duplicate_id_is_rejected_and_keeps_token_free() {
        let store = MemoryStore::new();
        let first = endpoint(WorkspaceId::new(), WebhookConfig::default());
        let mut second = endpoint(WorkspaceId::new(), WebhookConfig::default());
        second.id = first.id;
        let second_token = second.token.clone();

        store.insert_endpoint(first).unwrap();
        assert!(matches!(
            store.insert_endpoint(second),
            Err(StoreError::Conflict(_))
        ));

        let third = {
            let mut hook = endpoint(WorkspaceId::new(), WebhookConfig::default());
            hook.token = second_token;
            hook
        };
        store.insert_endpoint(third).unwrap();
    }

    #[tokio::test]
    async fn stats_increments_show_up_on_lookup() {
        let store = MemoryStore::new();
        let hook = endpoint(WorkspaceId::new(), WebhookConfig::default());
        store.insert_endpoint(hook.clone()).unwrap();

        store.increment_webhook_stats(hook.id, true, 7).await.unwrap();
        store.increment_webhook_stats(hook.id, false, 9).await.unwrap();

        let stats = store.get_endpoint(hook.id).await.unwrap().stats;
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.success_requests, 1);
        assert_eq!(stats.failed_requests, 1);
        assert_eq!(stats.average_response, 9);
        assert!(stats.last_request_at.is_some());
    }

    #[tokio::test]
    async fn stats_for_unknown_endpoint_is_not_found() {
        let store = MemoryStore::new();

        let result = store.increment_webhook_stats(EndpointId::new(), true, 1).await;

        assert!(matches!(result, Err(StoreError::NotFound("Webhook"))));
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let hook = endpoint(WorkspaceId::new(), WebhookConfig::default());
        store.insert_endpoint(hook.clone()).unwrap();

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let store = std::sync::Arc::clone(&store);
                tokio::spawn(async move {
                    store.increment_webhook_stats(hook.id, true, 1).await.unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let stats = store.get_endpoint(hook.id).await.unwrap().stats;
        assert_eq!(stats.total_requests, 50);
        assert_eq!(stats.success_requests, 50);
    }

    #[tokio::test]
    async fn workspace_membership_is_checked() {
        let store = MemoryStore::new();
        let team = Team::register(&store);

        store
            .authorize_workspace(team.member, team.workspace)
            .await
            .unwrap();
        assert!(matches!(
            store.authorize_workspace(UserId::new(), team.workspace).await,
            Err(StoreError::AccessDenied)
        ));
        assert!(matches!(
            store.authorize_workspace(team.owner, WorkspaceId::new()).await,
            Err(StoreError::NotFound("Workspace"))
        ));
    }
}

mod logs {
    use super::*;

    async fn store_with_logs(count: i64) -> (MemoryStore, EndpointId) {
        let store = MemoryStore::new();
        let webhook = EndpointId::new();
        for minute in 0..count {
            store
                .append_webhook_log(log_entry(webhook, minute))
                .await
                .unwrap();
        }
        (store, webhook)
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let (store, webhook) = store_with_logs(3).await;

        let page = store
            .list_webhook_logs(webhook, PageRequest::default())
            .await
            .unwrap();

        let bodies: Vec<_> = page.items.iter().map(|l| l.body.as_str()).collect();
        assert_eq!(bodies, ["call 2", "call 1", "call 0"]);
        assert_eq!(page.total, 3);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn listing_pages_through_results() {
        let (store, webhook) = store_with_logs(5).await;

        let first = store
            .list_webhook_logs(webhook, PageRequest { page: 1, limit: 2 })
            .await
            .unwrap();
        let last = store
            .list_webhook_logs(webhook, PageRequest { page: 3, limit: 2 })
            .await
            .unwrap();

        assert_eq!(first.items.len(), 2);
        assert_eq!(first.items[0].body, "call 4");
        assert!(first.has_more);
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].body, "call 0");
        assert!(!last.has_more);
        assert_eq!(last.total, 5);
    }

    #[tokio::test]
    async fn out_of_range_paging_is_normalized() {
        let (store, webhook) = store_with_logs(25).await;

        let page = store
            .list_webhook_logs(webhook, PageRequest { page: 0, limit: 500 })
            .await
            .unwrap();

        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 20);
        assert_eq!(page.items.len(), 20);
        assert!(page.has_more);
    }

    #[tokio::test]
    async fn log_cap_drops_oldest_entries() {
        let store = MemoryStore::new().with_log_cap(3);
        let webhook = EndpointId::new();
        let other = EndpointId::new();
        for minute in 0..5 {
            store
                .append_webhook_log(log_entry(webhook, minute))
                .await
                .unwrap();
        }
        store.append_webhook_log(log_entry(other, 0)).await.unwrap();

        let page = store
            .list_webhook_logs(webhook, PageRequest::default())
            .await
            .unwrap();

        let bodies: Vec<_> = page.items.iter().map(|l| l.body.as_str()).collect();
        assert_eq!(bodies, ["call 4", "call 3", "call 2"]);
        assert_eq!(page.total, 3);
        let other_page = store
            .list_webhook_logs(other, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(other_page.total, 1);
    }

    #[tokio::test]
    async fn uncapped_store_keeps_every_entry() {
        let (store, webhook) = store_with_logs(1_200).await;

        let page = store
            .list_webhook_logs(webhook, PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total, 1_200);
    }

    #[tokio::test]
    async fn endpoint_without_logs_lists_empty_page() {
        let store = MemoryStore::new();

        let page = store
            .list_webhook_logs(EndpointId::new(), PageRequest::default())
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
        assert!(!page.has_more);
    }
}

mod paging {
    use super::*;

    #[test]
    fn normalization_rules() {
        let cases = [
            (PageRequest { page: 0, limit: 0 }, (1, 20)),
            (PageRequest { page: 3, limit: 100 }, (3, 100)),
            (PageRequest { page: 2, limit: 101 }, (2, 20)),
            (PageRequest { page: 1, limit: 1 }, (1, 1)),
        ];
        for (input, (page, limit)) in cases {
            let normalized = input.normalized();
            assert_eq!((normalized.page, normalized.limit), (page, limit), "{input:?}");
        }
    }

    #[test]
    fn offset_counts_preceding_items() {
        assert_eq!(PageRequest { page: 1, limit: 20 }.offset(), 0);
        assert_eq!(PageRequest { page: 3, limit: 10 }.offset(), 20);
    }
}
