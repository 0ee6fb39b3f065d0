//! Integration tests for `UserFetcher`.
//!
//! Network-facing behaviour runs against a wiremock server on real time;
//! retry timing and cache expiry run against `ScriptedApi` on paused time.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{ScriptedApi, init_logger, seven_users, user, users_json};
use directory_business::http::Client;
use directory_business::{
    CachePolicy, DirectoryConfig, DirectoryError, ErrorKind, FetchResult, HttpUserApi,
    RetryPolicy, UserApi, UserFetcher, UserId, users_key,
};
use tokio::time::Instant;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_fetcher(server: &MockServer, retry: RetryPolicy) -> UserFetcher {
    let client = Client::new(Duration::from_secs(5)).unwrap();
    let api = Arc::new(HttpUserApi::new(client, server.uri()));
    UserFetcher::new(api, retry, CachePolicy::default())
}

fn scripted_fetcher(api: &Arc<ScriptedApi>) -> UserFetcher {
    UserFetcher::new(
        Arc::clone(api) as Arc<dyn UserApi>,
        RetryPolicy::default(),
        CachePolicy::default(),
    )
}

mod http_tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_all_then_fresh_cache_hit() {
        init_logger();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users_json(&seven_users())))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = http_fetcher(&server, RetryPolicy::none());
        let first = fetcher.fetch_all().await.unwrap();
        let second = fetcher.fetch_all().await.unwrap();

        assert_eq!(first.len(), 7);
        assert_eq!(first, second);
        assert!(matches!(fetcher.status_all(), FetchResult::Success(users) if users.len() == 7));
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_request() {
        init_logger();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(users_json(&seven_users()))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = http_fetcher(&server, RetryPolicy::none());
        let (a, b, c) = tokio::join!(
            fetcher.fetch_all(),
            fetcher.fetch_all(),
            fetcher.fetch_all()
        );

        assert_eq!(a.unwrap().len(), 7);
        assert_eq!(b.unwrap().len(), 7);
        assert_eq!(c.unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_empty_collection_is_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let fetcher = http_fetcher(&server, RetryPolicy::none());

        assert!(fetcher.fetch_all().await.unwrap().is_empty());
        assert!(fetcher.status_all().is_success());
    }

    #[tokio::test]
    async fn test_server_error_is_retried_then_fails() {
        init_logger();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let retry = RetryPolicy {
            max_retries: 2,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
        };
        let fetcher = http_fetcher(&server, retry);
        let err = fetcher.fetch_all().await.unwrap_err();

        assert_eq!(err, DirectoryError::Status { status: 500 });
        assert_eq!(fetcher.status_all().error(), Some(&err));
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_retried() {
        init_logger();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = http_fetcher(&server, RetryPolicy::default());
        let id = UserId::new(99).unwrap();
        let err = fetcher.fetch_one(id).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(fetcher.status_one(id).is_failure());
    }

    #[tokio::test]
    async fn test_fetch_one_from_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/3"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::to_value(user(3, "Clementine Bauch", "Acme")).unwrap()),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = http_fetcher(&server, RetryPolicy::none());
        let record = fetcher.fetch_one_from_path("3").await.unwrap();

        assert_eq!(record.name, "Clementine Bauch");
        assert!(fetcher.status_one(record.id).is_success());
    }

    #[tokio::test]
    async fn test_invalid_id_never_reaches_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path_regex("^/users/.*$"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let fetcher = http_fetcher(&server, RetryPolicy::default());

        for raw in ["abc", "0", "-1", ""] {
            let err = fetcher.fetch_one_from_path(raw).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidId, "{raw:?}");
        }
    }

    #[tokio::test]
    async fn test_from_config_uses_configured_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = DirectoryConfig::new(server.uri());
        config.retry = RetryPolicy::none();
        let client = Client::new(config.request_timeout).unwrap();
        let api = Arc::new(HttpUserApi::new(client, config.api_base_url.clone()));
        let fetcher = UserFetcher::from_config(api, &config);

        assert!(fetcher.fetch_all().await.is_err());
    }
}

mod retry_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_three_failed_retries_end_in_failure() {
        init_logger();
        let api = ScriptedApi::new()
            .then_list(Err(DirectoryError::Status { status: 503 }))
            .into_arc();
        let fetcher = scripted_fetcher(&api);
        let start = Instant::now();

        let err = fetcher.fetch_all().await.unwrap_err();

        assert_eq!(err, DirectoryError::Status { status: 503 });
        assert_eq!(
            api.call_offsets(start),
            vec![
                Duration::ZERO,
                Duration::from_secs(1),
                Duration::from_secs(3),
                Duration::from_secs(7),
            ]
        );
        assert!(fetcher.status_all().is_failure());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_within_retry_budget() {
        let api = ScriptedApi::new()
            .then_list(Err(DirectoryError::Transport("reset".to_string())))
            .then_list(Err(DirectoryError::Transport("reset".to_string())))
            .then_list(Ok(seven_users()))
            .into_arc();
        let fetcher = scripted_fetcher(&api);
        let start = Instant::now();

        let users = fetcher.fetch_all().await.unwrap();

        assert_eq!(users.len(), 7);
        assert_eq!(api.call_count(), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(3));
        assert!(fetcher.status_all().is_success());
    }

    #[tokio::test(start_paused = true)]
    async fn test_followers_share_the_leaders_retries() {
        let api = ScriptedApi::new()
            .then_list(Err(DirectoryError::Status { status: 500 }))
            .into_arc();
        let fetcher = scripted_fetcher(&api);

        let (a, b) = tokio::join!(fetcher.fetch_all(), fetcher.fetch_all());

        assert!(a.is_err());
        assert_eq!(a, b);
        assert_eq!(api.call_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_collection_is_retried() {
        let api = ScriptedApi::new()
            .then_list(Err(DirectoryError::Status { status: 404 }))
            .into_arc();
        let fetcher = scripted_fetcher(&api);

        let err = fetcher.fetch_all().await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(api.call_count(), 4);
        assert!(fetcher.status_all().is_failure());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_user_is_not_retried() {
        let api = ScriptedApi::new()
            .then_user(Err(DirectoryError::Status { status: 404 }))
            .into_arc();
        let fetcher = scripted_fetcher(&api);

        let err = fetcher.fetch_one(UserId::new(11).unwrap()).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(api.call_count(), 1);
    }
}

mod cache_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_reload_after_stale_window() {
        let api = ScriptedApi::new().then_list(Ok(seven_users())).into_arc();
        let fetcher = scripted_fetcher(&api);

        fetcher.fetch_all().await.unwrap();
        tokio::time::advance(Duration::from_secs(4 * 60)).await;
        fetcher.fetch_all().await.unwrap();
        assert_eq!(api.call_count(), 1);

        tokio::time::advance(Duration::from_secs(2 * 60)).await;
        fetcher.fetch_all().await.unwrap();
        assert_eq!(api.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_ignores_freshness() {
        let api = ScriptedApi::new()
            .then_list(Ok(seven_users()))
            .then_list(Ok(vec![user(1, "Leanne Graham", "Acme")]))
            .into_arc();
        let fetcher = scripted_fetcher(&api);

        fetcher.fetch_all().await.unwrap();
        let reloaded = fetcher.refetch_all().await.unwrap();

        assert_eq!(reloaded.len(), 1);
        assert_eq!(api.call_count(), 2);
        assert_eq!(fetcher.cached_users().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refetch_keeps_last_collection_readable() {
        let api = ScriptedApi::new()
            .then_list(Ok(seven_users()))
            .then_list(Err(DirectoryError::Status { status: 502 }))
            .into_arc();
        let fetcher = UserFetcher::new(
            Arc::clone(&api) as Arc<dyn UserApi>,
            RetryPolicy::none(),
            CachePolicy::default(),
        );

        fetcher.fetch_all().await.unwrap();
        assert!(fetcher.refetch_all().await.is_err());

        assert!(fetcher.status_all().is_failure());
        assert_eq!(fetcher.cached_users().unwrap().len(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_in_flight_result() {
        init_logger();
        let api = ScriptedApi::new()
            .with_latency(Duration::from_secs(10))
            .then_list(Ok(seven_users()))
            .into_arc();
        let fetcher = scripted_fetcher(&api);

        let task = tokio::spawn({
            let fetcher = fetcher.clone();
            async move { fetcher.fetch_all().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(fetcher.status_all().is_pending());
        assert!(fetcher.cancel(&users_key()));
        let err = task.await.unwrap().unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(fetcher.cached_users().is_none());
        assert!(fetcher.status_all().is_pending());
        assert!(!fetcher.cancel_all());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unused_entries_are_evicted() {
        let api = ScriptedApi::new()
            .then_user(Ok(user(2, "Ervin Howell", "Globex")))
            .into_arc();
        let fetcher = scripted_fetcher(&api);
        let id = UserId::new(2).unwrap();

        fetcher.fetch_one(id).await.unwrap();
        tokio::time::advance(Duration::from_secs(31 * 60)).await;

        assert_eq!(fetcher.evict_unused(), 1);
        assert!(fetcher.status_one(id).is_pending());
    }
}
