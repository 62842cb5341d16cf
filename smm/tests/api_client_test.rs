mod common;

use common::{CannedResponse, MockServer, client_for, memory_session, unreachable_url, user};
use serde_json::json;
use smm::{
    api::{auth::AuthApi, schedule::ScheduleApi, telegram::TelegramApi, twitter::TwitterApi},
    error::{AppError, NO_RESPONSE_MESSAGE},
    models::{AccountType, PostStatus},
};

#[tokio::test]
async fn test_server_error_body_becomes_message() {
    let server = MockServer::start(vec![CannedResponse::json(
        400,
        json!({ "error": "Scheduled time must be in the future" }),
    )])
    .await;
    let api = client_for(&server.base_url, memory_session());

    let err = api
        .get_scheduled_posts(Some(PostStatus::Scheduled))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Scheduled time must be in the future");
}

#[tokio::test]
async fn test_message_field_is_used_when_error_is_missing() {
    let server = MockServer::start(vec![CannedResponse::json(
        404,
        json!({ "message": "Scheduled post not found" }),
    )])
    .await;
    let api = client_for(&server.base_url, memory_session());

    let err = api.get_scheduled_post(42).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Scheduled post not found");
}

#[tokio::test]
async fn test_empty_error_body_falls_back_to_status_line() {
    let server = MockServer::start(vec![CannedResponse::empty(500)]).await;
    let api = client_for(&server.base_url, memory_session());

    let err = api.get_scheduled_posts(None).await.unwrap_err();

    assert_eq!(err.to_string(), "Request failed with status code 500");
}

#[tokio::test]
async fn test_plain_text_error_body_is_kept() {
    let server = MockServer::start(vec![CannedResponse::text(502, "Bad gateway")]).await;
    let api = client_for(&server.base_url, memory_session());

    let err = api.get_scheduled_posts(None).await.unwrap_err();

    assert_eq!(err.to_string(), "Bad gateway");
}

#[tokio::test]
async fn test_closed_port_is_no_response() {
    let api = client_for(&unreachable_url().await, memory_session());

    let err = api.get_scheduled_posts(None).await.unwrap_err();

    assert!(matches!(err, AppError::NoResponse));
    assert_eq!(err.to_string(), NO_RESPONSE_MESSAGE);
}

#[tokio::test]
async fn test_retry_after_seconds_is_read_from_body() {
    let server = MockServer::start(vec![
        CannedResponse::json(
            429,
            json!({ "error": "Rate limit exceeded", "retryAfterSeconds": 840 }),
        )
        .with_header("Retry-After", "60"),
    ])
    .await;
    let api = client_for(&server.base_url, memory_session());

    let err = api.post_tweet(1, "hello").await.unwrap_err();

    assert_eq!(err.status(), Some(429));
    assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(840)));
}

#[tokio::test]
async fn test_retry_after_header_is_used_without_body_field() {
    let server = MockServer::start(vec![
        CannedResponse::json(429, json!({ "error": "Too many requests" }))
            .with_header("Retry-After", "120"),
    ])
    .await;
    let api = client_for(&server.base_url, memory_session());

    let err = api.post_tweet(1, "hello").await.unwrap_err();

    assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(120)));
}

#[tokio::test]
async fn test_bearer_token_is_attached_once_logged_in() {
    let server = MockServer::start(vec![
        CannedResponse::json(200, json!([])),
        CannedResponse::json(
            200,
            json!({
                "token": "abc123",
                "user": { "id": 1, "username": "alice", "email": "a@example.com", "accountType": "admin" }
            }),
        ),
        CannedResponse::json(200, json!([])),
    ])
    .await;
    let api = client_for(&server.base_url, memory_session());

    api.get_scheduled_posts(None).await.unwrap();
    api.login("alice", "secret").await.unwrap();
    api.get_scheduled_posts(None).await.unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[0].header("authorization"), None);
    assert_eq!(requests[1].method, "POST");
    assert_eq!(requests[1].path, "/api/auth/login");
    assert_eq!(
        requests[1].json(),
        json!({ "username": "alice", "password": "secret" })
    );
    assert_eq!(requests[2].header("authorization"), Some("Bearer abc123"));
}

#[tokio::test]
async fn test_login_then_logout_round_trip() {
    let server = MockServer::start(vec![CannedResponse::json(
        200,
        json!({
            "token": "abc123",
            "user": { "id": 7, "username": "bob", "email": "b@example.com", "accountType": "subaccount" }
        }),
    )])
    .await;
    let session = memory_session();
    let api = client_for(&server.base_url, session.clone());
    assert!(!api.is_logged_in());

    let logged_in = api.login("bob", "pw").await.unwrap();

    let mut expected = user(7, "bob", AccountType::Subaccount);
    expected.email = "b@example.com".to_string();
    assert_eq!(logged_in, expected);
    assert!(api.is_logged_in());
    assert_eq!(session.token().as_deref(), Some("abc123"));
    assert_eq!(api.current_user().map(|u| u.username), Some("bob".to_string()));

    api.logout().unwrap();

    assert!(!api.is_logged_in());
    assert_eq!(api.current_user(), None);
}

#[tokio::test]
async fn test_failed_login_keeps_session_empty() {
    let server = MockServer::start(vec![CannedResponse::json(
        401,
        json!({ "error": "Invalid username or password" }),
    )])
    .await;
    let api = client_for(&server.base_url, memory_session());

    let err = api.login("alice", "wrong").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Invalid username or password");
    assert!(!api.is_logged_in());
}

#[tokio::test]
async fn test_timeline_accepts_wrapped_and_bare_lists() {
    let server = MockServer::start(vec![
        CannedResponse::json(200, json!({ "data": [{ "id": "1", "text": "first" }] })),
        CannedResponse::json(200, json!([{ "id": "2", "text": "second" }])),
    ])
    .await;
    let api = client_for(&server.base_url, memory_session());

    let wrapped = api.get_timeline(3, 20).await.unwrap();
    let bare = api.get_timeline(3, 5).await.unwrap();

    assert_eq!(wrapped[0].text, "first");
    assert_eq!(bare[0].text, "second");
    let requests = server.requests();
    assert_eq!(requests[0].path, "/api/twitter/accounts/3/timeline?count=20");
    assert_eq!(requests[1].path, "/api/twitter/accounts/3/timeline?count=5");
}

#[tokio::test]
async fn test_post_tweet_tolerates_empty_success_body() {
    let server = MockServer::start(vec![CannedResponse::empty(200)]).await;
    let api = client_for(&server.base_url, memory_session());

    let tweet = api.post_tweet(1, "hello").await.unwrap();

    assert_eq!(tweet.id, "");
    let requests = server.requests();
    assert_eq!(requests[0].path, "/api/twitter/accounts/1/tweets");
    assert_eq!(requests[0].json(), json!({ "content": "hello" }));
}

#[tokio::test]
async fn test_telegram_send_message_body() {
    let server = MockServer::start(vec![CannedResponse::json(200, json!({ "ok": true }))]).await;
    let api = client_for(&server.base_url, memory_session());

    api.send_message(4, "-100123", "hi there").await.unwrap();

    let requests = server.requests();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/telegram/accounts/4/send");
    assert_eq!(
        requests[0].json(),
        json!({ "chatId": "-100123", "message": "hi there" })
    );
}
