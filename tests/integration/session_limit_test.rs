//! Integration tests for the device cap and session sweeping.

use axum::http::StatusCode;
use chrono::Duration;

use crate::helpers;

#[tokio::test]
async fn test_device_limit_enforced() {
    let app = helpers::TestApp::new().await;
    let user_id = app.create_test_user("limited", "secret1", 1).await;

    app.login_token("limited", "secret1", "DEV-1").await;
    app.clear_binding(user_id).await;

    let response = app.login("limited", "secret1", "DEV-2").await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error_code"], "DEVICE_LIMIT");
    assert_eq!(response.body["details"]["active_devices"], 1);
    assert_eq!(response.body["details"]["max_devices"], 1);
}

#[tokio::test]
async fn test_same_device_relogin_reuses_slot() {
    let app = helpers::TestApp::new().await;
    app.create_test_user("reuse", "secret1", 1).await;

    let first = app.login_token("reuse", "secret1", "DEV-1").await;
    let second = app.login_token("reuse", "secret1", "DEV-1").await;
    assert_ne!(first, second);

    let sessions = app.request("GET", "/api/admin/sessions", None, true).await;
    assert_eq!(sessions.status, StatusCode::OK);
    assert_eq!(sessions.body["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_stale_device_frees_its_slot() {
    let app = helpers::TestApp::new().await;
    let user_id = app.create_test_user("stale", "secret1", 1).await;

    app.login_token("stale", "secret1", "DEV-1").await;
    app.clear_binding(user_id).await;
    app.clock.advance(Duration::seconds(301));

    let response = app.login("stale", "secret1", "DEV-2").await;
    assert_eq!(response.status, StatusCode::OK, "{}", response.body);
}

#[tokio::test]
async fn test_admin_clean_removes_dead_sessions() {
    let app = helpers::TestApp::new().await;
    app.create_test_user("sweep", "secret1", 1).await;
    app.login_token("sweep", "secret1", "DEV-1").await;

    app.clock.advance(Duration::seconds(301));
    let response = app
        .request("POST", "/api/admin/sessions/clean", None, true)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["remaining"], 0);
    assert!(app.stores.sessions.load_all().await.expect("load").is_empty());
}
