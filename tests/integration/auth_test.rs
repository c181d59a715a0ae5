//! Integration tests for the client session flow.

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

use crate::helpers;

#[tokio::test]
async fn test_login_binds_device_and_reports_license() {
    let app = helpers::TestApp::new().await;
    app.create_test_user("alice", "secret1", 2).await;

    let response = app.login("alice", "secret1", "DEV-A-0123456789ABCDEF").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["device_bound"], true);
    assert_eq!(response.body["data"]["max_simulators"], 2);
    assert_eq!(response.body["data"]["device_id"], "DEV-A-0123456789...");
}

#[tokio::test]
async fn test_credentials_errors_are_indistinguishable() {
    let app = helpers::TestApp::new().await;
    app.create_test_user("bob", "secret1", 1).await;

    let wrong_password = app.login("bob", "nope123", "D").await;
    let unknown_user = app.login("nobody", "secret1", "D").await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_user.body);
}

#[tokio::test]
async fn test_other_device_rejected_with_truncated_details() {
    let app = helpers::TestApp::new().await;
    app.create_test_user("carol", "secret1", 3).await;
    app.login_token("carol", "secret1", "DEV-ONE-AAAAAAAAAAAAAAAA").await;

    let response = app.login("carol", "secret1", "DEV-TWO-BBBBBBBBBBBBBBBB").await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error_code"], "DEVICE_BOUND");
    assert_eq!(response.body["details"]["bound_device_id"], "DEV-ONE-AAAAAAAA...");
    assert_eq!(response.body["details"]["current_device_id"], "DEV-TWO-BBBBBBBB...");
}

#[tokio::test]
async fn test_sessions_and_bindings_survive_restart() {
    let app = helpers::TestApp::new().await;
    app.create_test_user("dave", "secret1", 1).await;
    let token = app.login_token("dave", "secret1", "DEV-D").await;

    let restarted = app.restart().await;

    let verify = restarted
        .request("POST", "/api/auth/verify", Some(json!({ "token": token })), false)
        .await;
    assert_eq!(verify.status, StatusCode::OK);
    assert_eq!(verify.body["data"]["username"], "dave");

    let other = restarted.login("dave", "secret1", "DEV-E").await;
    assert_eq!(other.body["error_code"], "DEVICE_BOUND");
}

#[tokio::test]
async fn test_verify_times_out_without_heartbeat() {
    let app = helpers::TestApp::new().await;
    app.create_test_user("erin", "secret1", 1).await;
    let token = app.login_token("erin", "secret1", "DEV-E").await;

    app.clock.advance(Duration::minutes(30));
    let heartbeat = app
        .request(
            "POST",
            "/api/auth/heartbeat",
            Some(json!({ "token": token, "real_name": "Erin" })),
            false,
        )
        .await;
    assert_eq!(heartbeat.status, StatusCode::OK);

    app.clock.advance(Duration::seconds(3601));
    let verify = app
        .request("POST", "/api/auth/verify", Some(json!({ "token": token })), false)
        .await;
    assert_eq!(verify.status, StatusCode::UNAUTHORIZED);
    assert_eq!(verify.body["error_code"], "SESSION_TIMEOUT");
}

#[tokio::test]
async fn test_disabled_account_cannot_log_in() {
    let app = helpers::TestApp::new().await;
    let user_id = app.create_test_user("frank", "secret1", 1).await;
    let token = app.login_token("frank", "secret1", "DEV-F").await;

    let disable = app
        .request(
            "POST",
            &format!("/api/admin/users/{user_id}/status"),
            Some(json!({ "status": "disabled" })),
            true,
        )
        .await;
    assert_eq!(disable.status, StatusCode::OK);

    let verify = app
        .request("POST", "/api/auth/verify", Some(json!({ "token": token })), false)
        .await;
    assert_eq!(verify.body["error_code"], "INVALID_TOKEN");

    let login = app.login("frank", "secret1", "DEV-F").await;
    assert_eq!(login.status, StatusCode::FORBIDDEN);
    assert_eq!(login.body["error_code"], "ACCOUNT_DISABLED");
}

#[tokio::test]
async fn test_assigned_accounts_survive_restart_and_need_a_session() {
    let app = helpers::TestApp::new().await;
    let user_id = app.create_test_user("frank", "secret1", 1).await;
    let set = app
        .request(
            "PUT",
            &format!("/api/admin/users/{user_id}/accounts"),
            Some(json!({ "accounts": "fb-1----pw----mail\n# spare\nfb-2----pw" })),
            true,
        )
        .await;
    assert_eq!(set.status, StatusCode::OK, "{}", set.body);

    let restarted = app.restart().await;
    let token = restarted.login_token("frank", "secret1", "DEV-F").await;
    let accounts = restarted
        .request("POST", "/api/auth/accounts", Some(json!({ "token": token })), false)
        .await;
    assert_eq!(accounts.status, StatusCode::OK, "{}", accounts.body);
    assert_eq!(accounts.body["data"][0]["c_user"], "fb-1");
    assert_eq!(accounts.body["data"][1]["account_line"], "fb-2----pw");

    restarted
        .request("POST", "/api/auth/logout", Some(json!({ "token": token })), false)
        .await;
    let after_logout = restarted
        .request("POST", "/api/auth/accounts", Some(json!({ "token": token })), false)
        .await;
    assert_eq!(after_logout.status, StatusCode::UNAUTHORIZED);
    assert_eq!(after_logout.body["error_code"], "INVALID_TOKEN");
}
