//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use licensor_api::{AppState, build_app};
use licensor_auth::PasswordHasher;
use licensor_core::clock::ManualClock;
use licensor_core::config::AppConfig;
use licensor_core::types::UserId;
use licensor_database::Stores;

/// Admin key used by every test app.
pub const ADMIN_KEY: &str = "integration-admin-key";

/// Test application context backed by a temporary data directory
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Stores, for inspecting and arranging persisted state
    pub stores: Stores,
    /// Clock driving every liveness decision
    pub clock: Arc<ManualClock>,
    /// Application config
    pub config: AppConfig,
    /// Data directory; removed on drop
    pub data_dir: Arc<TempDir>,
}

/// Response from a test request
pub struct TestResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Parsed JSON body (`Null` when not JSON)
    pub body: Value,
}

impl TestApp {
    /// Create a new test application over an empty data directory
    pub async fn new() -> Self {
        let data_dir = Arc::new(tempfile::tempdir().expect("Failed to create temp dir"));
        let clock = Arc::new(ManualClock::starting_now());
        Self::open(data_dir, clock).await
    }

    /// Start a fresh process over the same data directory and clock
    pub async fn restart(&self) -> Self {
        Self::open(Arc::clone(&self.data_dir), Arc::clone(&self.clock)).await
    }

    async fn open(data_dir: Arc<TempDir>, clock: Arc<ManualClock>) -> Self {
        let toml = format!(
            "[auth]\nadmin_key = \"{ADMIN_KEY}\"\n[storage]\nbackend = \"file\"\ndata_dir = {:?}\n",
            data_dir.path().display().to_string()
        );
        let config = AppConfig::from_toml_str(&toml).expect("Failed to parse test config");

        let stores = Stores::open(&config.storage)
            .await
            .expect("Failed to open stores");
        let state = AppState::new(
            config.clone(),
            stores.clone(),
            clock.clone(),
            PasswordHasher::fast(),
        );

        Self {
            router: build_app(state),
            stores,
            clock,
            config,
            data_dir,
        }
    }

    /// Create a user through the admin API
    pub async fn create_test_user(&self, username: &str, password: &str, max_devices: u32) -> UserId {
        let response = self
            .request(
                "POST",
                "/api/admin/users",
                Some(json!({
                    "username": username,
                    "password": password,
                    "max_simulators": max_devices,
                })),
                true,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["data"]["user_id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("Missing user id")
    }

    /// Log in and return the raw response
    pub async fn login(&self, username: &str, password: &str, device_id: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/login",
            Some(json!({
                "username": username,
                "password": password,
                "device_id": device_id,
            })),
            false,
        )
        .await
    }

    /// Log in and return the session token
    pub async fn login_token(&self, username: &str, password: &str, device_id: &str) -> String {
        let response = self.login(username, password, device_id).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }

    /// Clear a device binding directly in the store, keeping sessions
    pub async fn clear_binding(&self, user_id: UserId) {
        let mut user = self
            .stores
            .users
            .find_by_id(user_id)
            .await
            .expect("Store read failed")
            .expect("User not found");
        user.bound_device_id = None;
        user.device_bound_at = None;
        self.stores
            .users
            .update(user)
            .await
            .expect("Store write failed");
    }

    /// Make a JSON request, optionally carrying the admin key
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        admin: bool,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if admin {
            builder = builder.header("x-admin-key", ADMIN_KEY);
        }

        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("Failed to build request"))
            .await
            .expect("Request failed");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}
