//! Route definitions for the authority HTTP API.

use axum::Router;
use axum::middleware as axum_middleware;
use axum::routing::{delete, get, post, put};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let admin = admin_routes().layer(axum_middleware::from_fn_with_state(
        state.clone(),
        middleware::admin::require_admin_key,
    ));

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(health_routes())
        .nest("/admin", admin);

    let cors = build_cors_layer(&state.config.server);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Client session endpoints
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/verify", post(handlers::auth::verify))
        .route("/auth/heartbeat", post(handlers::auth::heartbeat))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/accounts", post(handlers::auth::accounts))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Admin endpoints, guarded by the admin key
fn admin_routes() -> Router<AppState> {
    use handlers::admin::{accounts, licenses, sessions, users};

    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", delete(users::delete_user))
        .route("/users/{id}/password", post(users::reset_password))
        .route("/users/{id}/status", post(users::set_status))
        .route("/users/{id}/unbind", post(users::unbind_device))
        .route("/users/{id}/kick", post(sessions::kick_user))
        .route("/users/{id}/license", put(licenses::update_license))
        .route("/users/{id}/license/extend", post(licenses::extend_time))
        .route("/users/{id}/quota", put(licenses::update_quota))
        .route(
            "/users/{id}/accounts",
            get(accounts::get_accounts).put(accounts::set_accounts),
        )
        .route("/sessions", get(sessions::list_sessions))
        .route("/sessions/clean", post(sessions::clean_sessions))
}
