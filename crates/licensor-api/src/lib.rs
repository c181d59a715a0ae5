//! # licensor-api
//!
//! HTTP API layer for Licensor built on Axum.
//!
//! Exposes the client session endpoints (`login`, `verify`, `heartbeat`,
//! `logout`), the health check, and the admin-key protected administrative
//! surface. Every response uses the `{ success, ... }` envelope.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
