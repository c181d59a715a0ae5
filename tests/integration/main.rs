//! End-to-end tests driving the HTTP router over a file-backed data directory.

mod auth_test;
mod helpers;
mod session_limit_test;
