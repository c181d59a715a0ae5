//! Request extractors that reject into the standard error envelope.

pub mod json;
pub mod path;

pub use json::ApiJson;
pub use path::UserIdPath;
