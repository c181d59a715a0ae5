//! # licensor-database
//!
//! The store interface the authority is written against, plus its JSON
//! collection implementation. Collections live either in memory or in a data
//! directory as `users.json`, `licenses.json`, `sessions.json` and
//! `accounts.json`, each rewritten atomically on every change.

pub mod collection;
pub mod connection;
pub mod repositories;
pub mod store;

pub use collection::JsonCollection;
pub use connection::{Stores, initialize_data_dir};
pub use store::{AccountStore, LicenseStore, SessionStore, UserStore};
