//! # licensor-auth
//!
//! The session authority core.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and policy enforcement
//! - `token`: Unguessable session tokens and license keys
//! - `device`: One-device-per-account binding guard
//! - `lock`: Per-user mutual exclusion for login, unbind and kick
//! - `session`: Session registry, liveness sweep, and the login/verify/heartbeat/logout flows

pub mod device;
pub mod lock;
pub mod password;
pub mod session;
pub mod token;

pub use device::{BindingResult, DeviceBindingGuard, UnbindOutcome};
pub use lock::UserLocks;
pub use password::{PasswordHasher, PasswordValidator};
pub use session::{LoginOutcome, SessionManager, SessionRegistry, SweepReport};
pub use token::TokenGenerator;
