//! Store implementations backed by [`JsonCollection`](crate::collection::JsonCollection).

pub mod account;
pub mod license;
pub mod session;
pub mod user;

pub use account::AccountRepository;
pub use license::LicenseRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
