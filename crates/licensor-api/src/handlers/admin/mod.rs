//! Administrative handlers. Mounted behind the admin-key middleware.

pub mod accounts;
pub mod licenses;
pub mod sessions;
pub mod users;
