//! Session entity, opaque token, and the read-only verify projection.

pub mod model;
pub mod token;
pub mod view;

pub use model::Session;
pub use token::SessionToken;
pub use view::SessionView;
