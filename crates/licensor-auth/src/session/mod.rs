//! Session admission, liveness and lifecycle.

pub mod admission;
pub mod manager;
pub mod registry;
pub mod sweeper;

pub use admission::{Classification, Decision, classify, decide};
pub use manager::{LoginOutcome, SessionManager};
pub use registry::{Admission, SessionRegistry};
pub use sweeper::{SweepReport, sweep_dead};
