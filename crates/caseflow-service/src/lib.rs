//! Business logic for case intake and workflow.
//!
//! Each service holds an [`Arc`](std::sync::Arc) to a store from
//! `caseflow-core` and is cheap to clone. The HTTP crates build on these
//! services rather than talking to a store directly.

pub mod acknowledgment;
pub mod auth;
pub mod case;
pub mod dashboard;
pub mod error;

pub use acknowledgment::AcknowledgmentService;
pub use auth::{AuthService, hash_password};
pub use case::{CaseService, NewDocument};
pub use dashboard::DashboardService;
pub use error::{Error, Result};

#[cfg(test)]
mod tests;
