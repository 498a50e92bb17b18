//! In-memory backend for the Caseflow case and session stores.
//!
//! Every store keeps its records behind a single [`parking_lot::RwLock`].
//! Operations are short synchronous critical sections, so the returned
//! futures complete immediately and never hold the lock across an await.

mod seed;
mod session;
mod store;

pub use caseflow_core::{Error, Result};
pub use session::MemorySessionStore;
pub use store::MemoryStore;

#[cfg(test)]
mod tests;
