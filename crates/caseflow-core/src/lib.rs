//! Core types and trait definitions for the Caseflow intake system.
//!
//! This crate is deliberately free of HTTP and storage dependencies. It holds
//! the case model, the status machine, business-day arithmetic, and the store
//! traits every backend implements.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod acknowledgment;
pub mod business_days;
pub mod case;
pub mod deadline;
pub mod error;
pub mod opinion;
pub mod record;
pub mod stats;
pub mod store;
pub mod user;

pub use error::{Error, Result};
