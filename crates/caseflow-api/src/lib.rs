//! JSON REST API for Caseflow.
//!
//! Exposes an axum [`Router`] backed by any [`caseflow_core::store::CaseStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility; a
//! caller that authenticates staff may insert a [`StaffRef`] into the request
//! extensions so changes are attributed in case activity.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", caseflow_api::api_router(ApiState::new(store.clone())))
//! ```

pub mod acknowledgments;
pub mod cases;
pub mod dashboard;
pub mod error;
pub mod etag;
pub mod opinions;

use std::{convert::Infallible, sync::Arc};

use axum::{
  Router,
  extract::FromRequestParts,
  http::request::Parts,
  routing::{get, post},
};
use caseflow_core::{case::StaffRef, store::CaseStore};
use caseflow_service::{AcknowledgmentService, CaseService, DashboardService};

pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// The services the API handlers call into.
pub struct ApiState<S> {
  pub cases:           CaseService<S>,
  pub dashboard:       DashboardService<S>,
  pub acknowledgments: AcknowledgmentService<S>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      cases:           self.cases.clone(),
      dashboard:       self.dashboard.clone(),
      acknowledgments: self.acknowledgments.clone(),
    }
  }
}

impl<S: CaseStore> ApiState<S> {
  /// Services with default policy and no stats baseline.
  pub fn new(store: Arc<S>) -> Self {
    Self::from_services(
      CaseService::new(Arc::clone(&store)),
      DashboardService::new(store),
    )
  }

  pub fn from_services(cases: CaseService<S>, dashboard: DashboardService<S>) -> Self {
    Self {
      acknowledgments: AcknowledgmentService::new(cases.clone()),
      cases,
      dashboard,
    }
  }
}

// ─── Actor ───────────────────────────────────────────────────────────────────

/// The staff member making the request, if the caller supplied one.
#[derive(Debug, Clone)]
pub struct Actor(pub Option<StaffRef>);

impl Actor {
  /// The actor, or a stand-in for unattributed API calls.
  pub fn or_api(&self) -> StaffRef {
    self.0.clone().unwrap_or_else(|| StaffRef {
      id:   "api".to_owned(),
      name: "API".to_owned(),
    })
  }
}

impl<T: Send + Sync> FromRequestParts<T> for Actor {
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _: &T) -> Result<Self, Self::Rejection> {
    Ok(Actor(parts.extensions.get::<StaffRef>().cloned()))
  }
}

/// Treat absent and empty query values alike.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: CaseStore + 'static,
{
  Router::new()
    // Cases
    .route("/cases", get(cases::list::<S>).post(cases::create::<S>))
    .route("/cases/{id}", get(cases::get_one::<S>))
    .route("/cases/by-number/{number}", get(cases::get_by_number::<S>))
    .route("/cases/{id}/status", post(cases::update_status::<S>))
    .route("/cases/{id}/assign", post(cases::assign::<S>))
    .route("/cases/{id}/notes", get(cases::list_notes::<S>).post(cases::add_note::<S>))
    .route(
      "/cases/{id}/documents",
      get(cases::list_documents::<S>).post(cases::attach_document::<S>),
    )
    .route("/cases/{id}/activity", get(cases::activity::<S>))
    // Overview
    .route("/deadlines", get(dashboard::deadlines::<S>))
    .route("/dashboard", get(dashboard::stats::<S>))
    // Acknowledgments
    .route(
      "/acknowledgments",
      get(acknowledgments::list::<S>).post(acknowledgments::file::<S>),
    )
    .route("/acknowledgments/{id}", get(acknowledgments::get_one::<S>))
    // Published opinions
    .route("/opinions", get(opinions::search::<S>))
    .route("/opinions/{case_number}", get(opinions::get_one::<S>))
    .with_state(state)
}
