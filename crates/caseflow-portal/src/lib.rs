//! Web portal for Caseflow.
//!
//! Serves the public intake forms and opinion search, the staff case
//! management pages, and mounts the JSON API under `/api`. Generic over the
//! case store and the user directory.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod html;

pub use error::Error;

use std::sync::Arc;

use axum::{
  Router,
  middleware,
  routing::{get, post},
};
use caseflow_api::{ApiState, api_router};
use caseflow_core::store::{CaseStore, SessionStore};
use caseflow_service::{AcknowledgmentService, AuthService, CaseService, DashboardService};

use config::PortalConfig;
use handlers::{public, session, staff};
use html::{Chrome, Page};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, U> {
  pub cases:           CaseService<S>,
  pub dashboard:       DashboardService<S>,
  pub acknowledgments: AcknowledgmentService<S>,
  pub auth:            AuthService<U>,
  pub config:          Arc<PortalConfig>,
}

impl<S, U> Clone for AppState<S, U> {
  fn clone(&self) -> Self {
    Self {
      cases:           self.cases.clone(),
      dashboard:       self.dashboard.clone(),
      acknowledgments: self.acknowledgments.clone(),
      auth:            self.auth.clone(),
      config:          Arc::clone(&self.config),
    }
  }
}

impl<S: CaseStore, U: SessionStore> AppState<S, U> {
  /// Wire the services to `store` and `users` as `config` describes.
  pub fn new(store: Arc<S>, users: Arc<U>, config: PortalConfig) -> Self {
    let cases = CaseService::new(Arc::clone(&store)).with_policy(config.status_transitions);
    let dashboard = DashboardService::new(store).with_baseline(config.stats_baseline());
    let auth = AuthService::new(users)
      .with_demo_mode(config.demo_mode)
      .with_session_ttl(config.session_ttl());

    Self {
      acknowledgments: AcknowledgmentService::new(cases.clone()),
      cases,
      dashboard,
      auth,
      config: Arc::new(config),
    }
  }

  pub fn api_state(&self) -> ApiState<S> {
    ApiState::from_services(self.cases.clone(), self.dashboard.clone())
  }

  pub(crate) fn page<'a>(&'a self, title: &'a str, chrome: Chrome<'a>) -> Page<'a> {
    Page { title, branding: &self.config.branding, chrome }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the portal router, with the JSON API nested under `/api`.
pub fn router<S, U>(state: AppState<S, U>) -> Router
where
  S: CaseStore + 'static,
  U: SessionStore + 'static,
{
  let api = api_router(state.api_state()).layer(middleware::from_fn_with_state(
    state.clone(),
    auth::require_api_auth::<S, U>,
  ));

  Router::new()
    // Public
    .route("/", get(public::home::<S, U>))
    .route(
      "/submit/advisory-opinion",
      get(public::advisory_form::<S, U>).post(public::submit_advisory::<S, U>),
    )
    .route(
      "/submit/ethics-complaint",
      get(public::complaint_form::<S, U>).post(public::submit_complaint::<S, U>),
    )
    .route(
      "/submit/acknowledgment",
      get(public::acknowledgment_form::<S, U>).post(public::submit_acknowledgment::<S, U>),
    )
    .route(
      "/submit/records-request",
      get(public::records_form::<S, U>).post(public::submit_records::<S, U>),
    )
    .route("/submit/confirmation", get(public::confirmation::<S, U>))
    .route("/search", get(public::search::<S, U>))
    .route("/opinions/{case_number}", get(public::opinion::<S, U>))
    // Session
    .route("/staff/login", get(session::login_form::<S, U>).post(session::login::<S, U>))
    .route("/staff/logout", get(session::logout::<S, U>).post(session::logout::<S, U>))
    // Staff
    .route("/staff/dashboard", get(staff::dashboard::<S, U>))
    .route("/staff/cases", get(staff::case_list::<S, U>))
    .route("/staff/cases/{id}", get(staff::case_detail::<S, U>))
    .route("/staff/cases/{id}/_panel", get(staff::case_panel::<S, U>))
    .route("/staff/cases/{id}/_status", post(staff::case_status::<S, U>))
    .route("/staff/deadlines", get(staff::deadlines::<S, U>))
    .route("/staff/acknowledgments", get(staff::acknowledgments::<S, U>))
    .route(
      "/staff/acknowledgments/{id}/_panel",
      get(staff::acknowledgment_panel::<S, U>),
    )
    .route("/staff/reports", get(staff::reports::<S, U>))
    .route("/staff/users", get(staff::users::<S, U>))
    .route("/staff/settings", get(staff::settings::<S, U>))
    .with_state(state)
    .nest("/api", api)
}
