//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized")]
  Unauthorized,

  /// The requested status change is not allowed from the current status.
  #[error("conflict: {0}")]
  Conflict(String),

  /// The `If-Match` precondition did not hold.
  #[error("precondition failed: {0}")]
  PreconditionFailed(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<caseflow_core::Error> for ApiError {
  fn from(err: caseflow_core::Error) -> Self {
    use caseflow_core::Error as E;

    let message = err.to_string();
    match err {
      E::CaseNotFound(_) | E::AcknowledgmentNotFound(_) | E::UserNotFound(_) => {
        Self::NotFound(message)
      }
      E::IllegalTransition { .. } => Self::Conflict(message),
      E::VersionConflict { .. } => Self::PreconditionFailed(message),
      E::UnknownCaseType(_)
      | E::UnknownStatus(_)
      | E::UnknownPriority(_)
      | E::UnknownAgencyType(_) => Self::BadRequest(message),
      E::InvalidSession | E::SessionExpired | E::InvalidCredentials => Self::Unauthorized,
      E::DuplicateKey(_) | E::PasswordHash(_) => Self::Store(Box::new(err)),
    }
  }
}

impl From<caseflow_service::Error> for ApiError {
  fn from(err: caseflow_service::Error) -> Self {
    match err {
      caseflow_service::Error::Core(e) => e.into(),
      caseflow_service::Error::Store(e) => Self::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::PreconditionFailed(m) => (StatusCode::PRECONDITION_FAILED, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
