//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not found")]
  NotFound,
  #[error("forbidden")]
  Forbidden,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("conflict: {0}")]
  Conflict(String),
  #[error("render error: {0}")]
  Render(String),
  #[error(transparent)]
  Service(caseflow_service::Error),
}

impl From<caseflow_service::Error> for Error {
  fn from(err: caseflow_service::Error) -> Self {
    use caseflow_core::Error as Core;

    let mapped = match err.as_core() {
      Some(e) if e.is_not_found() => Some(Error::NotFound),
      Some(Core::IllegalTransition { .. } | Core::VersionConflict { .. }) => {
        Some(Error::Conflict(err.to_string()))
      }
      Some(
        Core::UnknownCaseType(_)
        | Core::UnknownStatus(_)
        | Core::UnknownPriority(_)
        | Core::UnknownAgencyType(_),
      ) => Some(Error::BadRequest(err.to_string())),
      _ => None,
    };
    mapped.unwrap_or(Error::Service(err))
  }
}

impl From<caseflow_core::Error> for Error {
  fn from(err: caseflow_core::Error) -> Self { caseflow_service::Error::from(err).into() }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
      Error::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      Error::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
      Error::Render(msg) => {
        error!(%msg, "page render failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
      }
      Error::Service(e) => {
        error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  fn status(err: caseflow_core::Error) -> StatusCode { Error::from(err).into_response().status() }

  #[test]
  fn core_errors_map_to_statuses() {
    assert_eq!(status(caseflow_core::Error::CaseNotFound(Uuid::nil())), StatusCode::NOT_FOUND);
    assert_eq!(
      status(caseflow_core::Error::UnknownStatus("bogus".into())),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      status(caseflow_core::Error::IllegalTransition {
        from: caseflow_core::case::CaseStatus::Closed,
        to:   caseflow_core::case::CaseStatus::Submitted,
      }),
      StatusCode::CONFLICT
    );
    assert_eq!(
      status(caseflow_core::Error::DuplicateKey(Uuid::nil())),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }
}
