//! Error types for `caseflow-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::case::CaseStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("case not found: {0}")]
  CaseNotFound(Uuid),

  #[error("acknowledgment not found: {0}")]
  AcknowledgmentNotFound(Uuid),

  /// A record with this id already exists. Ids are freshly generated, so this
  /// signals a bug rather than a user error.
  #[error("duplicate key: {0}")]
  DuplicateKey(Uuid),

  #[error("case {id} was modified concurrently (expected version {expected}, found {actual})")]
  VersionConflict { id: Uuid, expected: u64, actual: u64 },

  #[error("illegal status transition: {from} -> {to}")]
  IllegalTransition { from: CaseStatus, to: CaseStatus },

  #[error("unknown case type: {0:?}")]
  UnknownCaseType(String),

  #[error("unknown case status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown priority: {0:?}")]
  UnknownPriority(String),

  #[error("unknown agency type: {0:?}")]
  UnknownAgencyType(String),

  #[error("invalid session")]
  InvalidSession,

  #[error("session expired")]
  SessionExpired,

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("user not found: {0}")]
  UserNotFound(String),

  #[error("password hash error: {0}")]
  PasswordHash(String),
}

impl Error {
  /// Whether the error means "the referenced record does not exist".
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::CaseNotFound(_) | Self::AcknowledgmentNotFound(_) | Self::UserNotFound(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
