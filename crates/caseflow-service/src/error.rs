//! Error type for `caseflow-service`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain error, whether raised here or reported by the store.
  #[error(transparent)]
  Core(#[from] caseflow_core::Error),

  /// Any other store failure.
  #[error("store error: {0}")]
  Store(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a store error, keeping it classifiable when the store reports a
  /// core error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(err);
    match boxed.downcast::<caseflow_core::Error>() {
      Ok(core) => Self::Core(*core),
      Err(other) => Self::Store(other),
    }
  }

  pub fn as_core(&self) -> Option<&caseflow_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      Self::Store(_) => None,
    }
  }

  pub fn is_not_found(&self) -> bool {
    self.as_core().is_some_and(caseflow_core::Error::is_not_found)
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  #[derive(Debug, Error)]
  #[error("disk on fire")]
  struct DiskError;

  #[test]
  fn core_errors_survive_boxing() {
    let id = Uuid::new_v4();
    let err = Error::store(caseflow_core::Error::CaseNotFound(id));
    assert!(err.is_not_found());
    assert!(matches!(err, Error::Core(caseflow_core::Error::CaseNotFound(x)) if x == id));
  }

  #[test]
  fn foreign_errors_stay_opaque() {
    let err = Error::store(DiskError);
    assert!(matches!(err, Error::Store(_)));
    assert!(!err.is_not_found());
    assert_eq!(err.to_string(), "store error: disk on fire");
  }
}
