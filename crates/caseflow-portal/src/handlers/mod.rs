//! Route handlers, grouped by audience.

pub mod public;
pub mod session;
pub mod staff;

/// Treat absent, empty and whitespace-only form or query values alike.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

/// Parse an optional year filter.
pub(crate) fn parse_year(value: Option<String>) -> Result<Option<i32>, crate::Error> {
  non_empty(value)
    .map(|y| {
      y.trim()
        .parse()
        .map_err(|_| crate::Error::BadRequest(format!("invalid year: {y:?}")))
    })
    .transpose()
}
