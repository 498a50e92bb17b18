//! ETag computation for case resources.
//!
//! An ETag is a SHA-256 hash over the case id, its store version and the
//! `updated_at` timestamp, so any successful update produces a new tag.

use caseflow_core::case::Case;
use sha2::{Digest, Sha256};

/// Compute the quoted ETag for `case`.
pub fn compute_etag(case: &Case) -> String {
  let mut hasher = Sha256::new();
  hasher.update(case.id.as_bytes());
  hasher.update(case.version.to_le_bytes());
  hasher.update(case.updated_at.timestamp_micros().to_le_bytes());
  format!("\"{}\"", hex::encode(hasher.finalize()))
}

/// Some clients send entity tags without the surrounding quotes.
pub fn strip_etag_quotes(tag: &str) -> &str { tag.trim().trim_matches('"') }

/// Whether an `If-Match` header value matches `case`'s current tag.
///
/// `If-Match` uses strong comparison, so weak (`W/`) tags never match. `*`
/// matches any existing case.
pub fn if_match_holds(header: &str, case: &Case) -> bool {
  let current = compute_etag(case);
  header.split(',').map(str::trim).any(|tag| {
    let strong_match =
      !tag.starts_with("W/") && strip_etag_quotes(tag) == strip_etag_quotes(&current);
    tag == "*" || strong_match
  })
}
