//! The `CaseStore` and `SessionStore` traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g.
//! `caseflow-store-memory`). Higher layers (`caseflow-service`,
//! `caseflow-api`, `caseflow-portal`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  acknowledgment::{AcknowledgmentQuery, EthicsAcknowledgment},
  case::{Case, CaseStatus, CaseType},
  deadline::Deadline,
  opinion::{OpinionQuery, PublishedOpinion},
  record::{CaseActivity, CaseNote, Document},
  user::{Session, User},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`CaseStore::list`]. Every filter must match; `None` is a
/// wildcard.
#[derive(Debug, Clone, Default)]
pub struct CaseQuery {
  pub case_type: Option<CaseType>,
  pub status:    Option<CaseStatus>,
  /// Case-insensitive substring over case number, summary and submitter name.
  pub text:      Option<String>,
}

impl CaseQuery {
  pub fn matches(&self, case: &Case) -> bool {
    if self.case_type.is_some_and(|t| t != case.case_type) {
      return false;
    }
    if self.status.is_some_and(|s| s != case.status) {
      return false;
    }
    match &self.text {
      Some(text) => case
        .search_haystack()
        .to_lowercase()
        .contains(&text.to_lowercase()),
      None => true,
    }
  }
}

// ─── Case store ──────────────────────────────────────────────────────────────

/// Abstraction over a case store backend.
///
/// Implementations must make [`CaseStore::next_case_number`] linearizable: no
/// two calls may ever return the same number.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CaseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Cases ─────────────────────────────────────────────────────────────

  /// Insert a new case and log its `created` activity entry. Fails with a
  /// duplicate-key error if the id is taken.
  fn create(
    &self,
    case: Case,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Replace an existing case and return the stored record, whose `version`
  /// has been bumped.
  ///
  /// With `expected_version: None` the write is last-write-wins. With
  /// `Some(v)` the stored version must still be `v`.
  fn update(
    &self,
    case: Case,
    expected_version: Option<u64>,
  ) -> impl Future<Output = Result<Case, Self::Error>> + Send + '_;

  /// Retrieve a case by id. Returns `None` if not found.
  fn get_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + '_;

  fn get_by_case_number<'a>(
    &'a self,
    case_number: &'a str,
  ) -> impl Future<Output = Result<Option<Case>, Self::Error>> + Send + 'a;

  /// All cases matching `query`. The order is not part of the contract.
  fn list<'a>(
    &'a self,
    query: &'a CaseQuery,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + 'a;

  /// The `limit` most recently submitted cases, newest first.
  fn recent(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Case>, Self::Error>> + Send + '_;

  /// Deadlines of all cases with a due date that are not closed, soonest
  /// first, capped at `limit` when given.
  fn deadlines(
    &self,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<Deadline>, Self::Error>> + Send + '_;

  /// Atomically allocate the next case number for `case_type`.
  fn next_case_number(
    &self,
    case_type: CaseType,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;

  // ── Case history ──────────────────────────────────────────────────────

  fn record_activity(
    &self,
    entry: CaseActivity,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// A case's activity, oldest first.
  fn activity(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<Vec<CaseActivity>, Self::Error>> + Send + '_;

  /// The newest activity entries across all cases, newest first.
  fn recent_activity(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<CaseActivity>, Self::Error>> + Send + '_;

  /// Attach a note and log it. Fails if the case does not exist.
  fn add_note(
    &self,
    note: CaseNote,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn notes(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<Vec<CaseNote>, Self::Error>> + Send + '_;

  /// Attach document metadata and log it. Fails if the case does not exist.
  fn add_document(
    &self,
    document: Document,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn documents(
    &self,
    case_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  // ── Acknowledgments ───────────────────────────────────────────────────

  fn create_acknowledgment(
    &self,
    ack: EthicsAcknowledgment,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_acknowledgment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<EthicsAcknowledgment>, Self::Error>>
  + Send
  + '_;

  /// Acknowledgments matching `query`, most recently filed first.
  fn list_acknowledgments<'a>(
    &'a self,
    query: &'a AcknowledgmentQuery,
  ) -> impl Future<Output = Result<Vec<EthicsAcknowledgment>, Self::Error>>
  + Send
  + 'a;

  // ── Published opinions ────────────────────────────────────────────────

  /// Add or replace the published record for a case number.
  fn publish_opinion(
    &self,
    opinion: PublishedOpinion,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Published opinions matching `query`, newest first.
  fn search_published<'a>(
    &'a self,
    query: &'a OpinionQuery,
  ) -> impl Future<Output = Result<Vec<PublishedOpinion>, Self::Error>> + Send + 'a;

  fn get_published_opinion<'a>(
    &'a self,
    case_number: &'a str,
  ) -> impl Future<Output = Result<Option<PublishedOpinion>, Self::Error>>
  + Send
  + 'a;
}

// ─── Session store ───────────────────────────────────────────────────────────

/// Staff users and their login sessions.
pub trait SessionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn get_user<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Every user, ordered by name.
  fn list_users(&self) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Insert a user, or replace the one with the same id.
  fn upsert_user(
    &self,
    user: User,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn create_session(
    &self,
    session: Session,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn session_by_token<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + 'a;

  /// Remove a session. Deleting an unknown token is not an error.
  fn delete_session<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::case::{Priority, format_case_number};

  fn case(case_type: CaseType, summary: &str, submitter: &str) -> Case {
    let now = Utc::now();
    Case {
      id: Uuid::new_v4(),
      case_number: format_case_number(case_type, 2024, 7),
      case_type,
      status: CaseStatus::Submitted,
      submitter_name: submitter.into(),
      submitter_title: String::new(),
      submitter_agency: String::new(),
      submitter_email: String::new(),
      submitter_phone: String::new(),
      subject_name: String::new(),
      subject_title: String::new(),
      subject_agency: String::new(),
      summary: summary.into(),
      description: String::new(),
      statute_citations: String::new(),
      submitted_at: now,
      due_date: None,
      closed_at: None,
      published_at: None,
      assigned_to: None,
      priority: Priority::Normal,
      is_public: false,
      is_confidential: false,
      tags: vec![],
      created_at: now,
      updated_at: now,
      version: 0,
    }
  }

  #[test]
  fn empty_query_matches_everything() {
    let q = CaseQuery::default();
    assert!(q.matches(&case(CaseType::EthicsComplaint, "x", "y")));
  }

  #[test]
  fn text_matches_number_summary_or_submitter() {
    let c = case(CaseType::AdvisoryOpinion, "Outside employment", "Maria Garcia");
    let q = |t: &str| CaseQuery { text: Some(t.into()), ..Default::default() };

    assert!(q("GARCIA").matches(&c));
    assert!(q("outside").matches(&c));
    assert!(q("ao-2024-007").matches(&c));
    assert!(!q("chen").matches(&c));
  }

  #[test]
  fn all_filters_must_match() {
    let c = case(CaseType::AdvisoryOpinion, "Gifts", "Jane");
    let q = CaseQuery {
      case_type: Some(CaseType::AdvisoryOpinion),
      status:    Some(CaseStatus::Closed),
      text:      None,
    };
    assert!(!q.matches(&c));
  }
}
