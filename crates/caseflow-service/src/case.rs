//! [`CaseService`]: case creation, status changes and staff annotations.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use caseflow_core::{
  business_days::add_business_days,
  case::{Case, CaseStatus, NewCase, Priority, StaffRef, TransitionPolicy},
  deadline::Deadline,
  opinion::{OpinionQuery, PublishedOpinion},
  record::{CaseActivity, CaseNote, Document, DocumentCategory},
  store::{CaseQuery, CaseStore},
};

use crate::{Error, Result};

/// Metadata for a document being attached to a case.
#[derive(Debug, Clone)]
pub struct NewDocument {
  pub filename:     String,
  pub content_type: String,
  pub size:         u64,
  pub category:     DocumentCategory,
  pub is_public:    bool,
}

pub struct CaseService<S> {
  store:  Arc<S>,
  policy: TransitionPolicy,
}

impl<S> Clone for CaseService<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      policy: self.policy,
    }
  }
}

impl<S: CaseStore> CaseService<S> {
  /// A service enforcing the strict transition table.
  pub fn new(store: Arc<S>) -> Self {
    Self { store, policy: TransitionPolicy::default() }
  }

  pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn policy(&self) -> TransitionPolicy { self.policy }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Intake ────────────────────────────────────────────────────────────

  /// Number, stamp and persist a new submission. The returned case's
  /// `case_number` is the confirmation shown to the submitter.
  pub async fn create(&self, new: NewCase) -> Result<Case> {
    let case_number = self
      .store
      .next_case_number(new.case_type)
      .await
      .map_err(Error::store)?;

    let now = Utc::now();
    let due_date = new
      .case_type
      .response_period()
      .map(|days| add_business_days(now, days));

    let case = Case {
      id: Uuid::new_v4(),
      case_number,
      case_type: new.case_type,
      status: CaseStatus::Submitted,
      submitter_name: new.submitter_name,
      submitter_title: new.submitter_title,
      submitter_agency: new.submitter_agency,
      submitter_email: new.submitter_email,
      submitter_phone: new.submitter_phone,
      subject_name: new.subject_name,
      subject_title: new.subject_title,
      subject_agency: new.subject_agency,
      summary: new.summary,
      description: new.description,
      statute_citations: new.statute_citations,
      submitted_at: now,
      due_date,
      closed_at: None,
      published_at: None,
      assigned_to: None,
      priority: new.priority,
      is_public: false,
      is_confidential: new.is_confidential,
      tags: new.tags,
      created_at: now,
      updated_at: now,
      version: 0,
    };

    self.store.create(case.clone()).await.map_err(Error::store)?;

    info!(
      id = %case.id,
      case_number = %case.case_number,
      case_type = %case.case_type,
      submitter = %case.submitter_name,
      "case created"
    );
    Ok(case)
  }

  // ── Status ────────────────────────────────────────────────────────────

  pub async fn update_status(&self, id: Uuid, status: CaseStatus) -> Result<Case> {
    self.update_status_checked(id, status, None, None).await
  }

  /// Move a case to `status`.
  ///
  /// When `expected_version` is given the write fails with a version
  /// conflict if the case changed since it was read. `actor` is recorded on
  /// the activity entry.
  pub async fn update_status_checked(
    &self,
    id: Uuid,
    status: CaseStatus,
    expected_version: Option<u64>,
    actor: Option<&StaffRef>,
  ) -> Result<Case> {
    let case = self.require(id).await?;

    if let Some(expected) = expected_version
      && expected != case.version
    {
      return Err(
        caseflow_core::Error::VersionConflict {
          id,
          expected,
          actual: case.version,
        }
        .into(),
      );
    }

    self.write_status(case, status, expected_version, actor).await
  }

  /// Apply a status change to `case` as read from the store.
  ///
  /// Under the strict policy the write is guarded by the version the
  /// transition was checked against, so a concurrent change surfaces as a
  /// version conflict instead of being overwritten.
  pub(crate) async fn write_status(
    &self,
    mut case: Case,
    status: CaseStatus,
    expected_version: Option<u64>,
    actor: Option<&StaffRef>,
  ) -> Result<Case> {
    let from = case.status;
    self.policy.check(from, status)?;

    let guard = match self.policy {
      TransitionPolicy::Strict => expected_version.or(Some(case.version)),
      TransitionPolicy::Permissive => expected_version,
    };

    let now = later_than(case.updated_at);
    case.status = status;
    case.updated_at = now;
    match status {
      CaseStatus::Closed => case.closed_at = Some(now),
      CaseStatus::Published => {
        case.published_at = Some(now);
        case.is_public = true;
      }
      _ => {}
    }

    let case = self
      .store
      .update(case, guard)
      .await
      .map_err(Error::store)?;

    if status == CaseStatus::Published
      && from != CaseStatus::Published
      && let Some(opinion) = PublishedOpinion::from_case(&case, now)
    {
      self.store.publish_opinion(opinion).await.map_err(Error::store)?;
    }

    if from != status {
      let mut entry = CaseActivity::status_changed(&case, from);
      if let Some(actor) = actor {
        entry = entry.by(&actor.id, &actor.name);
      }
      self.store.record_activity(entry).await.map_err(Error::store)?;
    }

    info!(
      case_number = %case.case_number,
      from = %from,
      to = %status,
      "case status changed"
    );
    Ok(case)
  }

  // ── Staff annotations ─────────────────────────────────────────────────

  /// Assign a case to a staff member and set its triage priority.
  pub async fn assign(
    &self,
    id: Uuid,
    staff: StaffRef,
    priority: Priority,
    actor: Option<&StaffRef>,
  ) -> Result<Case> {
    let mut case = self.require(id).await?;
    case.assigned_to = Some(staff);
    case.priority = priority;
    case.updated_at = later_than(case.updated_at);

    let case = self.store.update(case, None).await.map_err(Error::store)?;

    let mut entry = CaseActivity::assigned(&case);
    if let Some(actor) = actor {
      entry = entry.by(&actor.id, &actor.name);
    }
    self.store.record_activity(entry).await.map_err(Error::store)?;

    info!(case_number = %case.case_number, priority = %priority, "case assigned");
    Ok(case)
  }

  pub async fn add_note(&self, id: Uuid, author: &StaffRef, content: String) -> Result<CaseNote> {
    let note = CaseNote {
      note_id: Uuid::new_v4(),
      case_id: id,
      author_id: author.id.clone(),
      author_name: author.name.clone(),
      content,
      created_at: Utc::now(),
    };
    self.store.add_note(note.clone()).await.map_err(Error::store)?;
    Ok(note)
  }

  /// Record document metadata. The file contents are stored elsewhere.
  pub async fn attach_document(
    &self,
    id: Uuid,
    uploaded_by: &StaffRef,
    doc: NewDocument,
  ) -> Result<Document> {
    let document = Document {
      document_id: Uuid::new_v4(),
      case_id: id,
      filename: doc.filename,
      content_type: doc.content_type,
      size: doc.size,
      category: doc.category,
      is_public: doc.is_public,
      uploaded_by: uploaded_by.id.clone(),
      uploaded_at: Utc::now(),
    };
    self
      .store
      .add_document(document.clone())
      .await
      .map_err(Error::store)?;
    Ok(document)
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Case>> {
    self.store.get_by_id(id).await.map_err(Error::store)
  }

  pub async fn get_by_case_number(&self, case_number: &str) -> Result<Option<Case>> {
    self
      .store
      .get_by_case_number(case_number)
      .await
      .map_err(Error::store)
  }

  pub async fn list(&self, query: &CaseQuery) -> Result<Vec<Case>> {
    self.store.list(query).await.map_err(Error::store)
  }

  pub async fn get_recent(&self, limit: usize) -> Result<Vec<Case>> {
    self.store.recent(limit).await.map_err(Error::store)
  }

  pub async fn get_documents(&self, id: Uuid) -> Result<Vec<Document>> {
    self.store.documents(id).await.map_err(Error::store)
  }

  pub async fn get_notes(&self, id: Uuid) -> Result<Vec<CaseNote>> {
    self.store.notes(id).await.map_err(Error::store)
  }

  pub async fn get_activity(&self, id: Uuid) -> Result<Vec<CaseActivity>> {
    self.store.activity(id).await.map_err(Error::store)
  }

  pub async fn get_upcoming_deadlines(&self, limit: usize) -> Result<Vec<Deadline>> {
    self.store.deadlines(Some(limit)).await.map_err(Error::store)
  }

  pub async fn get_all_deadlines(&self) -> Result<Vec<Deadline>> {
    self.store.deadlines(None).await.map_err(Error::store)
  }

  pub async fn search_published(&self, query: &OpinionQuery) -> Result<Vec<PublishedOpinion>> {
    self.store.search_published(query).await.map_err(Error::store)
  }

  pub async fn get_published_opinion(&self, case_number: &str) -> Result<Option<PublishedOpinion>> {
    self
      .store
      .get_published_opinion(case_number)
      .await
      .map_err(Error::store)
  }

  async fn require(&self, id: Uuid) -> Result<Case> {
    self
      .get_by_id(id)
      .await?
      .ok_or(Error::Core(caseflow_core::Error::CaseNotFound(id)))
  }
}

/// The current time, nudged forward if needed so it is strictly after `prev`.
fn later_than(prev: DateTime<Utc>) -> DateTime<Utc> {
  Utc::now().max(prev + Duration::microseconds(1))
}
