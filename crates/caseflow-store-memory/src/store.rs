//! [`MemoryStore`]: the in-memory implementation of [`CaseStore`].

use std::{
  collections::{BTreeMap, HashMap},
  sync::Arc,
};

use chrono::{Datelike, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use caseflow_core::{
  acknowledgment::{AcknowledgmentQuery, EthicsAcknowledgment},
  case::{Case, CaseStatus, CaseType, format_case_number},
  deadline::Deadline,
  opinion::{OpinionQuery, PublishedOpinion},
  record::{CaseActivity, CaseNote, Document},
  store::{CaseQuery, CaseStore},
};

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Everything the store owns. Guarded as a whole by one lock.
#[derive(Default)]
pub(crate) struct Inner {
  pub(crate) cases:           HashMap<Uuid, Case>,
  /// Last sequence number issued per case type. Never reset.
  pub(crate) counters:        HashMap<CaseType, u32>,
  pub(crate) activity:        Vec<CaseActivity>,
  pub(crate) notes:           Vec<CaseNote>,
  pub(crate) documents:       Vec<Document>,
  pub(crate) acknowledgments: HashMap<Uuid, EthicsAcknowledgment>,
  pub(crate) opinions:        BTreeMap<String, PublishedOpinion>,
}

impl Inner {
  pub(crate) fn insert_case(&mut self, case: Case) -> Result<()> {
    if self.cases.contains_key(&case.id) {
      return Err(Error::DuplicateKey(case.id));
    }
    self.activity.push(CaseActivity::created(&case));
    self.cases.insert(case.id, case);
    Ok(())
  }

  fn require_case(&self, id: Uuid) -> Result<()> {
    if self.cases.contains_key(&id) {
      Ok(())
    } else {
      Err(Error::CaseNotFound(id))
    }
  }
}

/// A case store held entirely in process memory.
///
/// Cloning is cheap; clones share the same underlying records.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
  /// An empty store with all counters at zero.
  pub fn new() -> Self { Self::default() }

  pub(crate) fn from_inner(inner: Inner) -> Self {
    Self { inner: Arc::new(RwLock::new(inner)) }
  }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> chrono::DateTime<Utc>) {
  items.sort_by(|a, b| key(b).cmp(&key(a)));
}

impl CaseStore for MemoryStore {
  type Error = Error;

  // ── Cases ─────────────────────────────────────────────────────────────

  async fn create(&self, case: Case) -> Result<()> {
    self.inner.write().insert_case(case)
  }

  async fn update(&self, mut case: Case, expected_version: Option<u64>) -> Result<Case> {
    let mut inner = self.inner.write();
    let stored = inner
      .cases
      .get_mut(&case.id)
      .ok_or(Error::CaseNotFound(case.id))?;

    if let Some(expected) = expected_version
      && expected != stored.version
    {
      return Err(Error::VersionConflict {
        id: case.id,
        expected,
        actual: stored.version,
      });
    }

    case.version = stored.version + 1;
    *stored = case.clone();
    Ok(case)
  }

  async fn get_by_id(&self, id: Uuid) -> Result<Option<Case>> {
    Ok(self.inner.read().cases.get(&id).cloned())
  }

  async fn get_by_case_number<'a>(&'a self, case_number: &'a str) -> Result<Option<Case>> {
    Ok(
      self
        .inner
        .read()
        .cases
        .values()
        .find(|c| c.case_number == case_number)
        .cloned(),
    )
  }

  async fn list<'a>(&'a self, query: &'a CaseQuery) -> Result<Vec<Case>> {
    let mut cases: Vec<Case> = self
      .inner
      .read()
      .cases
      .values()
      .filter(|c| query.matches(c))
      .cloned()
      .collect();
    newest_first(&mut cases, |c| c.submitted_at);
    Ok(cases)
  }

  async fn recent(&self, limit: usize) -> Result<Vec<Case>> {
    let mut cases: Vec<Case> = self.inner.read().cases.values().cloned().collect();
    newest_first(&mut cases, |c| c.submitted_at);
    cases.truncate(limit);
    Ok(cases)
  }

  async fn deadlines(&self, limit: Option<usize>) -> Result<Vec<Deadline>> {
    let now = Utc::now();
    let mut deadlines: Vec<Deadline> = self
      .inner
      .read()
      .cases
      .values()
      .filter(|c| c.status != CaseStatus::Closed)
      .filter_map(|c| Deadline::for_case(c, now))
      .collect();

    deadlines.sort_by_key(|d| d.due_date);
    if let Some(limit) = limit {
      deadlines.truncate(limit);
    }
    Ok(deadlines)
  }

  async fn next_case_number(&self, case_type: CaseType) -> Result<String> {
    let mut inner = self.inner.write();
    let counter = inner.counters.entry(case_type).or_default();
    *counter += 1;
    Ok(format_case_number(case_type, Utc::now().year(), *counter))
  }

  // ── Case history ──────────────────────────────────────────────────────

  async fn record_activity(&self, entry: CaseActivity) -> Result<()> {
    let mut inner = self.inner.write();
    inner.require_case(entry.case_id)?;
    inner.activity.push(entry);
    Ok(())
  }

  async fn activity(&self, case_id: Uuid) -> Result<Vec<CaseActivity>> {
    let mut entries: Vec<CaseActivity> = self
      .inner
      .read()
      .activity
      .iter()
      .filter(|a| a.case_id == case_id)
      .cloned()
      .collect();
    entries.sort_by_key(|a| a.created_at);
    Ok(entries)
  }

  async fn recent_activity(&self, limit: usize) -> Result<Vec<CaseActivity>> {
    let mut entries = self.inner.read().activity.clone();
    newest_first(&mut entries, |a| a.created_at);
    entries.truncate(limit);
    Ok(entries)
  }

  async fn add_note(&self, note: CaseNote) -> Result<()> {
    let mut inner = self.inner.write();
    inner.require_case(note.case_id)?;
    inner.activity.push(CaseActivity::note_added(&note));
    inner.notes.push(note);
    Ok(())
  }

  async fn notes(&self, case_id: Uuid) -> Result<Vec<CaseNote>> {
    Ok(
      self
        .inner
        .read()
        .notes
        .iter()
        .filter(|n| n.case_id == case_id)
        .cloned()
        .collect(),
    )
  }

  async fn add_document(&self, document: Document) -> Result<()> {
    let mut inner = self.inner.write();
    inner.require_case(document.case_id)?;
    inner.activity.push(CaseActivity::document_added(&document));
    inner.documents.push(document);
    Ok(())
  }

  async fn documents(&self, case_id: Uuid) -> Result<Vec<Document>> {
    Ok(
      self
        .inner
        .read()
        .documents
        .iter()
        .filter(|d| d.case_id == case_id)
        .cloned()
        .collect(),
    )
  }

  // ── Acknowledgments ───────────────────────────────────────────────────

  async fn create_acknowledgment(&self, ack: EthicsAcknowledgment) -> Result<()> {
    let mut inner = self.inner.write();
    if inner.acknowledgments.contains_key(&ack.id) {
      return Err(Error::DuplicateKey(ack.id));
    }
    inner.acknowledgments.insert(ack.id, ack);
    Ok(())
  }

  async fn get_acknowledgment(&self, id: Uuid) -> Result<Option<EthicsAcknowledgment>> {
    Ok(self.inner.read().acknowledgments.get(&id).cloned())
  }

  async fn list_acknowledgments<'a>(
    &'a self,
    query: &'a AcknowledgmentQuery,
  ) -> Result<Vec<EthicsAcknowledgment>> {
    let mut acks: Vec<EthicsAcknowledgment> = self
      .inner
      .read()
      .acknowledgments
      .values()
      .filter(|a| query.matches(a))
      .cloned()
      .collect();
    newest_first(&mut acks, |a| a.acknowledged_at);
    Ok(acks)
  }

  // ── Published opinions ────────────────────────────────────────────────

  async fn publish_opinion(&self, opinion: PublishedOpinion) -> Result<()> {
    self
      .inner
      .write()
      .opinions
      .insert(opinion.case_number.clone(), opinion);
    Ok(())
  }

  async fn search_published<'a>(&'a self, query: &'a OpinionQuery) -> Result<Vec<PublishedOpinion>> {
    let mut opinions: Vec<PublishedOpinion> = self
      .inner
      .read()
      .opinions
      .values()
      .filter(|o| query.matches(o))
      .cloned()
      .collect();
    newest_first(&mut opinions, |o| o.published_at);
    Ok(opinions)
  }

  async fn get_published_opinion<'a>(
    &'a self,
    case_number: &'a str,
  ) -> Result<Option<PublishedOpinion>> {
    Ok(self.inner.read().opinions.get(case_number).cloned())
  }
}
