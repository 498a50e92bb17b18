//! [`AcknowledgmentService`]: filing and browsing ethics acknowledgments.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use caseflow_core::{
  acknowledgment::{
    AcknowledgmentQuery, AcknowledgmentSummary, EthicsAcknowledgment, NewAcknowledgment,
  },
  case::{CaseType, NewCase},
  store::CaseStore,
};

use crate::{CaseService, Error, Result};

/// The summary line every acknowledgment case is filed under.
pub const ACKNOWLEDGMENT_SUMMARY: &str = "Ethics Acknowledgment Filing";

pub struct AcknowledgmentService<S> {
  cases: CaseService<S>,
}

impl<S> Clone for AcknowledgmentService<S> {
  fn clone(&self) -> Self { Self { cases: self.cases.clone() } }
}

impl<S: CaseStore> AcknowledgmentService<S> {
  pub fn new(cases: CaseService<S>) -> Self { Self { cases } }

  /// File an acknowledgment: open its EA case, then store the
  /// acknowledgment record under the same case number.
  pub async fn file(&self, new: NewAcknowledgment) -> Result<EthicsAcknowledgment> {
    let mut intake = NewCase::new(CaseType::EthicsAcknowledgment);
    intake.submitter_name = new.official_name.clone();
    intake.submitter_title = new.official_title.clone();
    intake.submitter_agency = new.agency.clone();
    intake.submitter_email = new.email.clone();
    intake.submitter_phone = new.phone.clone();
    intake.summary = ACKNOWLEDGMENT_SUMMARY.to_owned();

    let case = self.cases.create(intake).await?;

    let ack = EthicsAcknowledgment {
      id:                Uuid::new_v4(),
      case_number:       case.case_number.clone(),
      case_id:           Some(case.id),
      official_name:     new.official_name,
      official_title:    new.official_title,
      agency:            new.agency,
      agency_type:       new.agency_type,
      term_start:        new.term_start,
      term_end:          new.term_end,
      acknowledged_at:   case.submitted_at,
      signature_on_file: new.signature_on_file,
      email:             new.email,
      phone:             new.phone,
      address:           new.address,
      is_active:         true,
      created_at:        case.created_at,
      updated_at:        case.created_at,
    };

    self
      .cases
      .store()
      .create_acknowledgment(ack.clone())
      .await
      .map_err(Error::store)?;

    info!(case_number = %ack.case_number, official = %ack.official_name, "acknowledgment filed");
    Ok(ack)
  }

  pub async fn list(&self, query: &AcknowledgmentQuery) -> Result<Vec<EthicsAcknowledgment>> {
    self
      .cases
      .store()
      .list_acknowledgments(query)
      .await
      .map_err(Error::store)
  }

  pub async fn get(&self, id: Uuid) -> Result<Option<EthicsAcknowledgment>> {
    self
      .cases
      .store()
      .get_acknowledgment(id)
      .await
      .map_err(Error::store)
  }

  pub fn summary(&self, acks: &[EthicsAcknowledgment], now: DateTime<Utc>) -> AcknowledgmentSummary {
    AcknowledgmentSummary::of(acks, now)
  }
}

#[cfg(test)]
mod tests {
  use caseflow_core::acknowledgment::AgencyType;
  use caseflow_store_memory::MemoryStore;
  use chrono::NaiveDate;

  use super::*;

  fn filing() -> NewAcknowledgment {
    NewAcknowledgment {
      official_name:     "Dana Reyes".into(),
      official_title:    "Trustee".into(),
      agency:            "Truckee Meadows Water Authority".into(),
      agency_type:       AgencyType::District,
      term_start:        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
      term_end:          None,
      signature_on_file: true,
      email:             "dreyes@tmwa.com".into(),
      phone:             String::new(),
      address:           String::new(),
    }
  }

  #[tokio::test]
  async fn filing_opens_a_linked_ea_case() {
    let store = Arc::new(MemoryStore::new());
    let cases = CaseService::new(Arc::clone(&store));
    let svc = AcknowledgmentService::new(cases.clone());

    let ack = svc.file(filing()).await.unwrap();
    assert!(ack.case_number.starts_with("EA-"));

    let case = cases
      .get_by_case_number(&ack.case_number)
      .await
      .unwrap()
      .unwrap();
    assert_eq!(Some(case.id), ack.case_id);
    assert_eq!(case.summary, ACKNOWLEDGMENT_SUMMARY);
    assert_eq!(case.submitter_name, "Dana Reyes");
    assert!(case.due_date.is_none());

    assert_eq!(svc.get(ack.id).await.unwrap().unwrap().official_name, "Dana Reyes");
  }

  #[tokio::test]
  async fn listing_includes_new_filings() {
    let store = Arc::new(MemoryStore::with_demo_data());
    let svc = AcknowledgmentService::new(CaseService::new(store));
    svc.file(filing()).await.unwrap();

    let all = svc.list(&AcknowledgmentQuery::default()).await.unwrap();
    assert_eq!(all.len(), 6);
    assert_eq!(all[0].official_name, "Dana Reyes");

    let summary = svc.summary(&all, Utc::now());
    assert_eq!(summary.total, 6);
    assert_eq!(summary.active, 6);
  }
}
