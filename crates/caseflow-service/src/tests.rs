//! Lifecycle tests for `CaseService` against the in-memory store.

use std::{sync::Arc, time::Duration as StdDuration};

use chrono::Duration;

use caseflow_core::{
  case::{CaseStatus, CaseType, NewCase, Priority, StaffRef, TransitionPolicy, parse_case_number},
  opinion::OpinionQuery,
  record::{ActivityAction, DocumentCategory},
  store::CaseQuery,
};
use caseflow_store_memory::MemoryStore;

use crate::{CaseService, Error, NewDocument};

fn service() -> CaseService<MemoryStore> { CaseService::new(Arc::new(MemoryStore::new())) }

fn submission(case_type: CaseType) -> NewCase {
  let mut new = NewCase::new(case_type);
  new.submitter_name = "John Test".into();
  new.submitter_email = "john@test.gov".into();
  new.summary = "May I accept a speaking fee?".into();
  new.description = "A trade association has offered an honorarium.".into();
  new
}

fn staff() -> StaffRef {
  StaffRef { id: "user_1".into(), name: "Ross Armstrong".into() }
}

fn core(err: Error) -> caseflow_core::Error {
  match err {
    Error::Core(e) => e,
    Error::Store(e) => panic!("unexpected store error: {e}"),
  }
}

// ─── Intake ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn advisory_opinion_due_date_is_45_business_days_out() {
  let case = service().create(submission(CaseType::AdvisoryOpinion)).await.unwrap();
  let due = case.due_date.unwrap();

  assert!(due > case.submitted_at + Duration::days(45));
  assert!(due <= case.submitted_at + Duration::days(67));
}

#[tokio::test]
async fn records_request_due_date_is_5_business_days_out() {
  let case = service()
    .create(submission(CaseType::PublicRecordsRequest))
    .await
    .unwrap();
  let due = case.due_date.unwrap();

  assert!(due >= case.submitted_at + Duration::days(5));
  assert!(due <= case.submitted_at + Duration::days(9));
}

#[tokio::test]
async fn complaints_and_acknowledgments_have_no_due_date() {
  let svc = service();
  for case_type in [CaseType::EthicsComplaint, CaseType::EthicsAcknowledgment] {
    let case = svc.create(submission(case_type)).await.unwrap();
    assert!(case.due_date.is_none());
  }
}

#[tokio::test]
async fn create_then_get_returns_submitted_fields() {
  let svc = service();
  let mut new = submission(CaseType::EthicsComplaint);
  new.subject_name = "Robert Johnson".into();
  new.statute_citations = "NRS 281A.400".into();

  let created = svc.create(new).await.unwrap();
  let fetched = svc.get_by_id(created.id).await.unwrap().unwrap();

  assert_eq!(fetched.submitter_name, "John Test");
  assert_eq!(fetched.submitter_email, "john@test.gov");
  assert_eq!(fetched.subject_name, "Robert Johnson");
  assert_eq!(fetched.summary, "May I accept a speaking fee?");
  assert_eq!(fetched.statute_citations, "NRS 281A.400");
  assert_eq!(fetched.status, CaseStatus::Submitted);
  assert_eq!(fetched.submitted_at, fetched.created_at);
}

#[tokio::test]
async fn empty_fields_are_accepted() {
  let case = service().create(NewCase::new(CaseType::EthicsComplaint)).await.unwrap();
  assert!(case.submitter_name.is_empty());
  assert!(parse_case_number(&case.case_number).is_some());
}

// ─── Status changes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn update_status_persists_and_advances_updated_at() {
  let svc = service();
  let case = svc.create(submission(CaseType::AdvisoryOpinion)).await.unwrap();

  let updated = svc.update_status(case.id, CaseStatus::UnderReview).await.unwrap();
  assert!(updated.updated_at > case.updated_at);

  let fetched = svc.get_by_id(case.id).await.unwrap().unwrap();
  assert_eq!(fetched.status, CaseStatus::UnderReview);
  assert_eq!(fetched.updated_at, updated.updated_at);
}

#[tokio::test]
async fn update_status_of_missing_case_is_not_found() {
  let err = service()
    .update_status(uuid::Uuid::new_v4(), CaseStatus::Closed)
    .await
    .unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn strict_policy_rejects_illegal_transitions() {
  let svc = service();
  let case = svc.create(submission(CaseType::AdvisoryOpinion)).await.unwrap();

  let err = svc.update_status(case.id, CaseStatus::Published).await.unwrap_err();
  assert!(matches!(
    core(err),
    caseflow_core::Error::IllegalTransition {
      from: CaseStatus::Submitted,
      to:   CaseStatus::Published,
    }
  ));

  let unchanged = svc.get_by_id(case.id).await.unwrap().unwrap();
  assert_eq!(unchanged.status, CaseStatus::Submitted);
}

#[tokio::test]
async fn permissive_policy_allows_any_transition() {
  let svc = service().with_policy(TransitionPolicy::Permissive);
  let case = svc.create(submission(CaseType::AdvisoryOpinion)).await.unwrap();

  svc.update_status(case.id, CaseStatus::Closed).await.unwrap();
  let reopened = svc.update_status(case.id, CaseStatus::Submitted).await.unwrap();
  assert_eq!(reopened.status, CaseStatus::Submitted);
}

#[tokio::test]
async fn closing_stamps_closed_at() {
  let svc = service();
  let case = svc.create(submission(CaseType::PublicRecordsRequest)).await.unwrap();

  let closed = svc.update_status(case.id, CaseStatus::Closed).await.unwrap();
  assert_eq!(closed.closed_at, Some(closed.updated_at));
  assert!(!closed.is_overdue(closed.due_date.unwrap() + Duration::days(1)));
}

#[tokio::test]
async fn stale_version_is_a_conflict() {
  let svc = service();
  let case = svc.create(submission(CaseType::AdvisoryOpinion)).await.unwrap();
  svc
    .update_status_checked(case.id, CaseStatus::UnderReview, Some(0), None)
    .await
    .unwrap();

  let err = svc
    .update_status_checked(case.id, CaseStatus::Investigation, Some(0), None)
    .await
    .unwrap_err();
  assert!(matches!(
    core(err),
    caseflow_core::Error::VersionConflict { expected: 0, actual: 1, .. }
  ));
}

#[tokio::test]
async fn racing_status_change_cannot_reopen_a_closed_case() {
  let svc = service();
  let case = svc.create(submission(CaseType::AdvisoryOpinion)).await.unwrap();

  // Both requests read the case while it is still submitted.
  let seen_by_review = svc.get_by_id(case.id).await.unwrap().unwrap();
  svc.update_status(case.id, CaseStatus::Closed).await.unwrap();

  let err = svc
    .write_status(seen_by_review, CaseStatus::UnderReview, None, None)
    .await
    .unwrap_err();
  assert!(matches!(
    core(err),
    caseflow_core::Error::VersionConflict { expected: 0, actual: 1, .. }
  ));

  let stored = svc.get_by_id(case.id).await.unwrap().unwrap();
  assert_eq!(stored.status, CaseStatus::Closed);
  assert!(stored.closed_at.is_some());
  let changes = svc
    .get_activity(case.id)
    .await
    .unwrap()
    .into_iter()
    .filter(|a| a.action == ActivityAction::StatusChanged)
    .count();
  assert_eq!(changes, 1);
}

#[tokio::test]
async fn permissive_policy_keeps_last_write_wins() {
  let svc = service().with_policy(TransitionPolicy::Permissive);
  let case = svc.create(submission(CaseType::AdvisoryOpinion)).await.unwrap();

  let stale = svc.get_by_id(case.id).await.unwrap().unwrap();
  svc.update_status(case.id, CaseStatus::Closed).await.unwrap();
  let reopened = svc
    .write_status(stale, CaseStatus::UnderReview, None, None)
    .await
    .unwrap();
  assert_eq!(reopened.status, CaseStatus::UnderReview);
}

#[tokio::test]
async fn status_changes_are_logged_with_the_actor() {
  let svc = service();
  let case = svc.create(submission(CaseType::EthicsComplaint)).await.unwrap();
  svc
    .update_status_checked(case.id, CaseStatus::UnderReview, None, Some(&staff()))
    .await
    .unwrap();

  let activity = svc.get_activity(case.id).await.unwrap();
  assert_eq!(activity.len(), 2);
  let change = &activity[1];
  assert_eq!(change.action, ActivityAction::StatusChanged);
  assert_eq!(change.old_value.as_deref(), Some("submitted"));
  assert_eq!(change.new_value.as_deref(), Some("under_review"));
  assert_eq!(change.user_name.as_deref(), Some("Ross Armstrong"));
}

#[tokio::test]
async fn publishing_an_opinion_makes_it_searchable() {
  let svc = service();
  let mut new = submission(CaseType::AdvisoryOpinion);
  new.tags = vec!["Honoraria".into()];
  new.statute_citations = "NRS 281A.510; NRS 281A.400".into();
  let case = svc.create(new).await.unwrap();

  for status in [
    CaseStatus::UnderReview,
    CaseStatus::DraftPrepared,
    CaseStatus::Published,
  ] {
    svc.update_status(case.id, status).await.unwrap();
  }

  let published = svc.get_by_id(case.id).await.unwrap().unwrap();
  assert!(published.is_public);
  assert!(published.published_at.is_some());

  let opinion = svc
    .get_published_opinion(&case.case_number)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(opinion.statutes, ["NRS 281A.510", "NRS 281A.400"]);

  let hits = svc
    .search_published(&OpinionQuery { topic: Some("honoraria".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(hits.len(), 1);
}

// ─── Staff annotations ───────────────────────────────────────────────────────

#[tokio::test]
async fn assign_sets_staff_and_priority() {
  let svc = service();
  let case = svc.create(submission(CaseType::EthicsComplaint)).await.unwrap();

  let assigned = svc
    .assign(case.id, staff(), Priority::High, None)
    .await
    .unwrap();
  assert_eq!(assigned.assigned_to, Some(staff()));
  assert_eq!(assigned.priority, Priority::High);

  let activity = svc.get_activity(case.id).await.unwrap();
  assert_eq!(activity.last().unwrap().action, ActivityAction::Assigned);
}

#[tokio::test]
async fn notes_and_documents_attach_to_the_case() {
  let svc = service();
  let case = svc.create(submission(CaseType::PublicRecordsRequest)).await.unwrap();

  svc
    .add_note(case.id, &staff(), "Records located.".into())
    .await
    .unwrap();
  svc
    .attach_document(case.id, &staff(), NewDocument {
      filename:     "response.pdf".into(),
      content_type: "application/pdf".into(),
      size:         2048,
      category:     DocumentCategory::Correspondence,
      is_public:    false,
    })
    .await
    .unwrap();

  assert_eq!(svc.get_notes(case.id).await.unwrap().len(), 1);
  assert_eq!(svc.get_documents(case.id).await.unwrap()[0].filename, "response.pdf");
}

#[tokio::test]
async fn notes_on_missing_cases_fail() {
  let err = service()
    .add_note(uuid::Uuid::new_v4(), &staff(), "x".into())
    .await
    .unwrap_err();
  assert!(err.is_not_found());
}

// ─── Queries ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_filters_by_type_and_text() {
  let svc = service();
  svc.create(submission(CaseType::AdvisoryOpinion)).await.unwrap();
  svc.create(submission(CaseType::PublicRecordsRequest)).await.unwrap();
  let mut other = submission(CaseType::AdvisoryOpinion);
  other.submitter_name = "Maria Garcia".into();
  svc.create(other).await.unwrap();

  let aos = svc
    .list(&CaseQuery { case_type: Some(CaseType::AdvisoryOpinion), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(aos.len(), 2);

  let garcia = svc
    .list(&CaseQuery { text: Some("GARCIA".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(garcia.len(), 1);
  assert_eq!(garcia[0].submitter_name, "Maria Garcia");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_get_distinct_numbers() {
  let svc = service();
  let handles: Vec<_> = (0..32)
    .map(|_| {
      let svc = svc.clone();
      tokio::spawn(async move { svc.create(submission(CaseType::AdvisoryOpinion)).await })
    })
    .collect();

  let mut numbers = Vec::new();
  for handle in handles {
    numbers.push(handle.await.unwrap().unwrap().case_number);
  }
  numbers.sort();
  numbers.dedup();
  assert_eq!(numbers.len(), 32);
}

// ─── End to end ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn advisory_opinion_intake_to_review() {
  let svc = service();
  let created = svc.create(submission(CaseType::AdvisoryOpinion)).await.unwrap();

  let (case_type, _, _) = parse_case_number(&created.case_number).unwrap();
  assert_eq!(case_type, CaseType::AdvisoryOpinion);
  assert_eq!(created.case_number.len(), "AO-2025-001".len());

  let found = svc
    .get_by_case_number(&created.case_number)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.status, CaseStatus::Submitted);
  assert_eq!(found.submitter_name, "John Test");
  assert_eq!(
    found.due_date,
    Some(caseflow_core::business_days::add_business_days(
      found.submitted_at,
      45
    ))
  );

  tokio::time::sleep(StdDuration::from_millis(2)).await;
  svc.update_status(found.id, CaseStatus::UnderReview).await.unwrap();

  let reviewed = svc.get_by_id(found.id).await.unwrap().unwrap();
  assert_eq!(reviewed.status, CaseStatus::UnderReview);
  assert!(reviewed.updated_at > found.updated_at);
}
