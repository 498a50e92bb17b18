//! Tests for `MemoryStore` and `MemorySessionStore`.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use uuid::Uuid;

use caseflow_core::{
  acknowledgment::{AcknowledgmentQuery, AgencyType},
  case::{Case, CaseStatus, CaseType, Priority, parse_case_number},
  deadline::DeadlineStatus,
  opinion::OpinionQuery,
  record::{ActivityAction, CaseNote},
  store::{CaseQuery, CaseStore, SessionStore},
  user::Session,
};

use crate::{Error, MemorySessionStore, MemoryStore};

fn case(case_type: CaseType, number: &str) -> Case {
  let now = Utc::now();
  Case {
    id: Uuid::new_v4(),
    case_number: number.into(),
    case_type,
    status: CaseStatus::Submitted,
    submitter_name: "Alice Liddell".into(),
    submitter_title: String::new(),
    submitter_agency: String::new(),
    submitter_email: "alice@example.gov".into(),
    submitter_phone: String::new(),
    subject_name: String::new(),
    subject_title: String::new(),
    subject_agency: String::new(),
    summary: "Outside employment".into(),
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

// ─── Case numbers ────────────────────────────────────────────────────────────

#[tokio::test]
async fn case_numbers_start_at_one_in_an_empty_store() {
  let s = MemoryStore::new();
  let number = s.next_case_number(CaseType::AdvisoryOpinion).await.unwrap();

  let (case_type, _year, seq) = parse_case_number(&number).unwrap();
  assert_eq!(case_type, CaseType::AdvisoryOpinion);
  assert_eq!(seq, 1);
  assert!(number.ends_with("-001"));
}

#[tokio::test]
async fn sequential_case_numbers_strictly_increase() {
  let s = MemoryStore::new();
  let mut last = 0;
  for _ in 0..20 {
    let number = s.next_case_number(CaseType::PublicRecordsRequest).await.unwrap();
    let (_, _, seq) = parse_case_number(&number).unwrap();
    assert!(seq > last);
    last = seq;
  }
}

#[tokio::test]
async fn counters_are_independent_per_type() {
  let s = MemoryStore::new();
  s.next_case_number(CaseType::AdvisoryOpinion).await.unwrap();
  s.next_case_number(CaseType::AdvisoryOpinion).await.unwrap();
  let ec = s.next_case_number(CaseType::EthicsComplaint).await.unwrap();
  assert!(ec.starts_with("EC-"));
  assert!(ec.ends_with("-001"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_case_numbers_are_unique() {
  let s = MemoryStore::new();

  let handles: Vec<_> = (0..64)
    .map(|_| {
      let s = s.clone();
      tokio::spawn(async move { s.next_case_number(CaseType::EthicsComplaint).await })
    })
    .collect();

  let mut seen = HashSet::new();
  for handle in handles {
    let number = handle.await.unwrap().unwrap();
    assert!(seen.insert(number), "case number issued twice");
  }
  assert_eq!(seen.len(), 64);
}

#[tokio::test]
async fn demo_counters_continue_after_seeded_numbers() {
  let s = MemoryStore::with_demo_data();
  let ao = s.next_case_number(CaseType::AdvisoryOpinion).await.unwrap();
  let prr = s.next_case_number(CaseType::PublicRecordsRequest).await.unwrap();

  assert_eq!(parse_case_number(&ao).unwrap().2, 43);
  assert_eq!(parse_case_number(&prr).unwrap().2, 90);
}

// ─── Create / update / get ───────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_round_trip() {
  let s = MemoryStore::new();
  let c = case(CaseType::AdvisoryOpinion, "AO-2025-001");
  s.create(c.clone()).await.unwrap();

  assert_eq!(s.get_by_id(c.id).await.unwrap(), Some(c.clone()));
  assert_eq!(s.get_by_case_number("AO-2025-001").await.unwrap(), Some(c));
  assert!(s.get_by_case_number("AO-2025-999").await.unwrap().is_none());
}

#[tokio::test]
async fn create_rejects_duplicate_id() {
  let s = MemoryStore::new();
  let c = case(CaseType::AdvisoryOpinion, "AO-2025-001");
  s.create(c.clone()).await.unwrap();

  let err = s.create(c.clone()).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateKey(id) if id == c.id));
}

#[tokio::test]
async fn create_logs_a_created_entry() {
  let s = MemoryStore::new();
  let c = case(CaseType::EthicsComplaint, "EC-2025-001");
  s.create(c.clone()).await.unwrap();

  let activity = s.activity(c.id).await.unwrap();
  assert_eq!(activity.len(), 1);
  assert_eq!(activity[0].action, ActivityAction::Created);
}

#[tokio::test]
async fn update_missing_case_is_not_found() {
  let s = MemoryStore::new();
  let err = s
    .update(case(CaseType::AdvisoryOpinion, "AO-2025-001"), None)
    .await
    .unwrap_err();
  assert!(err.is_not_found());
}

#[tokio::test]
async fn update_bumps_version() {
  let s = MemoryStore::new();
  let mut c = case(CaseType::AdvisoryOpinion, "AO-2025-001");
  s.create(c.clone()).await.unwrap();

  c.status = CaseStatus::UnderReview;
  let stored = s.update(c.clone(), None).await.unwrap();
  assert_eq!(stored.version, 1);

  let fetched = s.get_by_id(c.id).await.unwrap().unwrap();
  assert_eq!(fetched.status, CaseStatus::UnderReview);
  assert_eq!(fetched.version, 1);
}

#[tokio::test]
async fn update_with_stale_version_conflicts() {
  let s = MemoryStore::new();
  let c = case(CaseType::AdvisoryOpinion, "AO-2025-001");
  s.create(c.clone()).await.unwrap();
  s.update(c.clone(), Some(0)).await.unwrap();

  let err = s.update(c.clone(), Some(0)).await.unwrap_err();
  assert!(matches!(
    err,
    Error::VersionConflict { expected: 0, actual: 1, .. }
  ));
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_filters_by_type_and_text() {
  let s = MemoryStore::with_demo_data();

  let aos = s
    .list(&CaseQuery {
      case_type: Some(CaseType::AdvisoryOpinion),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(aos.len(), 4);
  assert!(aos.iter().all(|c| c.case_type == CaseType::AdvisoryOpinion));

  let garcia = s
    .list(&CaseQuery { text: Some("garcia".into()), ..Default::default() })
    .await
    .unwrap();
  let mut numbers: Vec<_> = garcia.iter().map(|c| c.case_number.as_str()).collect();
  numbers.sort_unstable();
  assert_eq!(numbers, ["AO-2024-041", "EA-2024-089"]);

  let closed = s
    .list(&CaseQuery { status: Some(CaseStatus::Closed), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(closed.len(), 5);
}

#[tokio::test]
async fn recent_is_newest_first_and_capped() {
  let s = MemoryStore::with_demo_data();
  let recent = s.recent(5).await.unwrap();

  assert_eq!(recent.len(), 5);
  assert_eq!(recent[0].case_number, "AO-2024-042");
  assert!(recent.windows(2).all(|w| w[0].submitted_at >= w[1].submitted_at));
}

// ─── Deadlines ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn deadlines_skip_closed_cases_and_sort_ascending() {
  let s = MemoryStore::with_demo_data();
  let all = s.deadlines(None).await.unwrap();

  assert_eq!(all.len(), 7);
  assert!(all.iter().all(|d| d.case_number != "AO-2024-040"));
  assert!(all.windows(2).all(|w| w[0].due_date <= w[1].due_date));
  assert_eq!(all[0].case_number, "PRR-2024-088");
  assert_eq!(all[0].status, DeadlineStatus::Overdue);

  let capped = s.deadlines(Some(5)).await.unwrap();
  assert_eq!(capped.len(), 5);
  let numbers = |ds: &[caseflow_core::deadline::Deadline]| {
    ds.iter().map(|d| d.case_number.clone()).collect::<Vec<_>>()
  };
  assert_eq!(numbers(&capped), numbers(&all[..5]));
}

#[tokio::test]
async fn deadlines_keep_overdue_non_closed_cases() {
  let s = MemoryStore::new();
  let mut c = case(CaseType::PublicRecordsRequest, "PRR-2025-001");
  c.status = CaseStatus::Withdrawn;
  c.due_date = Some(Utc::now() - Duration::days(1));
  s.create(c).await.unwrap();

  let deadlines = s.deadlines(None).await.unwrap();
  assert_eq!(deadlines.len(), 1);
  assert_eq!(deadlines[0].status, DeadlineStatus::Overdue);
}

// ─── Notes, documents, activity ──────────────────────────────────────────────

#[tokio::test]
async fn notes_require_an_existing_case() {
  let s = MemoryStore::new();
  let note = CaseNote {
    note_id:     Uuid::new_v4(),
    case_id:     Uuid::new_v4(),
    author_id:   "user_1".into(),
    author_name: "Demo Admin".into(),
    content:     "Called the requester".into(),
    created_at:  Utc::now(),
  };
  assert!(s.add_note(note).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn notes_are_logged_in_activity() {
  let s = MemoryStore::new();
  let c = case(CaseType::AdvisoryOpinion, "AO-2025-001");
  s.create(c.clone()).await.unwrap();

  let note = CaseNote {
    note_id:     Uuid::new_v4(),
    case_id:     c.id,
    author_id:   "user_1".into(),
    author_name: "Demo Admin".into(),
    content:     "Called the requester".into(),
    created_at:  Utc::now() + Duration::seconds(1),
  };
  s.add_note(note).await.unwrap();

  assert_eq!(s.notes(c.id).await.unwrap().len(), 1);
  let actions: Vec<_> = s
    .activity(c.id)
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.action)
    .collect();
  assert_eq!(actions, [ActivityAction::Created, ActivityAction::NoteAdded]);

  let newest = s.recent_activity(1).await.unwrap();
  assert_eq!(newest[0].action, ActivityAction::NoteAdded);
}

// ─── Acknowledgments & opinions ──────────────────────────────────────────────

#[tokio::test]
async fn demo_acknowledgments_filter_by_agency_type() {
  let s = MemoryStore::with_demo_data();

  let all = s
    .list_acknowledgments(&AcknowledgmentQuery::default())
    .await
    .unwrap();
  assert_eq!(all.len(), 5);
  assert_eq!(all[0].official_name, "Maria Garcia");

  let state = s
    .list_acknowledgments(&AcknowledgmentQuery {
      agency_type: Some(AgencyType::State),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(state.len(), 2);

  let fetched = s.get_acknowledgment(all[0].id).await.unwrap().unwrap();
  assert_eq!(fetched.case_number, "EA-2024-089");
}

#[tokio::test]
async fn demo_acknowledgments_link_to_their_cases() {
  let s = MemoryStore::with_demo_data();
  let acks = s
    .list_acknowledgments(&AcknowledgmentQuery::default())
    .await
    .unwrap();

  for ack in &acks {
    let case = s.get_by_id(ack.case_id.unwrap()).await.unwrap().unwrap();
    assert_eq!(case.case_number, ack.case_number);
    assert_eq!(case.case_type, CaseType::EthicsAcknowledgment);
    assert_eq!(case.submitter_name, ack.official_name);

    let actions: Vec<_> = s
      .activity(case.id)
      .await
      .unwrap()
      .into_iter()
      .map(|a| a.action)
      .collect();
    assert_eq!(actions, [ActivityAction::Created]);
  }

  let eas = s
    .list(&CaseQuery {
      case_type: Some(CaseType::EthicsAcknowledgment),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(eas.len(), acks.len());
}

#[tokio::test]
async fn published_opinions_search_and_lookup() {
  let s = MemoryStore::with_demo_data();

  let all = s.search_published(&OpinionQuery::default()).await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].case_number, "AO-2024-010");

  let gifts = s
    .search_published(&OpinionQuery { topic: Some("gifts".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(gifts.len(), 1);
  assert_eq!(gifts[0].case_number, "EC-2024-005");

  assert!(s.get_published_opinion("EC-2024-005").await.unwrap().is_some());
  assert!(s.get_published_opinion("AO-1999-001").await.unwrap().is_none());
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn demo_user_is_found_by_email() {
  let s = MemorySessionStore::with_demo_user();
  let user = s.find_user_by_email("Demo@NCOE.nv.gov").await.unwrap().unwrap();
  assert_eq!(user.id, "user_1");
  assert!(s.get_user("user_1").await.unwrap().is_some());
}

#[tokio::test]
async fn users_are_listed_by_name() {
  let s = MemorySessionStore::with_demo_user();
  let mut other = s.get_user("user_1").await.unwrap().unwrap();
  other.id = "user_2".into();
  other.email = "ross@ncoe.nv.gov".into();
  other.first_name = "Ross".into();
  other.last_name = "Armstrong".into();
  s.upsert_user(other).await.unwrap();

  let names: Vec<String> = s
    .list_users()
    .await
    .unwrap()
    .into_iter()
    .map(|u| u.last_name)
    .collect();
  assert_eq!(names, ["Admin", "Armstrong"]);
}

#[tokio::test]
async fn session_lifecycle() {
  let s = MemorySessionStore::with_demo_user();
  let now = Utc::now();
  let session = Session {
    id:         "sess_1".into(),
    user_id:    "user_1".into(),
    token:      "abc123".into(),
    expires_at: now + Duration::minutes(30),
    created_at: now,
  };
  s.create_session(session).await.unwrap();

  assert!(s.session_by_token("abc123").await.unwrap().is_some());
  s.delete_session("abc123").await.unwrap();
  assert!(s.session_by_token("abc123").await.unwrap().is_none());
  s.delete_session("abc123").await.unwrap();
}

#[tokio::test]
async fn session_for_unknown_user_is_rejected() {
  let s = MemorySessionStore::new();
  let now = Utc::now();
  let session = Session {
    id:         "sess_1".into(),
    user_id:    "ghost".into(),
    token:      "t".into(),
    expires_at: now,
    created_at: now,
  };
  assert!(matches!(
    s.create_session(session).await,
    Err(Error::UserNotFound(_))
  ));
}
