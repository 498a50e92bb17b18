//! Cases: the unit of work tracked by the commission.
//!
//! A case is created from a public submission, numbered per type, and then
//! moves through a small status machine as staff work it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Case type ───────────────────────────────────────────────────────────────

/// The four kinds of submission the commission accepts. The string form is
/// the case-number prefix.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
pub enum CaseType {
  #[serde(rename = "AO")]
  #[strum(serialize = "AO")]
  AdvisoryOpinion,
  #[serde(rename = "EC")]
  #[strum(serialize = "EC")]
  EthicsComplaint,
  #[serde(rename = "EA")]
  #[strum(serialize = "EA")]
  EthicsAcknowledgment,
  #[serde(rename = "PRR")]
  #[strum(serialize = "PRR")]
  PublicRecordsRequest,
}

impl CaseType {
  /// Parse a case-number prefix (`"AO"`, `"EC"`, `"EA"`, `"PRR"`).
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownCaseType(s.to_owned()))
  }

  /// The prefix used in case numbers.
  pub fn prefix(self) -> &'static str { self.into() }

  /// Human-readable name for display.
  pub fn label(self) -> &'static str {
    match self {
      Self::AdvisoryOpinion => "Advisory Opinion",
      Self::EthicsComplaint => "Ethics Complaint",
      Self::EthicsAcknowledgment => "Ethics Acknowledgment",
      Self::PublicRecordsRequest => "Public Records Request",
    }
  }

  /// Statutory response period in business days, if the type has one.
  pub fn response_period(self) -> Option<u32> {
    match self {
      Self::AdvisoryOpinion => Some(45),
      Self::PublicRecordsRequest => Some(5),
      Self::EthicsComplaint | Self::EthicsAcknowledgment => None,
    }
  }
}

// ─── Case status ─────────────────────────────────────────────────────────────

/// Where a case is in its lifecycle.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaseStatus {
  Submitted,
  UnderReview,
  Investigation,
  PendingHearing,
  DraftPrepared,
  Published,
  Closed,
  Withdrawn,
}

impl CaseStatus {
  /// Parse the snake_case wire form, e.g. `"under_review"`.
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownStatus(s.to_owned()))
  }

  pub fn as_str(self) -> &'static str { self.into() }

  pub fn label(self) -> &'static str {
    match self {
      Self::Submitted => "Submitted",
      Self::UnderReview => "Under Review",
      Self::Investigation => "Investigation",
      Self::PendingHearing => "Pending Hearing",
      Self::DraftPrepared => "Draft Prepared",
      Self::Published => "Published",
      Self::Closed => "Closed",
      Self::Withdrawn => "Withdrawn",
    }
  }

  /// No transition leaves a terminal status.
  pub fn is_terminal(self) -> bool { matches!(self, Self::Closed | Self::Withdrawn) }

  /// The strict transition table. Re-asserting the current status is always
  /// allowed.
  pub fn can_transition_to(self, next: Self) -> bool {
    use CaseStatus::*;

    if self == next {
      return true;
    }
    match self {
      Submitted => matches!(next, UnderReview | Closed | Withdrawn),
      UnderReview => matches!(
        next,
        Investigation | PendingHearing | DraftPrepared | Closed | Withdrawn
      ),
      Investigation => {
        matches!(next, PendingHearing | DraftPrepared | Closed | Withdrawn)
      }
      PendingHearing => matches!(next, DraftPrepared | Closed | Withdrawn),
      // A draft may be sent back for another round of review.
      DraftPrepared => matches!(next, Published | UnderReview | Closed | Withdrawn),
      Published => matches!(next, Closed),
      Closed | Withdrawn => false,
    }
  }
}

/// How strictly status changes are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
  /// Only transitions in [`CaseStatus::can_transition_to`] are allowed.
  #[default]
  Strict,
  /// Any status may be written over any other.
  Permissive,
}

impl TransitionPolicy {
  pub fn check(self, from: CaseStatus, to: CaseStatus) -> Result<()> {
    match self {
      Self::Permissive => Ok(()),
      Self::Strict if from.can_transition_to(to) => Ok(()),
      Self::Strict => Err(Error::IllegalTransition { from, to }),
    }
  }
}

// ─── Priority & assignment ───────────────────────────────────────────────────

/// Advisory triage tier; nothing escalates automatically.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
  #[default]
  Normal,
  High,
  Critical,
}

impl Priority {
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownPriority(s.to_owned()))
  }
}

/// The staff member a case is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRef {
  pub id:   String,
  pub name: String,
}

// ─── Case ────────────────────────────────────────────────────────────────────

/// A case record as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
  pub id:                Uuid,
  /// `{prefix}-{year}-{seq:03}`, assigned once and never changed.
  pub case_number:       String,
  pub case_type:         CaseType,
  pub status:            CaseStatus,

  pub submitter_name:    String,
  pub submitter_title:   String,
  pub submitter_agency:  String,
  pub submitter_email:   String,
  pub submitter_phone:   String,

  /// The official a complaint is about. Empty for other types.
  pub subject_name:      String,
  pub subject_title:     String,
  pub subject_agency:    String,

  pub summary:           String,
  pub description:       String,
  pub statute_citations: String,

  pub submitted_at:      DateTime<Utc>,
  /// `None` means the type carries no statutory deadline.
  pub due_date:          Option<DateTime<Utc>>,
  pub closed_at:         Option<DateTime<Utc>>,
  pub published_at:      Option<DateTime<Utc>>,

  pub assigned_to:       Option<StaffRef>,
  pub priority:          Priority,

  pub is_public:         bool,
  pub is_confidential:   bool,
  pub tags:              Vec<String>,

  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
  /// Bumped by the store on every successful update.
  pub version:           u64,
}

impl Case {
  /// Past its due date and not yet closed. Cases without a due date are never
  /// overdue.
  pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
    match self.due_date {
      Some(due) => now > due && self.status != CaseStatus::Closed,
      None => false,
    }
  }

  /// The text the free-text filter matches against.
  pub fn search_haystack(&self) -> String {
    format!("{}{}{}", self.case_number, self.summary, self.submitter_name)
  }
}

// ─── NewCase ─────────────────────────────────────────────────────────────────

/// Input to case creation.
///
/// Identity, numbering, status, timestamps and the due date are assigned by
/// the lifecycle service and are not accepted from callers. Field contents are
/// not validated; empty strings are stored as given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCase {
  pub case_type:         CaseType,
  #[serde(default)]
  pub submitter_name:    String,
  #[serde(default)]
  pub submitter_title:   String,
  #[serde(default)]
  pub submitter_agency:  String,
  #[serde(default)]
  pub submitter_email:   String,
  #[serde(default)]
  pub submitter_phone:   String,
  #[serde(default)]
  pub subject_name:      String,
  #[serde(default)]
  pub subject_title:     String,
  #[serde(default)]
  pub subject_agency:    String,
  #[serde(default)]
  pub summary:           String,
  #[serde(default)]
  pub description:       String,
  #[serde(default)]
  pub statute_citations: String,
  #[serde(default)]
  pub priority:          Priority,
  #[serde(default)]
  pub is_confidential:   bool,
  #[serde(default)]
  pub tags:              Vec<String>,
}

impl NewCase {
  /// A blank submission of the given type.
  pub fn new(case_type: CaseType) -> Self {
    Self {
      case_type,
      submitter_name: String::new(),
      submitter_title: String::new(),
      submitter_agency: String::new(),
      submitter_email: String::new(),
      submitter_phone: String::new(),
      subject_name: String::new(),
      subject_title: String::new(),
      subject_agency: String::new(),
      summary: String::new(),
      description: String::new(),
      statute_citations: String::new(),
      priority: Priority::default(),
      is_confidential: false,
      tags: Vec::new(),
    }
  }
}

// ─── Case numbers ────────────────────────────────────────────────────────────

/// Format a case number, e.g. `AO-2024-042`.
pub fn format_case_number(case_type: CaseType, year: i32, seq: u32) -> String {
  format!("{}-{year}-{seq:03}", case_type.prefix())
}

/// Split a case number into its type, year and sequence.
///
/// Accepts `^(AO|EC|EA|PRR)-\d{4}-\d{3,}$`.
pub fn parse_case_number(s: &str) -> Option<(CaseType, i32, u32)> {
  let mut parts = s.splitn(3, '-');
  let case_type = CaseType::parse(parts.next()?).ok()?;
  let year = parts.next()?;
  let seq = parts.next()?;

  let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
  if year.len() != 4 || !all_digits(year) || seq.len() < 3 || !all_digits(seq) {
    return None;
  }
  Some((case_type, year.parse().ok()?, seq.parse().ok()?))
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};
  use strum::IntoEnumIterator;

  use super::*;

  fn sample(status: CaseStatus, due: Option<DateTime<Utc>>) -> Case {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    Case {
      id: Uuid::new_v4(),
      case_number: "AO-2024-001".into(),
      case_type: CaseType::AdvisoryOpinion,
      status,
      submitter_name: "Maria Garcia".into(),
      submitter_title: String::new(),
      submitter_agency: String::new(),
      submitter_email: String::new(),
      submitter_phone: String::new(),
      subject_name: String::new(),
      subject_title: String::new(),
      subject_agency: String::new(),
      summary: "Outside employment".into(),
      description: String::new(),
      statute_citations: String::new(),
      submitted_at: at,
      due_date: due,
      closed_at: None,
      published_at: None,
      assigned_to: None,
      priority: Priority::Normal,
      is_public: false,
      is_confidential: false,
      tags: vec![],
      created_at: at,
      updated_at: at,
      version: 0,
    }
  }

  #[test]
  fn case_type_wire_form_is_the_prefix() {
    assert_eq!(CaseType::PublicRecordsRequest.to_string(), "PRR");
    assert_eq!(CaseType::parse("EC").unwrap(), CaseType::EthicsComplaint);
    assert!(matches!(CaseType::parse("XX"), Err(Error::UnknownCaseType(_))));
    assert_eq!(
      serde_json::to_string(&CaseType::AdvisoryOpinion).unwrap(),
      "\"AO\""
    );
  }

  #[test]
  fn status_wire_form_is_snake_case() {
    assert_eq!(CaseStatus::UnderReview.as_str(), "under_review");
    assert_eq!(
      CaseStatus::parse("pending_hearing").unwrap(),
      CaseStatus::PendingHearing
    );
    assert_eq!(
      serde_json::to_string(&CaseStatus::DraftPrepared).unwrap(),
      "\"draft_prepared\""
    );
    assert!(CaseStatus::parse("archived").is_err());
  }

  #[test]
  fn only_ao_and_prr_carry_a_response_period() {
    assert_eq!(CaseType::AdvisoryOpinion.response_period(), Some(45));
    assert_eq!(CaseType::PublicRecordsRequest.response_period(), Some(5));
    assert_eq!(CaseType::EthicsComplaint.response_period(), None);
    assert_eq!(CaseType::EthicsAcknowledgment.response_period(), None);
  }

  #[test]
  fn terminal_statuses_have_no_exits() {
    for from in [CaseStatus::Closed, CaseStatus::Withdrawn] {
      for to in CaseStatus::iter().filter(|s| *s != from) {
        assert!(!from.can_transition_to(to), "{from} -> {to}");
      }
    }
  }

  #[test]
  fn every_open_status_can_be_closed_or_withdrawn() {
    for from in CaseStatus::iter().filter(|s| !s.is_terminal()) {
      assert!(from.can_transition_to(CaseStatus::Closed), "{from}");
    }
    assert!(CaseStatus::Submitted.can_transition_to(CaseStatus::Withdrawn));
    assert!(!CaseStatus::Published.can_transition_to(CaseStatus::Withdrawn));
  }

  #[test]
  fn strict_policy_rejects_skipping_review() {
    let err = TransitionPolicy::Strict
      .check(CaseStatus::Submitted, CaseStatus::Published)
      .unwrap_err();
    assert!(matches!(err, Error::IllegalTransition { .. }));
    assert!(
      TransitionPolicy::Permissive
        .check(CaseStatus::Closed, CaseStatus::Submitted)
        .is_ok()
    );
  }

  #[test]
  fn overdue_requires_a_past_due_date() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let past = Some(now - Duration::days(2));
    let future = Some(now + Duration::days(2));

    assert!(sample(CaseStatus::UnderReview, past).is_overdue(now));
    assert!(!sample(CaseStatus::UnderReview, future).is_overdue(now));
    assert!(!sample(CaseStatus::UnderReview, None).is_overdue(now));
  }

  #[test]
  fn closed_case_is_never_overdue() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let long_past = Some(now - Duration::days(365));
    assert!(!sample(CaseStatus::Closed, long_past).is_overdue(now));
  }

  #[test]
  fn only_closed_is_exempt_from_overdue() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let past = Some(now - Duration::days(2));
    assert!(sample(CaseStatus::Published, past).is_overdue(now));
    assert!(sample(CaseStatus::Withdrawn, past).is_overdue(now));
  }

  #[test]
  fn case_numbers_format_and_parse() {
    let n = format_case_number(CaseType::AdvisoryOpinion, 2024, 42);
    assert_eq!(n, "AO-2024-042");
    assert_eq!(
      parse_case_number(&n),
      Some((CaseType::AdvisoryOpinion, 2024, 42))
    );
    assert_eq!(
      parse_case_number("PRR-2025-1000"),
      Some((CaseType::PublicRecordsRequest, 2025, 1000))
    );
    assert_eq!(parse_case_number("AO-24-042"), None);
    assert_eq!(parse_case_number("AO-2024-42"), None);
    assert_eq!(parse_case_number("ZZ-2024-042"), None);
  }
}
