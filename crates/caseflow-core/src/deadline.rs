//! Deadlines: a live projection over cases that carry a due date.
//!
//! Nothing here is persisted; the status is recomputed against the clock every
//! time a deadline is built.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::case::{Case, CaseType};

/// A deadline is "due soon" when less than this much time remains.
pub const DUE_SOON_WINDOW: Duration = Duration::days(7);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineStatus {
  Upcoming,
  DueSoon,
  Overdue,
}

impl DeadlineStatus {
  /// Classify `due` relative to `now`.
  pub fn at(due: DateTime<Utc>, now: DateTime<Utc>) -> Self {
    if now > due {
      Self::Overdue
    } else if due - now < DUE_SOON_WINDOW {
      Self::DueSoon
    } else {
      Self::Upcoming
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Upcoming => "Upcoming",
      Self::DueSoon => "Due soon",
      Self::Overdue => "Overdue",
    }
  }
}

/// What the deadline is for. Every case deadline today is the statutory
/// response date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineKind {
  ResponseDue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deadline {
  pub case_id:     Uuid,
  pub case_number: String,
  pub case_type:   CaseType,
  pub summary:     String,
  pub kind:        DeadlineKind,
  pub due_date:    DateTime<Utc>,
  pub status:      DeadlineStatus,
}

impl Deadline {
  /// Build the deadline view of `case`, or `None` if it has no due date.
  pub fn for_case(case: &Case, now: DateTime<Utc>) -> Option<Self> {
    let due_date = case.due_date?;
    Some(Self {
      case_id: case.id,
      case_number: case.case_number.clone(),
      case_type: case.case_type,
      summary: case.summary.clone(),
      kind: DeadlineKind::ResponseDue,
      due_date,
      status: DeadlineStatus::at(due_date, now),
    })
  }

  /// Whole days remaining, truncated toward zero; negative once overdue.
  pub fn days_until_due(&self, now: DateTime<Utc>) -> i64 {
    (self.due_date - now).num_days()
  }
}
