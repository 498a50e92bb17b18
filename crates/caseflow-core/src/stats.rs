//! Dashboard read model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
  case::{Case, CaseStatus, CaseType},
  deadline::Deadline,
  record::CaseActivity,
};

/// A point-in-time snapshot for the staff landing view. Never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseStats {
  pub total_open:         usize,
  /// Cases still in `submitted`; a subset of `total_open`.
  pub total_pending:      usize,
  pub total_overdue:      usize,
  pub total_closed:       usize,
  pub by_type:            BTreeMap<CaseType, usize>,
  pub by_status:          BTreeMap<CaseStatus, usize>,
  pub recent_cases:       Vec<Case>,
  pub recent_activity:    Vec<CaseActivity>,
  pub upcoming_deadlines: Vec<Deadline>,
}

/// Fixed counts added to the open and closed totals to account for historical
/// cases that are not in the live store. Presentation only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsBaseline {
  pub open:   usize,
  pub closed: usize,
}
