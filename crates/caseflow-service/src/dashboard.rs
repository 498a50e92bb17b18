//! [`DashboardService`]: headline numbers for the staff landing page.

use std::sync::Arc;

use chrono::Utc;

use caseflow_core::{
  case::CaseStatus,
  deadline::Deadline,
  stats::{CaseStats, StatsBaseline},
  store::{CaseQuery, CaseStore},
};

use crate::{Error, Result};

/// How many entries each dashboard list shows.
pub const DASHBOARD_LIST_LEN: usize = 5;

pub struct DashboardService<S> {
  store:    Arc<S>,
  baseline: StatsBaseline,
}

impl<S> Clone for DashboardService<S> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      baseline: self.baseline,
    }
  }
}

impl<S: CaseStore> DashboardService<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self { store, baseline: StatsBaseline::default() }
  }

  /// Pad the open and closed totals with historical counts.
  pub fn with_baseline(mut self, baseline: StatsBaseline) -> Self {
    self.baseline = baseline;
    self
  }

  /// Compute a fresh snapshot from every case in the store.
  pub async fn get_stats(&self) -> Result<CaseStats> {
    let now = Utc::now();
    let mut cases = self
      .store
      .list(&CaseQuery::default())
      .await
      .map_err(Error::store)?;

    let mut stats = CaseStats::default();
    for case in &cases {
      *stats.by_type.entry(case.case_type).or_default() += 1;
      *stats.by_status.entry(case.status).or_default() += 1;

      match case.status {
        CaseStatus::Closed => stats.total_closed += 1,
        CaseStatus::Submitted => {
          stats.total_pending += 1;
          stats.total_open += 1;
        }
        _ => stats.total_open += 1,
      }
      if case.is_overdue(now) {
        stats.total_overdue += 1;
      }
    }
    stats.total_open += self.baseline.open;
    stats.total_closed += self.baseline.closed;

    // Deadlines come from the same snapshot as the counts.
    let mut deadlines: Vec<Deadline> = cases
      .iter()
      .filter(|c| c.status != CaseStatus::Closed)
      .filter_map(|c| Deadline::for_case(c, now))
      .collect();
    deadlines.sort_by_key(|d| d.due_date);
    deadlines.truncate(DASHBOARD_LIST_LEN);
    stats.upcoming_deadlines = deadlines;

    cases.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    cases.truncate(DASHBOARD_LIST_LEN);
    stats.recent_cases = cases;

    stats.recent_activity = self
      .store
      .recent_activity(DASHBOARD_LIST_LEN)
      .await
      .map_err(Error::store)?;

    Ok(stats)
  }
}

#[cfg(test)]
mod tests {
  use caseflow_core::case::{CaseType, NewCase};
  use caseflow_store_memory::MemoryStore;

  use super::*;
  use crate::CaseService;

  #[tokio::test]
  async fn empty_store_reports_only_the_baseline() {
    let svc = DashboardService::new(Arc::new(MemoryStore::new()))
      .with_baseline(StatsBaseline { open: 32, closed: 150 });
    let stats = svc.get_stats().await.unwrap();

    assert_eq!(stats.total_open, 32);
    assert_eq!(stats.total_closed, 150);
    assert_eq!(stats.total_pending, 0);
    assert!(stats.recent_cases.is_empty());
  }

  #[tokio::test]
  async fn demo_data_counts() {
    let svc = DashboardService::new(Arc::new(MemoryStore::with_demo_data()));
    let stats = svc.get_stats().await.unwrap();

    assert_eq!(stats.total_closed, 5);
    assert_eq!(stats.total_pending, 2);
    assert_eq!(stats.total_open, 8);
    assert_eq!(stats.total_overdue, 1);
    assert_eq!(stats.by_type[&CaseType::AdvisoryOpinion], 4);
    assert_eq!(stats.by_status[&CaseStatus::UnderReview], 4);

    assert_eq!(stats.recent_cases.len(), DASHBOARD_LIST_LEN);
    assert_eq!(stats.recent_cases[0].case_number, "AO-2024-042");

    assert_eq!(stats.upcoming_deadlines.len(), DASHBOARD_LIST_LEN);
    assert!(
      stats
        .upcoming_deadlines
        .windows(2)
        .all(|w| w[0].due_date <= w[1].due_date)
    );
  }

  #[tokio::test]
  async fn new_submission_is_pending_and_open() {
    let store = Arc::new(MemoryStore::new());
    let cases = CaseService::new(Arc::clone(&store));
    let dashboard = DashboardService::new(store);

    cases.create(NewCase::new(CaseType::EthicsComplaint)).await.unwrap();
    let stats = dashboard.get_stats().await.unwrap();

    assert_eq!(stats.total_open, 1);
    assert_eq!(stats.total_pending, 1);
    assert_eq!(stats.recent_activity.len(), 1);
  }

  #[tokio::test]
  async fn deadlines_match_the_counted_cases() {
    let store = Arc::new(MemoryStore::new());
    let cases = CaseService::new(Arc::clone(&store));
    let dashboard = DashboardService::new(store);

    let open = cases.create(NewCase::new(CaseType::PublicRecordsRequest)).await.unwrap();
    let closed = cases.create(NewCase::new(CaseType::AdvisoryOpinion)).await.unwrap();
    cases.update_status(closed.id, CaseStatus::Closed).await.unwrap();
    cases.create(NewCase::new(CaseType::EthicsComplaint)).await.unwrap();

    let stats = dashboard.get_stats().await.unwrap();
    assert_eq!(stats.total_open, 2);
    assert_eq!(stats.total_closed, 1);
    assert_eq!(stats.upcoming_deadlines.len(), 1);
    let deadline = &stats.upcoming_deadlines[0];
    assert_eq!(deadline.case_id, open.id);
    assert_eq!(Some(deadline.due_date), open.due_date);
  }
}
