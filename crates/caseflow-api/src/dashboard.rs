//! Handlers for `GET /deadlines` and `GET /dashboard`.

use axum::{
  Json,
  extract::{Query, State},
};
use caseflow_core::{deadline::Deadline, stats::CaseStats, store::CaseStore};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct DeadlineParams {
  /// Cap on the number of deadlines returned. Absent means all.
  pub limit: Option<usize>,
}

/// `GET /deadlines[?limit=<n>]`: soonest first, closed cases excluded.
pub async fn deadlines<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<DeadlineParams>,
) -> Result<Json<Vec<Deadline>>, ApiError> {
  let deadlines = match params.limit {
    Some(limit) => state.cases.get_upcoming_deadlines(limit).await?,
    None => state.cases.get_all_deadlines().await?,
  };
  Ok(Json(deadlines))
}

/// `GET /dashboard`
pub async fn stats<S: CaseStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<CaseStats>, ApiError> {
  Ok(Json(state.dashboard.get_stats().await?))
}
