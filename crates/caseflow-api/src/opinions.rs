//! Handlers for the public opinion search.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use caseflow_core::{
  case::CaseType,
  opinion::{OpinionQuery, PublishedOpinion},
  store::CaseStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError, non_empty};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  pub q:         Option<String>,
  #[serde(rename = "type")]
  pub case_type: Option<String>,
  pub year:      Option<String>,
  pub topic:     Option<String>,
}

impl SearchParams {
  pub fn into_query(self) -> Result<OpinionQuery, ApiError> {
    let year = non_empty(self.year)
      .map(|y| {
        y.trim()
          .parse::<i32>()
          .map_err(|_| ApiError::BadRequest(format!("invalid year: {y:?}")))
      })
      .transpose()?;
    Ok(OpinionQuery {
      text: non_empty(self.q),
      case_type: non_empty(self.case_type)
        .map(|t| CaseType::parse(&t))
        .transpose()?,
      year,
      topic: non_empty(self.topic),
    })
  }
}

/// `GET /opinions[?q=<text>][&type=AO|EC][&year=<yyyy>][&topic=<topic>]`
pub async fn search<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PublishedOpinion>>, ApiError> {
  let query = params.into_query()?;
  Ok(Json(state.cases.search_published(&query).await?))
}

/// `GET /opinions/{case_number}`
pub async fn get_one<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Path(case_number): Path<String>,
) -> Result<Json<PublishedOpinion>, ApiError> {
  let opinion = state
    .cases
    .get_published_opinion(&case_number)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("no published opinion {case_number}")))?;
  Ok(Json(opinion))
}
