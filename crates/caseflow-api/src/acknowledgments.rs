//! Handlers for `/acknowledgments` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/acknowledgments` | Optional `?agency_type=state&q=garcia&year=2024` |
//! | `POST` | `/acknowledgments` | Body: [`NewAcknowledgment`]; opens the EA case too |
//! | `GET`  | `/acknowledgments/{id}` | |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use caseflow_core::{
  acknowledgment::{AcknowledgmentQuery, AgencyType, EthicsAcknowledgment, NewAcknowledgment},
  store::CaseStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError, non_empty};

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub agency_type: Option<String>,
  pub q:           Option<String>,
  pub year:        Option<String>,
}

impl ListParams {
  pub fn into_query(self) -> Result<AcknowledgmentQuery, ApiError> {
    let year = non_empty(self.year)
      .map(|y| {
        y.trim()
          .parse::<i32>()
          .map_err(|_| ApiError::BadRequest(format!("invalid year: {y:?}")))
      })
      .transpose()?;
    Ok(AcknowledgmentQuery {
      agency_type: non_empty(self.agency_type)
        .map(|t| AgencyType::parse(&t))
        .transpose()?,
      text: non_empty(self.q),
      year,
    })
  }
}

/// `GET /acknowledgments`
pub async fn list<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<EthicsAcknowledgment>>, ApiError> {
  let query = params.into_query()?;
  Ok(Json(state.acknowledgments.list(&query).await?))
}

/// `POST /acknowledgments`
pub async fn file<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewAcknowledgment>,
) -> Result<impl IntoResponse, ApiError> {
  let ack = state.acknowledgments.file(body).await?;
  Ok((StatusCode::CREATED, Json(ack)))
}

/// `GET /acknowledgments/{id}`
pub async fn get_one<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<EthicsAcknowledgment>, ApiError> {
  let ack = state
    .acknowledgments
    .get(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("acknowledgment {id} not found")))?;
  Ok(Json(ack))
}
