//! Handlers for `/cases` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/cases` | Optional `?type=AO&status=submitted&q=garcia` |
//! | `POST` | `/cases` | Body: [`NewCase`]; 201 |
//! | `GET`  | `/cases/{id}` | 404 if not found; sets `ETag` |
//! | `GET`  | `/cases/by-number/{number}` | |
//! | `POST` | `/cases/{id}/status` | Body: `{"status":"under_review"}`; honours `If-Match` |
//! | `POST` | `/cases/{id}/assign` | Body: `{"staff_id","staff_name","priority"}` |
//! | `GET`/`POST` | `/cases/{id}/notes` | |
//! | `GET`/`POST` | `/cases/{id}/documents` | Metadata only |
//! | `GET`  | `/cases/{id}/activity` | Oldest first |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use caseflow_core::{
  case::{Case, CaseStatus, CaseType, NewCase, Priority, StaffRef},
  record::{CaseActivity, CaseNote, Document, DocumentCategory},
  store::{CaseQuery, CaseStore},
};
use caseflow_service::NewDocument;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  Actor, ApiState, non_empty,
  error::ApiError,
  etag::{compute_etag, if_match_holds},
};

/// A JSON body with the case's current ETag attached.
fn with_etag(status: StatusCode, case: Case) -> Response {
  let etag = compute_etag(&case);
  (status, [(header::ETAG, etag)], Json(case)).into_response()
}

async fn require<S: CaseStore>(state: &ApiState<S>, id: Uuid) -> Result<Case, ApiError> {
  state
    .cases
    .get_by_id(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("case {id} not found")))
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  #[serde(rename = "type")]
  pub case_type: Option<String>,
  pub status:    Option<String>,
  pub q:         Option<String>,
}

impl ListParams {
  pub fn into_query(self) -> Result<CaseQuery, caseflow_core::Error> {
    Ok(CaseQuery {
      case_type: non_empty(self.case_type)
        .map(|t| CaseType::parse(&t))
        .transpose()?,
      status:    non_empty(self.status)
        .map(|s| CaseStatus::parse(&s))
        .transpose()?,
      text:      non_empty(self.q),
    })
  }
}

/// `GET /cases[?type=<prefix>][&status=<status>][&q=<text>]`
pub async fn list<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Case>>, ApiError> {
  let query = params.into_query()?;
  Ok(Json(state.cases.list(&query).await?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /cases`
pub async fn create<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewCase>,
) -> Result<Response, ApiError> {
  let case = state.cases.create(body).await?;
  Ok(with_etag(StatusCode::CREATED, case))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /cases/{id}`
pub async fn get_one<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
  let case = require(&state, id).await?;
  Ok(with_etag(StatusCode::OK, case))
}

/// `GET /cases/by-number/{number}`
pub async fn get_by_number<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Path(number): Path<String>,
) -> Result<Response, ApiError> {
  let case = state
    .cases
    .get_by_case_number(&number)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("case {number} not found")))?;
  Ok(with_etag(StatusCode::OK, case))
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: String,
}

/// `POST /cases/{id}/status`: body: `{"status":"under_review"}`
///
/// With an `If-Match` header the change only applies if the case still has
/// that ETag; otherwise 412.
pub async fn update_status<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  actor: Actor,
  headers: HeaderMap,
  Json(body): Json<StatusBody>,
) -> Result<Response, ApiError> {
  let status = CaseStatus::parse(&body.status)?;

  let if_match = headers
    .get(header::IF_MATCH)
    .and_then(|v| v.to_str().ok())
    .map(str::to_owned);

  let expected_version = match if_match {
    Some(tag) => {
      let current = require(&state, id).await?;
      if !if_match_holds(&tag, &current) {
        return Err(ApiError::PreconditionFailed(format!(
          "case {id} has changed"
        )));
      }
      Some(current.version)
    }
    None => None,
  };

  let case = state
    .cases
    .update_status_checked(id, status, expected_version, actor.0.as_ref())
    .await?;
  Ok(with_etag(StatusCode::OK, case))
}

// ─── Assign ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AssignBody {
  pub staff_id:   String,
  pub staff_name: String,
  #[serde(default)]
  pub priority:   Option<String>,
}

/// `POST /cases/{id}/assign`
pub async fn assign<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  actor: Actor,
  Json(body): Json<AssignBody>,
) -> Result<Response, ApiError> {
  let priority = non_empty(body.priority)
    .map(|p| Priority::parse(&p))
    .transpose()?
    .unwrap_or_default();
  let staff = StaffRef { id: body.staff_id, name: body.staff_name };

  let case = state
    .cases
    .assign(id, staff, priority, actor.0.as_ref())
    .await?;
  Ok(with_etag(StatusCode::OK, case))
}

// ─── Notes ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NoteBody {
  pub content: String,
}

/// `GET /cases/{id}/notes`
pub async fn list_notes<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<CaseNote>>, ApiError> {
  require(&state, id).await?;
  Ok(Json(state.cases.get_notes(id).await?))
}

/// `POST /cases/{id}/notes`: body: `{"content":"..."}`
pub async fn add_note<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  actor: Actor,
  Json(body): Json<NoteBody>,
) -> Result<impl IntoResponse, ApiError> {
  let note = state
    .cases
    .add_note(id, &actor.or_api(), body.content)
    .await?;
  Ok((StatusCode::CREATED, Json(note)))
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DocumentBody {
  pub filename:     String,
  #[serde(default = "default_content_type")]
  pub content_type: String,
  #[serde(default)]
  pub size:         u64,
  #[serde(default)]
  pub category:     DocumentCategory,
  #[serde(default)]
  pub is_public:    bool,
}

fn default_content_type() -> String { "application/octet-stream".to_owned() }

/// `GET /cases/{id}/documents`
pub async fn list_documents<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Document>>, ApiError> {
  require(&state, id).await?;
  Ok(Json(state.cases.get_documents(id).await?))
}

/// `POST /cases/{id}/documents`
pub async fn attach_document<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  actor: Actor,
  Json(body): Json<DocumentBody>,
) -> Result<impl IntoResponse, ApiError> {
  let doc = NewDocument {
    filename:     body.filename,
    content_type: body.content_type,
    size:         body.size,
    category:     body.category,
    is_public:    body.is_public,
  };
  let document = state
    .cases
    .attach_document(id, &actor.or_api(), doc)
    .await?;
  Ok((StatusCode::CREATED, Json(document)))
}

// ─── Activity ────────────────────────────────────────────────────────────────

/// `GET /cases/{id}/activity`
pub async fn activity<S: CaseStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<CaseActivity>>, ApiError> {
  require(&state, id).await?;
  Ok(Json(state.cases.get_activity(id).await?))
}
