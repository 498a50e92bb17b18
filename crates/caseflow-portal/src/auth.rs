//! Staff authentication.
//!
//! Staff pages require a `session` cookie issued at login; without one the
//! browser is redirected to the login page. The JSON API additionally
//! accepts HTTP Basic credentials so scripts can call it directly.

use axum::{
  Json,
  extract::{FromRequestParts, Request, State},
  http::{HeaderMap, HeaderValue, StatusCode, header, request::Parts},
  middleware::Next,
  response::{IntoResponse, Redirect, Response},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use caseflow_core::{
  case::StaffRef,
  store::{CaseStore, SessionStore},
  user::User,
};
use chrono::Duration;
use cookie::{Cookie, SameSite};
use serde_json::json;
use tracing::debug;

use crate::AppState;

pub const SESSION_COOKIE: &str = "session";
pub const LOGIN_PATH: &str = "/staff/login";

// ─── Cookies ─────────────────────────────────────────────────────────────────

/// The `Set-Cookie` value for a freshly issued session.
pub fn session_cookie(token: &str, ttl: Duration, secure: bool) -> String {
  Cookie::build((SESSION_COOKIE, token))
    .http_only(true)
    .same_site(SameSite::Strict)
    .secure(secure)
    .path("/")
    .max_age(cookie::time::Duration::seconds(ttl.num_seconds()))
    .build()
    .to_string()
}

/// The `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie() -> String {
  Cookie::build((SESSION_COOKIE, ""))
    .http_only(true)
    .same_site(SameSite::Strict)
    .path("/")
    .max_age(cookie::time::Duration::ZERO)
    .build()
    .to_string()
}

/// The session token from the `Cookie` header, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|piece| Cookie::parse(piece.trim()).ok())
    .find(|c| c.name() == SESSION_COOKIE)
    .map(|c| c.value().to_owned())
    .filter(|token| !token.is_empty())
}

/// `(email, password)` from an `Authorization: Basic` header.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let encoded = headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Basic ")?;
  let decoded = B64.decode(encoded).ok()?;
  let creds = String::from_utf8(decoded).ok()?;
  let (email, password) = creds.split_once(':')?;
  Some((email.to_owned(), password.to_owned()))
}

pub fn staff_ref(user: &User) -> StaffRef {
  StaffRef {
    id:   user.id.clone(),
    name: user.full_name(),
  }
}

// ─── Staff pages ─────────────────────────────────────────────────────────────

/// The signed-in staff member. Rejects with a redirect to the login page.
pub struct Staff(pub User);

impl<S, U> FromRequestParts<AppState<S, U>> for Staff
where
  S: CaseStore + 'static,
  U: SessionStore + 'static,
{
  type Rejection = Redirect;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, U>,
  ) -> Result<Self, Self::Rejection> {
    let token = session_token(&parts.headers).ok_or(Redirect::to(LOGIN_PATH))?;
    match state.auth.validate_session(&token).await {
      Ok(user) => Ok(Staff(user)),
      Err(e) => {
        debug!(error = %e, "staff session rejected");
        Err(Redirect::to(LOGIN_PATH))
      }
    }
  }
}

// ─── API ─────────────────────────────────────────────────────────────────────

fn unauthorized() -> Response {
  let mut res =
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" }))).into_response();
  res.headers_mut().insert(
    header::WWW_AUTHENTICATE,
    HeaderValue::from_static("Basic realm=\"caseflow\""),
  );
  res
}

/// Middleware guarding `/api`: admits a live session or valid Basic
/// credentials and records the caller as the request's [`StaffRef`].
pub async fn require_api_auth<S, U>(
  State(state): State<AppState<S, U>>,
  mut req: Request,
  next: Next,
) -> Response
where
  S: CaseStore + 'static,
  U: SessionStore + 'static,
{
  let headers = req.headers();
  let user = if let Some(token) = session_token(headers) {
    state.auth.validate_session(&token).await.ok()
  } else if let Some((email, password)) = basic_credentials(headers) {
    state.auth.authenticate(&email, &password).await.ok()
  } else {
    None
  };

  match user {
    Some(user) => {
      req.extensions_mut().insert(staff_ref(&user));
      next.run(req).await
    }
    None => unauthorized(),
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(name: header::HeaderName, value: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(name, HeaderValue::from_str(value).unwrap());
    map
  }

  #[test]
  fn session_cookie_attributes() {
    let cookie = session_cookie("abc123", Duration::minutes(30), false);
    assert!(cookie.starts_with("session=abc123"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=1800"));
    assert!(!cookie.contains("Secure"));
  }

  #[test]
  fn cleared_cookie_expires_immediately() {
    let cookie = clear_session_cookie();
    assert!(cookie.starts_with("session=;") || cookie.starts_with("session=\"\""));
    assert!(cookie.contains("Max-Age=0"));
  }

  #[test]
  fn finds_session_among_other_cookies() {
    let map = headers(header::COOKIE, "theme=dark; session=tok; lang=en");
    assert_eq!(session_token(&map).as_deref(), Some("tok"));
    assert_eq!(session_token(&HeaderMap::new()), None);
    assert_eq!(session_token(&headers(header::COOKIE, "session=")), None);
  }

  #[test]
  fn decodes_basic_credentials() {
    let value = format!("Basic {}", B64.encode("demo@ncoe.nv.gov:pw:with:colons"));
    let map = headers(header::AUTHORIZATION, &value);
    assert_eq!(
      basic_credentials(&map),
      Some(("demo@ncoe.nv.gov".to_owned(), "pw:with:colons".to_owned()))
    );
    assert_eq!(
      basic_credentials(&headers(header::AUTHORIZATION, "Basic !!!not-base64!!!")),
      None
    );
    assert_eq!(basic_credentials(&headers(header::AUTHORIZATION, "Bearer x")), None);
  }
}
