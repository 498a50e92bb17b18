//! Staff login and logout.

use axum::{
  Form,
  extract::State,
  http::{HeaderMap, header},
  response::{IntoResponse, Redirect, Response},
};
use caseflow_core::store::{CaseStore, SessionStore};
use serde::Deserialize;
use tracing::warn;

use crate::{
  AppState, Error,
  auth::{LOGIN_PATH, clear_session_cookie, session_cookie, session_token},
  html::{Chrome, RenderMode, field, render},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
  pub email:    String,
  pub password: String,
}

fn login_page<S: CaseStore, U: SessionStore>(
  state: &AppState<S, U>,
  error: Option<&str>,
) -> Result<Response, Error> {
  let demo_mode = state.config.demo_mode;
  let page = render(RenderMode::Page, &state.page("Staff Login", Chrome::Public), |w| {
    if let Some(msg) = error {
      w.elem("p", &[("class", "error"), ("role", "alert")], msg);
    }
    w.open("form", &[("method", "post"), ("action", LOGIN_PATH)]);
    field(w, "email", "email", "Email", true);
    field(w, "password", "password", "Password", false);
    w.elem("button", &[("type", "submit")], "Sign in");
    w.close("form");
    if demo_mode {
      w.elem(
        "p",
        &[("class", "hint")],
        "Demo mode: any email and password will sign you in.",
      );
    }
  })?;
  Ok(page.into_response())
}

/// `GET /staff/login`
pub async fn login_form<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
) -> Result<Response, Error> {
  login_page(&state, None)
}

/// `POST /staff/login`: on success, set the session cookie and go to the
/// dashboard; otherwise show the form again.
pub async fn login<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Form(form): Form<LoginForm>,
) -> Result<Response, Error> {
  match state.auth.login(form.email.trim(), &form.password).await {
    Ok((session, _)) => {
      let cookie = session_cookie(
        &session.token,
        state.auth.session_ttl(),
        state.config.secure_cookies,
      );
      Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/staff/dashboard")).into_response())
    }
    Err(e) => {
      warn!(email = %form.email, error = %e, "staff login failed");
      login_page(&state, Some("Invalid credentials"))
    }
  }
}

/// `/staff/logout`: end the session, clear the cookie and return to the
/// login page.
pub async fn logout<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  headers: HeaderMap,
) -> Result<Response, Error> {
  if let Some(token) = session_token(&headers) {
    state.auth.logout(&token).await?;
  }
  Ok(([(header::SET_COOKIE, clear_session_cookie())], Redirect::to(LOGIN_PATH)).into_response())
}
