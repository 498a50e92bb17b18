//! Staff case-management pages. Every handler requires a signed-in
//! [`Staff`] member.
//!
//! Handlers under `/_name` paths render htmx fragments rather than full
//! pages.

use axum::{
  Form,
  extract::{Path, Query, State},
  http::{HeaderName, StatusCode},
  response::{Html, IntoResponse},
};
use caseflow_api::cases::ListParams;
use caseflow_core::{
  acknowledgment::{AcknowledgmentQuery, AgencyType, EthicsAcknowledgment},
  case::{Case, CaseStatus, CaseType},
  deadline::Deadline,
  record::{CaseActivity, CaseNote, Document},
  stats::CaseStats,
  store::{CaseStore, SessionStore},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::{
  AppState, Error,
  auth::{Staff, staff_ref},
  handlers::{non_empty, parse_year},
  html::{self, Chrome, HtmlWriter, RenderMode, render},
};

type PageResult = Result<Html<String>, Error>;

/// Response header htmx listens on to refresh the case panel.
pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");

const RECENT_CASES: usize = 10;
const UPCOMING_DEADLINES: usize = 5;

fn case_href(id: Uuid) -> String { format!("/staff/cases/{id}") }

// ─── Shared widgets ──────────────────────────────────────────────────────────

fn case_table(w: &mut HtmlWriter, cases: &[Case], now: DateTime<Utc>) {
  html::table_head(w, &["Case", "Type", "Name", "Summary", "Status", "Submitted", "Due"]);
  for c in cases {
    let href = case_href(c.id);
    let panel = format!("{href}/_panel");
    let class = if c.is_overdue(now) { "overdue" } else { "" };
    w.open("tr", &[("class", class)]);
    w.open("td", &[]);
    w.elem(
      "a",
      &[("href", href.as_str()), ("hx-get", panel.as_str()), ("hx-target", "#panel")],
      &c.case_number,
    );
    w.close("td");
    w.elem("td", &[], c.case_type.label());
    let name = if c.subject_name.is_empty() { &c.submitter_name } else { &c.subject_name };
    w.elem("td", &[], name);
    w.elem("td", &[], &c.summary);
    w.elem("td", &[("class", c.status.as_str())], c.status.label());
    w.elem("td", &[], &html::date(c.submitted_at));
    w.elem("td", &[], &c.due_date.map(html::date).unwrap_or_else(|| "-".to_owned()));
    w.close("tr");
  }
  html::table_foot(w);
  w.elem("div", &[("id", "panel")], "");
}

fn deadline_table(w: &mut HtmlWriter, deadlines: &[Deadline], now: DateTime<Utc>) {
  if deadlines.is_empty() {
    w.elem("p", &[("class", "empty")], "No open deadlines.");
    return;
  }
  html::table_head(w, &["Case", "Type", "Summary", "Due", "Days", "Status"]);
  for d in deadlines {
    let href = case_href(d.case_id);
    w.open("tr", &[]);
    w.open("td", &[]).link(&href, &d.case_number).close("td");
    w.elem("td", &[], d.case_type.label());
    w.elem("td", &[], &d.summary);
    w.elem("td", &[], &html::date(d.due_date));
    w.elem("td", &[], &d.days_until_due(now).to_string());
    w.elem("td", &[], d.status.label());
    w.close("tr");
  }
  html::table_foot(w);
}

fn activity_list(w: &mut HtmlWriter, activity: &[CaseActivity]) {
  if activity.is_empty() {
    w.elem("p", &[("class", "empty")], "No activity yet.");
    return;
  }
  w.open("ul", &[("class", "activity")]);
  for a in activity {
    w.open("li", &[]);
    w.elem("time", &[], &html::date_time(a.created_at));
    w.text(" ").text(&a.description);
    if let Some(name) = &a.user_name {
      w.elem("span", &[("class", "who")], &format!(" by {name}"));
    }
    w.close("li");
  }
  w.close("ul");
}

fn document_list(w: &mut HtmlWriter, documents: &[Document]) {
  if documents.is_empty() {
    w.elem("p", &[("class", "empty")], "No documents.");
    return;
  }
  html::table_head(w, &["File", "Category", "Size", "Uploaded"]);
  for d in documents {
    w.open("tr", &[]);
    w.elem("td", &[], &d.filename);
    w.elem("td", &[], &format!("{:?}", d.category));
    w.elem("td", &[], &format!("{} bytes", d.size));
    w.elem("td", &[], &html::date(d.uploaded_at));
    w.close("tr");
  }
  html::table_foot(w);
}

fn note_list(w: &mut HtmlWriter, notes: &[CaseNote]) {
  if notes.is_empty() {
    w.elem("p", &[("class", "empty")], "No notes.");
    return;
  }
  for n in notes {
    w.open("blockquote", &[("class", "note")]);
    w.elem("p", &[], &n.content);
    w.elem(
      "footer",
      &[],
      &format!("{} · {}", n.author_name, html::date_time(n.created_at)),
    );
    w.close("blockquote");
  }
}

/// The status-change form, offering the statuses the policy allows.
fn status_form<S: CaseStore, U: SessionStore>(
  w: &mut HtmlWriter,
  state: &AppState<S, U>,
  case: &Case,
) {
  let policy = state.cases.policy();
  let choices: Vec<CaseStatus> = CaseStatus::iter()
    .filter(|s| *s != case.status && policy.check(case.status, *s).is_ok())
    .collect();
  if choices.is_empty() {
    return;
  }

  let action = format!("{}/_status", case_href(case.id));
  w.open(
    "form",
    &[("hx-post", action.as_str()), ("hx-swap", "none"), ("class", "status-form")],
  );
  w.elem("label", &[("for", "status")], "Change status");
  w.open("select", &[("id", "status"), ("name", "status")]);
  for s in choices {
    w.elem("option", &[("value", s.as_str())], s.label());
  }
  w.close("select");
  w.elem("button", &[("type", "submit")], "Update");
  w.close("form");
}

fn case_summary(w: &mut HtmlWriter, c: &Case) {
  let assigned = c.assigned_to.as_ref().map(|s| s.name.as_str()).unwrap_or("");
  let due = c.due_date.map(html::date).unwrap_or_default();
  let submitted = html::date(c.submitted_at);
  let priority = c.priority.to_string();

  html::details(w, &[
    ("Case number", c.case_number.as_str()),
    ("Type", c.case_type.label()),
    ("Status", c.status.label()),
    ("Priority", priority.as_str()),
    ("Submitted", submitted.as_str()),
    ("Due", due.as_str()),
    ("Assigned to", assigned),
  ]);

  w.elem("h2", &[], "Submitter");
  html::details(w, &[
    ("Name", c.submitter_name.as_str()),
    ("Title", c.submitter_title.as_str()),
    ("Agency", c.submitter_agency.as_str()),
    ("Email", c.submitter_email.as_str()),
    ("Phone", c.submitter_phone.as_str()),
  ]);

  if !c.subject_name.is_empty() {
    w.elem("h2", &[], "Subject");
    html::details(w, &[
      ("Name", c.subject_name.as_str()),
      ("Title", c.subject_title.as_str()),
      ("Agency", c.subject_agency.as_str()),
    ]);
  }

  w.elem("h2", &[], "Summary");
  w.elem("p", &[], &c.summary);
  if !c.description.is_empty() {
    w.elem("p", &[], &c.description);
  }
  if !c.statute_citations.is_empty() {
    w.elem("p", &[("class", "statutes")], &format!("Statutes: {}", c.statute_citations));
  }
}

async fn require_case<S: CaseStore, U: SessionStore>(
  state: &AppState<S, U>,
  id: Uuid,
) -> Result<Case, Error> {
  state.cases.get_by_id(id).await?.ok_or(Error::NotFound)
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

pub async fn dashboard<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Staff(user): Staff,
) -> PageResult {
  let now = Utc::now();
  let stats = state.dashboard.get_stats().await?;
  let recent = state.cases.get_recent(RECENT_CASES).await?;
  let deadlines = state.cases.get_upcoming_deadlines(UPCOMING_DEADLINES).await?;

  let chrome = Chrome::Staff { user: &user, active: "dashboard" };
  render(RenderMode::Page, &state.page("Dashboard", chrome), |w| {
    html::stat_cards(w, &[
      ("Open cases", stats.total_open),
      ("Pending review", stats.total_pending),
      ("Overdue", stats.total_overdue),
      ("Closed", stats.total_closed),
    ]);
    w.elem("h2", &[], "Upcoming deadlines");
    deadline_table(w, &deadlines, now);
    w.elem("h2", &[], "Recent cases");
    case_table(w, &recent, now);
    w.elem("h2", &[], "Recent activity");
    activity_list(w, &stats.recent_activity);
  })
}

// ─── Cases ───────────────────────────────────────────────────────────────────

pub async fn case_list<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Staff(user): Staff,
  Query(params): Query<ListParams>,
) -> PageResult {
  let now = Utc::now();
  let selected_type = params.case_type.clone().unwrap_or_default();
  let selected_status = params.status.clone().unwrap_or_default();
  let text = params.q.clone().unwrap_or_default();

  let cases = state.cases.list(&params.into_query()?).await?;
  let count = |status: CaseStatus| cases.iter().filter(|c| c.status == status).count();
  let submitted = count(CaseStatus::Submitted);
  let under_review = count(CaseStatus::UnderReview);
  let overdue = cases.iter().filter(|c| c.is_overdue(now)).count();

  let type_options: Vec<(&str, &str)> = CaseType::iter().map(|t| (t.prefix(), t.label())).collect();
  let status_options: Vec<(&str, &str)> =
    CaseStatus::iter().map(|s| (s.as_str(), s.label())).collect();

  let chrome = Chrome::Staff { user: &user, active: "cases" };
  render(RenderMode::Page, &state.page("Cases", chrome), |w| {
    html::stat_cards(w, &[
      ("Total", cases.len()),
      ("Submitted", submitted),
      ("Under review", under_review),
      ("Overdue", overdue),
    ]);

    w.open("form", &[("method", "get"), ("action", "/staff/cases"), ("class", "filters")]);
    html::select(w, "type", "Type", &type_options, &selected_type);
    html::select(w, "status", "Status", &status_options, &selected_status);
    w.open("div", &[("class", "field")]);
    w.elem("label", &[("for", "q")], "Search");
    w.void("input", &[("type", "search"), ("id", "q"), ("name", "q"), ("value", text.as_str())]);
    w.close("div");
    w.elem("button", &[("type", "submit")], "Filter");
    w.close("form");

    if cases.is_empty() {
      w.elem("p", &[("class", "empty")], "No cases match these filters.");
    } else {
      case_table(w, &cases, now);
    }
  })
}

pub async fn case_detail<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Staff(user): Staff,
  Path(id): Path<Uuid>,
) -> PageResult {
  let case = require_case(&state, id).await?;
  let documents = state.cases.get_documents(id).await?;
  let notes = state.cases.get_notes(id).await?;
  let activity = state.cases.get_activity(id).await?;

  let chrome = Chrome::Staff { user: &user, active: "cases" };
  render(RenderMode::Page, &state.page(&case.case_number, chrome), |w| {
    case_summary(w, &case);
    status_form(w, &state, &case);
    w.elem("h2", &[], "Documents");
    document_list(w, &documents);
    w.elem("h2", &[], "Notes");
    note_list(w, &notes);
    w.elem("h2", &[], "Activity");
    activity_list(w, &activity);
  })
}

/// The slide-out case panel.
pub async fn case_panel<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Staff(user): Staff,
  Path(id): Path<Uuid>,
) -> PageResult {
  let case = require_case(&state, id).await?;
  let documents = state.cases.get_documents(id).await?;
  let activity = state.cases.get_activity(id).await?;

  let chrome = Chrome::Staff { user: &user, active: "cases" };
  let refresh = format!("{}/_panel", case_href(case.id));
  render(RenderMode::Fragment, &state.page(&case.case_number, chrome), |w| {
    w.open("section", &[
      ("class", "panel"),
      ("hx-get", refresh.as_str()),
      ("hx-trigger", "caseUpdated from:body"),
      ("hx-swap", "outerHTML"),
    ]);
    w.open("h2", &[]).link(&case_href(case.id), &case.case_number).close("h2");
    case_summary(w, &case);
    status_form(w, &state, &case);
    w.elem("h3", &[], "Documents");
    document_list(w, &documents);
    w.elem("h3", &[], "Activity");
    activity_list(w, &activity);
    w.close("section");
  })
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
  pub status: String,
}

/// `POST /staff/cases/{id}/_status`: answers with an empty body and an
/// `HX-Trigger: caseUpdated` header.
pub async fn case_status<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Staff(user): Staff,
  Path(id): Path<Uuid>,
  Form(form): Form<StatusForm>,
) -> Result<impl IntoResponse, Error> {
  let status = CaseStatus::parse(form.status.trim())?;
  state
    .cases
    .update_status_checked(id, status, None, Some(&staff_ref(&user)))
    .await?;
  Ok((StatusCode::OK, [(HX_TRIGGER, "caseUpdated")]))
}

// ─── Deadlines ───────────────────────────────────────────────────────────────

pub async fn deadlines<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Staff(user): Staff,
) -> PageResult {
  let now = Utc::now();
  let deadlines = state.cases.get_all_deadlines().await?;

  let chrome = Chrome::Staff { user: &user, active: "deadlines" };
  render(RenderMode::Page, &state.page("Deadlines", chrome), |w| {
    deadline_table(w, &deadlines, now);
  })
}

// ─── Acknowledgments ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct AcknowledgmentParams {
  pub agency_type: Option<String>,
  pub q:           Option<String>,
  pub year:        Option<String>,
}

pub async fn acknowledgments<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Staff(user): Staff,
  Query(params): Query<AcknowledgmentParams>,
) -> PageResult {
  let selected_agency = params.agency_type.clone().unwrap_or_default();
  let selected_year = params.year.clone().unwrap_or_default();
  let text = params.q.clone().unwrap_or_default();

  let query = AcknowledgmentQuery {
    agency_type: non_empty(params.agency_type)
      .map(|t| AgencyType::parse(t.trim()))
      .transpose()?,
    text:        non_empty(params.q),
    year:        parse_year(params.year)?,
  };
  let acks = state.acknowledgments.list(&query).await?;
  let summary = state.acknowledgments.summary(&acks, Utc::now());

  let chrome = Chrome::Staff { user: &user, active: "acknowledgments" };
  render(RenderMode::Page, &state.page("Acknowledgments", chrome), |w| {
    html::stat_cards(w, &[
      ("Total", summary.total),
      ("Active", summary.active),
      ("This month", summary.this_month),
      ("Expiring", summary.expiring),
    ]);

    w.open(
      "form",
      &[("method", "get"), ("action", "/staff/acknowledgments"), ("class", "filters")],
    );
    html::select(
      w,
      "agency_type",
      "Agency type",
      &[("state", "State"), ("county", "County"), ("city", "City"), ("district", "District")],
      &selected_agency,
    );
    w.open("div", &[("class", "field")]);
    w.elem("label", &[("for", "year")], "Year");
    w.void(
      "input",
      &[("type", "number"), ("id", "year"), ("name", "year"), ("value", selected_year.as_str())],
    );
    w.close("div");
    w.open("div", &[("class", "field")]);
    w.elem("label", &[("for", "q")], "Search");
    w.void("input", &[("type", "search"), ("id", "q"), ("name", "q"), ("value", text.as_str())]);
    w.close("div");
    w.elem("button", &[("type", "submit")], "Filter");
    w.close("form");

    if acks.is_empty() {
      w.elem("p", &[("class", "empty")], "No acknowledgments match these filters.");
    } else {
      html::table_head(w, &["Case", "Official", "Title", "Agency", "Type", "Filed"]);
      for a in &acks {
        let panel = format!("/staff/acknowledgments/{}/_panel", a.id);
        w.open("tr", &[]);
        w.open("td", &[]);
        w.elem("a", &[("href", "#"), ("hx-get", panel.as_str()), ("hx-target", "#panel")], &a.case_number);
        w.close("td");
        w.elem("td", &[], &a.official_name);
        w.elem("td", &[], &a.official_title);
        w.elem("td", &[], &a.agency);
        w.elem("td", &[], &a.agency_type.to_string());
        w.elem("td", &[], &html::date(a.acknowledged_at));
        w.close("tr");
      }
      html::table_foot(w);
      w.elem("div", &[("id", "panel")], "");
    }
  })
}

fn acknowledgment_details(w: &mut HtmlWriter, a: &EthicsAcknowledgment) {
  let term_end = a.term_end.map(html::day).unwrap_or_default();
  let signature = if a.signature_on_file { "On file" } else { "Missing" };
  let active = if a.is_active { "Active" } else { "Inactive" };
  let agency_type = a.agency_type.to_string();
  let term_start = html::day(a.term_start);
  let filed = html::date(a.acknowledged_at);

  html::details(w, &[
    ("Case number", a.case_number.as_str()),
    ("Official", a.official_name.as_str()),
    ("Title", a.official_title.as_str()),
    ("Agency", a.agency.as_str()),
    ("Agency type", agency_type.as_str()),
    ("Term start", term_start.as_str()),
    ("Term end", term_end.as_str()),
    ("Filed", filed.as_str()),
    ("Signature", signature),
    ("Status", active),
    ("Email", a.email.as_str()),
    ("Phone", a.phone.as_str()),
    ("Address", a.address.as_str()),
  ]);
}

pub async fn acknowledgment_panel<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Staff(user): Staff,
  Path(id): Path<Uuid>,
) -> PageResult {
  let ack = state.acknowledgments.get(id).await?.ok_or(Error::NotFound)?;

  let chrome = Chrome::Staff { user: &user, active: "acknowledgments" };
  render(RenderMode::Fragment, &state.page(&ack.case_number, chrome), |w| {
    w.open("section", &[("class", "panel")]);
    w.elem("h2", &[], &ack.case_number);
    acknowledgment_details(w, &ack);
    if let Some(case_id) = ack.case_id {
      w.link(&case_href(case_id), "View case");
    }
    w.close("section");
  })
}

// ─── Reports ─────────────────────────────────────────────────────────────────

fn breakdown(w: &mut HtmlWriter, heading: &str, rows: &[(&str, usize)]) {
  w.elem("h2", &[], heading);
  html::table_head(w, &["", "Cases"]);
  for (label, n) in rows {
    w.open("tr", &[]).elem("td", &[], label).elem("td", &[], &n.to_string()).close("tr");
  }
  html::table_foot(w);
}

fn report_rows(stats: &CaseStats) -> (Vec<(&'static str, usize)>, Vec<(&'static str, usize)>) {
  let by_type = CaseType::iter()
    .map(|t| (t.label(), stats.by_type.get(&t).copied().unwrap_or(0)))
    .collect();
  let by_status = CaseStatus::iter()
    .map(|s| (s.label(), stats.by_status.get(&s).copied().unwrap_or(0)))
    .collect();
  (by_type, by_status)
}

pub async fn reports<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Staff(user): Staff,
) -> PageResult {
  let stats = state.dashboard.get_stats().await?;
  let (by_type, by_status) = report_rows(&stats);

  let chrome = Chrome::Staff { user: &user, active: "reports" };
  render(RenderMode::Page, &state.page("Reports", chrome), |w| {
    html::stat_cards(w, &[
      ("Open cases", stats.total_open),
      ("Pending review", stats.total_pending),
      ("Overdue", stats.total_overdue),
      ("Closed", stats.total_closed),
    ]);
    breakdown(w, "Cases by type", &by_type);
    breakdown(w, "Cases by status", &by_status);
  })
}

// ─── Administration ──────────────────────────────────────────────────────────

pub async fn users<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Staff(user): Staff,
) -> PageResult {
  if !user.can_manage_users() {
    return Err(Error::Forbidden);
  }
  let users = state.auth.list_users().await?;

  let chrome = Chrome::Staff { user: &user, active: "users" };
  render(RenderMode::Page, &state.page("User Management", chrome), |w| {
    html::table_head(w, &["Name", "Email", "Role", "Title", "Status", "Last login"]);
    for u in &users {
      w.open("tr", &[]);
      w.elem("td", &[], &u.full_name());
      w.elem("td", &[], &u.email);
      w.elem("td", &[], u.role.label());
      w.elem("td", &[], html::or_dash(&u.title));
      w.elem("td", &[], if u.is_active { "Active" } else { "Disabled" });
      w.elem("td", &[], &u.last_login_at.map(html::date_time).unwrap_or_else(|| "Never".to_owned()));
      w.close("tr");
    }
    html::table_foot(w);
  })
}

pub async fn settings<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Staff(user): Staff,
) -> PageResult {
  let cfg = &state.config;
  let b = &cfg.branding;
  let transitions = match state.cases.policy() {
    caseflow_core::case::TransitionPolicy::Strict => "Strict",
    caseflow_core::case::TransitionPolicy::Permissive => "Permissive",
  };
  let ttl = format!("{} minutes", cfg.session_ttl_minutes);
  let baseline = format!(
    "{} open, {} closed",
    cfg.stats_baseline_open, cfg.stats_baseline_closed
  );

  let chrome = Chrome::Staff { user: &user, active: "settings" };
  render(RenderMode::Page, &state.page("Settings", chrome), |w| {
    w.elem("h2", &[], "Agency");
    html::details(w, &[
      ("Agency name", b.agency_name.as_str()),
      ("Short name", b.short_name.as_str()),
      ("Tagline", b.tagline.as_str()),
      ("Email", b.contact_email.as_str()),
      ("Phone", b.contact_phone.as_str()),
      ("Address", b.address.as_str()),
      ("Website", b.website.as_str()),
    ]);
    w.elem("h2", &[], "Workflow");
    html::details(w, &[
      ("Status transitions", transitions),
      ("Session length", ttl.as_str()),
      ("Statistics baseline", baseline.as_str()),
      ("Demo mode", if cfg.demo_mode { "On" } else { "Off" }),
    ]);
  })
}
