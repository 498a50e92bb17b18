//! Public pages: the landing page, the four intake forms, and published
//! opinion search. No login required.

use axum::{
  Form,
  extract::{Path, Query, State},
  response::{Html, Redirect},
};
use caseflow_core::{
  acknowledgment::{AgencyType, NewAcknowledgment},
  case::{CaseType, NewCase},
  opinion::{OpinionQuery, PublishedOpinion},
  store::{CaseStore, SessionStore},
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;

use crate::{
  AppState, Error,
  handlers::{non_empty, parse_year},
  html::{self, Chrome, HtmlWriter, RenderMode, field, render},
};

type PageResult = Result<Html<String>, Error>;

/// Topics offered as search filters.
pub const SEARCH_TOPICS: &[&str] = &[
  "Conflicts of Interest",
  "Gifts",
  "Voting",
  "Employment",
  "Financial Disclosure",
];

fn confirm(case_number: &str, kind: &str) -> Redirect {
  Redirect::to(&format!("/submit/confirmation?case={case_number}&type={kind}"))
}

fn intake_form(w: &mut HtmlWriter, action: &str, intro: &str, body: impl FnOnce(&mut HtmlWriter)) {
  w.elem("p", &[("class", "lead")], intro);
  w.open("form", &[("method", "post"), ("action", action)]);
  body(w);
  w.elem("button", &[("type", "submit")], "Submit");
  w.close("form");
}

// ─── Home ────────────────────────────────────────────────────────────────────

pub async fn home<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
) -> PageResult {
  let b = &state.config.branding;
  render(RenderMode::Page, &state.page("Home", Chrome::Public), |w| {
    w.elem("p", &[("class", "lead")], &format!("Welcome to the {}.", b.agency_name));
    w.open("ul", &[("class", "services")]);
    for (href, label, blurb) in [
      (
        "/submit/advisory-opinion",
        "Request an Advisory Opinion",
        "Ask whether a proposed action complies with the Ethics in Government Law.",
      ),
      (
        "/submit/ethics-complaint",
        "File an Ethics Complaint",
        "Report a suspected ethics violation by a public officer or employee.",
      ),
      (
        "/submit/acknowledgment",
        "File an Ethics Acknowledgment",
        "Confirm that you have received and understand the ethics law.",
      ),
      (
        "/submit/records-request",
        "Public Records Request",
        "Request copies of public records held by the Commission.",
      ),
      ("/search", "Search Opinions", "Browse published advisory opinions and final orders."),
    ] {
      w.open("li", &[]).link(href, label).elem("p", &[], blurb).close("li");
    }
    w.close("ul");
  })
}

// ─── Advisory opinion ────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdvisoryForm {
  pub name:             String,
  pub title:            String,
  pub agency:           String,
  pub email:            String,
  pub phone:            String,
  pub question_summary: String,
  pub question_detail:  String,
}

pub async fn advisory_form<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
) -> PageResult {
  render(
    RenderMode::Page,
    &state.page("Request Advisory Opinion", Chrome::Public),
    |w| {
      intake_form(
        w,
        "/submit/advisory-opinion",
        "Public officers and employees may request an Advisory Opinion about their own \
         past, present or future conduct.",
        |w| {
          field(w, "text", "name", "Your name", true);
          field(w, "text", "title", "Title or position", false);
          field(w, "text", "agency", "Agency", false);
          field(w, "email", "email", "Email", true);
          field(w, "tel", "phone", "Phone", false);
          field(w, "text", "question_summary", "Question summary", true);
          field(w, "textarea", "question_detail", "Describe the facts and your question", false);
        },
      );
    },
  )
}

pub async fn submit_advisory<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Form(form): Form<AdvisoryForm>,
) -> Result<Redirect, Error> {
  let mut new = NewCase::new(CaseType::AdvisoryOpinion);
  new.submitter_name = form.name;
  new.submitter_title = form.title;
  new.submitter_agency = form.agency;
  new.submitter_email = form.email;
  new.submitter_phone = form.phone;
  new.summary = form.question_summary;
  new.description = form.question_detail;

  let case = state.cases.create(new).await?;
  Ok(confirm(&case.case_number, "advisory"))
}

// ─── Ethics complaint ────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ComplaintForm {
  pub complainant_name:   String,
  pub complainant_email:  String,
  pub complainant_phone:  String,
  pub subject_name:       String,
  pub subject_title:      String,
  pub subject_agency:     String,
  pub allegation_summary: String,
  pub allegation_detail:  String,
  pub statutes:           String,
}

pub async fn complaint_form<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
) -> PageResult {
  render(RenderMode::Page, &state.page("File Ethics Complaint", Chrome::Public), |w| {
    intake_form(
      w,
      "/submit/ethics-complaint",
      "Use this form to file an Ethics Complaint alleging that a public officer or \
       employee violated the Ethics in Government Law.",
      |w| {
        w.elem("h2", &[], "About you");
        field(w, "text", "complainant_name", "Your name", true);
        field(w, "email", "complainant_email", "Email", true);
        field(w, "tel", "complainant_phone", "Phone", false);
        w.elem("h2", &[], "About the public officer or employee");
        field(w, "text", "subject_name", "Name", true);
        field(w, "text", "subject_title", "Title or position", false);
        field(w, "text", "subject_agency", "Agency", false);
        w.elem("h2", &[], "The allegation");
        field(w, "text", "allegation_summary", "Summary", true);
        field(w, "textarea", "allegation_detail", "Details", false);
        field(w, "text", "statutes", "Statutes allegedly violated", false);
      },
    );
  })
}

pub async fn submit_complaint<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Form(form): Form<ComplaintForm>,
) -> Result<Redirect, Error> {
  let mut new = NewCase::new(CaseType::EthicsComplaint);
  new.submitter_name = form.complainant_name;
  new.submitter_email = form.complainant_email;
  new.submitter_phone = form.complainant_phone;
  new.subject_name = form.subject_name;
  new.subject_title = form.subject_title;
  new.subject_agency = form.subject_agency;
  new.summary = form.allegation_summary;
  new.description = form.allegation_detail;
  new.statute_citations = form.statutes;

  let case = state.cases.create(new).await?;
  Ok(confirm(&case.case_number, "complaint"))
}

// ─── Ethics acknowledgment ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AcknowledgmentForm {
  pub official_name:  String,
  pub official_title: String,
  pub agency:         String,
  pub agency_type:    Option<String>,
  pub term_start:     Option<String>,
  pub term_end:       Option<String>,
  pub email:          String,
  pub phone:          String,
  pub address:        String,
  /// Checkbox; present when ticked.
  pub signature:      Option<String>,
}

fn parse_date(value: Option<String>) -> Result<Option<NaiveDate>, Error> {
  non_empty(value)
    .map(|d| {
      NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
        .map_err(|_| Error::BadRequest(format!("invalid date: {d:?}")))
    })
    .transpose()
}

pub async fn acknowledgment_form<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
) -> PageResult {
  render(
    RenderMode::Page,
    &state.page("File Ethics Acknowledgment", Chrome::Public),
    |w| {
      intake_form(
        w,
        "/submit/acknowledgment",
        "Public officers must acknowledge that they have received, read and understand \
         the Ethics in Government Law.",
        |w| {
          field(w, "text", "official_name", "Your name", true);
          field(w, "text", "official_title", "Title or position", false);
          field(w, "text", "agency", "Agency", true);
          w.open("div", &[("class", "field")]);
          w.elem("label", &[("for", "agency_type")], "Agency type");
          w.open("select", &[("id", "agency_type"), ("name", "agency_type")]);
          for (value, label) in [
            ("state", "State"),
            ("county", "County"),
            ("city", "City"),
            ("district", "District"),
          ] {
            w.elem("option", &[("value", value)], label);
          }
          w.close("select").close("div");
          field(w, "date", "term_start", "Term start", false);
          field(w, "date", "term_end", "Term end", false);
          field(w, "email", "email", "Email", true);
          field(w, "tel", "phone", "Phone", false);
          field(w, "text", "address", "Mailing address", false);
          w.open("div", &[("class", "field")]);
          w.void(
            "input",
            &[("type", "checkbox"), ("id", "signature"), ("name", "signature"), ("value", "on")],
          );
          w.elem(
            "label",
            &[("for", "signature")],
            "I acknowledge that I have received, read and understand the Ethics in Government Law.",
          );
          w.close("div");
        },
      );
    },
  )
}

pub async fn submit_acknowledgment<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Form(form): Form<AcknowledgmentForm>,
) -> Result<Redirect, Error> {
  let agency_type = non_empty(form.agency_type)
    .map(|t| AgencyType::parse(t.trim()))
    .transpose()?
    .unwrap_or(AgencyType::State);
  let term_start = parse_date(form.term_start)?.unwrap_or_else(|| Utc::now().date_naive());

  let new = NewAcknowledgment {
    official_name: form.official_name,
    official_title: form.official_title,
    agency: form.agency,
    agency_type,
    term_start,
    term_end: parse_date(form.term_end)?,
    signature_on_file: form.signature.is_some(),
    email: form.email,
    phone: form.phone,
    address: form.address,
  };

  let ack = state.acknowledgments.file(new).await?;
  Ok(confirm(&ack.case_number, "acknowledgment"))
}

// ─── Public records request ──────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecordsForm {
  pub requester_name:  String,
  pub requester_email: String,
  pub requester_phone: String,
  pub request_summary: String,
  pub request_detail:  String,
}

pub async fn records_form<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
) -> PageResult {
  render(RenderMode::Page, &state.page("Public Records Request", Chrome::Public), |w| {
    intake_form(
      w,
      "/submit/records-request",
      "Request copies of public records. The Commission responds within five business days.",
      |w| {
        field(w, "text", "requester_name", "Your name", true);
        field(w, "email", "requester_email", "Email", true);
        field(w, "tel", "requester_phone", "Phone", false);
        field(w, "text", "request_summary", "Records requested", true);
        field(w, "textarea", "request_detail", "Description", false);
      },
    );
  })
}

pub async fn submit_records<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Form(form): Form<RecordsForm>,
) -> Result<Redirect, Error> {
  let mut new = NewCase::new(CaseType::PublicRecordsRequest);
  new.submitter_name = form.requester_name;
  new.submitter_email = form.requester_email;
  new.submitter_phone = form.requester_phone;
  new.summary = form.request_summary;
  new.description = form.request_detail;

  let case = state.cases.create(new).await?;
  Ok(confirm(&case.case_number, "records"))
}

// ─── Confirmation ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmationParams {
  pub case:    Option<String>,
  #[serde(rename = "type")]
  pub kind:    Option<String>,
}

pub async fn confirmation<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Query(params): Query<ConfirmationParams>,
) -> PageResult {
  let case_number = params.case.unwrap_or_default();
  let what = match params.kind.as_deref() {
    Some("advisory") => "advisory opinion request",
    Some("complaint") => "ethics complaint",
    Some("acknowledgment") => "ethics acknowledgment",
    Some("records") => "public records request",
    _ => "submission",
  };
  let b = &state.config.branding;

  render(RenderMode::Page, &state.page("Submission Received", Chrome::Public), |w| {
    w.elem("p", &[], &format!("Thank you. Your {what} has been received."));
    w.open("p", &[]).text("Your confirmation number is ");
    w.elem("strong", &[("class", "case-number")], &case_number).text(".").close("p");
    w.elem(
      "p",
      &[],
      &format!(
        "Please keep this number for your records. Questions may be directed to {} at {}.",
        b.contact_email, b.contact_phone
      ),
    );
    w.link("/", "Return home");
  })
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
  pub q:     Option<String>,
  #[serde(rename = "type")]
  pub kind:  Option<String>,
  pub year:  Option<String>,
  pub topic: Option<String>,
}

impl SearchParams {
  pub fn into_query(self) -> Result<OpinionQuery, Error> {
    Ok(OpinionQuery {
      text:      non_empty(self.q),
      case_type: non_empty(self.kind).map(|t| CaseType::parse(&t)).transpose()?,
      year:      parse_year(self.year)?,
      topic:     non_empty(self.topic),
    })
  }
}

fn opinion_row(w: &mut HtmlWriter, o: &PublishedOpinion) {
  let href = format!("/opinions/{}", o.case_number);
  w.open("article", &[("class", "result")]);
  w.open("h3", &[]).link(&href, &o.title).close("h3");
  w.elem(
    "p",
    &[("class", "meta")],
    &format!("{} · {} · {}", o.case_number, o.case_type.label(), html::date(o.published_at)),
  );
  w.elem("p", &[], &o.summary);
  w.close("article");
}

pub async fn search<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Query(params): Query<SearchParams>,
) -> PageResult {
  let selected_type = params.kind.clone().unwrap_or_default();
  let selected_year = params.year.clone().unwrap_or_default();
  let selected_topic = params.topic.clone().unwrap_or_default();
  let text = params.q.clone().unwrap_or_default();

  let query = params.into_query()?;
  let results = if query.is_empty() {
    None
  } else {
    Some(state.cases.search_published(&query).await?)
  };

  let this_year = Utc::now().year();
  let years: Vec<String> = (0..5).map(|back| (this_year - back).to_string()).collect();

  render(
    RenderMode::Page,
    &state.page("Search Published Opinions & Orders", Chrome::Public),
    |w| {
      w.open("form", &[("method", "get"), ("action", "/search"), ("class", "search")]);
      w.open("div", &[("class", "field")]);
      w.elem("label", &[("for", "q")], "Keywords");
      w.void("input", &[("type", "search"), ("id", "q"), ("name", "q"), ("value", text.as_str())]);
      w.close("div");
      html::select(
        w,
        "type",
        "Document type",
        &[("AO", "Advisory Opinions"), ("EC", "Final Orders")],
        &selected_type,
      );
      let year_options: Vec<(&str, &str)> =
        years.iter().map(|y| (y.as_str(), y.as_str())).collect();
      html::select(w, "year", "Year", &year_options, &selected_year);
      let topic_options: Vec<(&str, &str)> = SEARCH_TOPICS.iter().map(|t| (*t, *t)).collect();
      html::select(w, "topic", "Topic", &topic_options, &selected_topic);
      w.elem("button", &[("type", "submit")], "Search");
      w.close("form");

      match &results {
        None => {
          w.elem("p", &[("class", "hint")], "Enter a keyword or choose a filter to search.");
        }
        Some(found) if found.is_empty() => {
          w.elem("p", &[("class", "empty")], "No published opinions match your search.");
        }
        Some(found) => {
          w.elem("p", &[], &format!("{} result(s)", found.len()));
          for o in found {
            opinion_row(w, o);
          }
        }
      }
    },
  )
}

pub async fn opinion<S: CaseStore, U: SessionStore>(
  State(state): State<AppState<S, U>>,
  Path(case_number): Path<String>,
) -> PageResult {
  let opinion = state
    .cases
    .get_published_opinion(&case_number)
    .await?
    .ok_or(Error::NotFound)?;

  render(RenderMode::Page, &state.page(&opinion.title, Chrome::Public), |w| {
    html::details(w, &[
      ("Case number", opinion.case_number.as_str()),
      ("Type", opinion.case_type.label()),
      ("Published", html::date(opinion.published_at).as_str()),
      ("Topics", opinion.topics.join(", ").as_str()),
      ("Statutes", opinion.statutes.join(", ").as_str()),
    ]);
    w.elem("h2", &[], "Summary");
    w.elem("p", &[], &opinion.summary);
    if let Some(url) = &opinion.document_url {
      w.link(url, "Download the full opinion");
    }
    w.link("/search", "Back to search");
  })
}
