//! HTML generation.
//!
//! Pages are written with `quick-xml`'s writer, which escapes text and
//! attribute values. Every handler picks a [`RenderMode`]: a full page with
//! the site chrome, or a bare fragment for htmx to swap in.

use std::io::Cursor;

use axum::response::Html;
use caseflow_core::user::User;
use chrono::{DateTime, NaiveDate, Utc};
use quick_xml::{
  Writer,
  events::{BytesEnd, BytesStart, BytesText, Event},
};

use crate::{config::Branding, error::Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
  Page,
  Fragment,
}

// ─── Writer ──────────────────────────────────────────────────────────────────

/// An element-at-a-time HTML writer.
///
/// Write failures are held until [`HtmlWriter::finish`] so call sites can
/// chain calls without handling each one.
pub struct HtmlWriter {
  writer: Writer<Cursor<Vec<u8>>>,
  error:  Option<String>,
}

impl Default for HtmlWriter {
  fn default() -> Self { Self::new() }
}

impl HtmlWriter {
  pub fn new() -> Self {
    Self {
      writer: Writer::new(Cursor::new(Vec::new())),
      error:  None,
    }
  }

  fn event(&mut self, event: Event<'_>) -> &mut Self {
    if self.error.is_none()
      && let Err(e) = self.writer.write_event(event)
    {
      self.error = Some(e.to_string());
    }
    self
  }

  fn start<'a>(tag: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut el = BytesStart::new(tag);
    for (k, v) in attrs {
      el.push_attribute((*k, *v));
    }
    el
  }

  pub fn doctype(&mut self) -> &mut Self {
    self.event(Event::DocType(BytesText::from_escaped("html")))
  }

  pub fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
    self.event(Event::Start(Self::start(tag, attrs)))
  }

  pub fn close(&mut self, tag: &str) -> &mut Self { self.event(Event::End(BytesEnd::new(tag))) }

  /// A void element such as `<input>` or `<meta>`.
  pub fn void(&mut self, tag: &str, attrs: &[(&str, &str)]) -> &mut Self {
    self.event(Event::Empty(Self::start(tag, attrs)))
  }

  pub fn text(&mut self, text: &str) -> &mut Self { self.event(Event::Text(BytesText::new(text))) }

  /// `<tag attrs>text</tag>`
  pub fn elem(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) -> &mut Self {
    self.open(tag, attrs).text(text).close(tag)
  }

  pub fn link(&mut self, href: &str, text: &str) -> &mut Self {
    self.elem("a", &[("href", href)], text)
  }

  pub fn finish(self) -> Result<String, Error> {
    if let Some(msg) = self.error {
      return Err(Error::Render(msg));
    }
    String::from_utf8(self.writer.into_inner().into_inner())
      .map_err(|e| Error::Render(e.to_string()))
  }
}

// ─── Formatting ──────────────────────────────────────────────────────────────

pub fn date(at: DateTime<Utc>) -> String { at.format("%b %-d, %Y").to_string() }

pub fn day(d: NaiveDate) -> String { d.format("%b %-d, %Y").to_string() }

pub fn date_time(at: DateTime<Utc>) -> String { at.format("%b %-d, %Y %H:%M").to_string() }

pub fn or_dash(s: &str) -> &str { if s.is_empty() { "-" } else { s } }

// ─── Chrome ──────────────────────────────────────────────────────────────────

/// Which navigation the page shows.
pub enum Chrome<'a> {
  Public,
  Staff { user: &'a User, active: &'a str },
}

pub struct Page<'a> {
  pub title:    &'a str,
  pub branding: &'a Branding,
  pub chrome:   Chrome<'a>,
}

const PUBLIC_NAV: &[(&str, &str)] = &[
  ("/", "Home"),
  ("/submit/advisory-opinion", "Advisory Opinion"),
  ("/submit/ethics-complaint", "File a Complaint"),
  ("/submit/acknowledgment", "Acknowledgment"),
  ("/submit/records-request", "Records Request"),
  ("/search", "Search Opinions"),
];

const STAFF_NAV: &[(&str, &str, &str)] = &[
  ("dashboard", "/staff/dashboard", "Dashboard"),
  ("cases", "/staff/cases", "Cases"),
  ("acknowledgments", "/staff/acknowledgments", "Acknowledgments"),
  ("deadlines", "/staff/deadlines", "Deadlines"),
  ("reports", "/staff/reports", "Reports"),
  ("settings", "/staff/settings", "Settings"),
];

/// Render `body` in the given mode.
pub fn render(
  mode: RenderMode,
  page: &Page<'_>,
  body: impl FnOnce(&mut HtmlWriter),
) -> Result<Html<String>, Error> {
  let mut w = HtmlWriter::new();
  match mode {
    RenderMode::Fragment => body(&mut w),
    RenderMode::Page => {
      open_page(&mut w, page);
      body(&mut w);
      close_page(&mut w, page.branding);
    }
  }
  w.finish().map(Html)
}

fn open_page(w: &mut HtmlWriter, page: &Page<'_>) {
  let b = page.branding;
  let title = format!("{} | {}", page.title, b.short_name);
  let style = format!(
    ":root {{ --primary: {}; --secondary: {}; }}",
    b.primary_color, b.secondary_color
  );

  w.doctype().open("html", &[("lang", "en")]).open("head", &[]);
  w.void("meta", &[("charset", "utf-8")]);
  w.void("meta", &[("name", "viewport"), ("content", "width=device-width, initial-scale=1")]);
  w.elem("title", &[], &title);
  if !b.favicon_url.is_empty() {
    w.void("link", &[("rel", "icon"), ("href", b.favicon_url.as_str())]);
  }
  w.elem("style", &[], &style);
  w.elem("script", &[("src", "https://unpkg.com/htmx.org@1.9.12")], "");
  w.close("head").open("body", &[]);

  w.open("header", &[("class", "site-header")]);
  w.open("a", &[("href", "/"), ("class", "brand")]);
  if !b.logo_url.is_empty() {
    w.void("img", &[("src", b.logo_url.as_str()), ("alt", b.short_name.as_str())]);
  }
  w.elem("span", &[], &b.agency_name).close("a");
  w.elem("p", &[("class", "tagline")], &b.tagline);

  w.open("nav", &[]);
  match &page.chrome {
    Chrome::Public => {
      for (href, label) in PUBLIC_NAV {
        w.link(href, label);
      }
      w.elem("a", &[("href", "/staff/login"), ("class", "staff-login")], "Staff Login");
    }
    Chrome::Staff { user, active } => {
      for (key, href, label) in STAFF_NAV {
        if key == active {
          w.elem("a", &[("href", *href), ("class", "active")], label);
        } else {
          w.link(href, label);
        }
      }
      if user.can_manage_users() {
        w.link("/staff/users", "Users");
      }
      w.elem("span", &[("class", "user")], &user.full_name());
      w.link("/staff/logout", "Sign out");
    }
  }
  w.close("nav").close("header");

  w.open("main", &[]).elem("h1", &[], page.title);
}

fn close_page(w: &mut HtmlWriter, b: &Branding) {
  w.close("main");
  w.open("footer", &[]);
  w.elem("p", &[], &b.agency_name);
  let contact = [b.address.as_str(), b.contact_phone.as_str(), b.contact_email.as_str()]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" · ");
  w.elem("p", &[], &contact);
  if !b.website.is_empty() {
    w.link(&b.website, &b.website);
  }
  w.close("footer").close("body").close("html");
}

// ─── Widgets ─────────────────────────────────────────────────────────────────

/// A labelled form control. `kind` is an input type, or `"textarea"`.
pub fn field(w: &mut HtmlWriter, kind: &str, name: &str, label: &str, required: bool) {
  w.open("div", &[("class", "field")]);
  w.elem("label", &[("for", name)], label);
  let mut attrs = vec![("id", name), ("name", name)];
  if required {
    attrs.push(("required", "required"));
  }
  if kind == "textarea" {
    attrs.push(("rows", "6"));
    w.elem("textarea", &attrs, "");
  } else {
    attrs.push(("type", kind));
    w.void("input", &attrs);
  }
  w.close("div");
}

/// A `<select>` whose first option is an empty "any" choice.
pub fn select(
  w: &mut HtmlWriter,
  name: &str,
  label: &str,
  options: &[(&str, &str)],
  selected: &str,
) {
  w.open("div", &[("class", "field")]);
  w.elem("label", &[("for", name)], label);
  w.open("select", &[("id", name), ("name", name)]);
  w.elem("option", &[("value", "")], "Any");
  for (value, text) in options {
    if *value == selected {
      w.elem("option", &[("value", *value), ("selected", "selected")], text);
    } else {
      w.elem("option", &[("value", *value)], text);
    }
  }
  w.close("select").close("div");
}

/// A `<dl>` of label/value rows.
pub fn details(w: &mut HtmlWriter, rows: &[(&str, &str)]) {
  w.open("dl", &[]);
  for (term, value) in rows {
    w.elem("dt", &[], term).elem("dd", &[], or_dash(value));
  }
  w.close("dl");
}

/// A row of headline numbers.
pub fn stat_cards(w: &mut HtmlWriter, cards: &[(&str, usize)]) {
  w.open("div", &[("class", "stats")]);
  for (label, value) in cards {
    w.open("div", &[("class", "stat")]);
    w.elem("span", &[("class", "value")], &value.to_string());
    w.elem("span", &[("class", "label")], label);
    w.close("div");
  }
  w.close("div");
}

pub fn table_head(w: &mut HtmlWriter, columns: &[&str]) {
  w.open("table", &[]).open("thead", &[]).open("tr", &[]);
  for col in columns {
    w.elem("th", &[], col);
  }
  w.close("tr").close("thead").open("tbody", &[]);
}

pub fn table_foot(w: &mut HtmlWriter) { w.close("tbody").close("table"); }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn text_and_attributes_are_escaped() {
    let mut w = HtmlWriter::new();
    w.elem("a", &[("href", "/search?q=a&b")], "<Smith & Co>");
    let html = w.finish().unwrap();
    assert_eq!(html, r#"<a href="/search?q=a&amp;b">&lt;Smith &amp; Co&gt;</a>"#);
  }

  #[test]
  fn fragment_mode_skips_chrome() {
    let branding = Branding::default();
    let page = Page { title: "Panel", branding: &branding, chrome: Chrome::Public };

    let Html(fragment) = render(RenderMode::Fragment, &page, |w| {
      w.elem("p", &[], "hello");
    })
    .unwrap();
    assert_eq!(fragment, "<p>hello</p>");

    let Html(full) = render(RenderMode::Page, &page, |w| {
      w.elem("p", &[], "hello");
    })
    .unwrap();
    assert!(full.starts_with("<!DOCTYPE html>"));
    assert!(full.contains("<title>Panel | NCOE</title>"));
    assert!(full.contains("Nevada Commission on Ethics"));
    assert!(full.ends_with("</html>"));
  }
}
