//! Published advisory opinions and final orders, searchable by the public.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::case::{Case, CaseType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedOpinion {
  pub case_number:  String,
  /// Only advisory opinions and complaints produce published documents.
  pub case_type:    CaseType,
  pub title:        String,
  pub summary:      String,
  /// Subject areas, e.g. "Conflicts of Interest", "Gifts".
  pub topics:       Vec<String>,
  /// Statute citations, e.g. "NRS 281A.400".
  pub statutes:     Vec<String>,
  pub document_url: Option<String>,
  pub published_at: DateTime<Utc>,
  pub year:         i32,
}

impl PublishedOpinion {
  /// Build the public record for a case that has just been published.
  /// Returns `None` for case types that are never published.
  pub fn from_case(case: &Case, published_at: DateTime<Utc>) -> Option<Self> {
    let title = match case.case_type {
      CaseType::AdvisoryOpinion => format!("Advisory Opinion: {}", case.summary),
      CaseType::EthicsComplaint => format!("Final Order: {}", case.summary),
      CaseType::EthicsAcknowledgment | CaseType::PublicRecordsRequest => {
        return None;
      }
    };
    let statutes = case
      .statute_citations
      .split([',', ';'])
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_owned)
      .collect();

    Some(Self {
      case_number: case.case_number.clone(),
      case_type: case.case_type,
      title,
      summary: case.description.clone(),
      topics: case.tags.clone(),
      statutes,
      document_url: None,
      published_at,
      year: published_at.year(),
    })
  }
}

/// Parameters for the public opinion search. `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct OpinionQuery {
  /// Case-insensitive substring over case number, title and summary.
  pub text:      Option<String>,
  pub case_type: Option<CaseType>,
  pub year:      Option<i32>,
  /// Case-insensitive exact match against one of the opinion's topics.
  pub topic:     Option<String>,
}

impl OpinionQuery {
  pub fn is_empty(&self) -> bool {
    self.text.is_none()
      && self.case_type.is_none()
      && self.year.is_none()
      && self.topic.is_none()
  }

  pub fn matches(&self, opinion: &PublishedOpinion) -> bool {
    if self.case_type.is_some_and(|t| t != opinion.case_type) {
      return false;
    }
    if self.year.is_some_and(|y| y != opinion.year) {
      return false;
    }
    if let Some(topic) = &self.topic
      && !opinion.topics.iter().any(|t| t.eq_ignore_ascii_case(topic))
    {
      return false;
    }
    match &self.text {
      Some(text) => {
        let needle = text.to_lowercase();
        [&opinion.case_number, &opinion.title, &opinion.summary]
          .iter()
          .any(|field| field.to_lowercase().contains(&needle))
      }
      None => true,
    }
  }
}
