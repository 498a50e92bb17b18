//! Ethics acknowledgments: the annual filing by a public official that they
//! have read and understood the ethics law.
//!
//! Acknowledgments are create-only; they carry no status machine.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{Error, Result};

/// An acknowledgment counts as expiring when the term ends within this window.
pub const EXPIRING_WINDOW: Duration = Duration::days(90);

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AgencyType {
  State,
  County,
  City,
  District,
}

impl AgencyType {
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownAgencyType(s.to_owned()))
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EthicsAcknowledgment {
  pub id:                Uuid,
  /// Shares the number of the EA case filed alongside it.
  pub case_number:       String,
  pub case_id:           Option<Uuid>,

  pub official_name:     String,
  pub official_title:    String,
  pub agency:            String,
  pub agency_type:       AgencyType,

  pub term_start:        NaiveDate,
  pub term_end:          Option<NaiveDate>,

  pub acknowledged_at:   DateTime<Utc>,
  pub signature_on_file: bool,

  pub email:             String,
  pub phone:             String,
  pub address:           String,

  pub is_active:         bool,

  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
}

impl EthicsAcknowledgment {
  /// The term ends within [`EXPIRING_WINDOW`] of `today` (and has not already
  /// ended).
  pub fn is_expiring(&self, today: NaiveDate) -> bool {
    self
      .term_end
      .is_some_and(|end| end >= today && end - today <= EXPIRING_WINDOW)
  }
}

/// Input to filing an acknowledgment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAcknowledgment {
  pub official_name:     String,
  #[serde(default)]
  pub official_title:    String,
  #[serde(default)]
  pub agency:            String,
  pub agency_type:       AgencyType,
  pub term_start:        NaiveDate,
  #[serde(default)]
  pub term_end:          Option<NaiveDate>,
  #[serde(default)]
  pub signature_on_file: bool,
  #[serde(default)]
  pub email:             String,
  #[serde(default)]
  pub phone:             String,
  #[serde(default)]
  pub address:           String,
}

/// Filters for the acknowledgment list view. `None` matches everything.
#[derive(Debug, Clone, Default)]
pub struct AcknowledgmentQuery {
  pub agency_type: Option<AgencyType>,
  /// Case-insensitive substring over official name, agency and case number.
  pub text:        Option<String>,
  /// Year the acknowledgment was filed.
  pub year:        Option<i32>,
}

impl AcknowledgmentQuery {
  pub fn matches(&self, ack: &EthicsAcknowledgment) -> bool {
    if self.agency_type.is_some_and(|t| t != ack.agency_type) {
      return false;
    }
    if self.year.is_some_and(|y| y != ack.acknowledged_at.year()) {
      return false;
    }
    match &self.text {
      Some(text) => {
        let needle = text.to_lowercase();
        [&ack.official_name, &ack.agency, &ack.case_number]
          .iter()
          .any(|field| field.to_lowercase().contains(&needle))
      }
      None => true,
    }
  }
}

/// Headline counts for the acknowledgment list view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcknowledgmentSummary {
  pub total:      usize,
  pub active:     usize,
  pub this_month: usize,
  pub expiring:   usize,
}

impl AcknowledgmentSummary {
  pub fn of(acks: &[EthicsAcknowledgment], now: DateTime<Utc>) -> Self {
    let today = now.date_naive();
    let same_month = |at: DateTime<Utc>| at.year() == now.year() && at.month() == now.month();

    Self {
      total:      acks.len(),
      active:     acks.iter().filter(|a| a.is_active).count(),
      this_month: acks.iter().filter(|a| same_month(a.acknowledged_at)).count(),
      expiring:   acks.iter().filter(|a| a.is_expiring(today)).count(),
    }
  }
}
