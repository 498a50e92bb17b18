//! Runtime configuration, deserialised from `caseflow.toml` and `CASEFLOW_*`
//! environment variables.

use caseflow_core::{case::TransitionPolicy, stats::StatsBaseline};
use chrono::Duration;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
  pub host:                  String,
  pub port:                  u16,
  /// Accept any staff credentials and register unknown emails on the fly.
  pub demo_mode:             bool,
  /// Start with the demo cases, acknowledgments and opinions loaded.
  pub seed_demo_data:        bool,
  pub session_ttl_minutes:   i64,
  /// Mark the session cookie `Secure`. Enable when served over HTTPS.
  pub secure_cookies:        bool,
  pub status_transitions:    TransitionPolicy,
  /// Historical counts added to the dashboard's open and closed totals.
  pub stats_baseline_open:   usize,
  pub stats_baseline_closed: usize,
  pub branding:              Branding,
}

impl Default for PortalConfig {
  fn default() -> Self {
    Self {
      host:                  "127.0.0.1".to_owned(),
      port:                  8080,
      demo_mode:             true,
      seed_demo_data:        true,
      session_ttl_minutes:   30,
      secure_cookies:        false,
      status_transitions:    TransitionPolicy::Strict,
      stats_baseline_open:   32,
      stats_baseline_closed: 150,
      branding:              Branding::default(),
    }
  }
}

impl PortalConfig {
  pub fn session_ttl(&self) -> Duration { Duration::minutes(self.session_ttl_minutes) }

  pub fn stats_baseline(&self) -> StatsBaseline {
    StatsBaseline {
      open:   self.stats_baseline_open,
      closed: self.stats_baseline_closed,
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Agency identity shown in page chrome.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Branding {
  pub agency_name:     String,
  pub short_name:      String,
  pub tagline:         String,
  pub logo_url:        String,
  pub favicon_url:     String,
  pub primary_color:   String,
  pub secondary_color: String,
  pub accent_color:    String,
  pub contact_email:   String,
  pub contact_phone:   String,
  pub address:         String,
  pub website:         String,
}

impl Default for Branding {
  fn default() -> Self {
    Self {
      agency_name:     "Nevada Commission on Ethics".to_owned(),
      short_name:      "NCOE".to_owned(),
      tagline:         "Integrity and Trust".to_owned(),
      logo_url:        String::new(),
      favicon_url:     String::new(),
      primary_color:   "#003366".to_owned(),
      secondary_color: "#C4A000".to_owned(),
      accent_color:    String::new(),
      contact_email:   "ncoe@ethics.nv.gov".to_owned(),
      contact_phone:   "(775) 687-5469".to_owned(),
      address:         String::new(),
      website:         "https://ethics.nv.gov".to_owned(),
    }
  }
}
