//! Append-only records attached to a case: activity, notes and document
//! metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::case::{Case, CaseStatus};

// ─── Activity ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
  Created,
  StatusChanged,
  Assigned,
  NoteAdded,
  DocumentAdded,
}

/// A timeline entry in a case's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseActivity {
  pub activity_id: Uuid,
  pub case_id:     Uuid,
  pub action:      ActivityAction,
  pub description: String,
  /// Staff user responsible, if any. Public submissions have none.
  pub user_id:     Option<String>,
  pub user_name:   Option<String>,
  pub old_value:   Option<String>,
  pub new_value:   Option<String>,
  pub created_at:  DateTime<Utc>,
}

impl CaseActivity {
  fn new(case_id: Uuid, action: ActivityAction, description: String) -> Self {
    Self {
      activity_id: Uuid::new_v4(),
      case_id,
      action,
      description,
      user_id: None,
      user_name: None,
      old_value: None,
      new_value: None,
      created_at: Utc::now(),
    }
  }

  pub fn created(case: &Case) -> Self {
    let mut entry = Self::new(
      case.id,
      ActivityAction::Created,
      "Case created from public submission".to_owned(),
    );
    entry.created_at = case.created_at;
    entry
  }

  pub fn status_changed(case: &Case, from: CaseStatus) -> Self {
    let mut entry = Self::new(
      case.id,
      ActivityAction::StatusChanged,
      format!("Status changed from {} to {}", from.label(), case.status.label()),
    );
    entry.old_value = Some(from.to_string());
    entry.new_value = Some(case.status.to_string());
    entry.created_at = case.updated_at;
    entry
  }

  pub fn assigned(case: &Case) -> Self {
    let name = case.assigned_to.as_ref().map(|s| s.name.clone());
    let mut entry = Self::new(
      case.id,
      ActivityAction::Assigned,
      format!(
        "Assigned to {} ({} priority)",
        name.as_deref().unwrap_or("nobody"),
        case.priority
      ),
    );
    entry.new_value = name;
    entry.created_at = case.updated_at;
    entry
  }

  pub fn note_added(note: &CaseNote) -> Self {
    let mut entry = Self::new(
      note.case_id,
      ActivityAction::NoteAdded,
      format!("Note added by {}", note.author_name),
    );
    entry.user_id = Some(note.author_id.clone());
    entry.user_name = Some(note.author_name.clone());
    entry.created_at = note.created_at;
    entry
  }

  pub fn document_added(doc: &Document) -> Self {
    let mut entry = Self::new(
      doc.case_id,
      ActivityAction::DocumentAdded,
      format!("Document added: {}", doc.filename),
    );
    entry.user_id = Some(doc.uploaded_by.clone());
    entry.created_at = doc.uploaded_at;
    entry
  }

  /// Attribute the entry to a staff member.
  pub fn by(mut self, user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
    self.user_id = Some(user_id.into());
    self.user_name = Some(user_name.into());
    self
  }
}

// ─── Notes ───────────────────────────────────────────────────────────────────

/// An internal staff note; never shown publicly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseNote {
  pub note_id:     Uuid,
  pub case_id:     Uuid,
  pub author_id:   String,
  pub author_name: String,
  pub content:     String,
  pub created_at:  DateTime<Utc>,
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
  #[default]
  Submission,
  Evidence,
  Draft,
  Final,
  Correspondence,
}

/// Metadata for a file attached to a case. File contents are kept elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub document_id:  Uuid,
  pub case_id:      Uuid,
  pub filename:     String,
  pub content_type: String,
  pub size:         u64,
  pub category:     DocumentCategory,
  pub is_public:    bool,
  pub uploaded_by:  String,
  pub uploaded_at:  DateTime<Utc>,
}
