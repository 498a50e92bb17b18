//! Staff users and login sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
  /// Full system access.
  Admin,
  /// All case access, publishing.
  CommissionCounsel,
  /// Assigned case access.
  StaffAttorney,
  /// Complaint investigation.
  Investigator,
  /// Case intake, records requests.
  AdminStaff,
  ReadOnly,
  /// Audit logs only.
  Auditor,
}

impl Role {
  pub fn label(self) -> &'static str {
    match self {
      Self::Admin => "Administrator",
      Self::CommissionCounsel => "Commission Counsel",
      Self::StaffAttorney => "Staff Attorney",
      Self::Investigator => "Investigator",
      Self::AdminStaff => "Administrative Staff",
      Self::ReadOnly => "Read Only",
      Self::Auditor => "Auditor",
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:            String,
  pub email:         String,
  /// Argon2 PHC string. `None` for accounts that can only log in while the
  /// portal runs in demo mode.
  #[serde(skip_serializing)]
  pub password_hash: Option<String>,
  pub first_name:    String,
  pub last_name:     String,
  pub role:          Role,
  pub title:         String,
  pub is_active:     bool,
  pub last_login_at: Option<DateTime<Utc>>,
  pub created_at:    DateTime<Utc>,
}

impl User {
  pub fn full_name(&self) -> String { format!("{} {}", self.first_name, self.last_name) }

  pub fn can_manage_cases(&self) -> bool {
    matches!(
      self.role,
      Role::Admin
        | Role::CommissionCounsel
        | Role::StaffAttorney
        | Role::Investigator
        | Role::AdminStaff
    )
  }

  pub fn can_publish(&self) -> bool {
    matches!(self.role, Role::Admin | Role::CommissionCounsel)
  }

  pub fn can_view_audit_logs(&self) -> bool {
    matches!(self.role, Role::Admin | Role::Auditor)
  }

  pub fn can_manage_users(&self) -> bool { self.role == Role::Admin }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub id:         String,
  pub user_id:    String,
  pub token:      String,
  pub expires_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl Session {
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool { now > self.expires_at }
}
