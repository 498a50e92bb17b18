//! [`AuthService`]: staff login, session validation and password hashing.

use std::sync::Arc;

use argon2::{
  Argon2,
  password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use rand_core::RngCore as _;
use tracing::{info, warn};
use uuid::Uuid;

use caseflow_core::{
  store::SessionStore,
  user::{Role, Session, User},
};

use crate::{Error, Result};

pub const DEFAULT_SESSION_TTL: Duration = Duration::minutes(30);

/// Hash a staff password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| caseflow_core::Error::PasswordHash(e.to_string()).into())
}

/// Check `password` against a PHC string. Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
  PasswordHash::new(hash).is_ok_and(|parsed| {
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok()
  })
}

/// 32 random bytes, hex encoded.
fn generate_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

pub struct AuthService<U> {
  users:     Arc<U>,
  demo_mode: bool,
  ttl:       Duration,
}

impl<U> Clone for AuthService<U> {
  fn clone(&self) -> Self {
    Self {
      users:     Arc::clone(&self.users),
      demo_mode: self.demo_mode,
      ttl:       self.ttl,
    }
  }
}

impl<U: SessionStore> AuthService<U> {
  pub fn new(users: Arc<U>) -> Self {
    Self { users, demo_mode: false, ttl: DEFAULT_SESSION_TTL }
  }

  /// In demo mode accounts without a password hash accept any password, and
  /// unknown emails are registered as administrators on first login.
  pub fn with_demo_mode(mut self, demo_mode: bool) -> Self {
    self.demo_mode = demo_mode;
    self
  }

  pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  pub fn session_ttl(&self) -> Duration { self.ttl }

  /// Check credentials without opening a session.
  pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
    let existing = self
      .users
      .find_user_by_email(email)
      .await
      .map_err(Error::store)?;

    let user = match existing {
      Some(user) => user,
      None if self.demo_mode => self.register_demo_user(email).await?,
      None => return Err(caseflow_core::Error::InvalidCredentials.into()),
    };

    if !user.is_active {
      return Err(caseflow_core::Error::InvalidCredentials.into());
    }
    let verified = match &user.password_hash {
      Some(hash) => verify_password(password, hash),
      None => self.demo_mode,
    };
    if !verified {
      warn!(email, "rejected staff login");
      return Err(caseflow_core::Error::InvalidCredentials.into());
    }
    Ok(user)
  }

  /// Authenticate and open a session.
  pub async fn login(&self, email: &str, password: &str) -> Result<(Session, User)> {
    let mut user = self.authenticate(email, password).await?;

    let now = Utc::now();
    user.last_login_at = Some(now);
    self
      .users
      .upsert_user(user.clone())
      .await
      .map_err(Error::store)?;

    let session = Session {
      id:         generate_token(),
      user_id:    user.id.clone(),
      token:      generate_token(),
      expires_at: now + self.ttl,
      created_at: now,
    };
    self
      .users
      .create_session(session.clone())
      .await
      .map_err(Error::store)?;

    info!(user = %user.id, email = %user.email, "staff login");
    Ok((session, user))
  }

  /// The user behind a live session. Expired sessions are removed.
  pub async fn validate_session(&self, token: &str) -> Result<User> {
    let session = self
      .users
      .session_by_token(token)
      .await
      .map_err(Error::store)?
      .ok_or(caseflow_core::Error::InvalidSession)?;

    if session.is_expired(Utc::now()) {
      self.logout(token).await?;
      return Err(caseflow_core::Error::SessionExpired.into());
    }

    self
      .users
      .get_user(&session.user_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| caseflow_core::Error::UserNotFound(session.user_id.clone()).into())
  }

  pub async fn list_users(&self) -> Result<Vec<User>> {
    self.users.list_users().await.map_err(Error::store)
  }

  pub async fn logout(&self, token: &str) -> Result<()> {
    self.users.delete_session(token).await.map_err(Error::store)
  }

  async fn register_demo_user(&self, email: &str) -> Result<User> {
    let user = User {
      id:            format!("user_{}", Uuid::new_v4().simple()),
      email:         email.to_owned(),
      password_hash: None,
      first_name:    "Demo".to_owned(),
      last_name:     "User".to_owned(),
      role:          Role::Admin,
      title:         String::new(),
      is_active:     true,
      last_login_at: None,
      created_at:    Utc::now(),
    };
    self
      .users
      .upsert_user(user.clone())
      .await
      .map_err(Error::store)?;
    info!(email, "registered demo user");
    Ok(user)
  }
}
