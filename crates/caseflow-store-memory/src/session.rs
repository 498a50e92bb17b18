//! [`MemorySessionStore`]: staff users and login sessions held in memory.

use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use parking_lot::RwLock;

use caseflow_core::{
  store::SessionStore,
  user::{Role, Session, User},
};

use crate::{Error, Result};

#[derive(Default)]
struct Inner {
  /// Keyed by user id.
  users:    HashMap<String, User>,
  /// Keyed by session token.
  sessions: HashMap<String, Session>,
}

#[derive(Clone, Default)]
pub struct MemorySessionStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemorySessionStore {
  pub fn new() -> Self { Self::default() }

  /// A directory holding the single demo administrator,
  /// `demo@ncoe.nv.gov`, with no password hash.
  pub fn with_demo_user() -> Self {
    let store = Self::new();
    let user = User {
      id:            "user_1".to_owned(),
      email:         "demo@ncoe.nv.gov".to_owned(),
      password_hash: None,
      first_name:    "Demo".to_owned(),
      last_name:     "Admin".to_owned(),
      role:          Role::Admin,
      title:         "System Administrator".to_owned(),
      is_active:     true,
      last_login_at: None,
      created_at:    Utc::now(),
    };
    store.inner.write().users.insert(user.id.clone(), user);
    store
  }
}

impl SessionStore for MemorySessionStore {
  type Error = Error;

  async fn find_user_by_email<'a>(&'a self, email: &'a str) -> Result<Option<User>> {
    Ok(
      self
        .inner
        .read()
        .users
        .values()
        .find(|u| u.email.eq_ignore_ascii_case(email))
        .cloned(),
    )
  }

  async fn get_user<'a>(&'a self, id: &'a str) -> Result<Option<User>> {
    Ok(self.inner.read().users.get(id).cloned())
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let mut users: Vec<User> = self.inner.read().users.values().cloned().collect();
    users.sort_by(|a, b| {
      (&a.last_name, &a.first_name, &a.id).cmp(&(&b.last_name, &b.first_name, &b.id))
    });
    Ok(users)
  }

  async fn upsert_user(&self, user: User) -> Result<()> {
    self.inner.write().users.insert(user.id.clone(), user);
    Ok(())
  }

  async fn create_session(&self, session: Session) -> Result<()> {
    let mut inner = self.inner.write();
    if !inner.users.contains_key(&session.user_id) {
      return Err(Error::UserNotFound(session.user_id));
    }
    inner.sessions.insert(session.token.clone(), session);
    Ok(())
  }

  async fn session_by_token<'a>(&'a self, token: &'a str) -> Result<Option<Session>> {
    Ok(self.inner.read().sessions.get(token).cloned())
  }

  async fn delete_session<'a>(&'a self, token: &'a str) -> Result<()> {
    self.inner.write().sessions.remove(token);
    Ok(())
  }
}
