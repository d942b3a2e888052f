// listshare_server/src/models/user.rs

use chrono::{DateTime, Utc};
use listshare::{User, UserId};
use sqlx::FromRow;
use std::collections::BTreeSet;
use uuid::Uuid;

pub const USER_COLUMNS: &str = "id, email, display_name, password_hash, created_at";

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
  pub id: Uuid,
  pub email: String,
  pub display_name: String,
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
}

impl UserRow {
  /// Partners live in their own table and are loaded separately.
  pub fn into_user(self, partners: impl IntoIterator<Item = UserId>) -> User {
    User {
      id: self.id,
      email: self.email,
      display_name: self.display_name,
      credential_hash: self.password_hash,
      partners: partners.into_iter().collect::<BTreeSet<_>>(),
      created_at: self.created_at,
    }
  }
}
