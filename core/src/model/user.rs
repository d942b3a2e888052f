// listshare/src/model/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

pub type UserId = Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub id: UserId,
  pub email: String,
  pub display_name: String,
  #[serde(skip)] // never leaves the process
  pub credential_hash: String,
  /// Symmetric partner relation: `b ∈ a.partners ⟺ a ∈ b.partners`.
  pub partners: BTreeSet<UserId>,
  pub created_at: DateTime<Utc>,
}

impl User {
  /// Emails are compared and stored trimmed and lower-cased.
  pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
  }

  /// Local part of the email, used when no display name was given.
  pub fn default_display_name(email: &str) -> String {
    email.split('@').next().filter(|s| !s.is_empty()).unwrap_or("User").to_string()
  }
}

/// Input to `IdentityStore::insert_user`. The email must already be normalized.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email: String,
  pub display_name: String,
  pub credential_hash: String,
}

/// An issued bearer credential bound to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub token: String,
  pub user_id: UserId,
  pub issued_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl Session {
  pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
    now >= self.expires_at
  }
}
