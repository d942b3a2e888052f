// listshare_server/src/services/auth_service.rs

//! Password hashing and opaque bearer sessions.

use crate::errors::AppError;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::Utc;
use listshare::{ListError, Session, SessionStore, UserId};
use rand_core::RngCore;
use tracing::{debug, error, instrument};

const SESSION_TOKEN_BYTES: usize = 32;

/// Hashes a plain-text password using Argon2 with a random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  match Argon2::default().hash_password(password.as_bytes(), &salt) {
    Ok(hash) => Ok(hash.to_string()),
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!("Password hashing process failed: {}", argon_err)))
    }
  }
}

/// `Ok(false)` on a wrong password; `Err` only when the stored hash is unusable.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool, AppError> {
  if provided_password.is_empty() {
    return Ok(false);
  }
  let parsed_hash = PasswordHash::new(stored_hash).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: passwords do not match.");
      Ok(false)
    }
    Err(other) => {
      error!(error = %other, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!("Password verification process failed: {}", other)))
    }
  }
}

/// 256 random bits, hex encoded.
pub fn generate_session_token() -> String {
  let mut bytes = [0u8; SESSION_TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[instrument(name = "auth_service::issue_session", skip(sessions), err(Display))]
pub async fn issue_session(
  sessions: &dyn SessionStore,
  user_id: UserId,
  ttl: chrono::Duration,
) -> Result<Session, AppError> {
  let issued_at = Utc::now();
  let expires_at = issued_at
    .checked_add_signed(ttl)
    .ok_or_else(|| AppError::Config("Session lifetime is out of range.".to_string()))?;
  let session = Session {
    token: generate_session_token(),
    user_id,
    issued_at,
    expires_at,
  };
  sessions.insert_session(session.clone()).await?;
  debug!(expires_at = %session.expires_at, "Session issued.");
  Ok(session)
}

/// Resolves a bearer token to its user. Unknown and expired tokens are
/// rejected alike; expired ones are removed on the way out.
pub async fn authenticate_token(sessions: &dyn SessionStore, token: &str) -> Result<UserId, AppError> {
  let session = sessions.find_session(token).await?.ok_or(ListError::Unauthenticated)?;
  if session.is_expired_at(Utc::now()) {
    sessions.revoke_session(token).await?;
    return Err(ListError::Unauthenticated.into());
  }
  Ok(session.user_id)
}

#[cfg(test)]
mod tests {
  use super::*;
  use listshare::store::MemorySessionStore;
  use uuid::Uuid;

  #[test]
  fn hash_round_trip_and_mismatch() {
    let hash = hash_password("correct horse").unwrap();
    assert!(verify_password(&hash, "correct horse").unwrap());
    assert!(!verify_password(&hash, "wrong horse").unwrap());
    assert!(!verify_password(&hash, "").unwrap());
  }

  #[test]
  fn tokens_are_long_and_distinct() {
    let a = generate_session_token();
    let b = generate_session_token();
    assert_eq!(a.len(), SESSION_TOKEN_BYTES * 2);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
  }

  #[actix_rt::test]
  async fn expired_sessions_are_rejected_and_removed() {
    let sessions = MemorySessionStore::new();
    let user_id = Uuid::new_v4();

    let live = issue_session(&sessions, user_id, chrono::Duration::days(7)).await.unwrap();
    assert_eq!(authenticate_token(&sessions, &live.token).await.unwrap(), user_id);

    let stale = issue_session(&sessions, user_id, chrono::Duration::seconds(-1)).await.unwrap();
    assert!(matches!(
      authenticate_token(&sessions, &stale.token).await,
      Err(AppError::List(ListError::Unauthenticated))
    ));
    assert!(sessions.find_session(&stale.token).await.unwrap().is_none());

    assert!(authenticate_token(&sessions, "nope").await.is_err());
  }

  #[actix_rt::test]
  async fn out_of_range_lifetime_is_an_error_not_a_panic() {
    let sessions = MemorySessionStore::new();
    let issued = issue_session(&sessions, Uuid::new_v4(), chrono::Duration::MAX).await;
    assert!(matches!(issued, Err(AppError::Config(_))));
  }
}
