// listshare/src/identity.rs

use crate::error::{ListError, ListResult};
use crate::model::{NewUser, User, UserId};
use crate::store::IdentityStore;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Result of a successful [`IdentityService::share_link`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareOutcome {
  pub partner_id: UserId,
  /// `false` when the two users were already partners.
  pub newly_linked: bool,
}

/// User records and the partner graph.
#[derive(Clone)]
pub struct IdentityService {
  store: Arc<dyn IdentityStore>,
}

impl IdentityService {
  pub fn new(store: Arc<dyn IdentityStore>) -> Self {
    Self { store }
  }

  pub fn store(&self) -> &Arc<dyn IdentityStore> {
    &self.store
  }

  /// Registers a user. The email is normalized before the uniqueness check.
  #[instrument(name = "IdentityService::register", skip(self, credential_hash), err(Display))]
  pub async fn register(
    &self,
    email: &str,
    display_name: Option<&str>,
    credential_hash: String,
  ) -> ListResult<User> {
    let email = User::normalize_email(email);
    if email.is_empty() || !email.contains('@') {
      return Err(ListError::invalid("a valid email address is required"));
    }
    let display_name = display_name
      .map(str::trim)
      .filter(|n| !n.is_empty())
      .map(str::to_string)
      .unwrap_or_else(|| User::default_display_name(&email));

    let user = self
      .store
      .insert_user(NewUser {
        email,
        display_name,
        credential_hash,
      })
      .await?;
    event!(Level::INFO, user_id = %user.id, "User registered.");
    Ok(user)
  }

  pub async fn find_by_email(&self, email: &str) -> ListResult<Option<User>> {
    self.store.find_user_by_email(&User::normalize_email(email)).await
  }

  pub async fn get(&self, user_id: UserId) -> ListResult<User> {
    self.store.find_user(user_id).await?.ok_or(ListError::NotFound)
  }

  /// Links `requester_id` and the user registered under `partner_email` in both
  /// directions. Repeating the call for the same pair changes nothing.
  #[instrument(name = "IdentityService::share_link", skip(self), err(Display))]
  pub async fn share_link(&self, requester_id: UserId, partner_email: &str) -> ListResult<ShareOutcome> {
    let partner = self
      .find_by_email(partner_email)
      .await?
      .ok_or(ListError::PartnerNotFound)?;
    if partner.id == requester_id {
      return Err(ListError::SelfShareRejected);
    }

    let newly_linked = match self.store.link_partners(requester_id, partner.id).await {
      Ok(added) => added,
      // The partner exists, so a missing user here is the requester.
      Err(ListError::NotFound) => return Err(ListError::Unauthenticated),
      Err(e) => return Err(e),
    };
    event!(Level::INFO, partner_id = %partner.id, newly_linked, "Share link applied.");
    Ok(ShareOutcome {
      partner_id: partner.id,
      newly_linked,
    })
  }
}
