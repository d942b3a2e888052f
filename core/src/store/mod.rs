// listshare/src/store/mod.rs

//! Persistence ports. Services only talk to these traits; adapters live in
//! [`memory`] (in-process) and in the server crate (PostgreSQL).

pub mod memory;

use crate::error::ListResult;
use crate::model::{Item, ItemChanges, ItemId, NewUser, Session, User, UserId};
use async_trait::async_trait;
use std::collections::HashSet;

pub use memory::{MemoryIdentityStore, MemoryItemStore, MemorySessionStore};

#[async_trait]
pub trait IdentityStore: Send + Sync {
  /// Fails with `EmailTaken` when the (already normalized) email is registered.
  async fn insert_user(&self, new_user: NewUser) -> ListResult<User>;

  async fn find_user(&self, id: UserId) -> ListResult<Option<User>>;

  async fn find_user_by_email(&self, email: &str) -> ListResult<Option<User>>;

  /// Current partners of `id`; empty for unknown users.
  async fn partners_of(&self, id: UserId) -> ListResult<HashSet<UserId>>;

  /// Adds both halves of the edge `a ↔ b` as a single atomic change.
  /// Returns `true` if the edge is new, `false` if it already existed.
  async fn link_partners(&self, a: UserId, b: UserId) -> ListResult<bool>;
}

/// Item persistence. Every non-insert operation is filtered by a set of owner ids.
#[async_trait]
pub trait ItemStore: Send + Sync {
  /// Writes a batch. Adapters may write element by element; a failure part-way
  /// leaves the earlier elements stored.
  async fn insert_items(&self, items: Vec<Item>) -> ListResult<Vec<Item>>;

  /// Items whose owner is in `owners`, newest first.
  async fn list_owned_by(&self, owners: &HashSet<UserId>) -> ListResult<Vec<Item>>;

  /// `None` when no item with `id` has an owner in `owners`.
  async fn update_in_scope(
    &self,
    id: ItemId,
    owners: &HashSet<UserId>,
    changes: &ItemChanges,
  ) -> ListResult<Option<Item>>;

  async fn toggle_favorite_in_scope(&self, id: ItemId, owners: &HashSet<UserId>) -> ListResult<Option<Item>>;

  /// `false` when no item with `id` has an owner in `owners`.
  async fn delete_in_scope(&self, id: ItemId, owners: &HashSet<UserId>) -> ListResult<bool>;

  async fn delete_all_in_scope(&self, owners: &HashSet<UserId>) -> ListResult<u64>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
  async fn insert_session(&self, session: Session) -> ListResult<()>;

  async fn find_session(&self, token: &str) -> ListResult<Option<Session>>;

  async fn revoke_session(&self, token: &str) -> ListResult<()>;
}
