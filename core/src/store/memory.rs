// listshare/src/store/memory.rs

//! In-process adapters backed by `parking_lot` locks. Used by tests and by the
//! server when no database is configured.

use crate::error::{ListError, ListResult};
use crate::model::{Item, ItemChanges, ItemId, NewUser, Session, User, UserId};
use crate::store::{IdentityStore, ItemStore, SessionStore};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, HashSet};
use uuid::Uuid;

#[derive(Default)]
struct IdentityTables {
  users: HashMap<UserId, User>,
  by_email: HashMap<String, UserId>,
}

#[derive(Default)]
pub struct MemoryIdentityStore {
  tables: RwLock<IdentityTables>,
}

impl MemoryIdentityStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
  async fn insert_user(&self, new_user: NewUser) -> ListResult<User> {
    let mut tables = self.tables.write();
    if tables.by_email.contains_key(&new_user.email) {
      return Err(ListError::EmailTaken);
    }
    let user = User {
      id: Uuid::new_v4(),
      email: new_user.email,
      display_name: new_user.display_name,
      credential_hash: new_user.credential_hash,
      partners: BTreeSet::new(),
      created_at: Utc::now(),
    };
    tables.by_email.insert(user.email.clone(), user.id);
    tables.users.insert(user.id, user.clone());
    Ok(user)
  }

  async fn find_user(&self, id: UserId) -> ListResult<Option<User>> {
    Ok(self.tables.read().users.get(&id).cloned())
  }

  async fn find_user_by_email(&self, email: &str) -> ListResult<Option<User>> {
    let tables = self.tables.read();
    Ok(tables.by_email.get(email).and_then(|id| tables.users.get(id)).cloned())
  }

  async fn partners_of(&self, id: UserId) -> ListResult<HashSet<UserId>> {
    Ok(
      self
        .tables
        .read()
        .users
        .get(&id)
        .map(|u| u.partners.iter().copied().collect())
        .unwrap_or_default(),
    )
  }

  async fn link_partners(&self, a: UserId, b: UserId) -> ListResult<bool> {
    // One write guard covers both halves, so no reader ever sees a one-sided edge.
    let mut tables = self.tables.write();
    if !tables.users.contains_key(&a) || !tables.users.contains_key(&b) {
      return Err(ListError::NotFound);
    }
    let mut added = false;
    if let Some(user) = tables.users.get_mut(&a) {
      added |= user.partners.insert(b);
    }
    if let Some(user) = tables.users.get_mut(&b) {
      added |= user.partners.insert(a);
    }
    Ok(added)
  }
}

#[derive(Default)]
pub struct MemoryItemStore {
  items: RwLock<HashMap<ItemId, Item>>,
}

impl MemoryItemStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.items.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.read().is_empty()
  }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
  async fn insert_items(&self, items: Vec<Item>) -> ListResult<Vec<Item>> {
    let mut stored = self.items.write();
    for item in &items {
      stored.insert(item.id, item.clone());
    }
    Ok(items)
  }

  async fn list_owned_by(&self, owners: &HashSet<UserId>) -> ListResult<Vec<Item>> {
    let mut items: Vec<Item> = self
      .items
      .read()
      .values()
      .filter(|item| owners.contains(&item.owner_id))
      .cloned()
      .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    Ok(items)
  }

  async fn update_in_scope(
    &self,
    id: ItemId,
    owners: &HashSet<UserId>,
    changes: &ItemChanges,
  ) -> ListResult<Option<Item>> {
    let mut stored = self.items.write();
    Ok(stored.get_mut(&id).filter(|item| owners.contains(&item.owner_id)).map(|item| {
      changes.apply_to(item);
      item.clone()
    }))
  }

  async fn toggle_favorite_in_scope(&self, id: ItemId, owners: &HashSet<UserId>) -> ListResult<Option<Item>> {
    let mut stored = self.items.write();
    Ok(stored.get_mut(&id).filter(|item| owners.contains(&item.owner_id)).map(|item| {
      item.is_favorite = !item.is_favorite;
      item.clone()
    }))
  }

  async fn delete_in_scope(&self, id: ItemId, owners: &HashSet<UserId>) -> ListResult<bool> {
    let mut stored = self.items.write();
    let in_scope = stored.get(&id).is_some_and(|item| owners.contains(&item.owner_id));
    if in_scope {
      stored.remove(&id);
    }
    Ok(in_scope)
  }

  async fn delete_all_in_scope(&self, owners: &HashSet<UserId>) -> ListResult<u64> {
    let mut stored = self.items.write();
    let before = stored.len();
    stored.retain(|_, item| !owners.contains(&item.owner_id));
    Ok((before - stored.len()) as u64)
  }
}

#[derive(Default)]
pub struct MemorySessionStore {
  sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
  async fn insert_session(&self, session: Session) -> ListResult<()> {
    self.sessions.write().insert(session.token.clone(), session);
    Ok(())
  }

  async fn find_session(&self, token: &str) -> ListResult<Option<Session>> {
    Ok(self.sessions.read().get(token).cloned())
  }

  async fn revoke_session(&self, token: &str) -> ListResult<()> {
    self.sessions.write().remove(token);
    Ok(())
  }
}
