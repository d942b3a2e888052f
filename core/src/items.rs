// listshare/src/items.rs

use crate::error::{ListError, ListResult};
use crate::model::{Item, ItemDraft, ItemId, ItemPatch, ItemQuery, ListSummary, UserId};
use crate::scope::ScopeResolver;
use crate::store::ItemStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// The document returned by [`ItemService::export`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExport {
  pub exported_at: chrono::DateTime<chrono::Utc>,
  pub items: Vec<Item>,
}

/// Scoped CRUD over items. Every operation except creation is gated on the
/// caller's current scope, and out-of-scope targets report `NotFound`.
#[derive(Clone)]
pub struct ItemService {
  items: Arc<dyn ItemStore>,
  scopes: ScopeResolver,
}

impl ItemService {
  pub fn new(items: Arc<dyn ItemStore>, scopes: ScopeResolver) -> Self {
    Self { items, scopes }
  }

  pub fn scopes(&self) -> &ScopeResolver {
    &self.scopes
  }

  pub fn store(&self) -> &Arc<dyn ItemStore> {
    &self.items
  }

  #[instrument(name = "ItemService::list", skip(self, query), err(Display))]
  pub async fn list(&self, user_id: UserId, query: &ItemQuery) -> ListResult<Vec<Item>> {
    let scope = self.scopes.resolve(user_id).await?;
    let items = self.items.list_owned_by(&scope.owners).await?;
    Ok(query.apply(items))
  }

  /// Creates an item owned by `user_id`, never by a partner.
  #[instrument(name = "ItemService::create", skip(self, draft), err(Display))]
  pub async fn create(&self, user_id: UserId, draft: ItemDraft) -> ListResult<Item> {
    let item = draft.into_item(user_id)?;
    let mut stored = self.items.insert_items(vec![item]).await?;
    let item = stored
      .pop()
      .ok_or_else(|| ListError::Internal("store returned no item for a single insert".into()))?;
    event!(Level::DEBUG, item_id = %item.id, "Item created.");
    Ok(item)
  }

  /// Writes already-built items as one batch. Callers guarantee ownership.
  pub async fn create_batch(&self, items: Vec<Item>) -> ListResult<Vec<Item>> {
    if items.is_empty() {
      return Ok(items);
    }
    self.items.insert_items(items).await
  }

  #[instrument(name = "ItemService::update", skip(self, patch), err(Display))]
  pub async fn update(&self, user_id: UserId, item_id: ItemId, patch: ItemPatch) -> ListResult<Item> {
    let changes = patch.validate()?;
    let scope = self.scopes.resolve(user_id).await?;
    self
      .items
      .update_in_scope(item_id, &scope.owners, &changes)
      .await?
      .ok_or(ListError::NotFound)
  }

  #[instrument(name = "ItemService::toggle_favorite", skip(self), err(Display))]
  pub async fn toggle_favorite(&self, user_id: UserId, item_id: ItemId) -> ListResult<Item> {
    let scope = self.scopes.resolve(user_id).await?;
    self
      .items
      .toggle_favorite_in_scope(item_id, &scope.owners)
      .await?
      .ok_or(ListError::NotFound)
  }

  #[instrument(name = "ItemService::delete", skip(self), err(Display))]
  pub async fn delete(&self, user_id: UserId, item_id: ItemId) -> ListResult<()> {
    let scope = self.scopes.resolve(user_id).await?;
    if self.items.delete_in_scope(item_id, &scope.owners).await? {
      Ok(())
    } else {
      Err(ListError::NotFound)
    }
  }

  /// Removes every item in the caller's scope, partners' items included.
  #[instrument(name = "ItemService::clear", skip(self), err(Display))]
  pub async fn clear(&self, user_id: UserId) -> ListResult<u64> {
    let scope = self.scopes.resolve(user_id).await?;
    let removed = self.items.delete_all_in_scope(&scope.owners).await?;
    event!(Level::INFO, removed, "Scoped list cleared.");
    Ok(removed)
  }

  pub async fn summary(&self, user_id: UserId) -> ListResult<ListSummary> {
    let items = self.list(user_id, &ItemQuery::default()).await?;
    Ok(ListSummary::from_items(&items))
  }

  pub async fn export(&self, user_id: UserId) -> ListResult<ListExport> {
    Ok(ListExport {
      exported_at: chrono::Utc::now(),
      items: self.list(user_id, &ItemQuery::default()).await?,
    })
  }

  /// Validates every record before writing any of them.
  #[instrument(name = "ItemService::import", skip(self, drafts), fields(count = drafts.len()), err(Display))]
  pub async fn import(&self, user_id: UserId, drafts: Vec<ItemDraft>) -> ListResult<Vec<Item>> {
    let items = drafts
      .into_iter()
      .enumerate()
      .map(|(index, draft)| {
        draft.into_item(user_id).map_err(|e| match e {
          ListError::InvalidInput(reason) => ListError::InvalidInput(format!("record {index}: {reason}")),
          other => other,
        })
      })
      .collect::<ListResult<Vec<_>>>()?;
    self.create_batch(items).await
  }
}
