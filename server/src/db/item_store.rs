// listshare_server/src/db/item_store.rs

use crate::db::storage_err;
use crate::models::item::{ItemRow, ITEM_COLUMNS};
use async_trait::async_trait;
use listshare::model::ItemChanges;
use listshare::{Item, ItemId, ItemStore, ListResult, UserId};
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::instrument;

#[derive(Clone)]
pub struct PgItemStore {
  pool: PgPool,
}

impl PgItemStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

fn owner_list(owners: &HashSet<UserId>) -> Vec<UserId> {
  owners.iter().copied().collect()
}

#[async_trait]
impl ItemStore for PgItemStore {
  #[instrument(name = "PgItemStore::insert_items", skip_all, fields(count = items.len()), err(Display))]
  async fn insert_items(&self, items: Vec<Item>) -> ListResult<Vec<Item>> {
    let sql = format!(
      "INSERT INTO items (id, owner_id, name, price, category, quantity, is_favorite, image_ref, created_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
      ITEM_COLUMNS
    );
    let mut tx = self.pool.begin().await.map_err(storage_err)?;
    let mut stored = Vec::with_capacity(items.len());
    for item in items {
      let row = sqlx::query_as::<_, ItemRow>(&sql)
        .bind(item.id)
        .bind(item.owner_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.category.as_str())
        .bind(item.quantity as i32)
        .bind(item.is_favorite)
        .bind(&item.image_ref)
        .bind(item.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_err)?;
      stored.push(Item::from(row));
    }
    tx.commit().await.map_err(storage_err)?;
    Ok(stored)
  }

  async fn list_owned_by(&self, owners: &HashSet<UserId>) -> ListResult<Vec<Item>> {
    let sql = format!(
      "SELECT {} FROM items WHERE owner_id = ANY($1) ORDER BY created_at DESC, id DESC",
      ITEM_COLUMNS
    );
    let rows = sqlx::query_as::<_, ItemRow>(&sql)
      .bind(owner_list(owners))
      .fetch_all(&self.pool)
      .await
      .map_err(storage_err)?;
    Ok(rows.into_iter().map(Item::from).collect())
  }

  async fn update_in_scope(
    &self,
    id: ItemId,
    owners: &HashSet<UserId>,
    changes: &ItemChanges,
  ) -> ListResult<Option<Item>> {
    let sql = format!(
      "UPDATE items SET \
         name = COALESCE($3, name), \
         price = COALESCE($4, price), \
         category = COALESCE($5, category), \
         quantity = COALESCE($6, quantity), \
         is_favorite = COALESCE($7, is_favorite), \
         image_ref = COALESCE($8, image_ref) \
       WHERE id = $1 AND owner_id = ANY($2) RETURNING {}",
      ITEM_COLUMNS
    );
    let row = sqlx::query_as::<_, ItemRow>(&sql)
      .bind(id)
      .bind(owner_list(owners))
      .bind(changes.name.as_deref())
      .bind(changes.price)
      .bind(changes.category.map(|c| c.as_str()))
      .bind(changes.quantity.map(|q| q as i32))
      .bind(changes.is_favorite)
      .bind(changes.image_ref.as_deref())
      .fetch_optional(&self.pool)
      .await
      .map_err(storage_err)?;
    Ok(row.map(Item::from))
  }

  async fn toggle_favorite_in_scope(&self, id: ItemId, owners: &HashSet<UserId>) -> ListResult<Option<Item>> {
    let sql = format!(
      "UPDATE items SET is_favorite = NOT is_favorite WHERE id = $1 AND owner_id = ANY($2) RETURNING {}",
      ITEM_COLUMNS
    );
    let row = sqlx::query_as::<_, ItemRow>(&sql)
      .bind(id)
      .bind(owner_list(owners))
      .fetch_optional(&self.pool)
      .await
      .map_err(storage_err)?;
    Ok(row.map(Item::from))
  }

  async fn delete_in_scope(&self, id: ItemId, owners: &HashSet<UserId>) -> ListResult<bool> {
    let done = sqlx::query("DELETE FROM items WHERE id = $1 AND owner_id = ANY($2)")
      .bind(id)
      .bind(owner_list(owners))
      .execute(&self.pool)
      .await
      .map_err(storage_err)?;
    Ok(done.rows_affected() > 0)
  }

  async fn delete_all_in_scope(&self, owners: &HashSet<UserId>) -> ListResult<u64> {
    let done = sqlx::query("DELETE FROM items WHERE owner_id = ANY($1)")
      .bind(owner_list(owners))
      .execute(&self.pool)
      .await
      .map_err(storage_err)?;
    Ok(done.rows_affected())
  }
}
