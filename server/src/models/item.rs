// listshare_server/src/models/item.rs

use chrono::{DateTime, Utc};
use listshare::{Category, Item};
use sqlx::FromRow;
use uuid::Uuid;

pub const ITEM_COLUMNS: &str = "id, owner_id, name, price, category, quantity, is_favorite, image_ref, created_at";

#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
  pub id: Uuid,
  pub owner_id: Uuid,
  pub name: String,
  pub price: f64,
  pub category: String,
  pub quantity: i32,
  pub is_favorite: bool,
  pub image_ref: String,
  pub created_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
  fn from(row: ItemRow) -> Self {
    Item {
      id: row.id,
      owner_id: row.owner_id,
      name: row.name,
      price: row.price,
      // Rows written by older builds may carry labels outside the enumeration.
      category: Category::coerce(Some(&row.category)),
      quantity: u32::try_from(row.quantity).ok().filter(|q| *q > 0).unwrap_or(1),
      is_favorite: row.is_favorite,
      image_ref: row.image_ref,
      created_at: row.created_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_row_values_are_coerced() {
    let row = ItemRow {
      id: Uuid::new_v4(),
      owner_id: Uuid::new_v4(),
      name: "Soap".into(),
      price: 12.0,
      category: "Temizlik".into(),
      quantity: 0,
      is_favorite: false,
      image_ref: String::new(),
      created_at: Utc::now(),
    };
    let item = Item::from(row);
    assert_eq!(item.category, Category::Cleaning);
    assert_eq!(item.quantity, 1);
  }
}
