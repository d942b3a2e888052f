// listshare/src/model/item.rs

use crate::error::{ListError, ListResult};
use crate::model::category::Category;
use crate::model::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

pub type ItemId = Uuid;

pub const MAX_ITEM_NAME_CHARS: usize = 200;
pub const MAX_QUANTITY: u32 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
  pub id: ItemId,
  /// Creator of the item; never changes.
  pub owner_id: UserId,
  pub name: String,
  pub price: f64,
  pub category: Category,
  pub quantity: u32,
  pub is_favorite: bool,
  pub image_ref: String,
  pub created_at: DateTime<Utc>,
}

impl Item {
  pub fn line_total(&self) -> f64 {
    self.price * f64::from(self.quantity)
  }
}

/// Parses a price given either as a JSON number or as text.
///
/// Text may use a comma as decimal separator and carry a trailing `₺` or `TL`.
/// Returns `None` unless the result is finite and non-negative.
pub fn parse_price(raw: &Value) -> Option<f64> {
  let parsed = match raw {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => {
      let trimmed = s.trim();
      let trimmed = trimmed
        .strip_suffix('₺')
        .or_else(|| trimmed.strip_suffix("TL"))
        .unwrap_or(trimmed)
        .trim();
      trimmed.replace(',', ".").parse::<f64>().ok()
    }
    _ => None,
  }?;
  (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

/// Trims `raw` and enforces the non-empty / length rules for item names.
pub fn validate_name(raw: &str) -> ListResult<String> {
  let name = raw.trim();
  if name.is_empty() {
    return Err(ListError::invalid("name must not be empty"));
  }
  if name.chars().count() > MAX_ITEM_NAME_CHARS {
    return Err(ListError::invalid(format!(
      "name must be at most {} characters",
      MAX_ITEM_NAME_CHARS
    )));
  }
  Ok(name.to_string())
}

fn validate_quantity(raw: Option<u32>) -> ListResult<u32> {
  match raw {
    None => Ok(1),
    Some(q) if (1..=MAX_QUANTITY).contains(&q) => Ok(q),
    Some(_) => Err(ListError::invalid(format!(
      "quantity must be between 1 and {}",
      MAX_QUANTITY
    ))),
  }
}

fn validate_price(raw: &Value) -> ListResult<f64> {
  parse_price(raw).ok_or_else(|| ListError::invalid("price must be a non-negative number"))
}

/// Fields supplied when creating an item, as received from a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub price: Value,
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub quantity: Option<u32>,
  #[serde(default)]
  pub image_ref: Option<String>,
  #[serde(default)]
  pub is_favorite: Option<bool>,
}

impl ItemDraft {
  pub fn new(name: impl Into<String>, price: f64) -> Self {
    Self {
      name: name.into(),
      price: Value::from(price),
      ..Self::default()
    }
  }

  pub fn with_category(mut self, category: impl Into<String>) -> Self {
    self.category = Some(category.into());
    self
  }

  pub fn with_quantity(mut self, quantity: u32) -> Self {
    self.quantity = Some(quantity);
    self
  }

  /// True when the client sent a non-blank category (recognized or not).
  pub fn has_category(&self) -> bool {
    self.category.as_deref().is_some_and(|c| !c.trim().is_empty())
  }

  /// Checks every field without consuming the draft.
  pub fn validate(&self) -> ListResult<()> {
    validate_name(&self.name)?;
    validate_price(&self.price)?;
    validate_quantity(self.quantity)?;
    Ok(())
  }

  /// Builds the stored record owned by `owner_id`. Unknown categories become `General`.
  pub fn into_item(self, owner_id: UserId) -> ListResult<Item> {
    Ok(Item {
      id: Uuid::new_v4(),
      owner_id,
      name: validate_name(&self.name)?,
      price: validate_price(&self.price)?,
      category: Category::coerce(self.category.as_deref()),
      quantity: validate_quantity(self.quantity)?,
      is_favorite: self.is_favorite.unwrap_or(false),
      image_ref: self.image_ref.map(|r| r.trim().to_string()).unwrap_or_default(),
      created_at: Utc::now(),
    })
  }
}

/// A partial update as received from a client. Ownership and timestamps are not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
  pub name: Option<String>,
  pub price: Option<Value>,
  pub category: Option<String>,
  pub quantity: Option<u32>,
  pub is_favorite: Option<bool>,
  pub image_ref: Option<String>,
}

impl ItemPatch {
  pub fn favorite(is_favorite: bool) -> Self {
    Self {
      is_favorite: Some(is_favorite),
      ..Self::default()
    }
  }

  pub fn validate(self) -> ListResult<ItemChanges> {
    Ok(ItemChanges {
      name: self.name.as_deref().map(validate_name).transpose()?,
      price: self.price.as_ref().map(validate_price).transpose()?,
      category: self.category.as_deref().map(|c| Category::coerce(Some(c))),
      quantity: self.quantity.map(|q| validate_quantity(Some(q))).transpose()?,
      is_favorite: self.is_favorite,
      image_ref: self.image_ref.map(|r| r.trim().to_string()),
    })
  }
}

/// A validated [`ItemPatch`], ready to be applied by a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
  pub name: Option<String>,
  pub price: Option<f64>,
  pub category: Option<Category>,
  pub quantity: Option<u32>,
  pub is_favorite: Option<bool>,
  pub image_ref: Option<String>,
}

impl ItemChanges {
  pub fn is_empty(&self) -> bool {
    *self == ItemChanges::default()
  }

  pub fn apply_to(&self, item: &mut Item) {
    if let Some(name) = &self.name {
      item.name = name.clone();
    }
    if let Some(price) = self.price {
      item.price = price;
    }
    if let Some(category) = self.category {
      item.category = category;
    }
    if let Some(quantity) = self.quantity {
      item.quantity = quantity;
    }
    if let Some(is_favorite) = self.is_favorite {
      item.is_favorite = is_favorite;
    }
    if let Some(image_ref) = &self.image_ref {
      item.image_ref = image_ref.clone();
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
  #[default]
  #[serde(rename = "date-desc")]
  DateDesc,
  #[serde(rename = "price-asc")]
  PriceAsc,
  #[serde(rename = "price-desc")]
  PriceDesc,
  #[serde(rename = "alpha-asc")]
  AlphaAsc,
}

/// Client-side view options over a scoped list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemQuery {
  #[serde(default)]
  pub search: Option<String>,
  #[serde(default)]
  pub sort: SortOrder,
  #[serde(default)]
  pub favorites_only: bool,
}

impl ItemQuery {
  /// Filters and orders `items`, which arrive newest first.
  pub fn apply(&self, items: Vec<Item>) -> Vec<Item> {
    let needle = self
      .search
      .as_deref()
      .map(|s| s.trim().to_lowercase())
      .filter(|s| !s.is_empty());

    let mut items: Vec<Item> = items
      .into_iter()
      .filter(|item| !self.favorites_only || item.is_favorite)
      .filter(|item| needle.as_ref().map_or(true, |n| item.name.to_lowercase().contains(n)))
      .collect();

    match self.sort {
      SortOrder::DateDesc => items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))),
      SortOrder::PriceAsc => items.sort_by(|a, b| a.price.total_cmp(&b.price)),
      SortOrder::PriceDesc => items.sort_by(|a, b| b.price.total_cmp(&a.price)),
      SortOrder::AlphaAsc => items.sort_by_key(|item| item.name.to_lowercase()),
    }
    items
  }
}

/// Totals over a whole scoped list.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListSummary {
  pub item_count: usize,
  pub favorite_count: usize,
  pub grand_total: f64,
  pub category_totals: BTreeMap<Category, f64>,
}

impl ListSummary {
  pub fn from_items(items: &[Item]) -> Self {
    let mut summary = ListSummary {
      item_count: items.len(),
      ..ListSummary::default()
    };
    for item in items {
      let line = item.line_total();
      summary.grand_total += line;
      if item.is_favorite {
        summary.favorite_count += 1;
      }
      *summary.category_totals.entry(item.category).or_insert(0.0) += line;
    }
    summary
  }
}
