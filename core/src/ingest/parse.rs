// listshare/src/ingest/parse.rs

use crate::error::{ListError, ListResult};
use crate::model::{parse_price, Category, Item, UserId, MAX_ITEM_NAME_CHARS};
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

/// Price given to generated elements whose price is missing or unusable.
pub const DEFAULT_GENERATED_PRICE: f64 = 50.0;
pub const MAX_GENERATED_ITEMS: usize = 50;
pub const MAX_PROMPT_CHARS: usize = 1000;

/// One normalized element of a generated batch.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedItem {
  pub name: String,
  pub category: Category,
  pub price: f64,
}

impl GeneratedItem {
  /// Generated items always start with a quantity of one.
  pub fn into_item(self, owner_id: UserId) -> Item {
    Item {
      id: Uuid::new_v4(),
      owner_id,
      name: self.name,
      price: self.price,
      category: self.category,
      quantity: 1,
      is_favorite: false,
      image_ref: String::new(),
      created_at: Utc::now(),
    }
  }
}

/// Removes a surrounding markdown code fence (with or without a language tag).
pub fn strip_code_fences(text: &str) -> &str {
  let trimmed = text.trim();
  let Some(rest) = trimmed.strip_prefix("```") else {
    return trimmed;
  };
  // Drop the info string (`json`, `JSON`, ...) up to the first newline.
  let body = match rest.find('\n') {
    Some(pos) => &rest[pos + 1..],
    None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
  };
  body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parses the generator's text as a JSON array. Anything else is malformed.
pub fn parse_generated_batch(text: &str) -> ListResult<Vec<Value>> {
  let body = strip_code_fences(text);
  match serde_json::from_str::<Value>(body) {
    Ok(Value::Array(elements)) => Ok(elements),
    Ok(other) => Err(ListError::MalformedGenerationOutput(format!(
      "expected a JSON array, got {}",
      json_kind(&other)
    ))),
    Err(e) => Err(ListError::MalformedGenerationOutput(format!("not valid JSON: {}", e))),
  }
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

/// Normalizes one element. Returns `None` for elements that are not objects or
/// have no usable name.
pub fn normalize_element(element: &Value, default_price: f64) -> Option<GeneratedItem> {
  let fields = element.as_object()?;
  let name: String = fields
    .get("name")
    .and_then(Value::as_str)
    .map(str::trim)
    .filter(|n| !n.is_empty())?
    .chars()
    .take(MAX_ITEM_NAME_CHARS)
    .collect();
  let category = Category::coerce(fields.get("category").and_then(Value::as_str));
  let price = fields.get("price").and_then(parse_price).unwrap_or(default_price);
  Some(GeneratedItem { name, category, price })
}

/// Normalizes every element independently, keeping at most `max_items`.
pub fn normalize_batch(elements: &[Value], default_price: f64, max_items: usize) -> Vec<GeneratedItem> {
  elements
    .iter()
    .filter_map(|element| normalize_element(element, default_price))
    .take(max_items)
    .collect()
}

/// Reads a single category label out of a short free-text reply.
pub fn parse_category_reply(text: &str) -> Option<Category> {
  let body = strip_code_fences(text);
  let label = body.trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '.' | '`'));
  Category::parse(label).or_else(|| {
    // Tolerate a sentence such as "Category: Food".
    body
      .split(|c: char| !c.is_alphabetic())
      .filter(|w| !w.is_empty())
      .find_map(Category::parse)
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn fences_are_stripped_with_or_without_language_tag() {
    assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
    assert_eq!(strip_code_fences("```\n[]\n```\n"), "[]");
    assert_eq!(strip_code_fences("```json[2]```"), "[2]");
    assert_eq!(strip_code_fences("  [3] "), "[3]");
  }

  #[test]
  fn only_arrays_pass_the_parse_gate() {
    assert_eq!(parse_generated_batch("```json\n[{\"name\":\"Tea\"}]\n```").unwrap().len(), 1);
    assert!(matches!(
      parse_generated_batch("{\"name\":\"Tea\"}"),
      Err(ListError::MalformedGenerationOutput(_))
    ));
    assert!(matches!(
      parse_generated_batch("Sure! Here is your list:"),
      Err(ListError::MalformedGenerationOutput(_))
    ));
  }

  #[test]
  fn element_fields_fall_back_independently() {
    let item = normalize_element(&json!({"name": " X ", "category": "Food", "price": "not-a-number"}), 50.0).unwrap();
    assert_eq!(item, GeneratedItem { name: "X".into(), category: Category::Food, price: 50.0 });

    let item = normalize_element(&json!({"name": "Soap", "category": "Weapons", "price": -4}), 50.0).unwrap();
    assert_eq!(item.category, Category::General);
    assert_eq!(item.price, 50.0);

    let item = normalize_element(&json!({"name": "Bread", "category": "gıda", "price": "12,5"}), 50.0).unwrap();
    assert_eq!(item.category, Category::Food);
    assert_eq!(item.price, 12.5);
  }

  #[test]
  fn unusable_elements_are_skipped_not_fatal() {
    let elements = vec![json!("Milk"), json!({"price": 3}), json!({"name": "   "}), json!({"name": "Eggs"})];
    let batch = normalize_batch(&elements, DEFAULT_GENERATED_PRICE, MAX_GENERATED_ITEMS);
    assert_eq!(batch.len(), 1);
    assert_eq!(batch[0].name, "Eggs");
    assert_eq!(batch[0].price, DEFAULT_GENERATED_PRICE);
  }

  #[test]
  fn long_names_and_large_batches_are_capped() {
    let long = "a".repeat(MAX_ITEM_NAME_CHARS + 40);
    let item = normalize_element(&json!({ "name": long }), 1.0).unwrap();
    assert_eq!(item.name.chars().count(), MAX_ITEM_NAME_CHARS);

    let elements: Vec<Value> = (0..80).map(|i| json!({ "name": format!("item {i}") })).collect();
    assert_eq!(normalize_batch(&elements, 1.0, MAX_GENERATED_ITEMS).len(), MAX_GENERATED_ITEMS);
  }

  #[test]
  fn category_reply_is_read_leniently() {
    assert_eq!(parse_category_reply("Food"), Some(Category::Food));
    assert_eq!(parse_category_reply(" \"cleaning\".\n"), Some(Category::Cleaning));
    assert_eq!(parse_category_reply("Category: Electronics"), Some(Category::Electronics));
    assert_eq!(parse_category_reply("I am not sure"), None);
  }
}
