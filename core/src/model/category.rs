// listshare/src/model/category.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed category enumeration. Anything outside it is coerced to `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Category {
  #[default]
  General,
  Food,
  Cleaning,
  Electronics,
  Clothing,
}

impl Category {
  pub const ALL: [Category; 5] = [
    Category::General,
    Category::Food,
    Category::Cleaning,
    Category::Electronics,
    Category::Clothing,
  ];

  /// Canonical wire label.
  pub fn as_str(self) -> &'static str {
    match self {
      Category::General => "General",
      Category::Food => "Food",
      Category::Cleaning => "Cleaning",
      Category::Electronics => "Electronics",
      Category::Clothing => "Clothing",
    }
  }

  /// Label used by the Turkish-language clients.
  pub fn localized_label(self) -> &'static str {
    match self {
      Category::General => "Genel",
      Category::Food => "Gıda",
      Category::Cleaning => "Temizlik",
      Category::Electronics => "Teknoloji",
      Category::Clothing => "Giyim",
    }
  }

  /// Recognizes a canonical or localized label, ignoring case and surrounding whitespace.
  pub fn parse(raw: &str) -> Option<Category> {
    let wanted = raw.trim().to_lowercase();
    if wanted.is_empty() {
      return None;
    }
    Category::ALL.into_iter().find(|c| {
      c.as_str().to_lowercase() == wanted || c.localized_label().to_lowercase() == wanted
    })
  }

  /// `parse`, falling back to `General` for missing or unrecognized labels.
  pub fn coerce(raw: Option<&str>) -> Category {
    raw.and_then(Category::parse).unwrap_or_default()
  }

  /// `label | label | ...`, as used in generation instructions.
  pub fn choices() -> String {
    Category::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(" | ")
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_canonical_and_localized_labels() {
    assert_eq!(Category::parse("Food"), Some(Category::Food));
    assert_eq!(Category::parse("  electronics "), Some(Category::Electronics));
    assert_eq!(Category::parse("Gıda"), Some(Category::Food));
    assert_eq!(Category::parse("TEMIZLIK"), Some(Category::Cleaning));
    assert_eq!(Category::parse("GIDA"), None); // dotted and dotless i are distinct letters
    assert_eq!(Category::parse("Giyim"), Some(Category::Clothing));
  }

  #[test]
  fn unknown_or_missing_labels_coerce_to_general() {
    assert_eq!(Category::coerce(Some("Nonexistent")), Category::General);
    assert_eq!(Category::coerce(Some("")), Category::General);
    assert_eq!(Category::coerce(None), Category::General);
    assert_eq!(Category::coerce(Some("Clothing")), Category::Clothing);
  }

  #[test]
  fn serializes_as_canonical_label() {
    assert_eq!(serde_json::to_string(&Category::Cleaning).unwrap(), "\"Cleaning\"");
  }
}
