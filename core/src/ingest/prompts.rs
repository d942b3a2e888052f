// listshare/src/ingest/prompts.rs

use crate::model::Category;

pub fn bulk_instruction(request: &str) -> String {
  format!(
    "You help people fill a shopping list.\n\
     Turn the request below into shopping items.\n\
     Reply with a JSON array only, without commentary or markdown. Every element must be an object \
     {{\"name\": string, \"category\": one of {choices}, \"price\": number}} where price is an estimated \
     unit price in Turkish lira.\n\n\
     Request: {request}",
    choices = Category::choices(),
  )
}

pub fn category_instruction(item_name: &str) -> String {
  format!(
    "Classify the shopping item \"{item_name}\" into exactly one of these categories: {choices}.\n\
     Reply with the category word only.",
    choices = Category::choices(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn instructions_name_every_category() {
    let bulk = bulk_instruction("breakfast for four");
    let single = category_instruction("Milk");
    for category in Category::ALL {
      assert!(bulk.contains(category.as_str()));
      assert!(single.contains(category.as_str()));
    }
    assert!(bulk.ends_with("Request: breakfast for four"));
  }
}
