// tests/ingestion_tests.rs
mod common;

use common::*;
use listshare::ingest::DEFAULT_GENERATED_PRICE;
use listshare::{Category, GenerationReply, ListError};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_generated_batch_is_normalized_and_owned_by_requester() {
  setup_tracing();
  let generator = Arc::new(ScriptedGenerator::replying(
    r#"```json
[
  {"name": "Eggs", "category": "Food", "price": 65},
  {"name": "X", "category": "Food", "price": "not-a-number"},
  {"name": "Sponge", "category": "Kitchenware", "price": "12,5 TL"}
]
```"#,
  ));
  let services = services_with(generator.clone());
  let a = register(&services, "a@example.com").await;

  let created = services.ingestion.bulk_generate(a.id, "  breakfast for two  ").await.unwrap();
  assert_eq!(created.len(), 3);
  assert!(created.iter().all(|i| i.owner_id == a.id && i.quantity == 1));

  let x = created.iter().find(|i| i.name == "X").unwrap();
  assert_eq!(x.price, DEFAULT_GENERATED_PRICE);
  assert_eq!(x.category, Category::Food);

  let sponge = created.iter().find(|i| i.name == "Sponge").unwrap();
  assert_eq!(sponge.category, Category::General);
  assert_eq!(sponge.price, 12.5);

  assert_eq!(names_for(&services, &a).await.len(), 3);
  let instruction = generator.last_instruction().unwrap();
  assert!(instruction.ends_with("Request: breakfast for two"));
}

#[tokio::test]
async fn test_garbage_reply_writes_nothing() {
  setup_tracing();
  let generator = Arc::new(ScriptedGenerator::replying("I'm sorry, I can't help with that."));
  let services = services_with(generator.clone());
  let a = register(&services, "a@example.com").await;

  let result = services.ingestion.bulk_generate(a.id, "party snacks").await;
  assert!(matches!(result, Err(ListError::MalformedGenerationOutput(_))));
  assert_eq!(generator.calls(), 1);
  assert!(names_for(&services, &a).await.is_empty());
}

#[tokio::test]
async fn test_object_reply_is_not_a_batch() {
  setup_tracing();
  let services = services_with(Arc::new(ScriptedGenerator::replying(r#"{"name": "Tea", "price": 5}"#)));
  let a = register(&services, "a@example.com").await;

  let result = services.ingestion.bulk_generate(a.id, "tea").await;
  assert!(matches!(result, Err(ListError::MalformedGenerationOutput(_))));
  assert!(names_for(&services, &a).await.is_empty());
}

#[tokio::test]
async fn test_blank_prompt_never_reaches_generator() {
  setup_tracing();
  let generator = Arc::new(ScriptedGenerator::replying("[]"));
  let services = services_with(generator.clone());
  let a = register(&services, "a@example.com").await;
  add_item(&services, &a, "Existing", 1.0).await;

  for prompt in ["", "   \n\t"] {
    let result = services.ingestion.bulk_generate(a.id, prompt).await;
    assert!(matches!(result, Err(ListError::InvalidPrompt(_))));
  }
  let too_long = "x".repeat(listshare::ingest::MAX_PROMPT_CHARS + 1);
  assert!(matches!(
    services.ingestion.bulk_generate(a.id, &too_long).await,
    Err(ListError::InvalidPrompt(_))
  ));

  assert_eq!(generator.calls(), 0);
  assert_eq!(names_for(&services, &a).await, vec!["Existing".to_string()]);
}

#[tokio::test]
async fn test_generator_failure_is_unavailable() {
  setup_tracing();
  let services = services_with(Arc::new(ScriptedGenerator::failing("quota exceeded")));
  let a = register(&services, "a@example.com").await;

  match services.ingestion.bulk_generate(a.id, "cleaning supplies").await {
    Err(ListError::GenerationUnavailable(reason)) => assert_eq!(reason, "quota exceeded"),
    other => panic!("expected GenerationUnavailable, got {:?}", other),
  }
  assert!(names_for(&services, &a).await.is_empty());
}

#[tokio::test]
async fn test_empty_payload_is_unavailable() {
  setup_tracing();
  let services = services_with(Arc::new(ScriptedGenerator::replying("   ")));
  let a = register(&services, "a@example.com").await;

  let result = services.ingestion.bulk_generate(a.id, "anything").await;
  assert!(matches!(result, Err(ListError::GenerationUnavailable(_))));
}

#[tokio::test]
async fn test_slow_generator_times_out() {
  setup_tracing();
  let generator = ScriptedGenerator::replying(r#"[{"name": "Late", "price": 1}]"#).with_delay(Duration::from_secs(5));
  let services = services_with(Arc::new(generator));
  let a = register(&services, "a@example.com").await;

  let result = services.ingestion.bulk_generate(a.id, "anything").await;
  assert!(matches!(result, Err(ListError::GenerationUnavailable(_))));
  assert!(names_for(&services, &a).await.is_empty());

  // Prediction degrades instead of failing.
  assert_eq!(services.ingestion.predict_category("Milk").await, Category::General);
}

#[tokio::test]
async fn test_empty_array_creates_nothing() {
  setup_tracing();
  let services = services_with(Arc::new(ScriptedGenerator::replying("[]")));
  let a = register(&services, "a@example.com").await;

  let created = services.ingestion.bulk_generate(a.id, "nothing please").await.unwrap();
  assert!(created.is_empty());
}

#[tokio::test]
async fn test_unusable_elements_do_not_abort_the_batch() {
  setup_tracing();
  let services = services_with(Arc::new(ScriptedGenerator::replying(
    r#"[42, "Milk", {"price": 10}, {"name": "  Butter  ", "category": "gıda"}]"#,
  )));
  let a = register(&services, "a@example.com").await;

  let created = services.ingestion.bulk_generate(a.id, "dairy").await.unwrap();
  assert_eq!(created.len(), 1);
  assert_eq!(created[0].name, "Butter");
  assert_eq!(created[0].category, Category::Food);
  assert_eq!(created[0].price, DEFAULT_GENERATED_PRICE);
}

#[tokio::test]
async fn test_predict_category_is_best_effort() {
  setup_tracing();
  let generator = Arc::new(ScriptedGenerator::sequence(
    vec![
      GenerationReply::Ok("Cleaning\n".into()),
      GenerationReply::Ok("Definitely a kitchen thing".into()),
      GenerationReply::Error("503".into()),
    ],
    GenerationReply::Ok("Electronics".into()),
  ));
  let services = services_with(generator.clone());

  assert_eq!(services.ingestion.predict_category("Bleach").await, Category::Cleaning);
  assert_eq!(services.ingestion.predict_category("Spatula").await, Category::General);
  assert_eq!(services.ingestion.predict_category("Phone").await, Category::General);
  assert_eq!(services.ingestion.predict_category("Charger").await, Category::Electronics);
  assert_eq!(generator.calls(), 4);

  // Blank names are not sent at all.
  assert_eq!(services.ingestion.predict_category("  ").await, Category::General);
  assert_eq!(generator.calls(), 4);
}

#[test]
fn test_bulk_pipeline_step_order() {
  let services = services();
  assert_eq!(
    services.ingestion.bulk_pipeline().step_names(),
    vec![
      "validate_prompt",
      "request_generation",
      "parse_generation",
      "normalize_batch",
      "persist_batch"
    ]
  );
}
