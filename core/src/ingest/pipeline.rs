// listshare/src/ingest/pipeline.rs

use crate::error::{ListError, ListResult};
use crate::ingest::generator::TextGenerator;
use crate::ingest::parse::{
  normalize_batch, parse_category_reply, parse_generated_batch, GeneratedItem, DEFAULT_GENERATED_PRICE,
  MAX_GENERATED_ITEMS, MAX_PROMPT_CHARS,
};
use crate::ingest::prompts;
use crate::items::ItemService;
use crate::model::{Category, Item, UserId};
use crate::pipeline::{Pipeline, PipelineCtx, StepControl};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{event, instrument, Level};

#[derive(Debug, Clone)]
pub struct IngestionConfig {
  /// Upper bound on each generator call.
  pub timeout: Duration,
  pub default_price: f64,
  pub max_items: usize,
}

impl Default for IngestionConfig {
  fn default() -> Self {
    Self {
      timeout: Duration::from_secs(15),
      default_price: DEFAULT_GENERATED_PRICE,
      max_items: MAX_GENERATED_ITEMS,
    }
  }
}

/// State of one bulk-generation run.
#[derive(Debug, Clone)]
pub struct BulkGenerateCtx {
  pub owner_id: UserId,
  pub prompt: String,
  pub raw_reply: Option<String>,
  pub parsed: Vec<Value>,
  pub normalized: Vec<GeneratedItem>,
  pub created: Vec<Item>,
}

impl BulkGenerateCtx {
  pub fn new(owner_id: UserId, prompt: impl Into<String>) -> Self {
    Self {
      owner_id,
      prompt: prompt.into(),
      raw_reply: None,
      parsed: Vec::new(),
      normalized: Vec::new(),
      created: Vec::new(),
    }
  }
}

/// Bulk generation and best-effort category prediction over one generator.
pub struct IngestionPipeline {
  generator: Arc<dyn TextGenerator>,
  config: IngestionConfig,
  bulk: Pipeline<BulkGenerateCtx, ListError>,
}

impl IngestionPipeline {
  pub const BULK_STEPS: [&'static str; 5] = [
    "validate_prompt",
    "request_generation",
    "parse_generation",
    "normalize_batch",
    "persist_batch",
  ];

  pub fn new(generator: Arc<dyn TextGenerator>, items: ItemService, config: IngestionConfig) -> Self {
    let step_defs: Vec<(&str, bool)> = Self::BULK_STEPS.iter().map(|s| (*s, false)).collect();
    let mut bulk: Pipeline<BulkGenerateCtx, ListError> = Pipeline::new("bulk_generate", &step_defs);

    bulk.on_step("validate_prompt", |ctx: PipelineCtx<BulkGenerateCtx>| async move {
      let prompt = validate_prompt(&ctx.read().prompt)?;
      ctx.write().prompt = prompt;
      Ok::<_, ListError>(StepControl::Continue)
    });

    let request_generator = generator.clone();
    let timeout = config.timeout;
    bulk.on_step("request_generation", move |ctx: PipelineCtx<BulkGenerateCtx>| {
      let generator = request_generator.clone();
      async move {
        let instruction = prompts::bulk_instruction(&ctx.read().prompt);
        let text = request_text(generator.as_ref(), &instruction, timeout).await?;
        ctx.write().raw_reply = Some(text);
        Ok::<_, ListError>(StepControl::Continue)
      }
    });

    bulk.on_step("parse_generation", |ctx: PipelineCtx<BulkGenerateCtx>| async move {
      let raw = ctx.write().raw_reply.take().unwrap_or_default();
      let parsed = parse_generated_batch(&raw)?;
      event!(Level::DEBUG, elements = parsed.len(), "Generated batch parsed.");
      ctx.write().parsed = parsed;
      Ok::<_, ListError>(StepControl::Continue)
    });

    let (default_price, max_items) = (config.default_price, config.max_items);
    bulk.on_step("normalize_batch", move |ctx: PipelineCtx<BulkGenerateCtx>| async move {
      let mut guard = ctx.write();
      let data = &mut *guard;
      data.normalized = normalize_batch(&data.parsed, default_price, max_items);
      let skipped = data.parsed.len().saturating_sub(data.normalized.len());
      if skipped > 0 {
        event!(Level::INFO, skipped, kept = data.normalized.len(), "Dropped unusable generated elements.");
      }
      Ok::<_, ListError>(StepControl::Continue)
    });
    bulk.skip_step_if("persist_batch", |data| data.normalized.is_empty());

    bulk.on_step("persist_batch", move |ctx: PipelineCtx<BulkGenerateCtx>| {
      let items = items.clone();
      async move {
        let batch: Vec<Item> = {
          let mut data = ctx.write();
          let owner = data.owner_id;
          std::mem::take(&mut data.normalized)
            .into_iter()
            .map(|generated| generated.into_item(owner))
            .collect()
        };
        let created = items.create_batch(batch).await?;
        ctx.write().created = created;
        Ok::<_, ListError>(StepControl::Continue)
      }
    });

    Self { generator, config, bulk }
  }

  pub fn config(&self) -> &IngestionConfig {
    &self.config
  }

  pub fn bulk_pipeline(&self) -> &Pipeline<BulkGenerateCtx, ListError> {
    &self.bulk
  }

  /// Generates items from `prompt` and stores them with `user_id` as owner.
  ///
  /// Nothing is written unless the generator replied and its reply parsed as
  /// a JSON array.
  #[instrument(name = "IngestionPipeline::bulk_generate", skip(self, prompt), err(Display))]
  pub async fn bulk_generate(&self, user_id: UserId, prompt: &str) -> ListResult<Vec<Item>> {
    let ctx = PipelineCtx::new(BulkGenerateCtx::new(user_id, prompt));
    self.bulk.run(ctx.clone()).await?;
    let created = std::mem::take(&mut ctx.write().created);
    event!(Level::INFO, created = created.len(), "Bulk generation finished.");
    Ok(created)
  }

  /// Asks the generator for a category. Never fails: any problem yields `General`.
  #[instrument(name = "IngestionPipeline::predict_category", skip(self))]
  pub async fn predict_category(&self, item_name: &str) -> Category {
    let name = item_name.trim();
    if name.is_empty() {
      return Category::General;
    }
    let instruction = prompts::category_instruction(name);
    match request_text(self.generator.as_ref(), &instruction, self.config.timeout).await {
      Ok(reply) => parse_category_reply(&reply).unwrap_or_else(|| {
        event!(Level::DEBUG, "Unrecognized category reply, using General.");
        Category::General
      }),
      Err(e) => {
        event!(Level::WARN, error = %e, "Category prediction failed, using General.");
        Category::General
      }
    }
  }
}

fn validate_prompt(raw: &str) -> ListResult<String> {
  let prompt = raw.trim();
  if prompt.is_empty() {
    return Err(ListError::InvalidPrompt("prompt must not be blank".into()));
  }
  if prompt.chars().count() > MAX_PROMPT_CHARS {
    return Err(ListError::InvalidPrompt(format!(
      "prompt must be at most {} characters",
      MAX_PROMPT_CHARS
    )));
  }
  Ok(prompt.to_string())
}

async fn request_text(generator: &dyn TextGenerator, instruction: &str, limit: Duration) -> ListResult<String> {
  match tokio::time::timeout(limit, generator.generate(instruction)).await {
    Ok(reply) => reply.into_payload().map_err(ListError::GenerationUnavailable),
    Err(_) => Err(ListError::GenerationUnavailable(format!(
      "no reply within {} ms",
      limit.as_millis()
    ))),
  }
}
