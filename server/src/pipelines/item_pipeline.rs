// listshare_server/src/pipelines/item_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::CreateItemCtxData;
use crate::state::AppState;
use listshare::{Pipeline, PipelineCtx, PipelineRegistry, StepControl};
use std::sync::Arc;
use tracing::{event, info, Level};

/// validate → (predict a category when none was sent) → insert.
pub fn register_create_item_pipeline(registry: &Arc<PipelineRegistry<AppError>>, _app_state: &AppState) {
  let mut create_p = Pipeline::<CreateItemCtxData, AppError>::new(
    "create_item",
    &[
      ("validate_item_input", false),
      ("predict_missing_category", true),
      ("insert_item", false),
    ],
  );

  create_p.on_step("validate_item_input", |ctx_data: PipelineCtx<CreateItemCtxData>| async move {
    ctx_data.read().draft.validate()?;
    Ok::<_, AppError>(StepControl::Continue)
  });

  create_p.skip_step_if("predict_missing_category", |data| data.draft.has_category());
  create_p.on_step("predict_missing_category", |ctx_data: PipelineCtx<CreateItemCtxData>| async move {
    let (name, ingestion) = {
      let guard = ctx_data.read();
      (guard.draft.name.clone(), guard.app_state.services.ingestion.clone())
    };

    // Never fails; an unusable prediction comes back as General.
    let category = ingestion.predict_category(&name).await;
    event!(Level::DEBUG, %category, "Category predicted for new item.");
    let mut guard = ctx_data.write();
    guard.draft.category = Some(category.as_str().to_string());
    guard.predicted_category = Some(category);
    Ok::<_, AppError>(StepControl::Continue)
  });

  create_p.on_step("insert_item", |ctx_data: PipelineCtx<CreateItemCtxData>| async move {
    let (user_id, draft, items) = {
      let guard = ctx_data.read();
      (
        guard.authenticated_user_id,
        guard.draft.clone(),
        guard.app_state.services.items.clone(),
      )
    };

    let item = items.create(user_id, draft).await?;
    info!(item_id = %item.id, "Item created.");
    ctx_data.write().created_item = Some(item);
    Ok::<_, AppError>(StepControl::Continue)
  });

  registry.register(create_p);
  tracing::info!("Create-item pipeline registered.");
}
