// listshare_server/src/web/handlers/item_handlers.rs

use actix_web::{web, HttpResponse};
use listshare::{ItemDraft, ItemId, ItemPatch, ItemQuery, PipelineCtx, PipelineOutcome};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::CreateItemCtxData;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::list_items", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_items_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  query: web::Query<ItemQuery>,
) -> Result<HttpResponse, AppError> {
  let items = app_state.services.items.list(auth_user.user_id, &query).await?;
  Ok(HttpResponse::Ok().json(items))
}

#[instrument(name = "handler::create_item", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn create_item_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<ItemDraft>,
) -> Result<HttpResponse, AppError> {
  let ctx_data = PipelineCtx::new(CreateItemCtxData {
    app_state: app_state.get_ref().clone(),
    authenticated_user_id: auth_user.user_id,
    draft: req_payload.into_inner(),
    predicted_category: None,
    created_item: None,
  });

  match app_state.registry.run(ctx_data.clone()).await? {
    PipelineOutcome::Completed => {
      let (item, predicted) = {
        let mut guard = ctx_data.write();
        (guard.created_item.take(), guard.predicted_category)
      };
      let item = item.ok_or_else(|| {
        warn!("Create-item pipeline completed but no item was stored.");
        AppError::Internal("Item creation completed without an item.".to_string())
      })?;
      if let Some(category) = predicted {
        info!(%category, "Category was filled in by prediction.");
      }
      Ok(HttpResponse::Created().json(item))
    }
    PipelineOutcome::Stopped => Err(AppError::PipelineHaltedByHandler),
  }
}

#[instrument(name = "handler::update_item", skip(app_state, auth_user, req_payload), fields(user_id = %auth_user.user_id))]
pub async fn update_item_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  item_id: web::Path<ItemId>,
  req_payload: web::Json<ItemPatch>,
) -> Result<HttpResponse, AppError> {
  let item = app_state
    .services
    .items
    .update(auth_user.user_id, item_id.into_inner(), req_payload.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(item))
}

#[instrument(name = "handler::toggle_favorite", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn toggle_favorite_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  item_id: web::Path<ItemId>,
) -> Result<HttpResponse, AppError> {
  let item = app_state
    .services
    .items
    .toggle_favorite(auth_user.user_id, item_id.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(item))
}

#[instrument(name = "handler::delete_item", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn delete_item_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  item_id: web::Path<ItemId>,
) -> Result<HttpResponse, AppError> {
  app_state
    .services
    .items
    .delete(auth_user.user_id, item_id.into_inner())
    .await?;
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::clear_items", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn clear_items_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let removed = app_state.services.items.clear(auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "removed": removed })))
}

pub async fn summary_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let summary = app_state.services.items.summary(auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(summary))
}

pub async fn export_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let export = app_state.services.items.export(auth_user.user_id).await?;
  Ok(
    HttpResponse::Ok()
      .insert_header(("Content-Disposition", "attachment; filename=\"shopping-list.json\""))
      .json(export),
  )
}

/// Accepts either a bare array of records or an export document.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum ImportPayload {
  Records(Vec<ItemDraft>),
  Export { items: Vec<ItemDraft> },
}

#[instrument(name = "handler::import", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn import_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<ImportPayload>,
) -> Result<HttpResponse, AppError> {
  let records = match req_payload.into_inner() {
    ImportPayload::Records(records) | ImportPayload::Export { items: records } => records,
  };
  let imported = app_state.services.items.import(auth_user.user_id, records).await?;
  Ok(HttpResponse::Created().json(json!({
    "imported": imported.len(),
    "items": imported,
  })))
}
