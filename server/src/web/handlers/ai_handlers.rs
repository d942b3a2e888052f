// listshare_server/src/web/handlers/ai_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct GenerateRequestPayload {
  #[serde(default)]
  pub prompt: String,
}

#[derive(Deserialize, Debug)]
pub struct PredictCategoryRequestPayload {
  #[serde(default)]
  pub name: String,
}

#[instrument(name = "handler::bulk_generate", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn bulk_generate_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<GenerateRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let items = app_state
    .services
    .ingestion
    .bulk_generate(auth_user.user_id, &req_payload.prompt)
    .await?;
  info!(created = items.len(), "Items generated from prompt.");
  Ok(HttpResponse::Created().json(json!({
    "count": items.len(),
    "items": items,
  })))
}

/// Best-effort: always answers with a category.
#[instrument(name = "handler::predict_category", skip_all, fields(user_id = %_auth_user.user_id))]
pub async fn predict_category_handler(
  app_state: web::Data<AppState>,
  _auth_user: AuthenticatedUser,
  req_payload: web::Json<PredictCategoryRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let category = app_state.services.ingestion.predict_category(&req_payload.name).await;
  Ok(HttpResponse::Ok().json(json!({ "category": category })))
}
