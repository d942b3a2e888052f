// listshare_server/src/web/handlers/share_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct ShareRequestPayload {
  pub email: String,
}

#[instrument(name = "handler::share", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn share_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  req_payload: web::Json<ShareRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let outcome = app_state
    .services
    .identities
    .share_link(auth_user.user_id, &req_payload.email)
    .await?;

  let message = if outcome.newly_linked {
    "List shared."
  } else {
    "List was already shared with this user."
  };
  Ok(HttpResponse::Ok().json(json!({
    "message": message,
    "partnerId": outcome.partner_id,
    "newlyLinked": outcome.newly_linked,
  })))
}
