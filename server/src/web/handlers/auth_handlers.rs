// listshare_server/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use listshare::{PipelineCtx, PipelineOutcome};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::pipelines::contexts::{SigninCtxData, SignupCtxData};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use crate::web::handlers::UserView;

#[derive(Deserialize, Debug)]
pub struct RegisterRequestPayload {
  pub email: String,
  pub password: String,
  #[serde(default)]
  pub name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequestPayload {
  pub email: String,
  pub password: String,
}

#[instrument(name = "handler::register", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let ctx_data = PipelineCtx::new(SignupCtxData {
    app_state: app_state.get_ref().clone(),
    email: payload.email,
    display_name: payload.name,
    password: payload.password,
    created_user: None,
  });

  match app_state.registry.run(ctx_data.clone()).await? {
    PipelineOutcome::Completed => {
      let user = ctx_data.write().created_user.take().ok_or_else(|| {
        warn!("Signup pipeline completed but no user was created.");
        AppError::Internal("Signup completed without creating a user.".to_string())
      })?;
      info!(user_id = %user.id, "Signup successful.");
      Ok(HttpResponse::Created().json(json!({
        "message": "User created successfully.",
        "user": UserView::from(user),
      })))
    }
    PipelineOutcome::Stopped => Err(AppError::PipelineHaltedByHandler),
  }
}

#[instrument(name = "handler::login", skip(app_state, req_payload), fields(req_email = %req_payload.email))]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();
  let ctx_data = PipelineCtx::new(SigninCtxData {
    app_state: app_state.get_ref().clone(),
    email: payload.email,
    password: payload.password,
    user: None,
    session: None,
  });

  match app_state.registry.run(ctx_data.clone()).await? {
    PipelineOutcome::Completed => {
      let (user, session) = {
        let mut guard = ctx_data.write();
        (guard.user.take(), guard.session.take())
      };
      let (user, session) = user
        .zip(session)
        .ok_or_else(|| AppError::Internal("Signin completed without a session.".to_string()))?;
      info!(user_id = %user.id, "Signin successful.");
      Ok(HttpResponse::Ok().json(json!({
        "token": session.token,
        "expiresAt": session.expires_at,
        "user": UserView::from(user),
      })))
    }
    PipelineOutcome::Stopped => Err(AppError::PipelineHaltedByHandler),
  }
}

#[instrument(name = "handler::logout", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn logout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state.sessions.revoke_session(&auth_user.token).await?;
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::me", skip_all, fields(user_id = %auth_user.user_id))]
pub async fn me_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = app_state.services.identities.get(auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(UserView::from(user)))
}
