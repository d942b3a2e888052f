// listshare_server/src/pipelines/signin_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::SigninCtxData;
use crate::services::auth_service;
use crate::state::AppState;
use listshare::{ListError, Pipeline, PipelineCtx, PipelineRegistry, StepControl};
use std::sync::Arc;
use tracing::{event, info, warn, Level};

/// Every failure past input validation is reported as `InvalidCredentials`,
/// whichever check failed.
pub fn register_signin_pipeline(registry: &Arc<PipelineRegistry<AppError>>, _app_state: &AppState) {
  let mut signin_p = Pipeline::<SigninCtxData, AppError>::new(
    "signin",
    &[
      ("validate_signin_input", false),
      ("fetch_user_by_email_signin", false),
      ("verify_user_password_signin", false),
      ("issue_session_token_signin", false),
    ],
  );

  signin_p.on_step("validate_signin_input", |ctx_data: PipelineCtx<SigninCtxData>| async move {
    let (email_is_empty, password_is_empty) = {
      let guard = ctx_data.read();
      (guard.email.trim().is_empty(), guard.password.is_empty())
    };
    if email_is_empty || password_is_empty {
      warn!("Sign-in attempted with missing email or password.");
      return Err(AppError::Validation("Email and password are required.".to_string()));
    }
    Ok::<_, AppError>(StepControl::Continue)
  });

  signin_p.on_step("fetch_user_by_email_signin", |ctx_data: PipelineCtx<SigninCtxData>| async move {
    let (email, identities) = {
      let guard = ctx_data.read();
      (guard.email.clone(), guard.app_state.services.identities.clone())
    };

    match identities.find_by_email(&email).await? {
      Some(user) => {
        ctx_data.write().user = Some(user);
        Ok::<_, AppError>(StepControl::Continue)
      }
      None => {
        event!(Level::DEBUG, "No user registered with the provided email.");
        Err(AppError::from(ListError::InvalidCredentials))
      }
    }
  });

  signin_p.on_step("verify_user_password_signin", |ctx_data: PipelineCtx<SigninCtxData>| async move {
    let (stored_hash, password) = {
      let guard = ctx_data.read();
      let hash = guard.user.as_ref().map(|u| u.credential_hash.clone());
      (hash, guard.password.clone())
    };
    let stored_hash = stored_hash.ok_or_else(|| AppError::Internal("User not loaded before verification.".into()))?;

    if auth_service::verify_password(&stored_hash, &password)? {
      Ok::<_, AppError>(StepControl::Continue)
    } else {
      warn!("Password mismatch during sign-in.");
      Err(AppError::from(ListError::InvalidCredentials))
    }
  });

  signin_p.on_step("issue_session_token_signin", |ctx_data: PipelineCtx<SigninCtxData>| async move {
    let (user_id, sessions, ttl) = {
      let guard = ctx_data.read();
      (
        guard.user.as_ref().map(|u| u.id),
        guard.app_state.sessions.clone(),
        guard.app_state.config.session_ttl(),
      )
    };
    let user_id = user_id.ok_or_else(|| AppError::Internal("User not loaded before token issue.".into()))?;
    let ttl = ttl?;

    let session = auth_service::issue_session(sessions.as_ref(), user_id, ttl).await?;
    info!(user_id = %user_id, "Session issued for sign-in.");
    ctx_data.write().session = Some(session);
    Ok::<_, AppError>(StepControl::Continue)
  });

  registry.register(signin_p);
  tracing::info!("Sign-in pipeline registered.");
}
