// listshare_server/src/pipelines/signup_pipeline.rs

use crate::errors::AppError;
use crate::pipelines::contexts::SignupCtxData;
use crate::services::auth_service;
use crate::state::AppState;
use listshare::{ListError, Pipeline, PipelineCtx, PipelineRegistry, StepControl, User};
use std::sync::Arc;
use tracing::{event, info, warn, Level};

pub const MIN_PASSWORD_CHARS: usize = 8;

pub fn register_signup_pipeline(registry: &Arc<PipelineRegistry<AppError>>, _app_state: &AppState) {
  let mut signup_p = Pipeline::<SignupCtxData, AppError>::new(
    "signup",
    &[
      ("validate_signup_input", false),
      ("check_existing_user_signup", false),
      ("create_user_in_db", false),
    ],
  );

  signup_p.on_step("validate_signup_input", |ctx_data: PipelineCtx<SignupCtxData>| async move {
    let (email, password_chars) = {
      let guard = ctx_data.read();
      (User::normalize_email(&guard.email), guard.password.chars().count())
    };

    event!(Level::DEBUG, email = %email, "Validating signup input.");
    if email.is_empty() || !email.contains('@') {
      warn!("Invalid email format provided for signup.");
      return Err(AppError::Validation("Valid email is required.".to_string()));
    }
    if password_chars < MIN_PASSWORD_CHARS {
      warn!("Password too short for signup ({} chars).", password_chars);
      return Err(AppError::Validation(format!(
        "Password must be at least {} characters long.",
        MIN_PASSWORD_CHARS
      )));
    }
    ctx_data.write().email = email;
    Ok::<_, AppError>(StepControl::Continue)
  });

  signup_p.on_step("check_existing_user_signup", |ctx_data: PipelineCtx<SignupCtxData>| async move {
    let (email, identities) = {
      let guard = ctx_data.read();
      (guard.email.clone(), guard.app_state.services.identities.clone())
    };

    if identities.find_by_email(&email).await?.is_some() {
      warn!("Attempt to sign up with an existing email.");
      return Err(AppError::from(ListError::EmailTaken));
    }
    Ok::<_, AppError>(StepControl::Continue)
  });

  signup_p.on_step("create_user_in_db", |ctx_data: PipelineCtx<SignupCtxData>| async move {
    let (email, display_name, password, identities) = {
      let guard = ctx_data.read();
      (
        guard.email.clone(),
        guard.display_name.clone(),
        guard.password.clone(),
        guard.app_state.services.identities.clone(),
      )
    };

    let hashed_password = auth_service::hash_password(&password)?;
    // A concurrent signup for the same email still fails here with EmailTaken.
    let user = identities.register(&email, display_name.as_deref(), hashed_password).await?;
    info!(user_id = %user.id, "User created successfully.");
    ctx_data.write().created_user = Some(user);
    Ok::<_, AppError>(StepControl::Continue)
  });

  registry.register(signup_p);
  tracing::info!("Sign-up pipeline registered.");
}
