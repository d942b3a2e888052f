// listshare_server/src/pipelines/mod.rs

//! Request pipelines, registered once at startup and dispatched by context type.

use crate::errors::AppError;
use crate::state::AppState;
use listshare::PipelineRegistry;
use std::sync::Arc;

pub mod contexts;
pub mod item_pipeline;
pub mod signin_pipeline;
pub mod signup_pipeline;

pub fn register_all_pipelines(registry: &Arc<PipelineRegistry<AppError>>, app_state: &AppState) {
  tracing::info!("Registering pipelines...");

  signup_pipeline::register_signup_pipeline(registry, app_state);
  signin_pipeline::register_signin_pipeline(registry, app_state);
  item_pipeline::register_create_item_pipeline(registry, app_state);

  tracing::info!(pipelines = ?registry.registered_names(), "All application pipelines registered.");
}
