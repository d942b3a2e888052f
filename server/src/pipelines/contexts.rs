// listshare_server/src/pipelines/contexts.rs

//! Data threaded through the request pipelines. Handlers receive these
//! wrapped in `PipelineCtx`.

use crate::state::AppState;
use listshare::{Category, Item, ItemDraft, Session, User, UserId};

#[derive(Clone)]
pub struct SignupCtxData {
  pub app_state: AppState,
  pub email: String,
  pub display_name: Option<String>,
  pub password: String,
  pub created_user: Option<User>,
}

#[derive(Clone)]
pub struct SigninCtxData {
  pub app_state: AppState,
  pub email: String,
  pub password: String,
  pub user: Option<User>,
  pub session: Option<Session>,
}

#[derive(Clone)]
pub struct CreateItemCtxData {
  pub app_state: AppState,
  pub authenticated_user_id: UserId,
  pub draft: ItemDraft,
  /// Set only when the category was filled in by prediction.
  pub predicted_category: Option<Category>,
  pub created_item: Option<Item>,
}
