// listshare_server/src/web/handlers/mod.rs

pub mod ai_handlers;
pub mod auth_handlers;
pub mod item_handlers;
pub mod share_handlers;

use listshare::{User, UserId};
use serde::Serialize;

/// Public view of a user. The credential hash never leaves the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
  pub id: UserId,
  pub name: String,
  pub email: String,
  pub partners: Vec<UserId>,
}

impl From<User> for UserView {
  fn from(user: User) -> Self {
    UserView {
      id: user.id,
      name: user.display_name,
      email: user.email,
      partners: user.partners.into_iter().collect(),
    }
  }
}
