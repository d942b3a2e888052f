// listshare_server/src/models/session.rs

use chrono::{DateTime, Utc};
use listshare::Session;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
  pub token: String,
  pub user_id: Uuid,
  pub issued_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
  fn from(row: SessionRow) -> Self {
    Session {
      token: row.token,
      user_id: row.user_id,
      issued_at: row.issued_at,
      expires_at: row.expires_at,
    }
  }
}
