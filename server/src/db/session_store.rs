// listshare_server/src/db/session_store.rs

use crate::db::storage_err;
use crate::models::SessionRow;
use async_trait::async_trait;
use listshare::{ListResult, Session, SessionStore};
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgSessionStore {
  pool: PgPool,
}

impl PgSessionStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl SessionStore for PgSessionStore {
  async fn insert_session(&self, session: Session) -> ListResult<()> {
    sqlx::query("INSERT INTO sessions (token, user_id, issued_at, expires_at) VALUES ($1, $2, $3, $4)")
      .bind(&session.token)
      .bind(session.user_id)
      .bind(session.issued_at)
      .bind(session.expires_at)
      .execute(&self.pool)
      .await
      .map_err(storage_err)?;
    Ok(())
  }

  async fn find_session(&self, token: &str) -> ListResult<Option<Session>> {
    let row = sqlx::query_as::<_, SessionRow>(
      "SELECT token, user_id, issued_at, expires_at FROM sessions WHERE token = $1",
    )
    .bind(token)
    .fetch_optional(&self.pool)
    .await
    .map_err(storage_err)?;
    Ok(row.map(Session::from))
  }

  async fn revoke_session(&self, token: &str) -> ListResult<()> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
      .bind(token)
      .execute(&self.pool)
      .await
      .map_err(storage_err)?;
    Ok(())
  }
}
