// listshare_server/src/db/identity_store.rs

use crate::db::storage_err;
use crate::models::user::{UserRow, USER_COLUMNS};
use async_trait::async_trait;
use listshare::model::NewUser;
use listshare::{IdentityStore, ListError, ListResult, User, UserId};
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::{event, instrument, Level};
use uuid::Uuid;

#[derive(Clone)]
pub struct PgIdentityStore {
  pool: PgPool,
}

impl PgIdentityStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn with_partners(&self, row: Option<UserRow>) -> ListResult<Option<User>> {
    match row {
      Some(row) => {
        let partners = self.partners_of(row.id).await?;
        Ok(Some(row.into_user(partners)))
      }
      None => Ok(None),
    }
  }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
  #[instrument(name = "PgIdentityStore::insert_user", skip_all, err(Display))]
  async fn insert_user(&self, new_user: NewUser) -> ListResult<User> {
    let sql = format!(
      "INSERT INTO users (id, email, display_name, password_hash) VALUES ($1, $2, $3, $4) RETURNING {}",
      USER_COLUMNS
    );
    let inserted = sqlx::query_as::<_, UserRow>(&sql)
      .bind(Uuid::new_v4())
      .bind(&new_user.email)
      .bind(&new_user.display_name)
      .bind(&new_user.credential_hash)
      .fetch_one(&self.pool)
      .await;

    match inserted {
      Ok(row) => Ok(row.into_user(std::iter::empty())),
      Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(ListError::EmailTaken),
      Err(e) => Err(storage_err(e)),
    }
  }

  async fn find_user(&self, id: UserId) -> ListResult<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    let row = sqlx::query_as::<_, UserRow>(&sql)
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(storage_err)?;
    self.with_partners(row).await
  }

  async fn find_user_by_email(&self, email: &str) -> ListResult<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
    let row = sqlx::query_as::<_, UserRow>(&sql)
      .bind(email)
      .fetch_optional(&self.pool)
      .await
      .map_err(storage_err)?;
    self.with_partners(row).await
  }

  async fn partners_of(&self, id: UserId) -> ListResult<HashSet<UserId>> {
    let partners = sqlx::query_scalar::<_, Uuid>("SELECT partner_id FROM user_partners WHERE user_id = $1")
      .bind(id)
      .fetch_all(&self.pool)
      .await
      .map_err(storage_err)?;
    Ok(partners.into_iter().collect())
  }

  /// Both directed rows go in one transaction; `ON CONFLICT DO NOTHING` makes
  /// concurrent or repeated links converge on the same pair of rows.
  /// Rows are always written lower id first, whichever side asked, so two
  /// opposite shares queue on the same key instead of deadlocking.
  #[instrument(name = "PgIdentityStore::link_partners", skip(self), err(Display))]
  async fn link_partners(&self, a: UserId, b: UserId) -> ListResult<bool> {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let mut tx = self.pool.begin().await.map_err(storage_err)?;
    let mut inserted = 0;
    for (user_id, partner_id) in [(lo, hi), (hi, lo)] {
      let result = sqlx::query(
        "INSERT INTO user_partners (user_id, partner_id) VALUES ($1, $2) ON CONFLICT (user_id, partner_id) DO NOTHING",
      )
      .bind(user_id)
      .bind(partner_id)
      .execute(&mut *tx)
      .await;
      match result {
        Ok(done) => inserted += done.rows_affected(),
        Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => return Err(ListError::NotFound),
        Err(e) => return Err(storage_err(e)),
      }
    }
    tx.commit().await.map_err(storage_err)?;
    event!(Level::DEBUG, rows = inserted, "Partner rows written.");
    Ok(inserted > 0)
  }
}
