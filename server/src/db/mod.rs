// listshare_server/src/db/mod.rs

//! PostgreSQL adapters for the persistence ports of the core crate.

pub mod identity_store;
pub mod item_store;
pub mod session_store;

pub use identity_store::PgIdentityStore;
pub use item_store::PgItemStore;
pub use session_store::PgSessionStore;

use listshare::ListError;

pub(crate) fn storage_err(err: sqlx::Error) -> ListError {
  tracing::error!(error = %err, "Database operation failed.");
  ListError::storage(err)
}
