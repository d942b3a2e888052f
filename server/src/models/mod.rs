// listshare_server/src/models/mod.rs

//! Row types read from PostgreSQL and their conversion into domain records.

pub mod item;
pub mod session;
pub mod user;

pub use session::SessionRow;
