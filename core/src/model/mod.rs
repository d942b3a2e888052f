// listshare/src/model/mod.rs

//! Domain records shared by the stores, services and the HTTP surface.

pub mod category;
pub mod item;
pub mod user;

pub use category::Category;
pub use item::{
  parse_price, validate_name, Item, ItemChanges, ItemDraft, ItemId, ItemPatch, ItemQuery, ListSummary, SortOrder,
  MAX_ITEM_NAME_CHARS, MAX_QUANTITY,
};
pub use user::{NewUser, Session, User, UserId};
