// listshare/src/lib.rs

//! listshare: the domain core of a shared shopping-list service.
//!
//! Users own items; two users may link as partners, after which each sees and
//! edits the other's items. Partner links are symmetric and one hop only.
//! Items can also be generated from free text through an external text
//! generator whose replies are validated before anything is stored.
//!
//!  - [`identity`]: registration, lookup and partner linking.
//!  - [`scope`]: the owner set a user may read or mutate.
//!  - [`items`]: scoped item CRUD, summaries, import and export.
//!  - [`ingest`]: prompt-driven bulk generation and category prediction.
//!  - [`pipeline`]: the async step-pipeline engine the flows above run on.
//!  - [`store`]: persistence ports plus in-memory adapters.

pub mod error;
pub mod identity;
pub mod ingest;
pub mod items;
pub mod model;
pub mod pipeline;
pub mod scope;
pub mod store;

pub use crate::error::{ListError, ListResult, PipelineError};
pub use crate::identity::{IdentityService, ShareOutcome};
pub use crate::ingest::{GenerationReply, IngestionConfig, IngestionPipeline, TextGenerator, UnconfiguredGenerator};
pub use crate::items::{ItemService, ListExport};
pub use crate::model::{
  Category, Item, ItemDraft, ItemId, ItemPatch, ItemQuery, ListSummary, Session, SortOrder, User, UserId,
};
pub use crate::pipeline::{Pipeline, PipelineCtx, PipelineOutcome, PipelineRegistry, StepControl};
pub use crate::scope::{Scope, ScopeResolver};
pub use crate::store::{IdentityStore, ItemStore, SessionStore};

use std::sync::Arc;

/// The core services wired over one set of stores.
#[derive(Clone)]
pub struct Services {
  pub identities: IdentityService,
  pub items: ItemService,
  pub ingestion: Arc<IngestionPipeline>,
}

impl Services {
  pub fn new(
    identity_store: Arc<dyn IdentityStore>,
    item_store: Arc<dyn ItemStore>,
    generator: Arc<dyn TextGenerator>,
    ingestion_config: IngestionConfig,
  ) -> Self {
    let identities = IdentityService::new(identity_store.clone());
    let items = ItemService::new(item_store, ScopeResolver::new(identity_store));
    let ingestion = Arc::new(IngestionPipeline::new(generator, items.clone(), ingestion_config));
    Self {
      identities,
      items,
      ingestion,
    }
  }

  /// Services over fresh in-memory stores.
  pub fn in_memory(generator: Arc<dyn TextGenerator>, ingestion_config: IngestionConfig) -> Self {
    Self::new(
      Arc::new(store::MemoryIdentityStore::new()),
      Arc::new(store::MemoryItemStore::new()),
      generator,
      ingestion_config,
    )
  }
}
