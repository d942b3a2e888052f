// listshare_server/src/state.rs

use crate::config::AppConfig;
use crate::db::{PgIdentityStore, PgItemStore, PgSessionStore};
use crate::errors::AppError;
use listshare::store::MemorySessionStore;
use listshare::{IngestionConfig, PipelineRegistry, Services, SessionStore, TextGenerator};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub services: Services,
  pub sessions: Arc<dyn SessionStore>,
  pub registry: Arc<PipelineRegistry<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  pub fn new(services: Services, sessions: Arc<dyn SessionStore>, config: Arc<AppConfig>) -> Self {
    Self {
      services,
      sessions,
      registry: Arc::new(PipelineRegistry::new()),
      config,
    }
  }

  /// Everything in process memory; state is lost on restart.
  pub fn in_memory(generator: Arc<dyn TextGenerator>, config: Arc<AppConfig>) -> Self {
    let services = Services::in_memory(generator, ingestion_config(&config));
    Self::new(services, Arc::new(MemorySessionStore::new()), config)
  }

  pub fn postgres(pool: PgPool, generator: Arc<dyn TextGenerator>, config: Arc<AppConfig>) -> Self {
    let services = Services::new(
      Arc::new(PgIdentityStore::new(pool.clone())),
      Arc::new(PgItemStore::new(pool.clone())),
      generator,
      ingestion_config(&config),
    );
    Self::new(services, Arc::new(PgSessionStore::new(pool)), config)
  }
}

fn ingestion_config(config: &AppConfig) -> IngestionConfig {
  IngestionConfig {
    timeout: config.generation_timeout(),
    ..IngestionConfig::default()
  }
}
