// tests/common/mod.rs
#![allow(dead_code)] // not every test binary uses every helper

use async_trait::async_trait;
use listshare::{GenerationReply, IngestionConfig, Item, ItemDraft, Services, TextGenerator, User};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Scripted text generator ---

/// Replays queued replies in order, then repeats `fallback`.
pub struct ScriptedGenerator {
  replies: Mutex<VecDeque<GenerationReply>>,
  fallback: GenerationReply,
  delay: Option<Duration>,
  calls: AtomicUsize,
  instructions: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
  pub fn replying(text: &str) -> Self {
    Self::sequence(Vec::new(), GenerationReply::Ok(text.to_string()))
  }

  pub fn failing(reason: &str) -> Self {
    Self::sequence(Vec::new(), GenerationReply::Error(reason.to_string()))
  }

  pub fn sequence(replies: Vec<GenerationReply>, fallback: GenerationReply) -> Self {
    Self {
      replies: Mutex::new(replies.into()),
      fallback,
      delay: None,
      calls: AtomicUsize::new(0),
      instructions: Mutex::new(Vec::new()),
    }
  }

  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = Some(delay);
    self
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  pub fn last_instruction(&self) -> Option<String> {
    self.instructions.lock().last().cloned()
  }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
  async fn generate(&self, instruction: &str) -> GenerationReply {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.instructions.lock().push(instruction.to_string());
    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }
    let next = self.replies.lock().pop_front();
    next.unwrap_or_else(|| self.fallback.clone())
  }
}

// --- Fixtures ---

pub fn test_config() -> IngestionConfig {
  IngestionConfig {
    timeout: Duration::from_millis(200),
    ..IngestionConfig::default()
  }
}

pub fn services_with(generator: Arc<ScriptedGenerator>) -> Services {
  Services::in_memory(generator, test_config())
}

pub fn services() -> Services {
  services_with(Arc::new(ScriptedGenerator::failing("no generator in this test")))
}

pub async fn register(services: &Services, email: &str) -> User {
  services
    .identities
    .register(email, None, "not-a-real-hash".to_string())
    .await
    .expect("registration should succeed")
}

pub async fn add_item(services: &Services, owner: &User, name: &str, price: f64) -> Item {
  services
    .items
    .create(owner.id, ItemDraft::new(name, price))
    .await
    .expect("item creation should succeed")
}

pub async fn names_for(services: &Services, user: &User) -> Vec<String> {
  services
    .items
    .list(user.id, &Default::default())
    .await
    .expect("list should succeed")
    .into_iter()
    .map(|i| i.name)
    .collect()
}
