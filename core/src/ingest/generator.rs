// listshare/src/ingest/generator.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What a text generator hands back: either text or a reason it produced none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationReply {
  Ok(String),
  Error(String),
}

impl GenerationReply {
  /// The usable text, or the reason there is none. A blank payload is not usable.
  pub fn into_payload(self) -> Result<String, String> {
    match self {
      GenerationReply::Ok(text) if text.trim().is_empty() => Err("generator returned an empty payload".into()),
      GenerationReply::Ok(text) => Ok(text),
      GenerationReply::Error(reason) => Err(reason),
    }
  }
}

/// Black-box text generation. Implementations report failures through
/// [`GenerationReply::Error`] instead of returning an error type.
#[async_trait]
pub trait TextGenerator: Send + Sync {
  async fn generate(&self, instruction: &str) -> GenerationReply;
}

/// Stand-in used when no generation service is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl TextGenerator for UnconfiguredGenerator {
  async fn generate(&self, _instruction: &str) -> GenerationReply {
    GenerationReply::Error("text generation is not configured".into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reply_wire_shape_is_externally_tagged() {
    let ok: GenerationReply = serde_json::from_str(r#"{"ok":"[]"}"#).unwrap();
    assert_eq!(ok, GenerationReply::Ok("[]".into()));
    let err: GenerationReply = serde_json::from_str(r#"{"error":"quota"}"#).unwrap();
    assert_eq!(err.into_payload(), Err("quota".to_string()));
  }

  #[test]
  fn blank_payload_is_not_usable() {
    assert!(GenerationReply::Ok("  \n".into()).into_payload().is_err());
  }
}
