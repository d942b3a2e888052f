// listshare_server/src/services/text_generation.rs

//! Gemini `generateContent` adapter for the core `TextGenerator` port.

use crate::config::AppConfig;
use crate::errors::AppError;
use async_trait::async_trait;
use listshare::{GenerationReply, TextGenerator, UnconfiguredGenerator};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{event, instrument, Level};

pub struct GeminiClient {
  client: Client,
  base_url: String,
  model: String,
  api_key: String,
}

impl GeminiClient {
  pub fn new(config: &AppConfig, api_key: String) -> Result<Self, AppError> {
    let client = Client::builder()
      .timeout(config.generation_timeout())
      .build()
      .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;
    Ok(Self {
      client,
      base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
      model: config.gemini_model.clone(),
      api_key,
    })
  }

  fn endpoint(&self) -> String {
    format!("{}/models/{}:generateContent", self.base_url, self.model)
  }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  #[serde(default)]
  content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
  #[serde(default)]
  text: Option<String>,
}

/// Concatenated text parts of the first candidate, if there is any text.
fn reply_text(response: GenerateContentResponse) -> Option<String> {
  let content = response.candidates.into_iter().next()?.content?;
  let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
  if text.trim().is_empty() {
    None
  } else {
    Some(text)
  }
}

#[async_trait]
impl TextGenerator for GeminiClient {
  #[instrument(name = "GeminiClient::generate", skip_all, fields(model = %self.model))]
  async fn generate(&self, instruction: &str) -> GenerationReply {
    let body = serde_json::json!({
      "contents": [{ "parts": [{ "text": instruction }] }]
    });

    let response = match self
      .client
      .post(self.endpoint())
      .header("x-goog-api-key", &self.api_key)
      .json(&body)
      .send()
      .await
    {
      Ok(response) => response,
      Err(e) => {
        event!(Level::WARN, error = %e, "Generation request failed.");
        return GenerationReply::Error(format!("generation service unreachable: {}", e));
      }
    };

    let status = response.status();
    if !status.is_success() {
      event!(Level::WARN, %status, "Generation service returned an error status.");
      return GenerationReply::Error(format!("generation service responded with {}", status));
    }

    match response.json::<GenerateContentResponse>().await {
      Ok(parsed) => match reply_text(parsed) {
        Some(text) => GenerationReply::Ok(text),
        None => GenerationReply::Error("generation service returned no text".to_string()),
      },
      Err(e) => GenerationReply::Error(format!("unreadable generation response: {}", e)),
    }
  }
}

/// Gemini when an API key is configured, otherwise a generator that always
/// reports itself unavailable.
pub fn build_generator(config: &AppConfig) -> Result<Arc<dyn TextGenerator>, AppError> {
  match &config.gemini_api_key {
    Some(key) => {
      tracing::info!(model = %config.gemini_model, "Text generation enabled.");
      Ok(Arc::new(GeminiClient::new(config, key.clone())?))
    }
    None => {
      tracing::warn!("GEMINI_API_KEY is not set; AI features will report generation as unavailable.");
      Ok(Arc::new(UnconfiguredGenerator))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(raw: &str) -> GenerateContentResponse {
    serde_json::from_str(raw).unwrap()
  }

  #[test]
  fn text_parts_of_first_candidate_are_joined() {
    let response = parse(
      r#"{"candidates": [
        {"content": {"parts": [{"text": "[{\"name\":"}, {"text": "\"Tea\"}]"}], "role": "model"}},
        {"content": {"parts": [{"text": "ignored"}]}}
      ]}"#,
    );
    assert_eq!(reply_text(response).as_deref(), Some(r#"[{"name":"Tea"}]"#));
  }

  #[test]
  fn missing_text_yields_none() {
    assert!(reply_text(parse(r#"{"candidates": []}"#)).is_none());
    assert!(reply_text(parse(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)).is_none());
    assert!(reply_text(parse(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#)).is_none());
  }

  #[test]
  fn endpoint_uses_model_and_trims_base() {
    let config = AppConfig {
      gemini_base_url: "http://localhost:9999/v1beta/".into(),
      gemini_model: "gemini-test".into(),
      ..AppConfig::default()
    };
    let client = GeminiClient::new(&config, "k".into()).unwrap();
    assert_eq!(client.endpoint(), "http://localhost:9999/v1beta/models/gemini-test:generateContent");
  }
}
