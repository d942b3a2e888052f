// listshare/src/error.rs
use thiserror::Error;

/// Failures raised by the pipeline engine itself rather than by step handlers.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Handler missing for non-optional step '{step_name}' in pipeline '{pipeline}'")]
  HandlerMissing { pipeline: &'static str, step_name: String },

  #[error("No pipeline registered for context type {type_name}")]
  NotRegistered { type_name: &'static str },

  #[error("Context type mismatch during registry dispatch (expected {expected_type})")]
  TypeMismatch { expected_type: &'static str },
}

/// Error taxonomy shared by the identity, scope, item and ingestion services.
///
/// `NotFound` deliberately carries no detail: an item outside the caller's
/// scope is reported exactly like an item that does not exist.
#[derive(Debug, Error)]
pub enum ListError {
  #[error("Resource not found")]
  NotFound,

  #[error("Invalid input: {0}")]
  InvalidInput(String),

  #[error("Invalid prompt: {0}")]
  InvalidPrompt(String),

  #[error("No user is registered with that email")]
  PartnerNotFound,

  #[error("A list cannot be shared with its own owner")]
  SelfShareRejected,

  #[error("An account with this email already exists")]
  EmailTaken,

  #[error("Invalid email or password")]
  InvalidCredentials,

  #[error("Authentication required")]
  Unauthenticated,

  #[error("Text generation unavailable: {0}")]
  GenerationUnavailable(String),

  #[error("Generated output could not be understood: {0}")]
  MalformedGenerationOutput(String),

  #[error("Storage failure: {source}")]
  Storage {
    #[source]
    source: anyhow::Error,
  },

  #[error("Pipeline failure: {source}")]
  Pipeline {
    #[from]
    source: PipelineError,
  },

  #[error("Internal error: {0}")]
  Internal(String),
}

impl ListError {
  /// Wraps an adapter-level failure (database driver, I/O) as a storage fault.
  pub fn storage(err: impl Into<anyhow::Error>) -> Self {
    ListError::Storage { source: err.into() }
  }

  pub fn invalid(msg: impl Into<String>) -> Self {
    ListError::InvalidInput(msg.into())
  }
}

pub type ListResult<T, E = ListError> = std::result::Result<T, E>;
