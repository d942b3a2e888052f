// listshare_server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use listshare::{ListError, PipelineError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error(transparent)]
  List(#[from] ListError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: PipelineError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),

  // A request pipeline ended early without producing its result.
  #[error("Pipeline execution was halted by a handler.")]
  PipelineHaltedByHandler,
}

impl AppError {
  /// Stable machine-readable code sent as the `error` field.
  pub fn code(&self) -> &'static str {
    match self {
      AppError::Validation(_) => "invalid_input",
      AppError::List(list_err) => match list_err {
        ListError::NotFound => "not_found",
        ListError::InvalidInput(_) => "invalid_input",
        ListError::InvalidPrompt(_) => "invalid_prompt",
        ListError::PartnerNotFound => "partner_not_found",
        ListError::SelfShareRejected => "self_share_rejected",
        ListError::EmailTaken => "email_taken",
        ListError::InvalidCredentials => "invalid_credentials",
        ListError::Unauthenticated => "unauthenticated",
        ListError::GenerationUnavailable(_) => "generation_unavailable",
        ListError::MalformedGenerationOutput(_) => "malformed_generation_output",
        ListError::Storage { .. } | ListError::Pipeline { .. } | ListError::Internal(_) => "internal",
      },
      AppError::PipelineHaltedByHandler => "halted",
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Workflow { .. } | AppError::Internal(_) => "internal",
    }
  }

  /// Message shown to clients. Internal faults never expose their detail.
  fn public_message(&self) -> String {
    if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
      "An internal error occurred.".to_string()
    } else {
      self.to_string()
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::List(list_err) => match list_err {
        ListError::NotFound | ListError::PartnerNotFound => StatusCode::NOT_FOUND,
        ListError::InvalidInput(_) | ListError::InvalidPrompt(_) | ListError::SelfShareRejected => {
          StatusCode::BAD_REQUEST
        }
        ListError::EmailTaken => StatusCode::CONFLICT,
        ListError::InvalidCredentials | ListError::Unauthenticated => StatusCode::UNAUTHORIZED,
        ListError::GenerationUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        ListError::MalformedGenerationOutput(_) => StatusCode::BAD_GATEWAY,
        ListError::Storage { .. } | ListError::Pipeline { .. } | ListError::Internal(_) => {
          StatusCode::INTERNAL_SERVER_ERROR
        }
      },
      AppError::PipelineHaltedByHandler => StatusCode::CONFLICT,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::debug!(application_error = %self, "Responding with error");
    }
    HttpResponse::build(status).json(json!({
      "error": self.code(),
      "message": self.public_message(),
    }))
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn list_errors_map_to_distinct_statuses() {
    let cases = [
      (AppError::from(ListError::NotFound), StatusCode::NOT_FOUND),
      (AppError::from(ListError::SelfShareRejected), StatusCode::BAD_REQUEST),
      (AppError::from(ListError::PartnerNotFound), StatusCode::NOT_FOUND),
      (AppError::from(ListError::EmailTaken), StatusCode::CONFLICT),
      (AppError::from(ListError::Unauthenticated), StatusCode::UNAUTHORIZED),
      (AppError::from(ListError::GenerationUnavailable("down".into())), StatusCode::SERVICE_UNAVAILABLE),
      (AppError::from(ListError::MalformedGenerationOutput("junk".into())), StatusCode::BAD_GATEWAY),
    ];
    for (err, status) in cases {
      assert_eq!(err.status_code(), status, "{err}");
    }
  }

  #[test]
  fn internal_detail_is_not_exposed() {
    let err = AppError::from(ListError::storage(anyhow::anyhow!("connection refused to 10.0.0.5")));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.code(), "internal");
    assert_eq!(err.public_message(), "An internal error occurred.");
  }
}
