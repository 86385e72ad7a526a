//! Closed error taxonomy for the API, mapped onto stable HTTP status codes.
//!
//! Every handler returns `Result<_, AppError>`; the body is always `{"error": "<message>"}`.

use axum::{
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("Invalid {field}: {reason}")]
  InvalidField { field: &'static str, reason: String },

  #[error("Email already exists")]
  DuplicateEmail,

  #[error("Invalid email or password")]
  InvalidCredentials,

  #[error("User not found")]
  AccountNotFound,

  #[error("Leaderboard entry not found")]
  LeaderboardEntryNotFound,

  #[error("User progress not found")]
  ProgressNotFound,

  #[error("Video not found")]
  VideoNotFound,

  #[error("Not found")]
  QuestionNotFound,

  #[error("{0}")]
  InvalidUpload(String),

  #[error("{field} exceeds the {limit_bytes} byte limit")]
  PayloadTooLarge { field: &'static str, limit_bytes: usize },

  #[error("Internal error: {0}")]
  Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
  pub fn status(&self) -> StatusCode {
    match self {
      AppError::MissingField(_)
      | AppError::InvalidField { .. }
      | AppError::DuplicateEmail
      | AppError::InvalidCredentials
      | AppError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
      AppError::AccountNotFound
      | AppError::LeaderboardEntryNotFound
      | AppError::ProgressNotFound
      | AppError::VideoNotFound
      | AppError::QuestionNotFound => StatusCode::NOT_FOUND,
      AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
      AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  pub fn internal(context: &str, e: impl std::fmt::Display) -> Self {
    AppError::Internal(format!("{context}: {e}"))
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      error!(target: "paryavaran", error = %self, "Request failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

impl From<std::io::Error> for AppError {
  fn from(e: std::io::Error) -> Self {
    AppError::internal("io", e)
  }
}

// Malformed, mistyped or non-JSON bodies are client errors like any other bad field.
impl From<JsonRejection> for AppError {
  fn from(rejection: JsonRejection) -> Self {
    let reason = match &rejection {
      JsonRejection::MissingJsonContentType(_) => "expected Content-Type: application/json".to_string(),
      _ => rejection.body_text(),
    };
    AppError::InvalidField { field: "request body", reason }
  }
}
