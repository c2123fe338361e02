//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Missing, malformed, unknown or expired bearer token.
  #[error("Please sign in to continue")]
  Unauthorized,

  #[error("Invalid email or password")]
  InvalidCredentials,

  #[error("This email is already registered. Please sign in instead.")]
  EmailTaken,

  #[error(transparent)]
  Invalid(#[from] wins_core::Error),

  #[error("password hashing failed: {0}")]
  Hash(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::Unauthorized | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
      Error::EmailTaken => StatusCode::CONFLICT,
      Error::Invalid(_) => StatusCode::BAD_REQUEST,
      Error::Hash(_) | Error::Store(_) => {
        tracing::error!(error = %self, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };

    let mut res = (status, Json(json!({ "error": self.to_string() }))).into_response();
    if matches!(self, Error::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Bearer realm=\"wins\""),
      );
    }
    res
  }
}
