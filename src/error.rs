use serde::Serialize;

use crate::supabase::BackendError;

/// Errors surfaced to the front end by the command layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("Database error: {0}")]
  Database(String),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Cloud features are not configured")]
  BackendNotConfigured,

  /// Carries the action that needed a session, e.g. "post"
  #[error("You must be signed in to {0}.")]
  NotSignedIn(&'static str),

  #[error("{0}")]
  Validation(String),

  #[error(transparent)]
  Backend(#[from] BackendError),
}

impl From<sqlx::Error> for AppError {
  fn from(e: sqlx::Error) -> Self {
    AppError::Database(e.to_string())
  }
}

impl Serialize for AppError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}
