//! Errors surfaced at the application boundary

use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
  /// Bad user input; nothing was written
  #[error("{0}")]
  Validation(String),

  #[error("Record store unavailable: {0}")]
  StoreUnavailable(String),

  #[error("Set {0} not found")]
  NotFound(i64),

  #[error("Configuration error: {0}")]
  Config(String),
}

impl From<StoreError> for AppError {
  fn from(e: StoreError) -> Self {
    match e {
      StoreError::NotFound(id) => AppError::NotFound(id),
      StoreError::Unavailable(msg) | StoreError::Decode(msg) => AppError::StoreUnavailable(msg),
    }
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
