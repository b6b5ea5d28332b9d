//! Structured error types for the incident builder.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IncidentError {
  #[error("invalid window: {minutes} minutes (must be positive)")]
  InvalidWindow { minutes: i64 },

  #[error("io: {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("read: {0}")]
  Read(#[from] std::io::Error),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl IncidentError {
  pub fn invalid_window(minutes: i64) -> Self {
    Self::InvalidWindow { minutes }
  }

  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }
}
