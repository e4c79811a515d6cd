//! Error type for `bioattend-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored template is not 64 lowercase hex characters.
  #[error("malformed template in row {0}")]
  MalformedTemplate(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
