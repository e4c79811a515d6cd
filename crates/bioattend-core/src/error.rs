//! Error types for `bioattend-core`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::{identity::Identity, image::InvalidImage};

/// Everything an enrollment or verification can be rejected with.
///
/// All variants are recoverable: the caller reports them and carries on.
#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid image: {0}")]
  InvalidImage(#[from] InvalidImage),

  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("identifier code {0:?} is already registered")]
  DuplicateIdentifier(String),

  #[error("this image is already enrolled to another identity")]
  DuplicateTemplate,

  #[error("identity not recognized")]
  IdentityNotRecognized,

  #[error(
    "attendance already marked for {} ({}) on {date}",
    .identity.name,
    .identity.identifier_code
  )]
  AlreadyMarked {
    identity: Box<Identity>,
    date:     NaiveDate,
  },

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
