//! Error types and axum `IntoResponse` implementation.
//!
//! Every error is rendered as `{"error": "<code>", "message": "..."}`; an
//! `already_marked` rejection also carries the recognized `identity`.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use bioattend_core::image::InvalidImage;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("not found: {0}")]
  NotFound(String),
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error(transparent)]
  Workflow(#[from] bioattend_core::Error),
}

impl Error {
  /// Wrap a store error surfaced outside a workflow.
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Workflow(bioattend_core::Error::storage(e))
  }

  /// Stable machine-readable code for the JSON body.
  pub fn code(&self) -> &'static str {
    use bioattend_core::Error as W;
    match self {
      Error::Unauthorized => "unauthorized",
      Error::NotFound(_) => "not_found",
      Error::BadRequest(_) => "bad_request",
      Error::Workflow(e) => match e {
        W::InvalidImage(_) => "invalid_image",
        W::MissingField(_) => "missing_field",
        W::DuplicateIdentifier(_) => "duplicate_identifier",
        W::DuplicateTemplate => "duplicate_template",
        W::IdentityNotRecognized => "identity_not_recognized",
        W::AlreadyMarked { .. } => "already_marked",
        W::Storage(_) => "storage",
      },
    }
  }

  pub fn status(&self) -> StatusCode {
    use bioattend_core::Error as W;
    match self {
      Error::Unauthorized => StatusCode::UNAUTHORIZED,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::Workflow(e) => match e {
        W::InvalidImage(InvalidImage::TooLarge { .. }) => {
          StatusCode::PAYLOAD_TOO_LARGE
        }
        W::InvalidImage(_) | W::MissingField(_) => StatusCode::BAD_REQUEST,
        W::DuplicateIdentifier(_)
        | W::DuplicateTemplate
        | W::AlreadyMarked { .. } => StatusCode::CONFLICT,
        W::IdentityNotRecognized => StatusCode::NOT_FOUND,
        W::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }
}

impl From<JsonRejection> for Error {
  fn from(rejection: JsonRejection) -> Self {
    Error::BadRequest(rejection.body_text())
  }
}

impl From<QueryRejection> for Error {
  fn from(rejection: QueryRejection) -> Self {
    Error::BadRequest(rejection.body_text())
  }
}

impl From<PathRejection> for Error {
  fn from(rejection: PathRejection) -> Self {
    Error::BadRequest(rejection.body_text())
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    let code = self.code();

    let body = match &self {
      Error::Workflow(bioattend_core::Error::AlreadyMarked { identity, date }) => {
        json!({
          "error":    code,
          "message":  self.to_string(),
          "identity": identity,
          "date":     date,
        })
      }
      Error::Workflow(bioattend_core::Error::Storage(e)) => {
        tracing::error!(error = %e, "storage failure");
        json!({ "error": code, "message": self.to_string() })
      }
      _ => json!({ "error": code, "message": self.to_string() }),
    };

    let mut res = (status, Json(body)).into_response();
    if matches!(self, Error::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"bioattend\""),
      );
    }
    res
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use bioattend_core::Error as W;

  #[test]
  fn too_large_maps_to_413() {
    let e = Error::from(W::InvalidImage(InvalidImage::TooLarge {
      size:  10,
      limit: 5,
    }));
    assert_eq!(e.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(e.code(), "invalid_image");
  }

  #[test]
  fn duplicates_map_to_409() {
    assert_eq!(
      Error::from(W::DuplicateIdentifier("R-1".into())).status(),
      StatusCode::CONFLICT
    );
    assert_eq!(Error::from(W::DuplicateTemplate).status(), StatusCode::CONFLICT);
  }

  #[test]
  fn unauthorized_carries_challenge() {
    let res = Error::Unauthorized.into_response();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(header::WWW_AUTHENTICATE));
  }
}
