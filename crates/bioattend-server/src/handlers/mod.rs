pub mod attendance;
pub mod identities;

use axum::extract::{FromRequest, FromRequestParts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use crate::error::Error;

// ─── Extractors ───────────────────────────────────────────────────────────────

/// [`axum::Json`] whose rejection is rendered as an [`Error`] body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// [`axum::extract::Query`] whose rejection is rendered as an [`Error`] body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct QueryParams<T>(pub T);

/// [`axum::extract::Path`] whose rejection is rendered as an [`Error`] body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Error))]
pub struct PathParam<T>(pub T);

/// Decode the base64 `image` field of a request body.
pub(crate) fn decode_image(encoded: &str) -> Result<Vec<u8>, Error> {
  B64
    .decode(encoded.trim())
    .map_err(|_| Error::BadRequest("image is not valid base64".to_string()))
}
