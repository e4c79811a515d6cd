//! Administrator authentication.
//!
//! Destructive routes take an [`Admin`] argument. The extractor reads an
//! `Authorization: Basic` header and checks it against the single
//! administrator account configured for the server.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header::AUTHORIZATION, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use crate::{AppState, error::Error};
use bioattend_core::store::AttendanceStore;

/// The administrator account for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`. Empty disables
  /// every administrative route.
  pub password_hash: String,
}

impl AuthConfig {
  /// Whether `creds` name the administrator and match the stored hash.
  fn admits(&self, creds: &BasicCredentials) -> bool {
    if self.password_hash.is_empty() || creds.username != self.username {
      return false;
    }
    match PasswordHash::new(&self.password_hash) {
      Ok(hash) => Argon2::default()
        .verify_password(creds.password.as_bytes(), &hash)
        .is_ok(),
      Err(e) => {
        tracing::error!(error = %e, "admin_password_hash is not a PHC string");
        false
      }
    }
  }
}

/// A `user:password` pair taken from an `Authorization: Basic` header.
struct BasicCredentials {
  username: String,
  password: String,
}

impl BasicCredentials {
  fn from_headers(headers: &HeaderMap) -> Option<Self> {
    let encoded = headers
      .get(AUTHORIZATION)?
      .to_str()
      .ok()?
      .strip_prefix("Basic ")?;
    let decoded = String::from_utf8(B64.decode(encoded.trim()).ok()?).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some(Self {
      username: username.to_owned(),
      password: password.to_owned(),
    })
  }
}

/// Proof that the request carried the administrator's credentials.
pub struct Admin {
  pub username: String,
}

impl<S> FromRequestParts<AppState<S>> for Admin
where
  S: AttendanceStore + Clone + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let Some(creds) = BasicCredentials::from_headers(&parts.headers) else {
      return Err(Error::Unauthorized);
    };
    if !state.auth.admits(&creds) {
      tracing::warn!(
        uri = %parts.uri,
        username = %creds.username,
        "rejected administrator credentials"
      );
      return Err(Error::Unauthorized);
    }
    Ok(Admin { username: creds.username })
  }
}
