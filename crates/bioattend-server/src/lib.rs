//! HTTP layer for BioAttend.
//!
//! Exposes an axum [`Router`] serving the JSON API under `/api`, backed by any
//! [`AttendanceStore`]. Images travel base64-encoded inside JSON bodies.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;

pub use config::ServerConfig;
pub use error::Error;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::get,
};
use bioattend_core::store::AttendanceStore;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;
use handlers::{attendance, identities};

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: AttendanceStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: AttendanceStore + Clone + 'static,
{
  let body_limit = state.config.body_limit();

  Router::new()
    .route(
      "/api/identities",
      get(identities::list::<S>).post(identities::create::<S>),
    )
    .route(
      "/api/identities/{id}",
      get(identities::get_one::<S>).delete(identities::remove::<S>),
    )
    .route("/api/identities/{id}/attendance", get(identities::history::<S>))
    .route("/api/identities/{id}/stats",      get(identities::stats::<S>))
    .route(
      "/api/attendance",
      get(attendance::report::<S>).post(attendance::verify::<S>),
    )
    .layer(DefaultBodyLimit::max(body_limit))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
