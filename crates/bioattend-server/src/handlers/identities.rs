//! Handlers for `/api/identities` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/identities` | Body: [`EnrollBody`]; returns 201 + identity |
//! | `GET`    | `/identities` | Ordered by identifier code |
//! | `GET`    | `/identities/{id}` | 404 if not found |
//! | `DELETE` | `/identities/{id}` | Administrator only; removes attendance too |
//! | `GET`    | `/identities/{id}/attendance` | Optional `?limit` (default 30) |
//! | `GET`    | `/identities/{id}/stats` | Count and first/last date |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use bioattend_core::{
  attendance::{AttendanceEvent, AttendanceStats},
  identity::Identity,
  store::AttendanceStore,
  workflow,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  auth::Admin,
  error::Error,
  handlers::{JsonBody, PathParam, QueryParams, decode_image},
};

/// Default number of events returned by the history endpoint.
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

// ─── Enroll ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /identities`. Absent fields read as empty and
/// are reported by the enrollment workflow.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EnrollBody {
  pub name:            String,
  pub identifier_code: String,
  /// Base64-encoded image bytes.
  pub image:           String,
}

/// `POST /identities` — returns 201 + the enrolled [`Identity`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<EnrollBody>,
) -> Result<impl IntoResponse, Error>
where
  S: AttendanceStore + Clone + 'static,
{
  let image = decode_image(&body.image)?;

  let identity = workflow::enroll(
    state.store.as_ref(),
    &state.config.upload,
    &body.name,
    &body.identifier_code,
    &image,
  )
  .await
  .inspect_err(|e| {
    tracing::warn!(identifier_code = %body.identifier_code, error = %e, "enrollment rejected");
  })?;

  tracing::info!(
    identity_id = %identity.identity_id,
    identifier_code = %identity.identifier_code,
    "enrolled identity"
  );
  Ok((StatusCode::CREATED, Json(identity)))
}

// ─── Read ─────────────────────────────────────────────────────────────────────

/// `GET /identities`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Identity>>, Error>
where
  S: AttendanceStore + Clone + 'static,
{
  let identities = state.store.list_identities().await.map_err(Error::store)?;
  Ok(Json(identities))
}

/// `GET /identities/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<Uuid>,
) -> Result<Json<Identity>, Error>
where
  S: AttendanceStore + Clone + 'static,
{
  let identity = state
    .store
    .get_identity(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound(format!("identity {id} not found")))?;
  Ok(Json(identity))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /identities/{id}` — 204 on success, 404 if it did not exist.
pub async fn remove<S>(
  admin: Admin,
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, Error>
where
  S: AttendanceStore + Clone + 'static,
{
  if !state.store.remove_identity(id).await.map_err(Error::store)? {
    return Err(Error::NotFound(format!("identity {id} not found")));
  }
  tracing::info!(
    identity_id = %id,
    admin = %admin.username,
    "removed identity and its attendance"
  );
  Ok(StatusCode::NO_CONTENT)
}

// ─── Attendance of one identity ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub limit: Option<usize>,
}

/// `GET /identities/{id}/attendance[?limit=<n>]` — newest date first.
pub async fn history<S>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<Uuid>,
  QueryParams(params): QueryParams<HistoryParams>,
) -> Result<Json<Vec<AttendanceEvent>>, Error>
where
  S: AttendanceStore + Clone + 'static,
{
  require_identity(&state, id).await?;
  let events = state
    .store
    .attendance_history(id, params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
    .await
    .map_err(Error::store)?;
  Ok(Json(events))
}

/// `GET /identities/{id}/stats`
pub async fn stats<S>(
  State(state): State<AppState<S>>,
  PathParam(id): PathParam<Uuid>,
) -> Result<Json<AttendanceStats>, Error>
where
  S: AttendanceStore + Clone + 'static,
{
  require_identity(&state, id).await?;
  let stats = state.store.attendance_stats(id).await.map_err(Error::store)?;
  Ok(Json(stats))
}

async fn require_identity<S>(state: &AppState<S>, id: Uuid) -> Result<(), Error>
where
  S: AttendanceStore + Clone + 'static,
{
  state
    .store
    .get_identity(id)
    .await
    .map_err(Error::store)?
    .map(|_| ())
    .ok_or_else(|| Error::NotFound(format!("identity {id} not found")))
}
