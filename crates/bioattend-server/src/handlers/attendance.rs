//! Handlers for `/api/attendance` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/attendance` | Body: [`VerifyBody`]; returns 201 + [`Verification`] |
//! | `GET`  | `/attendance` | Daily report; optional `?date=YYYY-MM-DD` |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use bioattend_core::{
  Error as WorkflowError,
  attendance::{DailyReport, Verification},
  store::AttendanceStore,
  workflow,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
  AppState,
  error::Error,
  handlers::{JsonBody, QueryParams, decode_image},
};

// ─── Verify ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /attendance`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VerifyBody {
  /// Base64-encoded image bytes.
  pub image: String,
  /// Defaults to today.
  pub date:  Option<NaiveDate>,
}

/// `POST /attendance` — match the image and mark attendance.
pub async fn verify<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<VerifyBody>,
) -> Result<impl IntoResponse, Error>
where
  S: AttendanceStore + Clone + 'static,
{
  let image = decode_image(&body.image)?;

  let verification: Verification = workflow::verify(
    state.store.as_ref(),
    &state.config.upload,
    &image,
    body.date,
  )
  .await
  .inspect_err(|e| match e {
    WorkflowError::AlreadyMarked { identity, date } => tracing::info!(
      identity_id = %identity.identity_id,
      %date,
      "attendance already marked"
    ),
    other => tracing::warn!(error = %other, "verification rejected"),
  })?;

  tracing::info!(
    identity_id = %verification.identity.identity_id,
    date = %verification.event.date,
    "marked attendance"
  );
  Ok((StatusCode::CREATED, Json(verification)))
}

// ─── Report ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReportParams {
  pub date: Option<NaiveDate>,
}

/// `GET /attendance[?date=YYYY-MM-DD]`
pub async fn report<S>(
  State(state): State<AppState<S>>,
  QueryParams(params): QueryParams<ReportParams>,
) -> Result<Json<DailyReport>, Error>
where
  S: AttendanceStore + Clone + 'static,
{
  let date = params.date.unwrap_or_else(workflow::today);
  let report = workflow::daily_report(state.store.as_ref(), date).await?;
  Ok(Json(report))
}
