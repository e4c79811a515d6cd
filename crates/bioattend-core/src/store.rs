//! The `AttendanceStore` trait and the outcomes of its guarded writes.
//!
//! The trait is implemented by storage backends (e.g.
//! `bioattend-store-sqlite`). The workflows in [`crate::workflow`] and the HTTP
//! layer depend on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  attendance::{AttendanceEvent, AttendanceRecord, AttendanceStats},
  identity::{Identity, NewIdentity},
  template::Template,
};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// Result of [`AttendanceStore::enroll`]. Rejections leave the store
/// untouched.
#[derive(Debug, Clone)]
pub enum EnrollOutcome {
  Enrolled(Identity),
  DuplicateIdentifier,
  DuplicateTemplate,
}

/// Result of [`AttendanceStore::mark_attendance`]. At most the `Marked`
/// variant has written a row.
#[derive(Debug, Clone)]
pub enum MarkOutcome {
  Marked {
    identity: Identity,
    event:    AttendanceEvent,
  },
  AlreadyMarked(Identity),
  NotRecognized,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a BioAttend storage backend.
///
/// The two guarded writes ([`enroll`](Self::enroll) and
/// [`mark_attendance`](Self::mark_attendance)) must perform their uniqueness
/// checks and the write atomically: concurrent callers touching the same key
/// are serialized and a failed call leaves nothing behind.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AttendanceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Template store ────────────────────────────────────────────────────

  /// Persist a new identity unless its identifier code or template is
  /// already taken.
  fn enroll(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<EnrollOutcome, Self::Error>> + Send + '_;

  /// Retrieve an identity by UUID. Returns `None` if not found.
  fn get_identity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// Retrieve an identity by its identifier code.
  fn find_by_identifier_code(
    &self,
    code: String,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// The matcher: the single identity whose template equals `template`
  /// exactly, if any.
  fn match_template(
    &self,
    template: Template,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;

  /// All identities, ordered by identifier code.
  fn list_identities(
    &self,
  ) -> impl Future<Output = Result<Vec<Identity>, Self::Error>> + Send + '_;

  /// Administrative removal of an identity together with its attendance
  /// events. Returns `false` if the identity did not exist.
  fn remove_identity(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Attendance ledger ─────────────────────────────────────────────────

  /// Match `template` and record attendance for `date` unless the matched
  /// identity already has an event on that day.
  fn mark_attendance(
    &self,
    template: Template,
    date: NaiveDate,
  ) -> impl Future<Output = Result<MarkOutcome, Self::Error>> + Send + '_;

  /// Every event on `date`, joined with its identity and ordered by
  /// identifier code.
  fn attendance_on(
    &self,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + '_;

  /// The most recent `limit` events of one identity, newest date first.
  fn attendance_history(
    &self,
    identity_id: Uuid,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<AttendanceEvent>, Self::Error>> + Send + '_;

  /// Event count and first/last dates of one identity.
  fn attendance_stats(
    &self,
    identity_id: Uuid,
  ) -> impl Future<Output = Result<AttendanceStats, Self::Error>> + Send + '_;
}
