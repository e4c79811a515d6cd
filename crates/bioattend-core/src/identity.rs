//! Identity — an enrolled person and the template they enrolled with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::template::Template;

/// An enrolled person. Never mutated after enrollment; removed only by an
/// administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub identity_id:     Uuid,
  pub name:            String,
  /// Roll or registration number; unique across the store.
  pub identifier_code: String,
  /// Unique across the store.
  pub template:        Template,
  pub enrolled_at:     DateTime<Utc>,
}

/// Input to [`crate::store::AttendanceStore::enroll`].
/// `identity_id` and `enrolled_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewIdentity {
  pub name:            String,
  pub identifier_code: String,
  pub template:        Template,
}
