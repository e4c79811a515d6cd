//! Attendance ledger types.
//!
//! An [`AttendanceEvent`] is written once per identity per calendar day and is
//! never updated afterwards. The report types below are read models assembled
//! at query time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::Identity;

// ─── Ledger ──────────────────────────────────────────────────────────────────

/// One verified presence of an identity on a given day.
/// At most one exists per `(identity_id, date)` (enforced by a UNIQUE
/// constraint).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEvent {
  pub event_id:    Uuid,
  pub identity_id: Uuid,
  pub date:        NaiveDate,
  /// Capture time; server-assigned.
  pub recorded_at: DateTime<Utc>,
}

/// The result of a successful verification: who was recognized and the event
/// that was written for them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
  pub identity: Identity,
  pub event:    AttendanceEvent,
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// A ledger row joined with the descriptive fields of its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub identity_id:     Uuid,
  pub name:            String,
  pub identifier_code: String,
  pub date:            NaiveDate,
  pub recorded_at:     DateTime<Utc>,
}

/// Who was present on a given day, with headcounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
  pub date:     NaiveDate,
  /// Ordered by identifier code.
  pub records:  Vec<AttendanceRecord>,
  pub enrolled: usize,
  pub present:  usize,
  pub absent:   usize,
}

impl DailyReport {
  pub fn new(
    date: NaiveDate,
    records: Vec<AttendanceRecord>,
    enrolled: usize,
  ) -> Self {
    let present = records.len();
    Self {
      date,
      records,
      enrolled,
      present,
      absent: enrolled.saturating_sub(present),
    }
  }
}

/// Summary of one identity's attendance over all time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceStats {
  pub total: u64,
  pub first: Option<NaiveDate>,
  pub last:  Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(code: &str) -> AttendanceRecord {
    AttendanceRecord {
      identity_id:     Uuid::new_v4(),
      name:            format!("Student {code}"),
      identifier_code: code.into(),
      date:            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
      recorded_at:     Utc::now(),
    }
  }

  #[test]
  fn daily_report_counts_absentees() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let report = DailyReport::new(date, vec![record("A1"), record("A2")], 5);
    assert_eq!(report.present, 2);
    assert_eq!(report.absent, 3);
  }

  #[test]
  fn daily_report_never_underflows() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let report = DailyReport::new(date, vec![record("A1")], 0);
    assert_eq!(report.absent, 0);
  }
}
