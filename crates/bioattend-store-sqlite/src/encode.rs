//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as day numbers
//! counted from 0001-01-01 (day 1), UUIDs as hyphenated lowercase strings and
//! templates as their hex form.

use bioattend_core::{
  attendance::{AttendanceEvent, AttendanceRecord},
  identity::Identity,
  template::Template,
};
use chrono::{DateTime, Datelike as _, NaiveDate, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

/// Day numbers sort in calendar order for every representable date, which
/// `%Y-%m-%d` text does not once the year leaves `0000..=9999`.
pub fn encode_date(d: NaiveDate) -> i32 { d.num_days_from_ce() }

pub fn decode_date(days: i32) -> Result<NaiveDate> {
  NaiveDate::from_num_days_from_ce_opt(days)
    .ok_or_else(|| Error::DateParse(format!("day number {days} is out of range")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Columns selected for every identity read, in [`RawIdentity`] field order.
pub const IDENTITY_COLUMNS: &str =
  "identity_id, name, identifier_code, template, enrolled_at";

/// Raw strings read directly from an `identities` row.
pub struct RawIdentity {
  pub identity_id:     String,
  pub name:            String,
  pub identifier_code: String,
  pub template:        String,
  pub enrolled_at:     String,
}

impl RawIdentity {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      identity_id:     row.get(0)?,
      name:            row.get(1)?,
      identifier_code: row.get(2)?,
      template:        row.get(3)?,
      enrolled_at:     row.get(4)?,
    })
  }

  pub fn into_identity(self) -> Result<Identity> {
    let template = Template::parse(&self.template)
      .ok_or_else(|| Error::MalformedTemplate(self.identity_id.clone()))?;
    Ok(Identity {
      identity_id: decode_uuid(&self.identity_id)?,
      name: self.name,
      identifier_code: self.identifier_code,
      template,
      enrolled_at: decode_dt(&self.enrolled_at)?,
    })
  }
}

/// Raw strings read directly from an `attendance_events` row.
pub struct RawEvent {
  pub event_id:    String,
  pub identity_id: String,
  pub date:        i32,
  pub recorded_at: String,
}

impl RawEvent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event_id:    row.get(0)?,
      identity_id: row.get(1)?,
      date:        row.get(2)?,
      recorded_at: row.get(3)?,
    })
  }

  pub fn into_event(self) -> Result<AttendanceEvent> {
    Ok(AttendanceEvent {
      event_id:    decode_uuid(&self.event_id)?,
      identity_id: decode_uuid(&self.identity_id)?,
      date:        decode_date(self.date)?,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw strings from an `attendance_events` row joined with `identities`.
pub struct RawRecord {
  pub identity_id:     String,
  pub name:            String,
  pub identifier_code: String,
  pub date:            i32,
  pub recorded_at:     String,
}

impl RawRecord {
  pub fn into_record(self) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
      identity_id:     decode_uuid(&self.identity_id)?,
      name:            self.name,
      identifier_code: self.identifier_code,
      date:            decode_date(self.date)?,
      recorded_at:     decode_dt(&self.recorded_at)?,
    })
  }
}
