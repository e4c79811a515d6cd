//! [`SqliteStore`] — the SQLite implementation of [`AttendanceStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use bioattend_core::{
  attendance::{AttendanceEvent, AttendanceRecord, AttendanceStats},
  identity::{Identity, NewIdentity},
  store::{AttendanceStore, EnrollOutcome, MarkOutcome},
  template::Template,
};

use crate::{
  encode::{
    decode_date, encode_date, encode_dt, encode_uuid, RawEvent, RawIdentity,
    RawRecord, IDENTITY_COLUMNS,
  },
  schema::SCHEMA,
  Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A BioAttend store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All clones
/// share one connection, so a committed write is visible to the next read
/// from any clone.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Flush and close the underlying connection. Other clones of this store
  /// fail every call afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    tracing::debug!("closed sqlite store");
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-row identity lookup on `column`.
  async fn find_identity_by(
    &self,
    column: &'static str,
    value: String,
  ) -> Result<Option<Identity>> {
    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {IDENTITY_COLUMNS} FROM identities WHERE {column} = ?1"
              ),
              rusqlite::params![value],
              RawIdentity::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIdentity::into_identity).transpose()
  }
}

// ─── AttendanceStore impl ────────────────────────────────────────────────────

impl AttendanceStore for SqliteStore {
  type Error = crate::Error;

  // ── Template store ────────────────────────────────────────────────────────

  async fn enroll(&self, input: NewIdentity) -> Result<EnrollOutcome> {
    let identity = Identity {
      identity_id:     Uuid::new_v4(),
      name:            input.name,
      identifier_code: input.identifier_code,
      template:        input.template,
      enrolled_at:     Utc::now(),
    };

    let id_str       = encode_uuid(identity.identity_id);
    let name         = identity.name.clone();
    let code         = identity.identifier_code.clone();
    let template_str = identity.template.as_str().to_owned();
    let at_str       = encode_dt(identity.enrolled_at);

    let outcome = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without committing rolls back.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let code_taken = tx
          .query_row(
            "SELECT 1 FROM identities WHERE identifier_code = ?1",
            rusqlite::params![code],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if code_taken {
          return Ok(EnrollOutcome::DuplicateIdentifier);
        }

        let template_taken = tx
          .query_row(
            "SELECT 1 FROM identities WHERE template = ?1",
            rusqlite::params![template_str],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if template_taken {
          return Ok(EnrollOutcome::DuplicateTemplate);
        }

        tx.execute(
          "INSERT INTO identities
             (identity_id, name, identifier_code, template, enrolled_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, code, template_str, at_str],
        )?;
        tx.commit()?;

        Ok(EnrollOutcome::Enrolled(identity))
      })
      .await?;

    Ok(outcome)
  }

  async fn get_identity(&self, id: Uuid) -> Result<Option<Identity>> {
    self.find_identity_by("identity_id", encode_uuid(id)).await
  }

  async fn find_by_identifier_code(
    &self,
    code: String,
  ) -> Result<Option<Identity>> {
    self.find_identity_by("identifier_code", code).await
  }

  async fn match_template(&self, template: Template) -> Result<Option<Identity>> {
    self
      .find_identity_by("template", template.as_str().to_owned())
      .await
  }

  async fn list_identities(&self) -> Result<Vec<Identity>> {
    let raws: Vec<RawIdentity> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {IDENTITY_COLUMNS} FROM identities ORDER BY identifier_code"
        ))?;
        let rows = stmt
          .query_map([], RawIdentity::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIdentity::into_identity).collect()
  }

  async fn remove_identity(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
          "DELETE FROM attendance_events WHERE identity_id = ?1",
          rusqlite::params![id_str],
        )?;
        let n = tx.execute(
          "DELETE FROM identities WHERE identity_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(n > 0)
      })
      .await?;

    Ok(removed)
  }

  // ── Attendance ledger ─────────────────────────────────────────────────────

  async fn mark_attendance(
    &self,
    template: Template,
    date: NaiveDate,
  ) -> Result<MarkOutcome> {
    let event_id     = Uuid::new_v4();
    let recorded_at  = Utc::now();
    let event_id_str = encode_uuid(event_id);
    let template_str = template.as_str().to_owned();
    let day          = encode_date(date);
    let at_str       = encode_dt(recorded_at);

    // The inner `Result` carries decode failures; returning one skips the
    // commit, so nothing is written.
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let matched = tx
          .query_row(
            &format!(
              "SELECT {IDENTITY_COLUMNS} FROM identities WHERE template = ?1"
            ),
            rusqlite::params![template_str],
            RawIdentity::from_row,
          )
          .optional()?;
        let Some(raw) = matched else {
          return Ok(Ok(MarkOutcome::NotRecognized));
        };
        let identity_id_str = raw.identity_id.clone();
        let identity = match raw.into_identity() {
          Ok(identity) => identity,
          Err(e) => return Ok(Err(e)),
        };

        let already = tx
          .query_row(
            "SELECT 1 FROM attendance_events WHERE identity_id = ?1 AND date = ?2",
            rusqlite::params![identity_id_str, day],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if already {
          return Ok(Ok(MarkOutcome::AlreadyMarked(identity)));
        }

        tx.execute(
          "INSERT INTO attendance_events (event_id, identity_id, date, recorded_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![event_id_str, identity_id_str, day, at_str],
        )?;
        tx.commit()?;

        let event = AttendanceEvent {
          event_id,
          identity_id: identity.identity_id,
          date,
          recorded_at,
        };
        Ok(Ok(MarkOutcome::Marked { identity, event }))
      })
      .await??;

    Ok(outcome)
  }

  async fn attendance_on(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>> {
    let day = encode_date(date);

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT i.identity_id, i.name, i.identifier_code, a.date, a.recorded_at
           FROM attendance_events a
           JOIN identities i ON i.identity_id = a.identity_id
           WHERE a.date = ?1
           ORDER BY i.identifier_code",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![day], |row| {
            Ok(RawRecord {
              identity_id:     row.get(0)?,
              name:            row.get(1)?,
              identifier_code: row.get(2)?,
              date:            row.get(3)?,
              recorded_at:     row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn attendance_history(
    &self,
    identity_id: Uuid,
    limit: usize,
  ) -> Result<Vec<AttendanceEvent>> {
    let id_str    = encode_uuid(identity_id);
    let limit_val = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT event_id, identity_id, date, recorded_at
           FROM attendance_events
           WHERE identity_id = ?1
           ORDER BY date DESC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str, limit_val], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn attendance_stats(&self, identity_id: Uuid) -> Result<AttendanceStats> {
    let id_str = encode_uuid(identity_id);

    let (total, first, last): (i64, Option<i32>, Option<i32>) = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*), MIN(date), MAX(date)
           FROM attendance_events
           WHERE identity_id = ?1",
          rusqlite::params![id_str],
          |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?)
      })
      .await?;

    Ok(AttendanceStats {
      total: total.max(0) as u64,
      first: first.map(decode_date).transpose()?,
      last:  last.map(decode_date).transpose()?,
    })
  }
}
