//! Enrollment and verification — the two operations that mutate the store.
//!
//! Both run the upload through the [`UploadPolicy`] and the template extractor
//! first, then hand the template to a single guarded store write, so a
//! rejected call never leaves a partial row behind.

use chrono::{Local, NaiveDate};

use crate::{
  Error, Result,
  attendance::{DailyReport, Verification},
  identity::{Identity, NewIdentity},
  image::UploadPolicy,
  store::{AttendanceStore, EnrollOutcome, MarkOutcome},
  template,
};

/// Today's date in the server's local time zone.
pub fn today() -> NaiveDate { Local::now().date_naive() }

/// Enroll a new identity from an uploaded image.
///
/// Checks run in this order: required fields, identifier code, image, then
/// template uniqueness. The identifier-code and template checks are repeated
/// atomically with the write by [`AttendanceStore::enroll`].
pub async fn enroll<S: AttendanceStore>(
  store: &S,
  policy: &UploadPolicy,
  name: &str,
  identifier_code: &str,
  image: &[u8],
) -> Result<Identity> {
  let name = name.trim();
  let identifier_code = identifier_code.trim();
  if name.is_empty() {
    return Err(Error::MissingField("name"));
  }
  if identifier_code.is_empty() {
    return Err(Error::MissingField("identifier_code"));
  }

  if store
    .find_by_identifier_code(identifier_code.to_owned())
    .await
    .map_err(Error::storage)?
    .is_some()
  {
    return Err(Error::DuplicateIdentifier(identifier_code.to_owned()));
  }

  let template = template::extract(policy, image)?;

  let input = NewIdentity {
    name: name.to_owned(),
    identifier_code: identifier_code.to_owned(),
    template,
  };
  match store.enroll(input).await.map_err(Error::storage)? {
    EnrollOutcome::Enrolled(identity) => Ok(identity),
    EnrollOutcome::DuplicateIdentifier => {
      Err(Error::DuplicateIdentifier(identifier_code.to_owned()))
    }
    EnrollOutcome::DuplicateTemplate => Err(Error::DuplicateTemplate),
  }
}

/// Mark attendance for whoever enrolled with this exact image.
///
/// `date` defaults to [`today`].
pub async fn verify<S: AttendanceStore>(
  store: &S,
  policy: &UploadPolicy,
  image: &[u8],
  date: Option<NaiveDate>,
) -> Result<Verification> {
  let template = template::extract(policy, image)?;
  let date = date.unwrap_or_else(today);

  match store
    .mark_attendance(template, date)
    .await
    .map_err(Error::storage)?
  {
    MarkOutcome::Marked { identity, event } => {
      Ok(Verification { identity, event })
    }
    MarkOutcome::AlreadyMarked(identity) => Err(Error::AlreadyMarked {
      identity: Box::new(identity),
      date,
    }),
    MarkOutcome::NotRecognized => Err(Error::IdentityNotRecognized),
  }
}

/// Attendance for one day with present/absent headcounts.
pub async fn daily_report<S: AttendanceStore>(
  store: &S,
  date: NaiveDate,
) -> Result<DailyReport> {
  let records = store.attendance_on(date).await.map_err(Error::storage)?;
  let enrolled = store.list_identities().await.map_err(Error::storage)?.len();
  Ok(DailyReport::new(date, records, enrolled))
}
