//! Test fixtures: small encoded images and an in-memory store.

use std::{
  collections::HashMap,
  convert::Infallible,
  io::Cursor,
  sync::Mutex,
};

use chrono::{NaiveDate, Utc};
use ::image::{DynamicImage, ImageFormat as Codec, Rgb, RgbImage};
use uuid::Uuid;

use crate::{
  attendance::{AttendanceEvent, AttendanceRecord, AttendanceStats},
  identity::{Identity, NewIdentity},
  store::{AttendanceStore, EnrollOutcome, MarkOutcome},
  template::Template,
};

// ─── Images ──────────────────────────────────────────────────────────────────

/// A small solid-colour image; both its width and colour depend on `seed`, so
/// distinct seeds always encode to distinct bytes.
fn encode(seed: u8, codec: Codec) -> Vec<u8> {
  let pixel = Rgb([
    seed.wrapping_mul(53),
    seed.wrapping_mul(101),
    seed.wrapping_mul(151),
  ]);
  let image =
    DynamicImage::ImageRgb8(RgbImage::from_pixel(u32::from(seed) + 1, 2, pixel));
  let mut out = Cursor::new(Vec::new());
  image.write_to(&mut out, codec).expect("encode fixture");
  out.into_inner()
}

pub fn png(seed: u8) -> Vec<u8> { encode(seed, Codec::Png) }

pub fn jpeg(seed: u8) -> Vec<u8> { encode(seed, Codec::Jpeg) }

pub fn bmp(seed: u8) -> Vec<u8> { encode(seed, Codec::Bmp) }

pub fn tiff(seed: u8) -> Vec<u8> { encode(seed, Codec::Tiff) }

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct State {
  identities:  HashMap<Uuid, Identity>,
  by_code:     HashMap<String, Uuid>,
  by_template: HashMap<Template, Uuid>,
  events:      Vec<AttendanceEvent>,
}

/// A store whose check-and-write sequences run under one mutex.
#[derive(Default)]
pub struct MemoryStore {
  state: Mutex<State>,
}

impl MemoryStore {
  pub fn identity_count(&self) -> usize {
    self.state.lock().unwrap().identities.len()
  }

  pub fn event_count(&self) -> usize { self.state.lock().unwrap().events.len() }
}

impl AttendanceStore for MemoryStore {
  type Error = Infallible;

  async fn enroll(&self, input: NewIdentity) -> Result<EnrollOutcome, Infallible> {
    let mut state = self.state.lock().unwrap();
    if state.by_code.contains_key(&input.identifier_code) {
      return Ok(EnrollOutcome::DuplicateIdentifier);
    }
    if state.by_template.contains_key(&input.template) {
      return Ok(EnrollOutcome::DuplicateTemplate);
    }
    let identity = Identity {
      identity_id:     Uuid::new_v4(),
      name:            input.name,
      identifier_code: input.identifier_code,
      template:        input.template,
      enrolled_at:     Utc::now(),
    };
    state
      .by_code
      .insert(identity.identifier_code.clone(), identity.identity_id);
    state
      .by_template
      .insert(identity.template.clone(), identity.identity_id);
    state.identities.insert(identity.identity_id, identity.clone());
    Ok(EnrollOutcome::Enrolled(identity))
  }

  async fn get_identity(&self, id: Uuid) -> Result<Option<Identity>, Infallible> {
    Ok(self.state.lock().unwrap().identities.get(&id).cloned())
  }

  async fn find_by_identifier_code(
    &self,
    code: String,
  ) -> Result<Option<Identity>, Infallible> {
    let state = self.state.lock().unwrap();
    Ok(state.by_code.get(&code).map(|id| state.identities[id].clone()))
  }

  async fn match_template(
    &self,
    template: Template,
  ) -> Result<Option<Identity>, Infallible> {
    let state = self.state.lock().unwrap();
    Ok(state.by_template.get(&template).map(|id| state.identities[id].clone()))
  }

  async fn list_identities(&self) -> Result<Vec<Identity>, Infallible> {
    let mut all: Vec<_> =
      self.state.lock().unwrap().identities.values().cloned().collect();
    all.sort_by(|a, b| a.identifier_code.cmp(&b.identifier_code));
    Ok(all)
  }

  async fn remove_identity(&self, id: Uuid) -> Result<bool, Infallible> {
    let mut state = self.state.lock().unwrap();
    let Some(identity) = state.identities.remove(&id) else {
      return Ok(false);
    };
    state.by_code.remove(&identity.identifier_code);
    state.by_template.remove(&identity.template);
    state.events.retain(|e| e.identity_id != id);
    Ok(true)
  }

  async fn mark_attendance(
    &self,
    template: Template,
    date: NaiveDate,
  ) -> Result<MarkOutcome, Infallible> {
    let mut state = self.state.lock().unwrap();
    let Some(identity) = state
      .by_template
      .get(&template)
      .map(|id| state.identities[id].clone())
    else {
      return Ok(MarkOutcome::NotRecognized);
    };
    if state
      .events
      .iter()
      .any(|e| e.identity_id == identity.identity_id && e.date == date)
    {
      return Ok(MarkOutcome::AlreadyMarked(identity));
    }
    let event = AttendanceEvent {
      event_id: Uuid::new_v4(),
      identity_id: identity.identity_id,
      date,
      recorded_at: Utc::now(),
    };
    state.events.push(event.clone());
    Ok(MarkOutcome::Marked { identity, event })
  }

  async fn attendance_on(
    &self,
    date: NaiveDate,
  ) -> Result<Vec<AttendanceRecord>, Infallible> {
    let state = self.state.lock().unwrap();
    let mut records: Vec<_> = state
      .events
      .iter()
      .filter(|e| e.date == date)
      .map(|e| {
        let identity = &state.identities[&e.identity_id];
        AttendanceRecord {
          identity_id:     identity.identity_id,
          name:            identity.name.clone(),
          identifier_code: identity.identifier_code.clone(),
          date:            e.date,
          recorded_at:     e.recorded_at,
        }
      })
      .collect();
    records.sort_by(|a, b| a.identifier_code.cmp(&b.identifier_code));
    Ok(records)
  }

  async fn attendance_history(
    &self,
    identity_id: Uuid,
    limit: usize,
  ) -> Result<Vec<AttendanceEvent>, Infallible> {
    let state = self.state.lock().unwrap();
    let mut events: Vec<_> = state
      .events
      .iter()
      .filter(|e| e.identity_id == identity_id)
      .cloned()
      .collect();
    events.sort_by(|a, b| b.date.cmp(&a.date));
    events.truncate(limit);
    Ok(events)
  }

  async fn attendance_stats(
    &self,
    identity_id: Uuid,
  ) -> Result<AttendanceStats, Infallible> {
    let state = self.state.lock().unwrap();
    let dates = state
      .events
      .iter()
      .filter(|e| e.identity_id == identity_id)
      .map(|e| e.date);
    Ok(AttendanceStats {
      total: dates.clone().count() as u64,
      first: dates.clone().min(),
      last:  dates.max(),
    })
  }
}
