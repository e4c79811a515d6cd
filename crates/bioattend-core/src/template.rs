//! Template extraction — the stand-in for biometric feature extraction.
//!
//! A template is the SHA-256 digest of the uploaded bytes. Two uploads match
//! only if they are byte-identical; there is no similarity measure.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::image::{InvalidImage, UploadPolicy};

/// Length of a template in its hex form.
pub const TEMPLATE_HEX_LEN: usize = 64;

/// Opaque, fixed-length template: 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template(String);

impl Template {
  /// Digest `bytes` without any validation.
  pub fn digest(bytes: &[u8]) -> Self {
    Self(hex::encode(Sha256::digest(bytes)))
  }

  /// Accept a previously computed template, e.g. one read back from storage.
  /// Returns `None` unless `s` is 64 lowercase hex characters.
  pub fn parse(s: &str) -> Option<Self> {
    let well_formed = s.len() == TEMPLATE_HEX_LEN
      && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
    well_formed.then(|| Self(s.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Template {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Validate an upload against `policy` and compute its template.
pub fn extract(
  policy: &UploadPolicy,
  bytes: &[u8],
) -> Result<Template, InvalidImage> {
  policy.inspect(bytes)?;
  Ok(Template::digest(bytes))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    image::ImageFormat,
    testing::{jpeg, png},
  };

  #[test]
  fn identical_bytes_give_identical_templates() {
    let policy = UploadPolicy::default();
    let a = extract(&policy, &png(3)).unwrap();
    let b = extract(&policy, &png(3)).unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn one_byte_difference_changes_template() {
    let original = jpeg(9);
    let mut altered = original.clone();
    let last = altered.len() - 1;
    altered[last] ^= 0x01;

    assert_ne!(Template::digest(&original), Template::digest(&altered));
  }

  #[test]
  fn different_images_give_different_templates() {
    let policy = UploadPolicy::default();
    let a = extract(&policy, &jpeg(9)).unwrap();
    let b = extract(&policy, &jpeg(10)).unwrap();
    assert_ne!(a, b);
  }

  #[test]
  fn undecodable_bytes_produce_no_template() {
    let err = extract(&UploadPolicy::default(), &[0xFF, 0xD8, 0xFF, 0x00])
      .unwrap_err();
    assert_eq!(err, InvalidImage::Undecodable(ImageFormat::Jpeg));
  }

  #[test]
  fn template_is_lowercase_sha256_hex() {
    let t = Template::digest(b"abc");
    assert_eq!(
      t.as_str(),
      "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(Template::parse(t.as_str()), Some(t));
  }

  #[test]
  fn parse_rejects_malformed_values() {
    assert_eq!(Template::parse("abc"), None);
    assert_eq!(Template::parse(&"G".repeat(TEMPLATE_HEX_LEN)), None);
    assert_eq!(Template::parse(&"A".repeat(TEMPLATE_HEX_LEN)), None);
  }

  #[test]
  fn invalid_image_produces_no_template() {
    let err = extract(&UploadPolicy::default(), b"plain text").unwrap_err();
    assert_eq!(err, InvalidImage::UnrecognizedFormat);
  }
}
