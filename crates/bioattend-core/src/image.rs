//! Upload validation ahead of template extraction.
//!
//! Formats are recognised by their file signature, and an upload is only
//! accepted once it decodes in full. Whether a recognised format is accepted
//! at all is decided by the configured [`UploadPolicy`].

use std::{fmt, io::Cursor};

use ::image::{ImageFormat as Codec, ImageReader};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upload ceiling: 16 MiB.
pub const DEFAULT_MAX_BYTES: usize = 16 * 1024 * 1024;

// ─── Formats ─────────────────────────────────────────────────────────────────

/// Raster formats the extractor knows how to recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
  Png,
  #[serde(alias = "jpg")]
  Jpeg,
  Bmp,
  #[serde(alias = "tif")]
  Tiff,
}

impl ImageFormat {
  pub const ALL: [ImageFormat; 4] =
    [Self::Png, Self::Jpeg, Self::Bmp, Self::Tiff];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Png => "png",
      Self::Jpeg => "jpeg",
      Self::Bmp => "bmp",
      Self::Tiff => "tiff",
    }
  }

  /// Identify the format from the leading signature bytes.
  pub fn sniff(bytes: &[u8]) -> Option<Self> {
    ::image::guess_format(bytes).ok().and_then(Self::from_codec)
  }

  fn from_codec(codec: Codec) -> Option<Self> {
    match codec {
      Codec::Png => Some(Self::Png),
      Codec::Jpeg => Some(Self::Jpeg),
      Codec::Bmp => Some(Self::Bmp),
      Codec::Tiff => Some(Self::Tiff),
      _ => None,
    }
  }
}

impl fmt::Display for ImageFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Rejections ──────────────────────────────────────────────────────────────

/// Why an upload was refused before a template could be computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidImage {
  #[error("the upload is empty")]
  Empty,

  #[error("the upload is {size} bytes; the limit is {limit} bytes")]
  TooLarge { size: usize, limit: usize },

  #[error("not a recognised image format")]
  UnrecognizedFormat,

  #[error("{0} images are not accepted")]
  DisallowedFormat(ImageFormat),

  #[error("the {0} data is truncated or corrupt")]
  Undecodable(ImageFormat),
}

// ─── Policy ──────────────────────────────────────────────────────────────────

/// Upload limits applied before template extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
  pub max_bytes:       usize,
  pub allowed_formats: Vec<ImageFormat>,
}

impl Default for UploadPolicy {
  fn default() -> Self {
    Self {
      max_bytes:       DEFAULT_MAX_BYTES,
      allowed_formats: ImageFormat::ALL.to_vec(),
    }
  }
}

impl UploadPolicy {
  /// Validate an upload and return its detected format.
  pub fn inspect(&self, bytes: &[u8]) -> Result<ImageFormat, InvalidImage> {
    if bytes.is_empty() {
      return Err(InvalidImage::Empty);
    }
    if bytes.len() > self.max_bytes {
      return Err(InvalidImage::TooLarge {
        size:  bytes.len(),
        limit: self.max_bytes,
      });
    }

    let reader = ImageReader::new(Cursor::new(bytes))
      .with_guessed_format()
      .map_err(|_| InvalidImage::UnrecognizedFormat)?;
    let format = reader
      .format()
      .and_then(ImageFormat::from_codec)
      .ok_or(InvalidImage::UnrecognizedFormat)?;
    if !self.allowed_formats.contains(&format) {
      return Err(InvalidImage::DisallowedFormat(format));
    }
    reader
      .decode()
      .map_err(|_| InvalidImage::Undecodable(format))?;
    Ok(format)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{bmp, jpeg, png, tiff};

  #[test]
  fn sniffs_every_supported_format() {
    assert_eq!(ImageFormat::sniff(&png(1)), Some(ImageFormat::Png));
    assert_eq!(ImageFormat::sniff(&jpeg(1)), Some(ImageFormat::Jpeg));
    assert_eq!(ImageFormat::sniff(&bmp(1)), Some(ImageFormat::Bmp));
    assert_eq!(ImageFormat::sniff(&tiff(1)), Some(ImageFormat::Tiff));
    assert_eq!(ImageFormat::sniff(b"GIF89a"), None);
  }

  #[test]
  fn default_policy_accepts_well_formed_images() {
    let policy = UploadPolicy::default();
    for (bytes, format) in [
      (png(7), ImageFormat::Png),
      (jpeg(7), ImageFormat::Jpeg),
      (bmp(7), ImageFormat::Bmp),
      (tiff(7), ImageFormat::Tiff),
    ] {
      assert_eq!(policy.inspect(&bytes), Ok(format));
    }
  }

  #[test]
  fn rejects_empty_upload() {
    assert_eq!(UploadPolicy::default().inspect(&[]), Err(InvalidImage::Empty));
  }

  #[test]
  fn rejects_oversized_upload() {
    let policy = UploadPolicy { max_bytes: 16, ..Default::default() };
    let bytes = png(1);
    assert_eq!(
      policy.inspect(&bytes),
      Err(InvalidImage::TooLarge { size: bytes.len(), limit: 16 })
    );
  }

  #[test]
  fn rejects_unknown_signature() {
    assert_eq!(
      UploadPolicy::default().inspect(b"GIF89a\x01\x00\x01\x00"),
      Err(InvalidImage::UnrecognizedFormat)
    );
  }

  #[test]
  fn rejects_formats_outside_the_allow_list() {
    let policy = UploadPolicy {
      allowed_formats: vec![ImageFormat::Png],
      ..Default::default()
    };
    assert_eq!(
      policy.inspect(&jpeg(1)),
      Err(InvalidImage::DisallowedFormat(ImageFormat::Jpeg))
    );
  }

  #[test]
  fn rejects_truncated_png() {
    let bytes = png(1);
    assert_eq!(
      UploadPolicy::default().inspect(&bytes[..20]),
      Err(InvalidImage::Undecodable(ImageFormat::Png))
    );
  }

  #[test]
  fn rejects_jpeg_with_nothing_after_the_signature() {
    let bytes = [0xFF, 0xD8, 0xFF, 0x00];
    assert_eq!(
      UploadPolicy::default().inspect(&bytes),
      Err(InvalidImage::Undecodable(ImageFormat::Jpeg))
    );
  }

  #[test]
  fn rejects_bmp_with_headers_but_no_pixels() {
    let bytes = bmp(1);
    let pixel_offset =
      u32::from_le_bytes(bytes[10..14].try_into().unwrap()) as usize;
    assert_eq!(
      UploadPolicy::default().inspect(&bytes[..pixel_offset]),
      Err(InvalidImage::Undecodable(ImageFormat::Bmp))
    );
  }

  #[test]
  fn rejects_tiff_with_ifd_past_end() {
    let mut bytes = b"II*\0".to_vec();
    bytes.extend_from_slice(&1000u32.to_le_bytes());
    assert_eq!(
      UploadPolicy::default().inspect(&bytes),
      Err(InvalidImage::Undecodable(ImageFormat::Tiff))
    );
  }

  #[test]
  fn policy_deserialises_with_aliases_and_defaults() {
    let policy: UploadPolicy =
      serde_json::from_str(r#"{"allowed_formats":["jpg","tif"]}"#).unwrap();
    assert_eq!(policy.max_bytes, DEFAULT_MAX_BYTES);
    assert_eq!(policy.allowed_formats, vec![ImageFormat::Jpeg, ImageFormat::Tiff]);
  }
}
