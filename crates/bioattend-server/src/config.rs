//! Runtime server configuration, deserialised from `config.toml` and
//! `BIOATTEND_*` environment variables.

use std::path::PathBuf;

use bioattend_core::image::UploadPolicy;
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  #[serde(default = "default_store_path")]
  pub store_path:          PathBuf,
  pub admin_username:      String,
  /// PHC string; generate with `server --hash-password`.
  pub admin_password_hash: String,
  /// `[upload]` table: `max_bytes`, `allowed_formats`.
  #[serde(default)]
  pub upload:              UploadPolicy,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5000 }

fn default_store_path() -> PathBuf { PathBuf::from("attendance.db") }

impl ServerConfig {
  /// Largest request body the JSON routes accept: the base64 expansion of
  /// `upload.max_bytes` plus room for the other fields.
  pub fn body_limit(&self) -> usize {
    self.upload.max_bytes.div_ceil(3) * 4 + 64 * 1024
  }
}
