//! Core types and workflows for BioAttend, a simulated biometric attendance
//! register.
//!
//! An uploaded image is reduced to a SHA-256 [`Template`](template::Template);
//! enrollment stores it against an identity and verification marks attendance
//! when a later upload hashes to the same template. This crate is free of HTTP
//! and database dependencies; storage backends implement
//! [`AttendanceStore`](store::AttendanceStore).

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod attendance;
pub mod error;
pub mod identity;
pub mod image;
pub mod store;
pub mod template;
pub mod workflow;

pub use error::{Error, Result};

#[cfg(test)]
mod testing;
