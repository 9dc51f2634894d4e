//! crates/sl_io/src/lib.rs
//! I/O layer for the seed list engine. No network access: every payload is
//! read from local files or handed in by a collaborator.
//!
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - Markup rank extraction, weight files, payload cache and wire decoders.
//! - Atomic JSON writes and SHA-256 helpers.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for sl_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (create_dir_all, rename, fsync, etc.)
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// CSV read/write errors.
    #[error("csv error: {0}")]
    Csv(String),

    /// Run manifest shape or policy violations.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// Generic validation / invariants.
    #[error("invalid: {0}")]
    Invalid(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json {
            pointer: "/".to_string(),
            msg: e.to_string(),
        }
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv(e.to_string())
    }
}

/// Returns true if `s` looks like a URL (any `<scheme>://`, plus bare http(s):).
#[inline]
pub fn has_scheme(s: &str) -> bool {
    let t = s.trim();
    t.contains("://") || t.starts_with("http:") || t.starts_with("https:")
}

pub mod cache;
pub mod hasher;
pub mod json;
pub mod manifest;
pub mod markup;
pub mod payloads;
pub mod weights;
