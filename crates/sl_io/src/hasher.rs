//! crates/sl_io/src/hasher.rs
//!
//! SHA-256 helpers. Hex digests are **lowercase**.
//! - `sha256_hex` / `sha256_file` for raw bytes and files
//! - `batch_key` derives a stable cache key for a batch of titles

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::IoResult;

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 over a file's contents (streamed).
pub fn sha256_file(path: &Path) -> IoResult<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// `<prefix>_<sha256 of titles joined by LF>`. Order-sensitive.
pub fn batch_key<S: AsRef<str>>(prefix: &str, titles: &[S]) -> String {
    let mut hasher = Sha256::new();
    for (i, t) in titles.iter().enumerate() {
        if i > 0 {
            hasher.update(b"\n");
        }
        hasher.update(t.as_ref().as_bytes());
    }
    format!("{prefix}_{}", hex::encode(hasher.finalize()))
}
