//! crates/sl_io/src/cache.rs
//! Directory-backed JSON payload cache.
//!
//! Keys are sanitized (`[^A-Za-z0-9._-]` → `_`) and stored as `<key>.json`.
//! Reads and writes are gated independently; writes are atomic, so two
//! workers writing the same key race harmlessly.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::json::{read_json_file, write_json_file};
use crate::payloads::encode_article;
use crate::IoResult;

/// Key of the aggregate entity-bindings payload.
pub const ENTITIES_KEY: &str = "entities";

#[derive(Debug, Clone)]
pub struct PayloadCache {
    dir: PathBuf,
    read_enabled: bool,
    write_enabled: bool,
}

impl PayloadCache {
    /// Read-only cache over `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), read_enabled: true, write_enabled: false }
    }

    pub fn with_reads(mut self, on: bool) -> Self {
        self.read_enabled = on;
        self
    }

    pub fn with_writes(mut self, on: bool) -> Self {
        self.write_enabled = on;
        self
    }

    /// File backing `key`.
    pub fn cache_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read_enabled && self.cache_path(key).is_file()
    }

    /// Cached payload for `key`; `None` when absent or reads are disabled.
    pub fn get_value(&self, key: &str) -> IoResult<Option<Value>> {
        self.get(key)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> IoResult<Option<T>> {
        if !self.contains(key) {
            return Ok(None);
        }
        read_json_file(&self.cache_path(key)).map(Some)
    }

    /// Store `value` under `key`. Returns `false` when writes are disabled.
    pub fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> IoResult<bool> {
        if !self.write_enabled {
            return Ok(false);
        }
        write_json_file(&self.cache_path(key), value)?;
        Ok(true)
    }
}

/// Replace every char outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect()
}

// ----------------------------- Key builders -----------------------------

/// Monthly top list: `top_<yyyy>_<mm>`.
pub fn top_key(year: i32, month: u32) -> String {
    format!("top_{year}_{month:02}")
}

/// Per-article daily series: `pv_<encoded article>_<start>_<end>`.
pub fn pageviews_key(title: &str, start: &str, end: &str) -> String {
    format!("pv_{}_{start}_{end}", encode_article(title))
}

/// Open-search result for a list query.
pub fn search_key(query: &str) -> String {
    format!("search_{query}")
}

/// Parsed page HTML.
pub fn parse_key(page: &str) -> String {
    format!("parse_{page}")
}
