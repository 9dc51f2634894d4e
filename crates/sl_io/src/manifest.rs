// crates/sl_io/src/manifest.rs
//
// Run manifest: optional parameter overrides, the named consensus lists, and
// an optional weight file path.
//
// • Offline-only: reject any path with a scheme ("://", "http:", "https:").
// • Relative paths resolve against the manifest's directory.
// • List ids must be unique tokens; queries must be non-empty.
// • When `lists` is absent or empty, the built-in lists are used.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sl_core::Params;

use crate::json::read_json_file;
use crate::{has_scheme, IoError, IoResult};

/// A named consensus list and the search query that locates its page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListSource {
    pub id: String,
    pub query: String,
}

impl ListSource {
    pub fn new(id: impl Into<String>, query: impl Into<String>) -> Self {
        Self { id: id.into(), query: query.into() }
    }
}

/// The five built-in "best-of" lists.
pub fn default_list_sources() -> Vec<ListSource> {
    vec![
        ListSource::new("bfi_sight_sound_critics", "Sight & Sound Greatest Films of All Time 2022"),
        ListSource::new("afi_100_years_100_movies", "AFI's 100 Years...100 Movies"),
        ListSource::new("imdb_top_250", "IMDb Top 250"),
        ListSource::new("letterboxd_top_250", "Letterboxd Top 250"),
        ListSource::new("tspdt", "They Shoot Pictures, Don't They?"),
    ]
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunManifest {
    /// Optional, non-normative identifier.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub params: Option<Params>,
    #[serde(default)]
    pub lists: Vec<ListSource>,
    #[serde(default)]
    pub weight_file: Option<String>,
}

impl RunManifest {
    /// Configured lists, or the built-in ones.
    pub fn list_sources(&self) -> Vec<ListSource> {
        if self.lists.is_empty() {
            default_list_sources()
        } else {
            self.lists.clone()
        }
    }

    /// Weight file path resolved against `base_dir`.
    pub fn weight_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.weight_file.as_deref().map(|s| join_under(base_dir, s))
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 64
        && s.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn join_under(base: &Path, rel: &str) -> PathBuf {
    let p = Path::new(rel);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

/// Shape and offline policy checks. No I/O.
pub fn validate_manifest(man: &RunManifest) -> IoResult<()> {
    let mut seen = BTreeSet::new();
    for l in &man.lists {
        if !is_token(&l.id) {
            return Err(IoError::Manifest(format!("invalid list id: {:?}", l.id)));
        }
        if !seen.insert(l.id.as_str()) {
            return Err(IoError::Manifest(format!("duplicate list id: {}", l.id)));
        }
        if l.query.trim().is_empty() {
            return Err(IoError::Manifest(format!("empty query for list {}", l.id)));
        }
    }
    if let Some(w) = &man.weight_file {
        if w.trim().is_empty() {
            return Err(IoError::Manifest("weight_file must not be empty".into()));
        }
        if has_scheme(w) {
            return Err(IoError::Manifest(format!("weight_file must be a local path: {w}")));
        }
    }
    if let Some(p) = &man.params {
        p.validate_domains()
            .map_err(|e| IoError::Manifest(format!("parameter domain error: {e}")))?;
    }
    Ok(())
}

/// Read → parse → validate.
pub fn load_manifest(path: &Path) -> IoResult<RunManifest> {
    let man: RunManifest = read_json_file(path)?;
    validate_manifest(&man)?;
    Ok(man)
}
