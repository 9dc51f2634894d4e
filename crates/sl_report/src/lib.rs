//! sl_report/src/lib.rs - offline renderers for the seed list document.
//!
//! - No recompute: everything comes from an already built `SeedListDoc`.
//! - Stable field order (struct layout for JSON, fixed header for CSV).
//! - File names derive from the total budget: `seed_<seed_limit>.{json,csv}`.

#![deny(unsafe_code)]

use std::fmt;
use std::path::{Path, PathBuf};

use sl_pipeline::SeedListDoc;

#[cfg(feature = "render_csv")]
pub mod render_csv;
#[cfg(feature = "render_json")]
pub mod render_json;

#[cfg(feature = "render_csv")]
pub use render_csv::{render_csv, CSV_HEADER};
#[cfg(feature = "render_json")]
pub use render_json::render_json;

// ===== Errors =====
#[derive(Debug)]
pub enum ReportError {
    /// Serializer failure (stage name + message).
    Render(&'static str, String),
    /// Writing an output file failed.
    Write(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Render(stage, m) => write!(f, "render {stage}: {m}"),
            ReportError::Write(m) => write!(f, "write: {m}"),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<sl_io::IoError> for ReportError {
    fn from(e: sl_io::IoError) -> Self {
        ReportError::Write(e.to_string())
    }
}

// ===== Summary =====

/// Header counts of a document, printed as one `key=value` line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub candidates: usize,
    pub fused: usize,
    pub reserved: usize,
    pub remainder: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "candidates={} fused={} reserved={} remainder={}",
            self.candidates, self.fused, self.reserved, self.remainder
        )
    }
}

pub fn summarize(doc: &SeedListDoc) -> Summary {
    Summary {
        candidates: doc.counts.candidates,
        fused: doc.counts.fused_candidates,
        reserved: doc.counts.reserved,
        remainder: doc.counts.remainder,
    }
}

// ===== Output files =====

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path, seed_limit: usize) -> Self {
        Self {
            json: dir.join(format!("seed_{seed_limit}.json")),
            csv: dir.join(format!("seed_{seed_limit}.csv")),
        }
    }
}

/// Render both formats and write them atomically under `dir`.
#[cfg(all(feature = "render_json", feature = "render_csv"))]
pub fn write_outputs(doc: &SeedListDoc, dir: &Path, seed_limit: usize) -> Result<OutputPaths, ReportError> {
    std::fs::create_dir_all(dir).map_err(|e| ReportError::Write(format!("{}: {e}", dir.display())))?;
    let paths = OutputPaths::in_dir(dir, seed_limit);

    let json = render_json(doc)?;
    sl_io::json::write_bytes_atomic(&paths.json, json.as_bytes())?;
    let csv = render_csv(&doc.items)?;
    sl_io::json::write_bytes_atomic(&paths.csv, csv.as_bytes())?;

    tracing::info!(json = %paths.json.display(), csv = %paths.csv.display(), items = doc.items.len(), "outputs written");
    Ok(paths)
}
